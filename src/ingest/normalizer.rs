use chrono::{NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AMOUNT_DECIMAL_PRECISION, CANONICAL_HOUR, CATEGORY_UNCATEGORIZED, TRANSACTION_TYPE_EXPENSE,
    TRANSACTION_TYPE_INCOME,
};
use crate::errors::{Error, Result, ValidationError};

lazy_static! {
    /// Everything that is not a digit, decimal point or sign gets stripped
    /// from textual amounts (currency symbols, thousands separators, spaces).
    static ref AMOUNT_SCRUB: Regex = Regex::new(r"[^0-9.\-]").expect("valid regex");
    static ref ISO_DATE: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex");
}

/// Raw amount as supplied by an ingestion channel. Bank feeds send numbers,
/// file imports send whatever was in the cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// Raw date as supplied by an ingestion channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Parsed(NaiveDateTime),
    Text(String),
}

/// Channel-agnostic raw input for one transaction. The `user_id` field is
/// whatever the payload claimed; it is always discarded during
/// normalization in favor of the authenticated caller's id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionInput {
    pub user_id: Option<String>,
    pub amount: Option<RawAmount>,
    pub transaction_type: Option<String>,
    pub merchant: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub account_label: Option<String>,
    pub date: Option<RawDate>,
    /// Provider taxonomy path, most general label first.
    pub taxonomy: Option<Vec<String>>,
}

/// Canonical transaction draft: fixed date convention, unsigned amount plus
/// explicit type, non-null category, owner pinned to the authenticated user.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub user_id: String,
    pub amount: Decimal,
    pub transaction_type: String,
    pub merchant: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub account_label: Option<String>,
    pub date: NaiveDateTime,
    pub source: String,
    pub taxonomy: Option<Vec<String>>,
}

/// Normalizes raw channel input into a canonical draft, or fails with a
/// `Validation` error naming the first offending field.
///
/// `authenticated_user_id` is mandatory and non-overridable: whatever the
/// payload claims as owner is thrown away here.
pub fn normalize(
    authenticated_user_id: &str,
    raw: RawTransactionInput,
    source: &str,
) -> Result<TransactionDraft> {
    let merchant = raw
        .merchant
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| Error::Validation(ValidationError::MissingField("merchant".to_string())))?
        .to_string();

    let raw_amount = raw
        .amount
        .ok_or_else(|| Error::Validation(ValidationError::MissingField("amount".to_string())))?;
    let signed = parse_amount(&raw_amount)?;

    let declared_type = match raw.transaction_type.as_deref().map(str::trim) {
        Some(t) if t.eq_ignore_ascii_case("income") => Some(TRANSACTION_TYPE_INCOME),
        Some(t) if t.eq_ignore_ascii_case("expense") => Some(TRANSACTION_TYPE_EXPENSE),
        Some("") | None => None,
        Some(other) => {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transaction type '{}'",
                other
            ))))
        }
    };

    // A negative raw amount always wins over whatever type was declared.
    let transaction_type = if signed < Decimal::ZERO {
        TRANSACTION_TYPE_EXPENSE
    } else {
        declared_type.unwrap_or(TRANSACTION_TYPE_EXPENSE)
    };

    let amount = signed.abs().round_dp(AMOUNT_DECIMAL_PRECISION);
    if amount.is_zero() {
        return Err(Error::Validation(ValidationError::InvalidAmount(
            "amount".to_string(),
            "zero-amount transactions are rejected".to_string(),
        )));
    }

    let category = raw
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| CATEGORY_UNCATEGORIZED.to_string());

    Ok(TransactionDraft {
        user_id: authenticated_user_id.to_string(),
        amount,
        transaction_type: transaction_type.to_string(),
        merchant,
        category,
        subcategory: raw.subcategory.filter(|s| !s.trim().is_empty()),
        account_label: raw.account_label.filter(|s| !s.trim().is_empty()),
        date: resolve_date(raw.date.as_ref()),
        source: source.to_string(),
        taxonomy: raw.taxonomy.filter(|t| !t.is_empty()),
    })
}

/// Parses a raw amount into a signed decimal. Textual input is scrubbed of
/// currency symbols and separators first; accounting-style parentheses mean
/// negative.
fn parse_amount(raw: &RawAmount) -> Result<Decimal> {
    match raw {
        RawAmount::Number(n) => {
            if !n.is_finite() {
                return Err(Error::Validation(ValidationError::InvalidAmount(
                    "amount".to_string(),
                    format!("{} is not a finite number", n),
                )));
            }
            Decimal::from_f64(*n).ok_or_else(|| {
                Error::Validation(ValidationError::InvalidAmount(
                    "amount".to_string(),
                    format!("{} is out of range", n),
                ))
            })
        }
        RawAmount::Text(text) => {
            let trimmed = text.trim();
            let parenthesized = trimmed.starts_with('(') && trimmed.ends_with(')');
            let scrubbed = AMOUNT_SCRUB.replace_all(trimmed, "");
            let mut value: Decimal = scrubbed.parse().map_err(|_| {
                Error::Validation(ValidationError::InvalidAmount(
                    "amount".to_string(),
                    format!("'{}' is not a number", text),
                ))
            })?;
            if parenthesized {
                value = -value.abs();
            }
            Ok(value)
        }
    }
}

/// Resolves a raw date to the canonical noon-pinned timestamp.
///
/// ISO `YYYY-MM-DD` strings are split into components rather than parsed
/// through a timezone-aware path, so the calendar date survives later
/// serialization regardless of server timezone. Anything unparseable falls
/// back to today.
pub(crate) fn resolve_date(raw: Option<&RawDate>) -> NaiveDateTime {
    let today = Utc::now().date_naive();

    let date = match raw {
        Some(RawDate::Parsed(dt)) => dt.date(),
        Some(RawDate::Text(text)) => parse_date_text(text.trim()).unwrap_or(today),
        None => today,
    };

    at_noon(date)
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    // Permissive fallback for free-form channel data.
    const FORMATS: [&str; 6] = [
        "%m/%d/%Y",
        "%m/%d/%y",
        "%Y/%m/%d",
        "%b %d, %Y",
        "%d %b %Y",
        "%B %d, %Y",
    ];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    None
}

pub(crate) fn at_noon(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(CANONICAL_HOUR, 0, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SOURCE_MANUAL;
    use rust_decimal_macros::dec;

    fn raw(amount: RawAmount, merchant: &str) -> RawTransactionInput {
        RawTransactionInput {
            amount: Some(amount),
            merchant: Some(merchant.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn negative_amount_forces_expense_with_positive_magnitude() {
        let mut input = raw(RawAmount::Number(-45.0), "STARBUCKS #123");
        input.transaction_type = Some("income".to_string());

        let draft = normalize("user-1", input, SOURCE_MANUAL).unwrap();
        assert_eq!(draft.amount, dec!(45.00));
        assert_eq!(draft.transaction_type, TRANSACTION_TYPE_EXPENSE);
    }

    #[test]
    fn textual_amount_is_scrubbed_before_parsing() {
        let draft = normalize(
            "user-1",
            raw(RawAmount::Text("$1,234.56".to_string()), "Rent"),
            SOURCE_MANUAL,
        )
        .unwrap();
        assert_eq!(draft.amount, dec!(1234.56));
    }

    #[test]
    fn parenthesized_amount_is_negative() {
        let draft = normalize(
            "user-1",
            raw(RawAmount::Text("($20.00)".to_string()), "Refund reversal"),
            SOURCE_MANUAL,
        )
        .unwrap();
        assert_eq!(draft.amount, dec!(20.00));
        assert_eq!(draft.transaction_type, TRANSACTION_TYPE_EXPENSE);
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let err = normalize(
            "user-1",
            raw(RawAmount::Text("abc".to_string()), "Mystery"),
            SOURCE_MANUAL,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = normalize(
            "user-1",
            raw(RawAmount::Number(0.0), "Free sample"),
            SOURCE_MANUAL,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_merchant_is_rejected() {
        let input = RawTransactionInput {
            amount: Some(RawAmount::Number(12.0)),
            merchant: Some("   ".to_string()),
            ..Default::default()
        };
        let err = normalize("user-1", input, SOURCE_MANUAL).unwrap_err();
        assert!(err.to_string().contains("merchant"));
    }

    #[test]
    fn payload_user_id_is_always_discarded() {
        let mut input = raw(RawAmount::Number(10.0), "Cafe");
        input.user_id = Some("someone-else".to_string());

        let draft = normalize("caller", input, SOURCE_MANUAL).unwrap();
        assert_eq!(draft.user_id, "caller");
    }

    #[test]
    fn iso_date_is_pinned_to_noon_of_that_calendar_day() {
        let mut input = raw(RawAmount::Number(5.0), "Cafe");
        input.date = Some(RawDate::Text("2025-05-17".to_string()));

        let draft = normalize("user-1", input, SOURCE_MANUAL).unwrap();
        assert_eq!(
            draft.date,
            NaiveDate::from_ymd_opt(2025, 5, 17).unwrap().and_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn invalid_calendar_date_falls_back_to_today() {
        let mut input = raw(RawAmount::Number(5.0), "Cafe");
        input.date = Some(RawDate::Text("2025-02-30".to_string()));

        let draft = normalize("user-1", input, SOURCE_MANUAL).unwrap();
        assert_eq!(draft.date.date(), Utc::now().date_naive());
    }

    #[test]
    fn free_form_date_is_parsed_permissively() {
        let mut input = raw(RawAmount::Number(5.0), "Cafe");
        input.date = Some(RawDate::Text("05/17/2025".to_string()));

        let draft = normalize("user-1", input, SOURCE_MANUAL).unwrap();
        assert_eq!(draft.date.date(), NaiveDate::from_ymd_opt(2025, 5, 17).unwrap());
    }

    #[test]
    fn missing_category_defaults_to_uncategorized() {
        let draft = normalize(
            "user-1",
            raw(RawAmount::Number(5.0), "Cafe"),
            SOURCE_MANUAL,
        )
        .unwrap();
        assert_eq!(draft.category, CATEGORY_UNCATEGORIZED);
    }
}
