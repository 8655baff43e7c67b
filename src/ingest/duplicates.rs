use crate::constants::DUPLICATE_WINDOW_DAYS;
use crate::ingest::normalizer::TransactionDraft;
use crate::transactions::Transaction;

/// Soft duplicate classifier: same amount, calendar date within the lookback
/// window, and the same or highly similar merchant text. A positive signal
/// marks the draft, it never blocks creation.
pub fn looks_like_duplicate(draft: &TransactionDraft, recent: &[Transaction]) -> bool {
    let draft_merchant = normalize_merchant(&draft.merchant);
    let draft_date = draft.date.date();

    recent.iter().any(|existing| {
        if existing.amount != draft.amount || existing.transaction_type != draft.transaction_type {
            return false;
        }
        let day_gap = (existing.transaction_date.date() - draft_date).num_days().abs();
        if day_gap > DUPLICATE_WINDOW_DAYS {
            return false;
        }
        merchants_similar(&draft_merchant, &normalize_merchant(&existing.merchant))
    })
}

/// Lowercases and strips store numbers, punctuation and extra whitespace so
/// "STARBUCKS #123" and "Starbucks 0456" compare equal.
fn normalize_merchant(merchant: &str) -> String {
    merchant
        .to_lowercase()
        .split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|token| !token.is_empty() && !token.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn merchants_similar(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    a == b || a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SOURCE_MANUAL, TRANSACTION_TYPE_EXPENSE, TRANSACTION_TYPE_INCOME};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn draft(amount: Decimal, merchant: &str, date: NaiveDate) -> TransactionDraft {
        TransactionDraft {
            user_id: "user-1".to_string(),
            amount,
            transaction_type: TRANSACTION_TYPE_EXPENSE.to_string(),
            merchant: merchant.to_string(),
            category: "Dining".to_string(),
            subcategory: None,
            account_label: None,
            date: date.and_hms_opt(12, 0, 0).unwrap(),
            source: SOURCE_MANUAL.to_string(),
            taxonomy: None,
        }
    }

    fn existing(amount: Decimal, merchant: &str, date: NaiveDate) -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            user_id: "user-1".to_string(),
            amount,
            transaction_type: TRANSACTION_TYPE_EXPENSE.to_string(),
            merchant: merchant.to_string(),
            category: "Dining".to_string(),
            subcategory: None,
            account_label: None,
            transaction_date: date.and_hms_opt(12, 0, 0).unwrap(),
            source: SOURCE_MANUAL.to_string(),
            is_duplicate: false,
            icon: None,
            color: None,
            created_at: date.and_hms_opt(12, 0, 0).unwrap(),
            updated_at: date.and_hms_opt(12, 0, 0).unwrap(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn same_amount_merchant_and_adjacent_date_is_flagged() {
        let candidate = draft(dec!(45.00), "STARBUCKS #123", day(17));
        let ledger = vec![existing(dec!(45.00), "Starbucks 0456", day(15))];
        assert!(looks_like_duplicate(&candidate, &ledger));
    }

    #[test]
    fn dates_outside_the_window_are_not_flagged() {
        let candidate = draft(dec!(45.00), "STARBUCKS #123", day(25));
        let ledger = vec![existing(dec!(45.00), "STARBUCKS #123", day(15))];
        assert!(!looks_like_duplicate(&candidate, &ledger));
    }

    #[test]
    fn different_amounts_are_not_flagged() {
        let candidate = draft(dec!(45.01), "STARBUCKS #123", day(17));
        let ledger = vec![existing(dec!(45.00), "STARBUCKS #123", day(17))];
        assert!(!looks_like_duplicate(&candidate, &ledger));
    }

    #[test]
    fn income_and_expense_of_same_amount_do_not_collide() {
        let mut candidate = draft(dec!(45.00), "ACME CORP", day(17));
        candidate.transaction_type = TRANSACTION_TYPE_INCOME.to_string();
        let ledger = vec![existing(dec!(45.00), "ACME CORP", day(17))];
        assert!(!looks_like_duplicate(&candidate, &ledger));
    }

    #[test]
    fn unrelated_merchants_are_not_flagged() {
        let candidate = draft(dec!(45.00), "Whole Foods", day(17));
        let ledger = vec![existing(dec!(45.00), "Shell Gas", day(17))];
        assert!(!looks_like_duplicate(&candidate, &ledger));
    }
}
