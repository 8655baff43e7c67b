use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::{CategoryAssignment, RawTransactionInput, TransactionDraft};

/// Domain model for a canonical transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub transaction_type: String,
    pub merchant: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub account_label: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub source: String,
    pub is_duplicate: bool,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for transactions. Amounts are stored as decimal strings.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub amount: String,
    pub transaction_type: String,
    pub merchant: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub account_label: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub source: String,
    pub is_duplicate: bool,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Transaction {
            id: db.id,
            user_id: db.user_id,
            amount: db.amount.parse().unwrap_or_default(),
            transaction_type: db.transaction_type,
            merchant: db.merchant,
            category: db.category,
            subcategory: db.subcategory,
            account_label: db.account_label,
            transaction_date: db.transaction_date,
            source: db.source,
            is_duplicate: db.is_duplicate,
            icon: db.icon,
            color: db.color,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl TransactionDB {
    /// Builds an insertable row from a normalized draft and its category
    /// assignment.
    pub fn from_draft(
        draft: &TransactionDraft,
        assignment: &CategoryAssignment,
        is_duplicate: bool,
    ) -> Self {
        let now = Utc::now().naive_utc();
        TransactionDB {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id.clone(),
            amount: draft.amount.to_string(),
            transaction_type: draft.transaction_type.clone(),
            merchant: draft.merchant.clone(),
            category: assignment.category.clone(),
            subcategory: draft.subcategory.clone(),
            account_label: draft.account_label.clone(),
            transaction_date: draft.date,
            source: draft.source.clone(),
            is_duplicate,
            icon: Some(assignment.icon.clone()),
            color: Some(assignment.color.clone()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Full-replacement update payload; the raw fields run through the same
/// normalizer as a create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: String,
    #[serde(flatten)]
    pub input: RawTransactionInput,
    /// Caller's explicit override of the duplicate flag, if any.
    pub is_duplicate: Option<bool>,
}

/// Filters for transaction listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub transaction_type: Option<String>,
    pub from_date: Option<chrono::NaiveDate>,
    pub to_date: Option<chrono::NaiveDate>,
    pub search: Option<String>,
}

/// Per-row failure in a batch import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRowError {
    pub index: usize,
    pub message: String,
}

/// Structured outcome of a batch import: partial success is reported, never
/// thrown away because one row was bad.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchImportSummary {
    pub success: usize,
    pub errors: Vec<BatchRowError>,
}
