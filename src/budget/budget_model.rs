use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};

/// Domain model for a budget category.
///
/// `spent_amount` is derived from the transaction ledger and is only ever
/// written by the ledger maintainer, never by a client payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub budget_amount: Decimal,
    pub spent_amount: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for budget categories
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::budget_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetCategoryDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub budget_amount: String,
    pub spent_amount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<BudgetCategoryDB> for BudgetCategory {
    fn from(db: BudgetCategoryDB) -> Self {
        BudgetCategory {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            budget_amount: db.budget_amount.parse().unwrap_or_default(),
            spent_amount: db.spent_amount.parse().unwrap_or_default(),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for creating a budget category. There is deliberately no
/// spent-amount field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetCategory {
    pub name: String,
    pub budget_amount: Decimal,
}

impl NewBudgetCategory {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.budget_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "budgetAmount".to_string(),
                "budget amount must be positive".to_string(),
            )));
        }
        Ok(())
    }

    pub(crate) fn into_db(self, user_id: &str, initial_spent: Decimal) -> BudgetCategoryDB {
        let now = Utc::now().naive_utc();
        BudgetCategoryDB {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: self.name.trim().to_string(),
            budget_amount: self.budget_amount.to_string(),
            spent_amount: initial_spent.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input model for updating a budget category; spent amount is absent by
/// design.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategoryUpdate {
    pub id: String,
    pub name: Option<String>,
    pub budget_amount: Option<Decimal>,
}
