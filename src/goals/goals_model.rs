use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};

/// Domain model for a savings goal.
///
/// `current_amount` moves only through explicit add-amount deltas so the
/// month-keyed contribution ledger stays consistent with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub progress_percentage: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for savings goals
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::savings_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SavingsGoalDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub target_date: Option<NaiveDate>,
    pub progress_percentage: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SavingsGoalDB> for SavingsGoal {
    fn from(db: SavingsGoalDB) -> Self {
        SavingsGoal {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            target_amount: db.target_amount.parse().unwrap_or_default(),
            current_amount: db.current_amount.parse().unwrap_or_default(),
            target_date: db.target_date,
            progress_percentage: db.progress_percentage,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for creating a savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Option<NaiveDate>,
}

impl NewSavingsGoal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "targetAmount".to_string(),
                "target amount must be positive".to_string(),
            )));
        }
        Ok(())
    }

    pub(crate) fn into_db(self, user_id: &str) -> SavingsGoalDB {
        let now = Utc::now().naive_utc();
        SavingsGoalDB {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: self.name.trim().to_string(),
            target_amount: self.target_amount.to_string(),
            current_amount: Decimal::ZERO.to_string(),
            target_date: self.target_date,
            progress_percentage: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input model for updating goal metadata; `current_amount` is not settable
/// here, only the add-amount operation moves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalUpdate {
    pub id: String,
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub target_date: Option<NaiveDate>,
}

/// One month's worth of contributions to a goal. Append-only from the
/// caller's point of view; deltas within the same month merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalContribution {
    pub id: String,
    pub goal_id: String,
    pub user_id: String,
    /// Calendar month key, `YYYY-MM`.
    pub month: String,
    pub amount: Decimal,
    pub updated_at: NaiveDateTime,
}

/// Database model for goal contributions
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::goal_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalContributionDB {
    pub id: String,
    pub goal_id: String,
    pub user_id: String,
    pub month: String,
    pub amount: String,
    pub updated_at: NaiveDateTime,
}

impl From<GoalContributionDB> for GoalContribution {
    fn from(db: GoalContributionDB) -> Self {
        GoalContribution {
            id: db.id,
            goal_id: db.goal_id,
            user_id: db.user_id,
            month: db.month,
            amount: db.amount.parse().unwrap_or_default(),
            updated_at: db.updated_at,
        }
    }
}
