use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};

/// Onboarding milestones, in order. The stage only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStage {
    #[default]
    New,
    BudgetCreated,
    TransactionAdded,
    GoalCreated,
    Completed,
}

impl OnboardingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStage::New => "new",
            OnboardingStage::BudgetCreated => "budget_created",
            OnboardingStage::TransactionAdded => "transaction_added",
            OnboardingStage::GoalCreated => "goal_created",
            OnboardingStage::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "budget_created" => OnboardingStage::BudgetCreated,
            "transaction_added" => OnboardingStage::TransactionAdded,
            "goal_created" => OnboardingStage::GoalCreated,
            "completed" => OnboardingStage::Completed,
            _ => OnboardingStage::New,
        }
    }

    /// Monotonic advance: the later of the current stage and the milestone.
    pub fn advanced_to(self, milestone: OnboardingStage) -> Self {
        self.max(milestone)
    }
}

/// Domain model for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub onboarding_stage: OnboardingStage,
    pub last_login_at: Option<NaiveDateTime>,
    pub last_transaction_at: Option<NaiveDateTime>,
    pub last_goal_update_at: Option<NaiveDateTime>,
    pub last_budget_update_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for users
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub onboarding_stage: String,
    pub last_login_at: Option<NaiveDateTime>,
    pub last_transaction_at: Option<NaiveDateTime>,
    pub last_goal_update_at: Option<NaiveDateTime>,
    pub last_budget_update_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        User {
            id: db.id,
            email: db.email,
            display_name: db.display_name,
            onboarding_stage: OnboardingStage::from_str(&db.onboarding_stage),
            last_login_at: db.last_login_at,
            last_transaction_at: db.last_transaction_at,
            last_goal_update_at: db.last_goal_update_at,
            last_budget_update_at: db.last_budget_update_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub display_name: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "email".to_string(),
            )));
        }
        if !email.contains('@') {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            ))));
        }
        Ok(())
    }

    pub(crate) fn into_db(self) -> UserDB {
        let now = Utc::now().naive_utc();
        UserDB {
            id: Uuid::new_v4().to_string(),
            email: self.email.trim().to_lowercase(),
            display_name: self.display_name.filter(|n| !n.trim().is_empty()),
            onboarding_stage: OnboardingStage::New.as_str().to_string(),
            last_login_at: None,
            last_transaction_at: None,
            last_goal_update_at: None,
            last_budget_update_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboarding_stage_never_regresses() {
        let stage = OnboardingStage::GoalCreated;
        assert_eq!(
            stage.advanced_to(OnboardingStage::BudgetCreated),
            OnboardingStage::GoalCreated
        );
        assert_eq!(
            stage.advanced_to(OnboardingStage::Completed),
            OnboardingStage::Completed
        );
    }

    #[test]
    fn unknown_stage_string_defaults_to_new() {
        assert_eq!(OnboardingStage::from_str("garbage"), OnboardingStage::New);
    }
}
