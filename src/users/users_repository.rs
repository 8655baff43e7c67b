use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::users;
use crate::users::users_model::{OnboardingStage, User, UserDB};

/// Milestone events that can move the onboarding stage and touch the
/// matching activity timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    Login,
    TransactionAdded,
    BudgetUpdated,
    GoalUpdated,
}

pub struct UserRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl UserRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        Self::find(&mut conn, user_id).map(User::from)
    }

    pub(crate) fn find(conn: &mut SqliteConnection, user_id: &str) -> Result<UserDB> {
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    pub(crate) fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<UserDB>> {
        users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .select(UserDB::as_select())
            .first::<UserDB>(conn)
            .optional()
            .map_err(Error::from)
    }

    pub(crate) fn insert(conn: &mut SqliteConnection, row: &UserDB) -> Result<User> {
        diesel::insert_into(users::table)
            .values(row)
            .returning(UserDB::as_returning())
            .get_result::<UserDB>(conn)
            .map(User::from)
            .map_err(Error::from)
    }

    /// Records an activity event: touches the matching timestamp and, if the
    /// event is a milestone past the current stage, advances the stage.
    /// Never moves the stage backward.
    pub(crate) fn record_event(
        conn: &mut SqliteConnection,
        user_id: &str,
        event: ActivityEvent,
    ) -> Result<User> {
        let mut row = Self::find(conn, user_id)?;
        let now = Utc::now().naive_utc();

        let milestone = match event {
            ActivityEvent::Login => {
                row.last_login_at = Some(now);
                None
            }
            ActivityEvent::TransactionAdded => {
                row.last_transaction_at = Some(now);
                Some(OnboardingStage::TransactionAdded)
            }
            ActivityEvent::BudgetUpdated => {
                row.last_budget_update_at = Some(now);
                Some(OnboardingStage::BudgetCreated)
            }
            ActivityEvent::GoalUpdated => {
                row.last_goal_update_at = Some(now);
                Some(OnboardingStage::GoalCreated)
            }
        };

        if let Some(milestone) = milestone {
            let current = OnboardingStage::from_str(&row.onboarding_stage);
            let mut advanced = current.advanced_to(milestone);
            // All three milestones hit, in any order, completes onboarding.
            if row.last_budget_update_at.is_some()
                && row.last_transaction_at.is_some()
                && row.last_goal_update_at.is_some()
            {
                advanced = OnboardingStage::Completed;
            }
            row.onboarding_stage = advanced.as_str().to_string();
        }

        row.updated_at = now;
        diesel::update(users::table.find(&row.id))
            .set(&row)
            .returning(UserDB::as_returning())
            .get_result::<UserDB>(conn)
            .map(User::from)
            .map_err(Error::from)
    }

    pub(crate) fn delete(conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        diesel::delete(users::table.find(user_id))
            .execute(conn)
            .map_err(Error::from)
    }
}
