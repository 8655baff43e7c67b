use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_model::{GoalContribution, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
use crate::goals::goals_repository::GoalRepository;
use crate::goals::goals_traits::GoalServiceTrait;
use crate::ledger;
use crate::nudges::nudges_service::evaluate_for_user;
use crate::score::score_service::recompute_for_user;
use crate::users::users_repository::{ActivityEvent, UserRepository};

pub struct GoalService {
    pool: Arc<DbPool>,
    repository: Arc<GoalRepository>,
}

impl GoalService {
    pub fn new(pool: Arc<DbPool>, repository: Arc<GoalRepository>) -> Self {
        Self { pool, repository }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        self.repository.get_goals(user_id)
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        self.repository.get_goal(user_id, goal_id)
    }

    fn get_contributions(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalContribution>> {
        self.repository.get_contributions(user_id, goal_id)
    }

    async fn create_goal(&self, user_id: &str, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        new_goal.validate()?;
        let user_id = user_id.to_string();

        self.pool.execute(move |conn| {
            let row = new_goal.into_db(&user_id);
            let created = GoalRepository::insert(conn, &row)?;

            UserRepository::record_event(conn, &user_id, ActivityEvent::GoalUpdated)?;
            recompute_for_user(conn, &user_id, "goal created")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(created)
        })
    }

    async fn update_goal(&self, user_id: &str, update: SavingsGoalUpdate) -> Result<SavingsGoal> {
        let user_id = user_id.to_string();

        self.pool.execute(move |conn| {
            let mut row = GoalRepository::find_scoped(conn, &user_id, &update.id)?;

            if let Some(name) = &update.name {
                if name.trim().is_empty() {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "name".to_string(),
                    )));
                }
                row.name = name.trim().to_string();
            }

            if let Some(target) = update.target_amount {
                if target <= Decimal::ZERO {
                    return Err(Error::Validation(ValidationError::InvalidAmount(
                        "targetAmount".to_string(),
                        "target amount must be positive".to_string(),
                    )));
                }
                // A new target changes how far along the goal is.
                let current: Decimal = row.current_amount.parse().unwrap_or_default();
                row.target_amount = target.to_string();
                row.progress_percentage = ledger::progress_percentage(current, target);
            }

            if let Some(date) = update.target_date {
                row.target_date = Some(date);
            }

            row.updated_at = Utc::now().naive_utc();
            let updated = GoalRepository::update(conn, &row)?;

            UserRepository::record_event(conn, &user_id, ActivityEvent::GoalUpdated)?;
            recompute_for_user(conn, &user_id, "goal updated")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(updated)
        })
    }

    async fn add_amount(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: Decimal,
    ) -> Result<SavingsGoal> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "amount".to_string(),
                "contribution amount must be positive".to_string(),
            )));
        }
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();

        self.pool.execute(move |conn| {
            let saved = ledger::add_goal_amount(conn, &user_id, &goal_id, amount)?;

            UserRepository::record_event(conn, &user_id, ActivityEvent::GoalUpdated)?;
            recompute_for_user(conn, &user_id, "goal funded")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(saved)
        })
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();

        self.pool.execute(move |conn| {
            let row = GoalRepository::find_scoped(conn, &user_id, &goal_id)?;
            GoalRepository::delete(conn, &goal_id)?;

            recompute_for_user(conn, &user_id, "goal deleted")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(SavingsGoal::from(row))
        })
    }
}
