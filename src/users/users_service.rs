use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::budget::budget_repository::BudgetRepository;
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_repository::GoalRepository;
use crate::linked_accounts::linked_accounts_repository::LinkedAccountRepository;
use crate::nudges::nudges_repository::NudgeRepository;
use crate::nudges::nudges_service::evaluate_for_user;
use crate::score::score_repository::ScoreRepository;
use crate::score::score_service::recompute_for_user;
use crate::transactions::transactions_repository::TransactionRepository;
use crate::users::users_model::{NewUser, User};
use crate::users::users_repository::{ActivityEvent, UserRepository};
use crate::users::users_traits::UserServiceTrait;

pub struct UserService {
    pool: Arc<DbPool>,
    repository: Arc<UserRepository>,
}

impl UserService {
    pub fn new(pool: Arc<DbPool>, repository: Arc<UserRepository>) -> Self {
        Self { pool, repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_user(user_id)
    }

    async fn register(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;

        self.pool.execute(move |conn| {
            if UserRepository::find_by_email(conn, &new_user.email)?.is_some() {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "A user with email '{}' already exists",
                    new_user.email.trim().to_lowercase()
                ))));
            }

            let created = UserRepository::insert(conn, &new_user.into_db())?;
            info!("registered user {}", created.id);

            // A fresh account starts with a baseline score and the first
            // onboarding nudge already in place.
            recompute_for_user(conn, &created.id, "account created")?;
            evaluate_for_user(conn, &created.id)?;
            Ok(created)
        })
    }

    async fn record_login(&self, user_id: &str) -> Result<User> {
        let user_id = user_id.to_string();

        self.pool.execute(move |conn| {
            let user = UserRepository::record_event(conn, &user_id, ActivityEvent::Login)?;
            recompute_for_user(conn, &user_id, "login")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(user)
        })
    }

    async fn delete_account(&self, user_id: &str) -> Result<()> {
        let user_id = user_id.to_string();

        self.pool.execute(move |conn| {
            // Existence check up front so deleting an unknown id is a
            // NotFound, not a silent no-op.
            UserRepository::find(conn, &user_id)?;

            TransactionRepository::delete_all_for_user(conn, &user_id)?;
            BudgetRepository::delete_all_for_user(conn, &user_id)?;
            GoalRepository::delete_all_for_user(conn, &user_id)?;
            NudgeRepository::delete_all_for_user(conn, &user_id)?;
            ScoreRepository::delete_all_for_user(conn, &user_id)?;
            LinkedAccountRepository::delete_all_for_user(conn, &user_id)?;
            UserRepository::delete(conn, &user_id)?;

            info!("deleted account {} and all owned records", user_id);
            Ok(())
        })
    }
}
