use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::budget::budget_model::{BudgetCategory, BudgetCategoryUpdate, NewBudgetCategory};
use crate::budget::budget_repository::BudgetRepository;
use crate::budget::budget_traits::BudgetServiceTrait;
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::{Error, Result, ValidationError};
use crate::ledger;
use crate::nudges::nudges_service::evaluate_for_user;
use crate::score::score_service::recompute_for_user;
use crate::users::users_repository::{ActivityEvent, UserRepository};

pub struct BudgetService {
    pool: Arc<DbPool>,
    repository: Arc<BudgetRepository>,
}

impl BudgetService {
    pub fn new(pool: Arc<DbPool>, repository: Arc<BudgetRepository>) -> Self {
        Self { pool, repository }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn get_categories(&self, user_id: &str) -> Result<Vec<BudgetCategory>> {
        self.repository.get_categories(user_id)
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<BudgetCategory> {
        self.repository.get_category(user_id, category_id)
    }

    async fn create_category(
        &self,
        user_id: &str,
        new_category: NewBudgetCategory,
    ) -> Result<BudgetCategory> {
        new_category.validate()?;
        let user_id = user_id.to_string();

        self.pool.execute(move |conn| {
            if BudgetRepository::find_by_name(conn, &user_id, &new_category.name)?.is_some() {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Budget category '{}' already exists",
                    new_category.name.trim()
                ))));
            }

            // Seed spent from the ledger so categories created after their
            // transactions still start reconciled.
            let initial_spent = ledger::recompute_spent(conn, &user_id, &new_category.name)?;
            let row = new_category.into_db(&user_id, initial_spent);
            let created = BudgetRepository::insert(conn, &row)?;

            UserRepository::record_event(conn, &user_id, ActivityEvent::BudgetUpdated)?;
            recompute_for_user(conn, &user_id, "budget created")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(created)
        })
    }

    async fn update_category(
        &self,
        user_id: &str,
        update: BudgetCategoryUpdate,
    ) -> Result<BudgetCategory> {
        let user_id = user_id.to_string();

        self.pool.execute(move |conn| {
            let mut row = BudgetRepository::find_scoped(conn, &user_id, &update.id)?;

            if let Some(name) = &update.name {
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "name".to_string(),
                    )));
                }
                if let Some(other) = BudgetRepository::find_by_name(conn, &user_id, name)? {
                    if other.id != row.id {
                        return Err(Error::Validation(ValidationError::InvalidInput(format!(
                            "Budget category '{}' already exists",
                            name
                        ))));
                    }
                }
                row.name = name.to_string();
                // Renaming changes which transactions match, so the spent
                // total is rebuilt from the ledger under the new name.
                row.spent_amount = ledger::recompute_spent(conn, &user_id, name)?.to_string();
            }

            if let Some(amount) = update.budget_amount {
                if amount <= rust_decimal::Decimal::ZERO {
                    return Err(Error::Validation(ValidationError::InvalidAmount(
                        "budgetAmount".to_string(),
                        "budget amount must be positive".to_string(),
                    )));
                }
                row.budget_amount = amount.to_string();
            }

            row.updated_at = Utc::now().naive_utc();
            let updated = BudgetRepository::update(conn, &row)?;

            UserRepository::record_event(conn, &user_id, ActivityEvent::BudgetUpdated)?;
            recompute_for_user(conn, &user_id, "budget updated")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(updated)
        })
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<BudgetCategory> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();

        self.pool.execute(move |conn| {
            let row = BudgetRepository::find_scoped(conn, &user_id, &category_id)?;
            BudgetRepository::delete(conn, &category_id)?;

            recompute_for_user(conn, &user_id, "budget deleted")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(BudgetCategory::from(row))
        })
    }
}
