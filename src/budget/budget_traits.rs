use async_trait::async_trait;

use crate::budget::budget_model::{BudgetCategory, BudgetCategoryUpdate, NewBudgetCategory};
use crate::errors::Result;

#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn get_categories(&self, user_id: &str) -> Result<Vec<BudgetCategory>>;

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<BudgetCategory>;

    async fn create_category(
        &self,
        user_id: &str,
        new_category: NewBudgetCategory,
    ) -> Result<BudgetCategory>;

    async fn update_category(
        &self,
        user_id: &str,
        update: BudgetCategoryUpdate,
    ) -> Result<BudgetCategory>;

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<BudgetCategory>;
}
