use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::goals::goals_model::{
    GoalContribution, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate,
};

#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>>;

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal>;

    fn get_contributions(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalContribution>>;

    async fn create_goal(&self, user_id: &str, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;

    async fn update_goal(&self, user_id: &str, update: SavingsGoalUpdate) -> Result<SavingsGoal>;

    async fn add_amount(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: Decimal,
    ) -> Result<SavingsGoal>;

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal>;
}
