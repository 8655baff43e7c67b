pub(crate) mod goals_model;
pub(crate) mod goals_repository;
pub(crate) mod goals_service;
pub(crate) mod goals_traits;

pub use goals_model::{
    GoalContribution, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate,
};
pub use goals_repository::GoalRepository;
pub use goals_service::GoalService;
pub use goals_traits::GoalServiceTrait;
