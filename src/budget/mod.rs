pub(crate) mod budget_model;
pub(crate) mod budget_repository;
pub(crate) mod budget_service;
pub(crate) mod budget_traits;

pub use budget_model::{BudgetCategory, BudgetCategoryUpdate, NewBudgetCategory};
pub use budget_repository::BudgetRepository;
pub use budget_service::BudgetService;
pub use budget_traits::BudgetServiceTrait;
