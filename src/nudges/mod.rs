pub(crate) mod nudges_engine;
pub(crate) mod nudges_model;
pub(crate) mod nudges_repository;
pub(crate) mod nudges_service;
pub(crate) mod nudges_traits;

pub use nudges_model::{
    Nudge, NUDGE_ADD_FIRST_TRANSACTION, NUDGE_BUDGET_OVERSPENT, NUDGE_CREATE_FIRST_BUDGET,
    NUDGE_CREATE_FIRST_GOAL, NUDGE_GOAL_REACHED, NUDGE_INACTIVITY, NUDGE_STATUS_ACTIVE,
    NUDGE_STATUS_COMPLETED, NUDGE_STATUS_DISMISSED,
};
pub use nudges_repository::NudgeRepository;
pub use nudges_service::NudgeService;
pub use nudges_traits::NudgeServiceTrait;
