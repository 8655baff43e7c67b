pub(crate) mod score_engine;
pub(crate) mod score_model;
pub(crate) mod score_repository;
pub(crate) mod score_service;
pub(crate) mod score_traits;

pub use score_engine::{ScoreBreakdown, ScoreInput};
pub use score_model::{ScoreHistoryEntry, ScoreRecord};
pub use score_repository::ScoreRepository;
pub use score_service::ScoreService;
pub use score_traits::ScoreServiceTrait;
