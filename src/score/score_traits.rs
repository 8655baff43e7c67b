use async_trait::async_trait;

use crate::errors::Result;
use crate::score::score_model::{ScoreHistoryEntry, ScoreRecord};

#[async_trait]
pub trait ScoreServiceTrait: Send + Sync {
    /// `None` until the first recompute has run for this user.
    fn get_score(&self, user_id: &str) -> Result<Option<ScoreRecord>>;

    fn get_score_history(&self, user_id: &str) -> Result<Vec<ScoreHistoryEntry>>;

    async fn recompute(&self, user_id: &str, reason: &str) -> Result<ScoreRecord>;
}
