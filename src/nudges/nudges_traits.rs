use async_trait::async_trait;

use crate::errors::Result;
use crate::nudges::nudges_model::Nudge;

#[async_trait]
pub trait NudgeServiceTrait: Send + Sync {
    fn get_active_nudges(&self, user_id: &str) -> Result<Vec<Nudge>>;

    fn get_nudges(&self, user_id: &str) -> Result<Vec<Nudge>>;

    /// Evaluates trigger conditions now and returns any newly created nudges.
    async fn evaluate(&self, user_id: &str) -> Result<Vec<Nudge>>;

    async fn dismiss_nudge(&self, user_id: &str, nudge_id: &str) -> Result<Nudge>;

    async fn complete_nudge(&self, user_id: &str, nudge_id: &str) -> Result<Nudge>;
}
