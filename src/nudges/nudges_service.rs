use async_trait::async_trait;
use chrono::Utc;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use crate::budget::budget_repository::BudgetRepository;
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_repository::GoalRepository;
use crate::nudges::nudges_engine::{self, NudgeContext};
use crate::nudges::nudges_model::{
    Nudge, NUDGE_STATUS_ACTIVE, NUDGE_STATUS_COMPLETED, NUDGE_STATUS_DISMISSED,
};
use crate::nudges::nudges_repository::NudgeRepository;
use crate::nudges::nudges_traits::NudgeServiceTrait;
use crate::users::users_model::OnboardingStage;
use crate::users::users_repository::UserRepository;

pub struct NudgeService {
    pool: Arc<DbPool>,
    repository: Arc<NudgeRepository>,
}

impl NudgeService {
    pub fn new(pool: Arc<DbPool>, repository: Arc<NudgeRepository>) -> Self {
        Self { pool, repository }
    }
}

#[async_trait]
impl NudgeServiceTrait for NudgeService {
    fn get_active_nudges(&self, user_id: &str) -> Result<Vec<Nudge>> {
        self.repository.get_active_nudges(user_id)
    }

    fn get_nudges(&self, user_id: &str) -> Result<Vec<Nudge>> {
        self.repository.get_nudges(user_id)
    }

    async fn evaluate(&self, user_id: &str) -> Result<Vec<Nudge>> {
        let user_id = user_id.to_string();
        self.pool.execute(move |conn| evaluate_for_user(conn, &user_id))
    }

    async fn dismiss_nudge(&self, user_id: &str, nudge_id: &str) -> Result<Nudge> {
        self.transition(user_id, nudge_id, NUDGE_STATUS_DISMISSED)
    }

    async fn complete_nudge(&self, user_id: &str, nudge_id: &str) -> Result<Nudge> {
        self.transition(user_id, nudge_id, NUDGE_STATUS_COMPLETED)
    }
}

impl NudgeService {
    /// Forward-only transition: the nudge must belong to the caller and be
    /// active. Transitioning a terminal nudge is rejected, not ignored.
    fn transition(&self, user_id: &str, nudge_id: &str, target_status: &str) -> Result<Nudge> {
        let user_id = user_id.to_string();
        let nudge_id = nudge_id.to_string();
        let target = target_status.to_string();

        self.pool.execute(move |conn| {
            let mut nudge = NudgeRepository::find_scoped(conn, &user_id, &nudge_id)?;
            if !nudge.is_active() {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Nudge {} is already {}",
                    nudge_id,
                    nudge.status.to_lowercase()
                ))));
            }
            nudge.status = target.clone();
            nudge.updated_at = Utc::now().naive_utc();
            NudgeRepository::update(conn, &nudge)
        })
    }
}

/// Evaluates trigger conditions and inserts one active nudge per newly true
/// condition. Safe to call from any mutating flow's transaction; conditions
/// already covered by an active nudge are skipped.
pub(crate) fn evaluate_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<Nudge>> {
    let user = UserRepository::find(conn, user_id)?;
    let budgets = BudgetRepository::load_all(conn, user_id)?;
    let goals = GoalRepository::load_all(conn, user_id)?;

    let days_since_last_transaction = user
        .last_transaction_at
        .map(|t| (Utc::now().naive_utc() - t).num_days());

    let ctx = NudgeContext {
        onboarding_stage: OnboardingStage::from_str(&user.onboarding_stage),
        days_since_last_transaction,
        has_budget: !budgets.is_empty(),
        has_goal: !goals.is_empty(),
        overspent_categories: budgets
            .iter()
            .filter(|c| c.spent_amount > c.budget_amount)
            .map(|c| c.name.clone())
            .collect(),
        achieved_goals: goals
            .iter()
            .filter(|g| g.progress_percentage >= 100.0)
            .map(|g| (g.id.clone(), g.name.clone()))
            .collect(),
    };

    let active_keys = NudgeRepository::active_condition_keys(conn, user_id)?;
    let proposals = nudges_engine::evaluate(&ctx, &active_keys);

    let now = Utc::now().naive_utc();
    let mut created = Vec::with_capacity(proposals.len());
    for proposal in proposals {
        debug!("creating nudge {} for user {}", proposal.condition_key, user_id);
        let row = Nudge {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            nudge_type: proposal.nudge_type,
            message: proposal.message,
            status: NUDGE_STATUS_ACTIVE.to_string(),
            condition_key: proposal.condition_key,
            condition_snapshot: serde_json::to_string(&proposal.snapshot)?,
            created_at: now,
            updated_at: now,
        };
        created.push(NudgeRepository::insert(conn, &row)?);
    }

    Ok(created)
}
