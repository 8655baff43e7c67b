use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::budget::budget_repository::BudgetRepository;
use crate::constants::{TRANSACTION_TYPE_INCOME, WEEKLY_ACTIVITY_WINDOW_DAYS};
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::score::score_engine::{self, ScoreInput};
use crate::score::score_model::{ScoreHistoryEntry, ScoreRecord};
use crate::score::score_repository::ScoreRepository;
use crate::score::score_traits::ScoreServiceTrait;
use crate::transactions::transactions_repository::TransactionRepository;
use crate::users::users_repository::UserRepository;

pub struct ScoreService {
    pool: Arc<DbPool>,
    repository: Arc<ScoreRepository>,
}

impl ScoreService {
    pub fn new(pool: Arc<DbPool>, repository: Arc<ScoreRepository>) -> Self {
        Self { pool, repository }
    }
}

#[async_trait]
impl ScoreServiceTrait for ScoreService {
    fn get_score(&self, user_id: &str) -> Result<Option<ScoreRecord>> {
        self.repository.get_score(user_id)
    }

    fn get_score_history(&self, user_id: &str) -> Result<Vec<ScoreHistoryEntry>> {
        self.repository.get_history(user_id)
    }

    async fn recompute(&self, user_id: &str, reason: &str) -> Result<ScoreRecord> {
        let user_id = user_id.to_string();
        let reason = reason.to_string();
        self.pool
            .execute(move |conn| recompute_for_user(conn, &user_id, &reason))
    }
}

/// Recomputes and persists the score inside the caller's transaction. Every
/// mutating flow calls this so the live record always reflects the ledger
/// it was committed with.
pub(crate) fn recompute_for_user(
    conn: &mut SqliteConnection,
    user_id: &str,
    reason: &str,
) -> Result<ScoreRecord> {
    let user = UserRepository::find(conn, user_id)?;
    let categories = BudgetRepository::load_all(conn, user_id)?
        .into_iter()
        .map(|c| (c.budget_amount, c.spent_amount))
        .collect();

    let transactions = TransactionRepository::load_all(conn, user_id)?;
    let (mut total_income, mut total_expenses) = (Decimal::ZERO, Decimal::ZERO);
    for tx in &transactions {
        if tx.transaction_type == TRANSACTION_TYPE_INCOME {
            total_income += tx.amount;
        } else {
            total_expenses += tx.amount;
        }
    }

    let cutoff = Utc::now().naive_utc() - Duration::days(WEEKLY_ACTIVITY_WINDOW_DAYS);
    let transactions_last_week = TransactionRepository::count_since(conn, user_id, cutoff)?;

    let input = ScoreInput {
        categories,
        total_income,
        total_expenses,
        transaction_count: transactions.len() as i64,
        transactions_last_week,
        has_logged_in: user.last_login_at.is_some(),
    };
    let breakdown = score_engine::compute(&input);
    debug!("recomputed score {} for user {} ({})", breakdown.score, user_id, reason);

    let now = Utc::now().naive_utc();
    let record = ScoreRecord {
        user_id: user_id.to_string(),
        score: breakdown.score,
        budget_adherence: breakdown.budget_adherence,
        savings_progress: breakdown.savings_progress,
        weekly_activity: breakdown.weekly_activity,
        calculated_at: now,
    };
    ScoreRepository::upsert(conn, &record)?;

    let entry = ScoreHistoryEntry {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        score: breakdown.score,
        budget_adherence: breakdown.budget_adherence,
        savings_progress: breakdown.savings_progress,
        weekly_activity: breakdown.weekly_activity,
        reason: reason.to_string(),
        recorded_at: now,
    };
    ScoreRepository::append_history(conn, &entry)?;

    Ok(record)
}
