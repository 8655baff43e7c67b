//! Ledger consistency maintenance.
//!
//! This module is the only writer of `budget_categories.spent_amount` and of
//! `savings_goals.current_amount`/`progress_percentage` plus the month-keyed
//! contribution rows. All functions are connection-scoped so callers can
//! compose them with the rest of a request inside one database transaction.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::budget::budget_repository::BudgetRepository;
use crate::constants::TRANSACTION_TYPE_EXPENSE;
use crate::errors::Result;
use crate::goals::goals_model::GoalContributionDB;
use crate::goals::goals_repository::GoalRepository;
use crate::goals::SavingsGoal;
use crate::schema::transactions;
use crate::transactions::Transaction;

/// Adds a freshly created transaction's contribution to the matching budget
/// category. No matching category is a no-op, not an error; categories are
/// never auto-created.
pub(crate) fn apply_transaction(conn: &mut SqliteConnection, tx: &Transaction) -> Result<()> {
    if tx.transaction_type != TRANSACTION_TYPE_EXPENSE {
        return Ok(());
    }
    adjust_spent(conn, &tx.user_id, &tx.category, tx.amount)
}

/// Reverses a transaction's contribution, on delete or as the first half of
/// an update.
pub(crate) fn reverse_transaction(conn: &mut SqliteConnection, tx: &Transaction) -> Result<()> {
    if tx.transaction_type != TRANSACTION_TYPE_EXPENSE {
        return Ok(());
    }
    adjust_spent(conn, &tx.user_id, &tx.category, -tx.amount)
}

/// Replaces an old contribution with a new one as one logical step. The
/// caller must already be inside a transaction so no intermediate state is
/// observable.
pub(crate) fn replace_transaction(
    conn: &mut SqliteConnection,
    old: &Transaction,
    new: &Transaction,
) -> Result<()> {
    reverse_transaction(conn, old)?;
    apply_transaction(conn, new)
}

fn adjust_spent(
    conn: &mut SqliteConnection,
    user_id: &str,
    category_name: &str,
    delta: Decimal,
) -> Result<()> {
    let Some(mut row) = BudgetRepository::find_by_name(conn, user_id, category_name)? else {
        debug!(
            "no budget category matching '{}' for user {}, skipping spent update",
            category_name, user_id
        );
        return Ok(());
    };

    let spent: Decimal = row.spent_amount.parse().unwrap_or_default();
    row.spent_amount = (spent + delta).to_string();
    row.updated_at = Utc::now().naive_utc();
    BudgetRepository::update(conn, &row)?;
    Ok(())
}

/// Recomputes a category's spent total straight from the transaction ledger.
/// Used when a category is created or renamed, so the invariant
/// `spent == sum of matching expense transactions` holds from the start.
pub(crate) fn recompute_spent(
    conn: &mut SqliteConnection,
    user_id: &str,
    category_name: &str,
) -> Result<Decimal> {
    let amounts: Vec<(String, String)> = transactions::table
        .filter(transactions::user_id.eq(user_id))
        .filter(transactions::transaction_type.eq(TRANSACTION_TYPE_EXPENSE))
        .select((transactions::category, transactions::amount))
        .load(conn)?;

    let total = amounts
        .into_iter()
        .filter(|(category, _)| category.eq_ignore_ascii_case(category_name.trim()))
        .map(|(_, amount)| amount.parse::<Decimal>().unwrap_or_default())
        .sum();

    Ok(total)
}

/// Applies an add-amount delta to a goal: bumps `current_amount`, recomputes
/// the clamped progress percentage, and merges the delta into the current
/// calendar month's contribution row.
pub(crate) fn add_goal_amount(
    conn: &mut SqliteConnection,
    user_id: &str,
    goal_id: &str,
    delta: Decimal,
) -> Result<SavingsGoal> {
    let mut goal = GoalRepository::find_scoped(conn, user_id, goal_id)?;
    let now = Utc::now().naive_utc();

    let current: Decimal = goal.current_amount.parse().unwrap_or_default();
    let target: Decimal = goal.target_amount.parse().unwrap_or_default();
    let updated = current + delta;

    goal.current_amount = updated.to_string();
    goal.progress_percentage = progress_percentage(updated, target);
    goal.updated_at = now;
    let saved = GoalRepository::update(conn, &goal)?;

    let month = Utc::now().format("%Y-%m").to_string();
    match GoalRepository::find_contribution_for_month(conn, goal_id, &month)? {
        Some(mut row) => {
            let existing: Decimal = row.amount.parse().unwrap_or_default();
            row.amount = (existing + delta).to_string();
            row.updated_at = now;
            GoalRepository::update_contribution(conn, &row)?;
        }
        None => {
            let row = GoalContributionDB {
                id: Uuid::new_v4().to_string(),
                goal_id: goal_id.to_string(),
                user_id: user_id.to_string(),
                month,
                amount: delta.to_string(),
                updated_at: now,
            };
            GoalRepository::insert_contribution(conn, &row)?;
        }
    }

    Ok(saved)
}

/// `min(100, max(0, current/target*100))`
pub(crate) fn progress_percentage(current: Decimal, target: Decimal) -> f64 {
    if target <= Decimal::ZERO {
        return 0.0;
    }
    let ratio = (current / target * Decimal::from(100))
        .to_f64()
        .unwrap_or(0.0);
    ratio.clamp(0.0, 100.0)
}
