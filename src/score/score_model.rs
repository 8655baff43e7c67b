use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// The single live financial-health score for a user. Upserted on every
/// recompute; score and sub-scores are always in [0, 100].
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize,
    PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::score_records)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub user_id: String,
    pub score: i32,
    pub budget_adherence: i32,
    pub savings_progress: i32,
    pub weekly_activity: i32,
    pub calculated_at: NaiveDateTime,
}

/// Append-only history row kept for audit and trend display.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, Serialize, Deserialize, PartialEq, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::score_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    pub id: String,
    pub user_id: String,
    pub score: i32,
    pub budget_adherence: i32,
    pub savings_progress: i32,
    pub weekly_activity: i32,
    /// Human-readable trigger, e.g. "transaction added".
    pub reason: String,
    pub recorded_at: NaiveDateTime,
}
