use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::{score_history, score_records};
use crate::score::score_model::{ScoreHistoryEntry, ScoreRecord};

pub struct ScoreRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ScoreRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_score(&self, user_id: &str) -> Result<Option<ScoreRecord>> {
        let mut conn = get_connection(&self.pool)?;
        Self::find(&mut conn, user_id)
    }

    pub fn get_history(&self, user_id: &str) -> Result<Vec<ScoreHistoryEntry>> {
        let mut conn = get_connection(&self.pool)?;
        score_history::table
            .filter(score_history::user_id.eq(user_id))
            .order(score_history::recorded_at.desc())
            .select(ScoreHistoryEntry::as_select())
            .load::<ScoreHistoryEntry>(&mut conn)
            .map_err(Error::from)
    }

    pub(crate) fn find(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<Option<ScoreRecord>> {
        score_records::table
            .find(user_id)
            .select(ScoreRecord::as_select())
            .first::<ScoreRecord>(conn)
            .optional()
            .map_err(Error::from)
    }

    /// One live record per user: insert or overwrite in place.
    pub(crate) fn upsert(conn: &mut SqliteConnection, record: &ScoreRecord) -> Result<()> {
        diesel::insert_into(score_records::table)
            .values(record)
            .on_conflict(score_records::user_id)
            .do_update()
            .set(record)
            .execute(conn)?;
        Ok(())
    }

    pub(crate) fn append_history(
        conn: &mut SqliteConnection,
        entry: &ScoreHistoryEntry,
    ) -> Result<()> {
        diesel::insert_into(score_history::table)
            .values(entry)
            .execute(conn)?;
        Ok(())
    }

    pub(crate) fn delete_all_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        diesel::delete(score_history::table.filter(score_history::user_id.eq(user_id)))
            .execute(conn)?;
        diesel::delete(score_records::table.filter(score_records::user_id.eq(user_id)))
            .execute(conn)
            .map_err(Error::from)
    }
}
