use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::collections::HashSet;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::nudges::nudges_model::{Nudge, NUDGE_STATUS_ACTIVE};
use crate::schema::nudges;

pub struct NudgeRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl NudgeRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_active_nudges(&self, user_id: &str) -> Result<Vec<Nudge>> {
        let mut conn = get_connection(&self.pool)?;
        Self::load_active(&mut conn, user_id)
    }

    pub fn get_nudges(&self, user_id: &str) -> Result<Vec<Nudge>> {
        let mut conn = get_connection(&self.pool)?;
        nudges::table
            .filter(nudges::user_id.eq(user_id))
            .order(nudges::created_at.desc())
            .select(Nudge::as_select())
            .load::<Nudge>(&mut conn)
            .map_err(Error::from)
    }

    pub(crate) fn load_active(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<Nudge>> {
        nudges::table
            .filter(nudges::user_id.eq(user_id))
            .filter(nudges::status.eq(NUDGE_STATUS_ACTIVE))
            .order(nudges::created_at.asc())
            .select(Nudge::as_select())
            .load::<Nudge>(conn)
            .map_err(Error::from)
    }

    pub(crate) fn active_condition_keys(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<HashSet<String>> {
        let keys: Vec<String> = nudges::table
            .filter(nudges::user_id.eq(user_id))
            .filter(nudges::status.eq(NUDGE_STATUS_ACTIVE))
            .select(nudges::condition_key)
            .load(conn)?;
        Ok(keys.into_iter().collect())
    }

    pub(crate) fn find_scoped(
        conn: &mut SqliteConnection,
        user_id: &str,
        nudge_id: &str,
    ) -> Result<Nudge> {
        let row = nudges::table
            .find(nudge_id)
            .select(Nudge::as_select())
            .first::<Nudge>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Nudge {}", nudge_id)))?;

        if row.user_id != user_id {
            return Err(Error::Ownership(format!("Nudge {}", nudge_id)));
        }
        Ok(row)
    }

    pub(crate) fn insert(conn: &mut SqliteConnection, row: &Nudge) -> Result<Nudge> {
        diesel::insert_into(nudges::table)
            .values(row)
            .returning(Nudge::as_returning())
            .get_result::<Nudge>(conn)
            .map_err(Error::from)
    }

    pub(crate) fn update(conn: &mut SqliteConnection, row: &Nudge) -> Result<Nudge> {
        diesel::update(nudges::table.find(&row.id))
            .set(row)
            .returning(Nudge::as_returning())
            .get_result::<Nudge>(conn)
            .map_err(Error::from)
    }

    pub(crate) fn delete_all_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        diesel::delete(nudges::table.filter(nudges::user_id.eq(user_id)))
            .execute(conn)
            .map_err(Error::from)
    }
}
