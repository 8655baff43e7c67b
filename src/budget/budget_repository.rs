use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::budget::budget_model::{BudgetCategory, BudgetCategoryDB};
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::budget_categories;

pub struct BudgetRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl BudgetRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_categories(&self, user_id: &str) -> Result<Vec<BudgetCategory>> {
        let mut conn = get_connection(&self.pool)?;
        Self::load_all(&mut conn, user_id)
    }

    pub fn get_category(&self, user_id: &str, category_id: &str) -> Result<BudgetCategory> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_scoped(&mut conn, user_id, category_id).map(BudgetCategory::from)
    }

    pub(crate) fn load_all(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<Vec<BudgetCategory>> {
        budget_categories::table
            .filter(budget_categories::user_id.eq(user_id))
            .order(budget_categories::name.asc())
            .select(BudgetCategoryDB::as_select())
            .load::<BudgetCategoryDB>(conn)
            .map(|rows| rows.into_iter().map(BudgetCategory::from).collect())
            .map_err(Error::from)
    }

    pub(crate) fn find_scoped(
        conn: &mut SqliteConnection,
        user_id: &str,
        category_id: &str,
    ) -> Result<BudgetCategoryDB> {
        let row = budget_categories::table
            .find(category_id)
            .select(BudgetCategoryDB::as_select())
            .first::<BudgetCategoryDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Budget category {}", category_id)))?;

        if row.user_id != user_id {
            return Err(Error::Ownership(format!("Budget category {}", category_id)));
        }
        Ok(row)
    }

    /// Case-insensitive name lookup for this user. Names are unique per
    /// user so at most one row comes back.
    pub(crate) fn find_by_name(
        conn: &mut SqliteConnection,
        user_id: &str,
        name: &str,
    ) -> Result<Option<BudgetCategoryDB>> {
        let rows = budget_categories::table
            .filter(budget_categories::user_id.eq(user_id))
            .select(BudgetCategoryDB::as_select())
            .load::<BudgetCategoryDB>(conn)?;

        Ok(rows
            .into_iter()
            .find(|row| row.name.eq_ignore_ascii_case(name.trim())))
    }

    pub(crate) fn insert(
        conn: &mut SqliteConnection,
        row: &BudgetCategoryDB,
    ) -> Result<BudgetCategory> {
        diesel::insert_into(budget_categories::table)
            .values(row)
            .returning(BudgetCategoryDB::as_returning())
            .get_result::<BudgetCategoryDB>(conn)
            .map(BudgetCategory::from)
            .map_err(Error::from)
    }

    pub(crate) fn update(
        conn: &mut SqliteConnection,
        row: &BudgetCategoryDB,
    ) -> Result<BudgetCategory> {
        diesel::update(budget_categories::table.find(&row.id))
            .set(row)
            .returning(BudgetCategoryDB::as_returning())
            .get_result::<BudgetCategoryDB>(conn)
            .map(BudgetCategory::from)
            .map_err(Error::from)
    }

    pub(crate) fn delete(conn: &mut SqliteConnection, category_id: &str) -> Result<usize> {
        diesel::delete(budget_categories::table.find(category_id))
            .execute(conn)
            .map_err(Error::from)
    }

    pub(crate) fn delete_all_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        diesel::delete(budget_categories::table.filter(budget_categories::user_id.eq(user_id)))
            .execute(conn)
            .map_err(Error::from)
    }
}
