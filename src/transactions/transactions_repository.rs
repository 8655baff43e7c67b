use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::ingest::normalizer::at_noon;
use crate::schema::transactions;
use crate::transactions::transactions_model::{Transaction, TransactionDB, TransactionFilter};

/// Repository for transaction rows. Every query is scoped to the owning
/// user; lookups that hit another user's row report `Ownership`, not the row.
pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_scoped(&mut conn, user_id, transaction_id).map(Transaction::from)
    }

    pub fn get_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .into_boxed();

        if let Some(ref category) = filter.category {
            query = query.filter(transactions::category.eq(category));
        }
        if let Some(ref transaction_type) = filter.transaction_type {
            query = query.filter(transactions::transaction_type.eq(transaction_type));
        }
        if let Some(from) = filter.from_date {
            query = query.filter(transactions::transaction_date.ge(at_noon(from)));
        }
        if let Some(to) = filter.to_date {
            query = query.filter(transactions::transaction_date.le(at_noon(to)));
        }
        if let Some(ref search) = filter.search {
            query = query.filter(transactions::merchant.like(format!("%{}%", search)));
        }

        query
            .order(transactions::transaction_date.desc())
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(Error::from)
    }

    /// Loads a row by id and enforces ownership. `NotFound` if the id does
    /// not exist at all, `Ownership` if it exists under a different user.
    pub(crate) fn find_scoped(
        conn: &mut SqliteConnection,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<TransactionDB> {
        let row = transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", transaction_id)))?;

        if row.user_id != user_id {
            return Err(Error::Ownership(format!("Transaction {}", transaction_id)));
        }
        Ok(row)
    }

    pub(crate) fn insert(conn: &mut SqliteConnection, row: &TransactionDB) -> Result<Transaction> {
        diesel::insert_into(transactions::table)
            .values(row)
            .returning(TransactionDB::as_returning())
            .get_result::<TransactionDB>(conn)
            .map(Transaction::from)
            .map_err(Error::from)
    }

    pub(crate) fn update(conn: &mut SqliteConnection, row: &TransactionDB) -> Result<Transaction> {
        diesel::update(transactions::table.find(&row.id))
            .set(row)
            .returning(TransactionDB::as_returning())
            .get_result::<TransactionDB>(conn)
            .map(Transaction::from)
            .map_err(Error::from)
    }

    pub(crate) fn delete(conn: &mut SqliteConnection, transaction_id: &str) -> Result<usize> {
        diesel::delete(transactions::table.find(transaction_id))
            .execute(conn)
            .map_err(Error::from)
    }

    pub(crate) fn load_all(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<Transaction>> {
        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(Error::from)
    }

    /// Rows in the duplicate-detection window around `center`, both sides.
    pub(crate) fn load_window(
        conn: &mut SqliteConnection,
        user_id: &str,
        center: NaiveDateTime,
        window_days: i64,
    ) -> Result<Vec<Transaction>> {
        let lower = center - Duration::days(window_days);
        let upper = center + Duration::days(window_days);

        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::transaction_date.ge(lower))
            .filter(transactions::transaction_date.le(upper))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(Error::from)
    }

    pub(crate) fn count_since(
        conn: &mut SqliteConnection,
        user_id: &str,
        cutoff: NaiveDateTime,
    ) -> Result<i64> {
        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::transaction_date.ge(cutoff))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub(crate) fn delete_all_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        diesel::delete(transactions::table.filter(transactions::user_id.eq(user_id)))
            .execute(conn)
            .map_err(Error::from)
    }
}
