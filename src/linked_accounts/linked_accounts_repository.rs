use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::linked_accounts::linked_accounts_model::LinkedAccount;
use crate::schema::linked_accounts;

pub struct LinkedAccountRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl LinkedAccountRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_linked_accounts(&self, user_id: &str) -> Result<Vec<LinkedAccount>> {
        let mut conn = get_connection(&self.pool)?;
        linked_accounts::table
            .filter(linked_accounts::user_id.eq(user_id))
            .order(linked_accounts::created_at.asc())
            .select(LinkedAccount::as_select())
            .load::<LinkedAccount>(&mut conn)
            .map_err(Error::from)
    }

    /// Registers a provider account label if it has not been seen before.
    pub(crate) fn ensure_registered(
        conn: &mut SqliteConnection,
        user_id: &str,
        provider: &str,
        account_label: &str,
    ) -> Result<()> {
        let existing: Option<String> = linked_accounts::table
            .filter(linked_accounts::user_id.eq(user_id))
            .filter(linked_accounts::provider.eq(provider))
            .filter(linked_accounts::account_label.eq(account_label))
            .select(linked_accounts::id)
            .first(conn)
            .optional()?;

        if existing.is_none() {
            let row = LinkedAccount {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                provider: provider.to_string(),
                account_label: account_label.to_string(),
                created_at: Utc::now().naive_utc(),
            };
            diesel::insert_into(linked_accounts::table)
                .values(&row)
                .execute(conn)?;
        }
        Ok(())
    }

    pub(crate) fn delete_all_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        diesel::delete(linked_accounts::table.filter(linked_accounts::user_id.eq(user_id)))
            .execute(conn)
            .map_err(Error::from)
    }
}
