use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A link to an external bank-data provider account. Created the first time
/// the sync channel delivers records for an account label; cascade-deleted
/// with the owning user.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, Serialize, Deserialize, PartialEq, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::linked_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub id: String,
    pub user_id: String,
    pub provider: String,
    pub account_label: String,
    pub created_at: NaiveDateTime,
}
