pub mod db;

pub mod budget;
pub mod goals;
pub mod ingest;
pub mod linked_accounts;
pub mod nudges;
pub mod score;
pub mod transactions;
pub mod users;

pub mod constants;
pub mod errors;
pub mod schema;

pub(crate) mod ledger;

pub use errors::{Error, Result};
pub use transactions::*;
