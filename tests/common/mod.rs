use std::sync::Arc;

use tempfile::TempDir;

use fintrack_core::db::{self, DbPool};
use fintrack_core::ingest::{RawAmount, RawDate, RawTransactionInput};
use fintrack_core::users::{NewUser, User, UserRepository, UserService, UserServiceTrait};

/// A fresh migrated database in a temp directory. The directory is removed
/// when the fixture drops, so tests never leak files.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = db::create_pool(&db_path).expect("create pool");
    db::run_migrations(&pool).expect("run migrations");

    TestDb { pool, _dir: dir }
}

pub fn register_user(pool: &Arc<DbPool>, email: &str) -> User {
    let service = UserService::new(pool.clone(), Arc::new(UserRepository::new(pool.clone())));
    tokio_test::block_on(service.register(NewUser {
        email: email.to_string(),
        display_name: None,
    }))
    .expect("register user")
}

pub fn raw_expense(amount: f64, merchant: &str, date: &str) -> RawTransactionInput {
    RawTransactionInput {
        amount: Some(RawAmount::Number(amount)),
        merchant: Some(merchant.to_string()),
        date: Some(RawDate::Text(date.to_string())),
        ..Default::default()
    }
}
