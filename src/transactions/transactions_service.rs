use async_trait::async_trait;
use chrono::Utc;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use crate::constants::{DUPLICATE_WINDOW_DAYS, SOURCE_BATCH_IMPORT, SOURCE_MANUAL, SOURCE_PROVIDER_SYNC};
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::ingest::{
    assignment_for, looks_like_duplicate, normalize, RawAmount, RawDate, RawTransactionInput,
};
use crate::ledger;
use crate::linked_accounts::linked_accounts_repository::LinkedAccountRepository;
use crate::nudges::nudges_service::evaluate_for_user;
use crate::score::score_service::recompute_for_user;
use crate::transactions::transactions_model::{
    BatchImportSummary, BatchRowError, Transaction, TransactionDB, TransactionFilter,
    TransactionUpdate,
};
use crate::transactions::transactions_repository::TransactionRepository;
use crate::transactions::transactions_traits::TransactionServiceTrait;
use crate::users::users_repository::{ActivityEvent, UserRepository};

/// Service for the three ingestion channels and transaction mutations.
///
/// Every mutation runs as one unit of work: normalize, categorize,
/// duplicate-check, persist, maintain the ledger, recompute the score and
/// re-evaluate nudges, all inside a single database transaction.
pub struct TransactionService {
    pool: Arc<DbPool>,
    repository: Arc<TransactionRepository>,
}

impl TransactionService {
    pub fn new(pool: Arc<DbPool>, repository: Arc<TransactionRepository>) -> Self {
        Self { pool, repository }
    }

    fn ingest_one(
        &self,
        user_id: &str,
        input: RawTransactionInput,
        source: &str,
        provider: Option<&str>,
        reason: &str,
    ) -> Result<Transaction> {
        let user_id = user_id.to_string();
        let source = source.to_string();
        let provider = provider.map(str::to_string);
        let reason = reason.to_string();

        self.pool.execute(move |conn| {
            let tx = ingest_row(conn, &user_id, input, &source, provider.as_deref())?;
            UserRepository::record_event(conn, &user_id, ActivityEvent::TransactionAdded)?;
            recompute_for_user(conn, &user_id, &reason)?;
            evaluate_for_user(conn, &user_id)?;
            Ok(tx)
        })
    }

    fn ingest_many(
        &self,
        user_id: &str,
        rows: Vec<RawTransactionInput>,
        source: &str,
        provider: Option<&str>,
        reason: &str,
    ) -> Result<BatchImportSummary> {
        let mut summary = BatchImportSummary::default();

        // One bad row never sinks the batch; each row is its own unit of
        // work so earlier successes stay committed.
        for (index, input) in rows.into_iter().enumerate() {
            match self.ingest_one(user_id, input, source, provider, reason) {
                Ok(_) => summary.success += 1,
                Err(err) => summary.errors.push(BatchRowError {
                    index,
                    message: err.to_string(),
                }),
            }
        }

        debug!(
            "batch ingest for user {}: {} ok, {} failed",
            user_id,
            summary.success,
            summary.errors.len()
        );
        Ok(summary)
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_transaction(user_id, transaction_id)
    }

    fn get_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        self.repository.get_transactions(user_id, filter)
    }

    async fn add_transaction(
        &self,
        user_id: &str,
        input: RawTransactionInput,
    ) -> Result<Transaction> {
        self.ingest_one(user_id, input, SOURCE_MANUAL, None, "transaction added")
    }

    async fn import_batch(
        &self,
        user_id: &str,
        rows: Vec<RawTransactionInput>,
    ) -> Result<BatchImportSummary> {
        self.ingest_many(user_id, rows, SOURCE_BATCH_IMPORT, None, "batch import")
    }

    async fn sync_provider_records(
        &self,
        user_id: &str,
        provider: &str,
        records: Vec<RawTransactionInput>,
    ) -> Result<BatchImportSummary> {
        self.ingest_many(
            user_id,
            records,
            SOURCE_PROVIDER_SYNC,
            Some(provider),
            "provider sync",
        )
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let user_id = user_id.to_string();

        self.pool.execute(move |conn| {
            let old_row = TransactionRepository::find_scoped(conn, &user_id, &update.id)?;
            let old = Transaction::from(old_row.clone());

            // An edit runs through the same normalizer as a create so the
            // canonical conventions hold after updates too. Fields the
            // payload omits are carried over from the stored row first, so
            // an amount-only edit never rewrites the date or merchant.
            let input = merge_with_existing(update.input, &old);
            let draft = normalize(&user_id, input, &old.source)?;
            let assignment = assignment_for(&draft);

            let mut row = TransactionDB::from_draft(&draft, &assignment, old.is_duplicate);
            row.id = old.id.clone();
            row.created_at = old.created_at;
            row.updated_at = Utc::now().naive_utc();
            if let Some(flag) = update.is_duplicate {
                row.is_duplicate = flag;
            }

            let new = TransactionRepository::update(conn, &row)?;
            ledger::replace_transaction(conn, &old, &new)?;
            UserRepository::record_event(conn, &user_id, ActivityEvent::TransactionAdded)?;
            recompute_for_user(conn, &user_id, "transaction updated")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(new)
        })
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();

        self.pool.execute(move |conn| {
            let row = TransactionRepository::find_scoped(conn, &user_id, &transaction_id)?;
            let deleted = Transaction::from(row);

            TransactionRepository::delete(conn, &transaction_id)?;
            ledger::reverse_transaction(conn, &deleted)?;
            recompute_for_user(conn, &user_id, "transaction deleted")?;
            evaluate_for_user(conn, &user_id)?;
            Ok(deleted)
        })
    }
}

/// Carries stored values into an update payload for every field the payload
/// leaves unset. Stored amounts are unsigned magnitudes with the type
/// carrying the sign, so the two merge as a pair.
fn merge_with_existing(mut input: RawTransactionInput, old: &Transaction) -> RawTransactionInput {
    if input.amount.is_none() {
        input.amount = Some(RawAmount::Text(old.amount.to_string()));
    }
    if input.transaction_type.is_none() {
        input.transaction_type = Some(old.transaction_type.clone());
    }
    if input.merchant.is_none() {
        input.merchant = Some(old.merchant.clone());
    }
    if input.category.is_none() {
        input.category = Some(old.category.clone());
    }
    if input.subcategory.is_none() {
        input.subcategory = old.subcategory.clone();
    }
    if input.account_label.is_none() {
        input.account_label = old.account_label.clone();
    }
    if input.date.is_none() {
        input.date = Some(RawDate::Parsed(old.transaction_date));
    }
    input
}

/// Runs the per-row ingestion pipeline inside the caller's transaction.
fn ingest_row(
    conn: &mut SqliteConnection,
    user_id: &str,
    input: RawTransactionInput,
    source: &str,
    provider: Option<&str>,
) -> Result<Transaction> {
    let draft = normalize(user_id, input, source)?;
    let assignment = assignment_for(&draft);

    let recent =
        TransactionRepository::load_window(conn, user_id, draft.date, DUPLICATE_WINDOW_DAYS)?;
    let is_duplicate = looks_like_duplicate(&draft, &recent);

    let row = TransactionDB::from_draft(&draft, &assignment, is_duplicate);
    let tx = TransactionRepository::insert(conn, &row)?;

    if let (Some(provider), Some(label)) = (provider, tx.account_label.as_deref()) {
        LinkedAccountRepository::ensure_registered(conn, user_id, provider, label)?;
    }

    ledger::apply_transaction(conn, &tx)?;
    Ok(tx)
}
