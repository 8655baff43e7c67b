use async_trait::async_trait;

use crate::errors::Result;
use crate::ingest::RawTransactionInput;
use crate::transactions::transactions_model::{
    BatchImportSummary, Transaction, TransactionFilter, TransactionUpdate,
};

/// Ingestion and mutation surface for financial transactions.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;

    fn get_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>>;

    async fn add_transaction(
        &self,
        user_id: &str,
        input: RawTransactionInput,
    ) -> Result<Transaction>;

    async fn import_batch(
        &self,
        user_id: &str,
        rows: Vec<RawTransactionInput>,
    ) -> Result<BatchImportSummary>;

    async fn sync_provider_records(
        &self,
        user_id: &str,
        provider: &str,
        records: Vec<RawTransactionInput>,
    ) -> Result<BatchImportSummary>;

    async fn update_transaction(
        &self,
        user_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str)
        -> Result<Transaction>;
}
