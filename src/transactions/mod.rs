pub(crate) mod transactions_model;
pub(crate) mod transactions_repository;
pub(crate) mod transactions_service;
pub(crate) mod transactions_traits;

pub use transactions_model::{
    BatchImportSummary, BatchRowError, Transaction, TransactionFilter, TransactionUpdate,
};
pub use transactions_repository::TransactionRepository;
pub use transactions_service::TransactionService;
pub use transactions_traits::TransactionServiceTrait;
