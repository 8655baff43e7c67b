pub(crate) mod categorizer;
pub(crate) mod duplicates;
pub(crate) mod normalizer;

pub use categorizer::{assignment_for, categorize, CategoryAssignment};
pub use duplicates::looks_like_duplicate;
pub use normalizer::{normalize, RawAmount, RawDate, RawTransactionInput, TransactionDraft};
