pub(crate) mod linked_accounts_model;
pub(crate) mod linked_accounts_repository;

pub use linked_accounts_model::LinkedAccount;
pub use linked_accounts_repository::LinkedAccountRepository;
