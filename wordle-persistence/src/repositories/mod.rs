pub mod ledger_repository;
pub mod user_repository;
pub mod word_repository;

pub use ledger_repository::LedgerRepository;
pub use user_repository::UserRepository;
pub use word_repository::WordRepository;
