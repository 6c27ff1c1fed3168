// Service exports
pub mod cache;
pub mod postgres;
pub mod store;

pub use cache::CandidateCache;
pub use postgres::{PostgresClient, StorageError};
pub use store::CandidateStore;
