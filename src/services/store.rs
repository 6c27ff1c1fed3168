use async_trait::async_trait;

use crate::models::{Donor, Hospital};
use crate::services::postgres::StorageError;

/// Read access to the donor and hospital records the matcher runs over
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Every donor that has both coordinates
    async fn donors_with_location(&self) -> Result<Vec<Donor>, StorageError>;

    /// Active hospitals that accept donations and have both coordinates
    async fn hospitals_accepting_donations(&self) -> Result<Vec<Hospital>, StorageError>;

    /// A single donor, whether or not they have a location
    async fn get_donor(&self, donor_id: i64) -> Result<Option<Donor>, StorageError>;

    async fn health_check(&self) -> Result<bool, StorageError>;
}
