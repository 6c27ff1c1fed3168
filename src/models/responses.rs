use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::MatchResult;
use crate::models::domain::{BloodGroup, Donor, Hospital};

/// Response for the donor search and emergency donor endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSearchResponse {
    pub results: Vec<MatchResult<Donor>>,
    pub radius_km: f64,
    pub total_candidates: usize,
}

/// Response for the nearest hospitals endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalSearchResponse {
    pub donor_id: i64,
    pub results: Vec<MatchResult<Hospital>>,
    pub radius_km: f64,
    pub total_candidates: usize,
}

/// Compatibility lookup for a single blood group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResponse {
    pub blood_group: BloodGroup,
    pub donates_to: BTreeSet<BloodGroup>,
    pub receives_from: BTreeSet<BloodGroup>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheInvalidatedResponse {
    pub invalidated: bool,
}
