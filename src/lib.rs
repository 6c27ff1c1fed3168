//! Blood bank matching - proximity and compatibility matching for a regional
//! blood bank network
//!
//! The core is a pure filter-and-rank pipeline over donors and hospitals:
//! Haversine distance, radius and attribute filtering, and a static
//! blood-group compatibility table. The service layer exposes it over HTTP,
//! reading candidates from PostgreSQL through a short-lived cache.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    compatible_donors, compatible_recipients, distance, find_nearby, MatchError, MatchResult,
    ProximityMatcher,
};
pub use models::{BloodGroup, Donor, GeoPoint, Hospital, MatchingRules};
