// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BloodGroup, Donor, GeoPoint, Hospital, MatchingRules};
pub use requests::{DonorSearchRequest, EmergencyDonorsRequest, NearestHospitalsQuery};
pub use responses::{
    CacheInvalidatedResponse, CompatibilityResponse, DonorSearchResponse, ErrorResponse,
    HealthResponse, HospitalSearchResponse,
};
