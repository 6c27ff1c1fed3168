use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{BloodGroup, GeoPoint};

/// Request to find eligible donors around a point
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DonorSearchRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat")]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(alias = "radius_km")]
    pub radius_km: Option<f64>,
    #[serde(alias = "blood_group")]
    pub blood_group: Option<BloodGroup>,
    /// Upper bound is `matching.max_limit`, checked by the handler
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

impl DonorSearchRequest {
    pub fn reference(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Request to find donors who can give blood to a patient in an emergency
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyDonorsRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(alias = "lat")]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    /// Blood group the patient needs
    #[serde(alias = "blood_group")]
    pub blood_group: BloodGroup,
    #[serde(alias = "radius_km")]
    pub radius_km: Option<f64>,
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

impl EmergencyDonorsRequest {
    pub fn reference(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Query string for the nearest-hospitals lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearestHospitalsQuery {
    #[serde(alias = "radius_km")]
    pub radius_km: Option<f64>,
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}
