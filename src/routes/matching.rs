use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use validator::Validate;

use crate::core::{CompatibilityTable, ProximityMatcher};
use crate::models::{
    BloodGroup, CacheInvalidatedResponse, CompatibilityResponse, DonorSearchRequest,
    DonorSearchResponse, EmergencyDonorsRequest, HealthResponse, HospitalSearchResponse,
    NearestHospitalsQuery,
};
use crate::routes::ApiError;
use crate::services::{CandidateCache, CandidateStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CandidateStore>,
    pub cache: Arc<CandidateCache>,
    pub matcher: ProximityMatcher,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/donors/search", web::post().to(search_donors))
        .route("/donors/{donor_id}/hospitals", web::get().to(nearest_hospitals))
        .route("/emergency/donors", web::post().to(emergency_donors))
        .route("/blood-groups/{group}/compatibility", web::get().to(compatibility))
        .route("/cache/invalidate", web::post().to(invalidate_cache));
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Reject limits above the configured maximum instead of clamping them
fn checked_limit(limit: Option<u16>, matcher: &ProximityMatcher) -> Result<Option<usize>, ApiError> {
    let max_limit = matcher.rules().max_limit;

    match limit.map(usize::from) {
        Some(limit) if limit > max_limit => Err(ApiError::Validation(format!(
            "limit: must be between 1 and {}",
            max_limit
        ))),
        limit => Ok(limit),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Donor search endpoint
///
/// POST /api/v1/donors/search
///
/// Request body:
/// ```json
/// {
///   "latitude": 27.7172,
///   "longitude": 85.3240,
///   "radiusKm": 25,
///   "bloodGroup": "O-",
///   "limit": 20
/// }
/// ```
async fn search_donors(
    state: web::Data<AppState>,
    req: web::Json<DonorSearchRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let limit = checked_limit(req.limit, &state.matcher)?;
    let plan = state.matcher.plan(req.reference(), req.radius_km, limit)?;

    tracing::info!(
        "Searching donors within {} km (group: {:?}, limit: {})",
        plan.radius_km(),
        req.blood_group,
        plan.limit()
    );

    let donors = state.cache.donors(state.store.donors_with_location()).await?;
    let results = state
        .matcher
        .search_donors(&plan, &donors, req.blood_group, today())?;

    tracing::debug!("Found {} donors from {} candidates", results.len(), donors.len());

    Ok(HttpResponse::Ok().json(DonorSearchResponse {
        results: results.into_iter().map(|r| r.cloned()).collect(),
        radius_km: plan.radius_km(),
        total_candidates: donors.len(),
    }))
}

/// Nearest hospitals for a donor
///
/// GET /api/v1/donors/{donor_id}/hospitals?radiusKm=30&limit=5
async fn nearest_hospitals(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<NearestHospitalsQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate().map_err(|e| ApiError::Validation(e.to_string()))?;
    let donor_id = path.into_inner();

    let donor = state
        .store
        .get_donor(donor_id)
        .await?
        .ok_or(ApiError::DonorNotFound(donor_id))?;

    // A donor without a stored location has no reference point
    let limit = checked_limit(query.limit, &state.matcher)?;
    let plan = state.matcher.plan(donor.location, query.radius_km, limit)?;

    let hospitals = state
        .cache
        .hospitals(state.store.hospitals_accepting_donations())
        .await?;
    let results = state.matcher.nearest_hospitals(&plan, &hospitals)?;

    tracing::info!(
        "Returning {} hospitals for donor {} (from {} candidates)",
        results.len(),
        donor_id,
        hospitals.len()
    );

    Ok(HttpResponse::Ok().json(HospitalSearchResponse {
        donor_id,
        results: results.into_iter().map(|r| r.cloned()).collect(),
        radius_km: plan.radius_km(),
        total_candidates: hospitals.len(),
    }))
}

/// Emergency donor lookup
///
/// POST /api/v1/emergency/donors
///
/// Returns eligible donors whose blood can be transfused to a patient of
/// `bloodGroup`, nearest first.
async fn emergency_donors(
    state: web::Data<AppState>,
    req: web::Json<EmergencyDonorsRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let limit = checked_limit(req.limit, &state.matcher)?;
    let plan = state.matcher.plan(req.reference(), req.radius_km, limit)?;

    tracing::info!(
        "Emergency request for {} within {} km",
        req.blood_group,
        plan.radius_km()
    );

    let donors = state.cache.donors(state.store.donors_with_location()).await?;
    let results = state
        .matcher
        .emergency_donors(&plan, &donors, req.blood_group, today())?;

    if results.is_empty() {
        tracing::warn!(
            "No compatible donors for {} within {} km",
            req.blood_group,
            plan.radius_km()
        );
    }

    Ok(HttpResponse::Ok().json(DonorSearchResponse {
        results: results.into_iter().map(|r| r.cloned()).collect(),
        radius_km: plan.radius_km(),
        total_candidates: donors.len(),
    }))
}

/// Compatibility lookup
///
/// GET /api/v1/blood-groups/{group}/compatibility
async fn compatibility(path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let group: BloodGroup = path.parse()?;
    let table = CompatibilityTable::global();

    Ok(HttpResponse::Ok().json(CompatibilityResponse {
        blood_group: group,
        donates_to: table.recipients(group).clone(),
        receives_from: table.donors(group).clone(),
    }))
}

/// Drop cached candidate lists after donor or hospital records change
///
/// POST /api/v1/cache/invalidate
async fn invalidate_cache(state: web::Data<AppState>) -> impl Responder {
    state.cache.invalidate_all().await;
    tracing::info!("Candidate cache invalidated");

    HttpResponse::Ok().json(CacheInvalidatedResponse { invalidated: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Donor, GeoPoint, Hospital};
    use crate::routes::{configure_extractors, configure_routes};
    use crate::services::StorageError;
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;

    /// In-memory records standing in for PostgreSQL
    #[derive(Default)]
    struct FakeStore {
        donors: Vec<Donor>,
        hospitals: Vec<Hospital>,
        healthy: bool,
    }

    #[async_trait]
    impl CandidateStore for FakeStore {
        async fn donors_with_location(&self) -> Result<Vec<Donor>, StorageError> {
            Ok(self
                .donors
                .iter()
                .filter(|d| d.location.is_set())
                .cloned()
                .collect())
        }

        async fn hospitals_accepting_donations(&self) -> Result<Vec<Hospital>, StorageError> {
            Ok(self.hospitals.clone())
        }

        async fn get_donor(&self, donor_id: i64) -> Result<Option<Donor>, StorageError> {
            Ok(self.donors.iter().find(|d| d.id == donor_id).cloned())
        }

        async fn health_check(&self) -> Result<bool, StorageError> {
            Ok(self.healthy)
        }
    }

    fn state_with(store: FakeStore) -> AppState {
        AppState {
            store: Arc::new(store),
            cache: Arc::new(CandidateCache::new(300)),
            matcher: ProximityMatcher::with_default_rules(),
        }
    }

    fn test_state() -> AppState {
        state_with(FakeStore::default())
    }

    fn donor(id: i64, group: BloodGroup, latitude: f64, longitude: f64) -> Donor {
        Donor {
            id,
            full_name: format!("Donor {}", id),
            blood_group: group,
            location: GeoPoint::new(latitude, longitude),
            is_available: true,
            last_donation_date: None,
            phone: None,
        }
    }

    fn hospital(id: i64, name: &str, latitude: f64, longitude: f64) -> Hospital {
        Hospital {
            id,
            name: name.to_string(),
            address: None,
            location: GeoPoint::new(latitude, longitude),
            is_active: true,
            accepts_donations: true,
            phone: None,
        }
    }

    fn valley_store() -> FakeStore {
        let mut unlocated = donor(5, BloodGroup::OPositive, 27.7172, 85.3240);
        unlocated.location = GeoPoint::unset();

        FakeStore {
            donors: vec![
                // Bhaktapur, Patan, Pokhara
                donor(1, BloodGroup::APositive, 27.6710, 85.4298),
                donor(2, BloodGroup::ONegative, 27.6588, 85.3247),
                donor(3, BloodGroup::APositive, 28.2096, 83.9856),
                donor(4, BloodGroup::BPositive, 27.6866, 85.3149),
                unlocated,
            ],
            hospitals: vec![
                hospital(1, "Bir Hospital", 27.7050, 85.3133),
                hospital(2, "Patan Hospital", 27.6680, 85.3206),
                hospital(3, "Manipal Pokhara", 28.2096, 83.9856),
            ],
            healthy: true,
        }
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure_extractors)
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_compatibility_universal_donor() {
        let app = app!(test_state());

        let req = test::TestRequest::get()
            .uri("/api/v1/blood-groups/O-/compatibility")
            .to_request();
        let body: CompatibilityResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.blood_group, BloodGroup::ONegative);
        assert_eq!(body.donates_to.len(), 8);
        assert_eq!(body.receives_from.len(), 1);
    }

    #[actix_web::test]
    async fn test_compatibility_unknown_group() {
        let app = app!(test_state());

        let req = test::TestRequest::get()
            .uri("/api/v1/blood-groups/XY/compatibility")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "unknown_blood_group");
    }

    #[actix_web::test]
    async fn test_search_donors_from_cache() {
        let app = app!(state_with(valley_store()));

        let req = test::TestRequest::post()
            .uri("/api/v1/donors/search")
            .set_json(serde_json::json!({
                "latitude": 27.7172,
                "longitude": 85.3240,
                "radiusKm": 15,
                "bloodGroup": "A+"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], 1);
        assert_eq!(results[0]["distanceKm"], 11.61);
        assert_eq!(body["totalCandidates"], 4);
    }

    #[actix_web::test]
    async fn test_emergency_donors_ranked() {
        let app = app!(state_with(valley_store()));

        let req = test::TestRequest::post()
            .uri("/api/v1/emergency/donors")
            .set_json(serde_json::json!({
                "latitude": 27.7172,
                "longitude": 85.3240,
                "bloodGroup": "AB+",
                "radiusKm": 50
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let ids: Vec<i64> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[actix_web::test]
    async fn test_missing_reference_point() {
        let app = app!(test_state());

        let req = test::TestRequest::post()
            .uri("/api/v1/donors/search")
            .set_json(serde_json::json!({ "longitude": 85.3240 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_reference_point");
    }

    #[actix_web::test]
    async fn test_non_positive_radius() {
        let app = app!(test_state());

        let req = test::TestRequest::post()
            .uri("/api/v1/emergency/donors")
            .set_json(serde_json::json!({
                "latitude": 27.7172,
                "longitude": 85.3240,
                "bloodGroup": "O+",
                "radiusKm": 0
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_radius");
    }

    #[actix_web::test]
    async fn test_bad_blood_group_in_body() {
        let app = app!(test_state());

        let req = test::TestRequest::post()
            .uri("/api/v1/emergency/donors")
            .set_json(serde_json::json!({
                "latitude": 27.7172,
                "longitude": 85.3240,
                "bloodGroup": "Z"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_json");
    }

    #[actix_web::test]
    async fn test_invalidate_cache() {
        let state = state_with(valley_store());
        let cache = Arc::clone(&state.cache);
        cache.donors(state.store.donors_with_location()).await.unwrap();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/v1/cache/invalidate")
            .to_request();
        let body: CacheInvalidatedResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.invalidated);

        let reloaded = cache.donors(async { Ok::<_, StorageError>(Vec::new()) }).await.unwrap();
        assert!(reloaded.is_empty());
    }

    #[actix_web::test]
    async fn test_health_reports_store_status() {
        let app = app!(state_with(valley_store()));
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "healthy");

        let app = app!(test_state());
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "degraded");
    }

    #[actix_web::test]
    async fn test_nearest_hospitals_for_donor() {
        let app = app!(state_with(valley_store()));

        let req = test::TestRequest::get()
            .uri("/api/v1/donors/4/hospitals?radiusKm=10")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["donorId"], 4);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "Bir Hospital");
        assert_eq!(results[0]["distanceKm"], 2.05);
        assert_eq!(results[1]["name"], "Patan Hospital");
        assert_eq!(results[1]["distanceKm"], 2.14);
    }

    #[actix_web::test]
    async fn test_nearest_hospitals_unknown_donor() {
        let app = app!(state_with(valley_store()));

        let req = test::TestRequest::get()
            .uri("/api/v1/donors/99/hospitals")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not_found");
    }

    #[actix_web::test]
    async fn test_nearest_hospitals_donor_without_location() {
        let app = app!(state_with(valley_store()));

        let req = test::TestRequest::get()
            .uri("/api/v1/donors/5/hospitals")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_reference_point");
    }

    #[actix_web::test]
    async fn test_limit_above_max_rejected() {
        let app = app!(state_with(valley_store()));

        let req = test::TestRequest::post()
            .uri("/api/v1/donors/search")
            .set_json(serde_json::json!({
                "latitude": 27.7172,
                "longitude": 85.3240,
                "limit": 101
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_failed");

        let req = test::TestRequest::get()
            .uri("/api/v1/donors/4/hospitals?limit=100")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
