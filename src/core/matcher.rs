use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{
    distance::distance,
    error::MatchError,
    filters::{accepts_donations, can_donate_to, has_blood_group, is_eligible_donor},
};
use crate::models::{BloodGroup, Donor, GeoPoint, Hospital, MatchingRules};

/// Anything that may carry a location
pub trait Locatable {
    fn location(&self) -> &GeoPoint;
}

impl Locatable for GeoPoint {
    fn location(&self) -> &GeoPoint {
        self
    }
}

impl Locatable for Donor {
    fn location(&self) -> &GeoPoint {
        &self.location
    }
}

impl Locatable for Hospital {
    fn location(&self) -> &GeoPoint {
        &self.location
    }
}

/// An entity together with its rounded distance from the reference point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<E> {
    #[serde(flatten)]
    entity: E,
    distance_km: f64,
}

impl<E> MatchResult<E> {
    fn new(entity: E, distance_km: f64) -> Self {
        Self { entity, distance_km }
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn into_entity(self) -> E {
        self.entity
    }
}

impl<E: Clone> MatchResult<&E> {
    pub fn cloned(self) -> MatchResult<E> {
        MatchResult::new(self.entity.clone(), self.distance_km)
    }
}

/// Filter candidates by predicate and radius, ranked by ascending distance
///
/// The predicate runs before any distance is computed. Candidates whose
/// location is unset are left out. The radius bound is inclusive and is
/// compared against the rounded distance. Equal distances keep their
/// input order.
pub fn find_nearby<'a, T: Locatable>(
    reference: &GeoPoint,
    candidates: &'a [T],
    max_distance_km: f64,
    predicate: Option<&dyn Fn(&T) -> bool>,
) -> Result<Vec<MatchResult<&'a T>>, MatchError> {
    if !reference.is_set() {
        return Err(MatchError::InvalidReferencePoint);
    }
    validate_radius(max_distance_km)?;

    let mut results: Vec<MatchResult<&T>> = candidates
        .iter()
        .filter(|candidate| predicate.map_or(true, |keep| keep(*candidate)))
        .filter_map(|candidate| {
            distance(reference, candidate.location())
                .map(|distance_km| MatchResult::new(candidate, distance_km))
        })
        .filter(|result| result.distance_km <= max_distance_km)
        .collect();

    // sort_by is stable, so ties keep input order
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    Ok(results)
}

/// Any positive radius is valid; `f64::INFINITY` means unbounded
fn validate_radius(radius_km: f64) -> Result<(), MatchError> {
    if radius_km > 0.0 {
        Ok(())
    } else {
        Err(MatchError::InvalidRadius(radius_km))
    }
}

/// A validated search: reference point, radius and result limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchPlan {
    reference: GeoPoint,
    radius_km: f64,
    limit: usize,
}

impl SearchPlan {
    pub fn reference(&self) -> &GeoPoint {
        &self.reference
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Proximity matching for the donor and hospital call sites
///
/// # Pipeline
/// 1. Validate the reference point and radius ([`ProximityMatcher::plan`])
/// 2. Attribute filtering (eligibility, blood group, hospital status)
/// 3. Distance and radius filtering
/// 4. Ranking by distance and truncation to the limit
#[derive(Debug, Clone)]
pub struct ProximityMatcher {
    rules: MatchingRules,
}

impl ProximityMatcher {
    pub fn new(rules: MatchingRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: MatchingRules::default(),
        }
    }

    pub fn rules(&self) -> &MatchingRules {
        &self.rules
    }

    /// Validate a search before any candidates are loaded
    ///
    /// Missing radius and limit fall back to the configured defaults.
    /// Radii above the configured maximum are clamped to it, and the limit
    /// is clamped to `1..=max_limit`.
    pub fn plan(
        &self,
        reference: GeoPoint,
        radius_km: Option<f64>,
        limit: Option<usize>,
    ) -> Result<SearchPlan, MatchError> {
        if !reference.is_set() {
            return Err(MatchError::InvalidReferencePoint);
        }

        let radius_km = radius_km.unwrap_or(self.rules.default_radius_km);
        validate_radius(radius_km)?;

        let limit = limit
            .unwrap_or(self.rules.default_limit)
            .clamp(1, self.rules.max_limit.max(1));

        Ok(SearchPlan {
            reference,
            radius_km: radius_km.min(self.rules.max_radius_km),
            limit,
        })
    }

    /// Eligible donors near the reference, optionally of one blood group
    pub fn search_donors<'a>(
        &self,
        plan: &SearchPlan,
        donors: &'a [Donor],
        blood_group: Option<BloodGroup>,
        today: NaiveDate,
    ) -> Result<Vec<MatchResult<&'a Donor>>, MatchError> {
        let interval = self.rules.donation_interval_days;
        let predicate = |donor: &Donor| {
            is_eligible_donor(donor, today, interval)
                && blood_group.map_or(true, |group| has_blood_group(donor, group))
        };

        self.ranked(plan, donors, &predicate)
    }

    /// Active hospitals accepting donations near the reference
    pub fn nearest_hospitals<'a>(
        &self,
        plan: &SearchPlan,
        hospitals: &'a [Hospital],
    ) -> Result<Vec<MatchResult<&'a Hospital>>, MatchError> {
        self.ranked(plan, hospitals, &accepts_donations)
    }

    /// Eligible donors whose blood can be given to `needed`
    pub fn emergency_donors<'a>(
        &self,
        plan: &SearchPlan,
        donors: &'a [Donor],
        needed: BloodGroup,
        today: NaiveDate,
    ) -> Result<Vec<MatchResult<&'a Donor>>, MatchError> {
        let interval = self.rules.donation_interval_days;
        let predicate = |donor: &Donor| {
            can_donate_to(donor, needed) && is_eligible_donor(donor, today, interval)
        };

        self.ranked(plan, donors, &predicate)
    }

    fn ranked<'a, T: Locatable>(
        &self,
        plan: &SearchPlan,
        candidates: &'a [T],
        predicate: &dyn Fn(&T) -> bool,
    ) -> Result<Vec<MatchResult<&'a T>>, MatchError> {
        let mut results = find_nearby(&plan.reference, candidates, plan.radius_km, Some(predicate))?;
        results.truncate(plan.limit);
        Ok(results)
    }
}

impl Default for ProximityMatcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
