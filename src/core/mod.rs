// Core algorithm exports
pub mod compatibility;
pub mod distance;
pub mod error;
pub mod filters;
pub mod matcher;

pub use compatibility::{compatible_donors, compatible_recipients, CompatibilityTable};
pub use distance::{distance, haversine_distance};
pub use error::MatchError;
pub use filters::{accepts_donations, can_donate_to, has_blood_group, is_eligible_donor};
pub use matcher::{find_nearby, Locatable, MatchResult, ProximityMatcher, SearchPlan};
