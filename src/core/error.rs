use thiserror::Error;

/// Errors surfaced by the matching core
///
/// Candidates without coordinates or failing a predicate are not errors;
/// they are simply left out of the results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("reference point must have both latitude and longitude")]
    InvalidReferencePoint,

    #[error("search radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),

    #[error("unknown blood group: {0}")]
    UnknownBloodGroup(String),
}
