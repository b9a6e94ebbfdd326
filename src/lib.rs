//! ZotHomes Match - roommate compatibility scoring for the ZotHomes student housing app
//!
//! This library scores how well two student profiles fit as roommates,
//! ranks a candidate pool for a viewer and searches housing listings near
//! campus. The HTTP service in `main.rs` wires it to a document store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_compatibility, filter_listings, Matcher};
pub use crate::models::{
    Compatibility, FilterCriteria, FindMatchesRequest, FindMatchesResponse, MatchResult, Profile,
    ScoringWeights,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let viewer = Profile::default();
        let compatibility = calculate_compatibility(&viewer, &viewer, &ScoringWeights::default());
        assert_eq!(compatibility.match_score, 0);
    }
}
