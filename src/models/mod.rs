// Model exports
pub mod domain;
pub mod listing;
pub mod requests;
pub mod responses;

pub use domain::{
    AcademicYear, BudgetRange, Compatibility, FilterCriteria, LivingPreferences, MatchResult,
    MoveInDate, PreferenceFlag, Profile, ProfileUpdate, ScoringWeights, SleepSchedule, UnknownVariant,
    YearFilter,
};
pub use listing::{CampusLocation, Listing, ListingFilter, ListingMatch, PropertyType};
pub use requests::{FindMatchesRequest, ProfileUpdateRequest, SearchListingsRequest};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, SearchListingsResponse};
