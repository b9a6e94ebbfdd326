// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod listings;
pub mod matcher;
pub mod overlap;
pub mod scoring;

pub use distance::{distance_to_campus, haversine_km};
pub use filters::matches_criteria;
pub use listings::filter_listings;
pub use matcher::{Matcher, Ranking, RankingSummary};
pub use scoring::{calculate_compatibility, max_points, Dimension};
