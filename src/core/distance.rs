use geo::{HaversineDistance, Point};

use crate::models::{CampusLocation, Listing};

/// Great-circle distance between two coordinates in kilometers
///
/// # Arguments
/// * `lat1`, `lon1` - First point in degrees
/// * `lat2`, `lon2` - Second point in degrees
#[inline]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // geo points are (x = longitude, y = latitude)
    let from = Point::new(lon1, lat1);
    let to = Point::new(lon2, lat2);
    from.haversine_distance(&to) / 1000.0
}

/// Distance from a listing to campus, if the listing has usable coordinates
pub fn distance_to_campus(listing: &Listing, campus: CampusLocation) -> Option<f64> {
    let (lat, lon) = (listing.latitude?, listing.longitude?);
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some(haversine_km(campus.latitude, campus.longitude, lat, lon))
}
