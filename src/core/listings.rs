use std::cmp::Ordering;

use crate::core::distance::distance_to_campus;
use crate::models::{CampusLocation, Listing, ListingFilter, ListingMatch};

/// Filter and order housing listings for the search page
///
/// Results are sorted nearest first (listings without coordinates last),
/// then by price, then by id.
pub fn filter_listings<I>(listings: I, filter: &ListingFilter, campus: CampusLocation) -> Vec<ListingMatch>
where
    I: IntoIterator<Item = Listing>,
{
    let mut matches: Vec<ListingMatch> = listings
        .into_iter()
        .map(|listing| {
            let distance_km = distance_to_campus(&listing, campus);
            ListingMatch { listing, distance_km }
        })
        .filter(|candidate| matches_listing(candidate, filter))
        .collect();

    matches.sort_by(|a, b| {
        compare_distance(a.distance_km, b.distance_km)
            .then_with(|| a.listing.price.cmp(&b.listing.price))
            .then_with(|| a.listing.id.cmp(&b.listing.id))
    });

    tracing::debug!(returned = matches.len(), "Filtered housing listings");

    matches
}

/// Check one listing against every filter field
pub fn matches_listing(candidate: &ListingMatch, filter: &ListingFilter) -> bool {
    let listing = &candidate.listing;

    if let Some(needle) = filter.search.as_deref() {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty()
            && !listing.title.to_lowercase().contains(&needle)
            && !listing.address.to_lowercase().contains(&needle)
        {
            return false;
        }
    }

    if let Some(kind) = filter.property_type {
        if listing.property_type != kind {
            return false;
        }
    }

    if let Some(bedrooms) = filter.bedrooms {
        let fits = if bedrooms >= ListingFilter::OPEN_ENDED_BEDROOMS {
            listing.bedrooms >= bedrooms
        } else {
            listing.bedrooms == bedrooms
        };
        if !fits {
            return false;
        }
    }

    let (price_min, price_max) = (
        filter.price_min.unwrap_or(u32::MIN),
        filter.price_max.unwrap_or(u32::MAX),
    );
    if price_min > price_max || !(price_min..=price_max).contains(&listing.price) {
        return false;
    }

    if !filter.amenities.iter().all(|amenity| listing.amenities.contains(amenity)) {
        return false;
    }

    match filter.max_distance_km {
        Some(limit) => candidate.distance_km.is_some_and(|d| d <= limit),
        None => true,
    }
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
