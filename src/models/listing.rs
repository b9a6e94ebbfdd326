use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use super::domain::UnknownVariant;

/// Kind of housing on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PropertyType {
    Apartment,
    House,
    Dorm,
    Studio,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Dorm => "dorm",
            PropertyType::Studio => "studio",
        }
    }
}

impl FromStr for PropertyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apartment" => Ok(PropertyType::Apartment),
            "house" => Ok(PropertyType::House),
            "dorm" => Ok(PropertyType::Dorm),
            "studio" => Ok(PropertyType::Studio),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl TryFrom<String> for PropertyType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.as_str().to_string()
    }
}

/// Housing listing from the `listings` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub address: String,
    /// Monthly rent
    pub price: u32,
    #[serde(default)]
    pub bedrooms: u8,
    #[serde(rename = "type", alias = "propertyType")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Listing filter; a `bedrooms` value of [`ListingFilter::OPEN_ENDED_BEDROOMS`]
/// or more means "at least that many"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingFilter {
    pub search: Option<String>,
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<u8>,
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub amenities: Vec<String>,
    pub max_distance_km: Option<f64>,
}

impl ListingFilter {
    pub const OPEN_ENDED_BEDROOMS: u8 = 3;
}

/// Listing with its distance from campus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingMatch {
    #[serde(flatten)]
    pub listing: Listing,
    pub distance_km: Option<f64>,
}

/// Reference point for listing distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CampusLocation {
    pub latitude: f64,
    pub longitude: f64,
}
