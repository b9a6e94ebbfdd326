use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationError};

use super::domain::{
    AcademicYear, FilterCriteria, LivingPreferences, MoveInDate, ProfileUpdate, SleepSchedule,
};
use super::listing::ListingFilter;

/// Request to rank roommates for a viewer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub filters: FilterCriteria,
    /// Page size; the server default applies when absent
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

const MAX_INTERESTS: usize = 20;

/// Profile edit submitted from onboarding or the profile page
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_profile_update"))]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "photoURL", alias = "photoUrl", default)]
    pub photo_url: Option<String>,
    pub year: AcademicYear,
    #[validate(length(min = 1, max = 100))]
    pub major: String,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub bio: Option<String>,
    pub sleep_schedule: SleepSchedule,
    #[validate(range(min = 1, max = 5))]
    pub cleanliness: u8,
    #[serde(default)]
    pub budget_min: Option<u32>,
    #[serde(default)]
    pub budget_max: Option<u32>,
    #[serde(default)]
    pub move_in_date: Option<MoveInDate>,
    /// Left out, the stored interests stay; an empty list clears them
    #[serde(default)]
    pub interests: Option<BTreeSet<String>>,
    #[serde(default)]
    pub preferences: Option<LivingPreferences>,
}

fn validate_profile_update(req: &ProfileUpdateRequest) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (req.budget_min, req.budget_max) {
        if min > max {
            return Err(ValidationError::new("budget_range_inverted"));
        }
    }
    if let Some(interests) = &req.interests {
        if interests.len() > MAX_INTERESTS {
            return Err(ValidationError::new("too_many_interests"));
        }
        if interests.iter().any(|i| i.trim().is_empty()) {
            return Err(ValidationError::new("blank_interest"));
        }
    }
    Ok(())
}

impl ProfileUpdateRequest {
    /// Email's domain part, lower-cased
    pub fn email_domain(&self) -> Option<String> {
        self.email
            .as_deref()
            .and_then(|email| email.rsplit_once('@'))
            .map(|(_, domain)| domain.to_ascii_lowercase())
    }

    /// Partial write for the store; interests and preferences only when sent
    pub fn into_update(self, id: String) -> ProfileUpdate {
        ProfileUpdate {
            id,
            name: Some(self.name.trim().to_string()),
            email: self.email,
            photo_url: self.photo_url,
            year: Some(self.year),
            major: Some(self.major.trim().to_string()),
            bio: self.bio,
            sleep_schedule: Some(self.sleep_schedule),
            cleanliness: Some(self.cleanliness),
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            move_in_date: self.move_in_date,
            interests: self.interests,
            preferences: self.preferences,
        }
    }
}

/// Request to search housing listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchListingsRequest {
    #[serde(default)]
    pub filter: ListingFilter,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_request() -> ProfileUpdateRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Sarah Johnson",
            "email": "sarahj@uci.edu",
            "year": "Junior",
            "major": "Computer Science",
            "sleepSchedule": "early-bird",
            "cleanliness": 4,
            "budgetMin": 700,
            "budgetMax": 900,
            "interests": ["Coding", "Hiking"],
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_update() {
        let req = update_request();
        assert!(req.validate().is_ok());
        assert_eq!(req.email_domain().as_deref(), Some("uci.edu"));

        let profile = req.into_update("u1".to_string()).into_profile();
        assert!(profile.is_complete());
        assert_eq!(profile.cleanliness, Some(4));
    }

    #[test]
    fn test_omitted_lists_are_not_sent() {
        let mut req = update_request();
        req.interests = None;
        assert!(req.validate().is_ok());

        let update = req.into_update("u1".to_string());
        assert_eq!(update.interests, None);
        assert_eq!(update.preferences, None);
    }

    #[test]
    fn test_rejects_blank_interest() {
        let mut req = update_request();
        req.interests = Some(["Coding", "  "].map(String::from).into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_cleanliness() {
        let mut req = update_request();
        req.cleanliness = 6;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_budget() {
        let mut req = update_request();
        req.budget_min = Some(1200);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_find_matches_defaults() {
        let req: FindMatchesRequest =
            serde_json::from_value(serde_json::json!({ "userId": "u1" })).unwrap();
        assert_eq!(req.limit, None);
        assert_eq!(req.filters, FilterCriteria::default());
    }
}
