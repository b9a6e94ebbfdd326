use crate::core::overlap::{budget_overlap, move_in_compatible, sleep_compatible};
use crate::models::{BudgetRange, FilterCriteria, MatchResult, Profile};

/// Check a scored candidate against every viewer-supplied filter
///
/// Filters combine with AND; an absent criterion accepts everyone. Reversed
/// ranges (min > max) accept no one.
#[inline]
pub fn matches_criteria(result: &MatchResult, criteria: &FilterCriteria) -> bool {
    let profile = &result.candidate;

    if let Some(floor) = criteria.min_match_score {
        if result.match_score < floor {
            return false;
        }
    }

    if let Some(needle) = criteria.search.as_deref() {
        if !matches_search(profile, needle) {
            return false;
        }
    }

    if let Some(year) = criteria.year {
        if !year.matches(profile.year) {
            return false;
        }
    }

    if !matches_budget(profile, criteria.budget_min, criteria.budget_max) {
        return false;
    }

    if let Some(wanted) = criteria.sleep_schedule {
        match profile.sleep_schedule {
            Some(actual) if sleep_compatible(wanted, actual) => {}
            _ => return false,
        }
    }

    if !matches_cleanliness(profile, criteria.cleanliness_min, criteria.cleanliness_max) {
        return false;
    }

    if let Some(wanted) = &criteria.move_in_date {
        match &profile.move_in_date {
            Some(actual) if move_in_compatible(wanted, actual) => {}
            _ => return false,
        }
    }

    criteria
        .preferences
        .iter()
        .all(|flag| flag.is_set(&profile.preferences))
}

/// Case-insensitive substring match over name, major, bio and interests
pub fn matches_search(profile: &Profile, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let contains = |field: &str| field.to_lowercase().contains(&needle);

    [&profile.name, &profile.major, &profile.bio]
        .into_iter()
        .flatten()
        .any(|field| contains(field.as_str()))
        || profile.interests.iter().any(|interest| contains(interest.as_str()))
}

/// Hard budget filter using the same overlap rule as scoring
pub fn matches_budget(profile: &Profile, min: Option<u32>, max: Option<u32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }

    let Some(wanted) = BudgetRange::new(min.unwrap_or(0), max.unwrap_or(u32::MAX)) else {
        return false;
    };

    profile
        .budget()
        .is_some_and(|actual| budget_overlap(wanted, actual) > 0)
}

/// Candidate's cleanliness must fall inside `[min, max]`
pub fn matches_cleanliness(profile: &Profile, min: Option<u8>, max: Option<u8>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }

    let (min, max) = (min.unwrap_or(u8::MIN), max.unwrap_or(u8::MAX));
    if min > max {
        return false;
    }

    profile
        .cleanliness
        .is_some_and(|level| (min..=max).contains(&level))
}
