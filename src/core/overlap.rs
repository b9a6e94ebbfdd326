use std::collections::BTreeSet;

use crate::models::{BudgetRange, MoveInDate, PreferenceFlag, Profile, SleepSchedule};

/// Lowest and highest valid cleanliness self-ratings
pub const CLEANLINESS_RANGE: (u8, u8) = (1, 5);

/// Overlap of two budget ranges in currency units
///
/// Positive when the ranges intersect, zero when they only touch, negative
/// by the size of the gap otherwise. Symmetric in its arguments.
#[inline]
pub fn budget_overlap(a: BudgetRange, b: BudgetRange) -> i64 {
    i64::from(a.max.min(b.max)) - i64::from(a.min.max(b.min))
}

/// Interests both profiles list, compared exactly (case-sensitive)
pub fn shared_interests(a: &Profile, b: &Profile) -> BTreeSet<String> {
    a.interests.intersection(&b.interests).cloned().collect()
}

/// Preference flags set on both profiles, in [`PreferenceFlag::ALL`] order
pub fn shared_preferences(a: &Profile, b: &Profile) -> Vec<PreferenceFlag> {
    PreferenceFlag::ALL
        .into_iter()
        .filter(|flag| flag.is_set(&a.preferences) && flag.is_set(&b.preferences))
        .collect()
}

/// Same schedule, or one side doesn't mind
#[inline]
pub fn sleep_compatible(a: SleepSchedule, b: SleepSchedule) -> bool {
    a == b || a == SleepSchedule::Flexible || b == SleepSchedule::Flexible
}

#[inline]
pub fn clamp_cleanliness(level: u8) -> u8 {
    level.clamp(CLEANLINESS_RANGE.0, CLEANLINESS_RANGE.1)
}

/// Distance between two cleanliness ratings after clamping to 1..=5
#[inline]
pub fn cleanliness_gap(a: u8, b: u8) -> u8 {
    clamp_cleanliness(a).abs_diff(clamp_cleanliness(b))
}

/// Same month, or one side is flexible
pub fn move_in_compatible(a: &MoveInDate, b: &MoveInDate) -> bool {
    a == b || a.is_flexible() || b.is_flexible()
}
