use crate::core::overlap::{
    budget_overlap, cleanliness_gap, shared_interests, shared_preferences, sleep_compatible,
};
use crate::models::{Compatibility, Profile, ScoringWeights, SleepSchedule};

/// Budget ranges this close (but not overlapping) still earn half the budget points
const NEAR_BUDGET_GAP: i64 = 200;

/// Scoring dimensions, in the order reasons are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Budget,
    Sleep,
    Cleanliness,
    Interests,
    Preferences,
    Year,
    Major,
    MoveIn,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Budget,
        Dimension::Sleep,
        Dimension::Cleanliness,
        Dimension::Interests,
        Dimension::Preferences,
        Dimension::Year,
        Dimension::Major,
        Dimension::MoveIn,
    ];

    /// Full points for this dimension; zero means inactive
    #[inline]
    pub fn weight(self, weights: &ScoringWeights) -> f64 {
        let raw = match self {
            Dimension::Budget => weights.budget,
            Dimension::Sleep => weights.sleep,
            Dimension::Cleanliness => weights.cleanliness,
            Dimension::Interests => weights.interests,
            Dimension::Preferences => weights.preferences,
            Dimension::Year => weights.year,
            Dimension::Major => weights.major,
            Dimension::MoveIn => weights.move_in,
        };
        non_negative(raw)
    }
}

/// Sum of the full points of every active dimension
pub fn max_points(weights: &ScoringWeights) -> f64 {
    Dimension::ALL.iter().map(|d| d.weight(weights)).sum()
}

/// Calculate how well `candidate` suits `viewer` as a roommate
///
/// Points are accumulated per dimension (see [`Dimension`]) and normalised:
/// score = round(100 * points / max_points). A field missing on either side
/// scores zero for its dimension while the dimension's full weight still
/// counts towards the maximum.
pub fn calculate_compatibility(
    viewer: &Profile,
    candidate: &Profile,
    weights: &ScoringWeights,
) -> Compatibility {
    let mut points = 0.0;
    let mut max = 0.0;
    let mut reasons = Vec::new();

    for dimension in Dimension::ALL {
        let full = dimension.weight(weights);
        if full <= 0.0 {
            continue;
        }
        max += full;

        let earned = match dimension {
            Dimension::Budget => budget_points(viewer, candidate, full, &mut reasons),
            Dimension::Sleep => sleep_points(viewer, candidate, full, &mut reasons),
            Dimension::Cleanliness => cleanliness_points(viewer, candidate, full, &mut reasons),
            Dimension::Interests => {
                interest_points(viewer, candidate, full, weights.per_interest, &mut reasons)
            }
            Dimension::Preferences => {
                preference_points(viewer, candidate, full, weights.per_preference, &mut reasons)
            }
            Dimension::Year => year_points(viewer, candidate, full, &mut reasons),
            Dimension::Major => major_points(viewer, candidate, full, &mut reasons),
            Dimension::MoveIn => move_in_points(viewer, candidate, full, &mut reasons),
        };
        points += earned.clamp(0.0, full);
    }

    Compatibility {
        match_score: normalize(points, max),
        match_reasons: reasons,
        shared_interests: shared_interests(viewer, candidate),
    }
}

#[inline]
fn normalize(points: f64, max: f64) -> u8 {
    if max <= 0.0 {
        return 0;
    }
    (100.0 * points / max).round().clamp(0.0, 100.0) as u8
}

#[inline]
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn budget_points(viewer: &Profile, candidate: &Profile, full: f64, reasons: &mut Vec<String>) -> f64 {
    let (Some(a), Some(b)) = (viewer.budget(), candidate.budget()) else {
        return 0.0;
    };

    let overlap = budget_overlap(a, b);
    if overlap > 0 {
        reasons.push("Similar budget".to_string());
        full
    } else if overlap > -NEAR_BUDGET_GAP {
        full / 2.0
    } else {
        0.0
    }
}

fn sleep_points(viewer: &Profile, candidate: &Profile, full: f64, reasons: &mut Vec<String>) -> f64 {
    let (Some(a), Some(b)) = (viewer.sleep_schedule, candidate.sleep_schedule) else {
        return 0.0;
    };

    if a == b {
        reasons.push("Same sleep schedule".to_string());
        full
    } else if sleep_compatible(a, b) {
        debug_assert!(a == SleepSchedule::Flexible || b == SleepSchedule::Flexible);
        full * 2.0 / 3.0
    } else {
        0.0
    }
}

fn cleanliness_points(
    viewer: &Profile,
    candidate: &Profile,
    full: f64,
    reasons: &mut Vec<String>,
) -> f64 {
    let (Some(a), Some(b)) = (viewer.cleanliness, candidate.cleanliness) else {
        return 0.0;
    };

    match cleanliness_gap(a, b) {
        0 => {
            reasons.push("Same cleanliness level".to_string());
            full
        }
        1 => {
            reasons.push("Similar cleanliness level".to_string());
            full * 2.0 / 3.0
        }
        2 => full / 3.0,
        _ => 0.0,
    }
}

fn interest_points(
    viewer: &Profile,
    candidate: &Profile,
    full: f64,
    per_interest: f64,
    reasons: &mut Vec<String>,
) -> f64 {
    let per_interest = non_negative(per_interest);
    let shared = viewer.interests.intersection(&candidate.interests).count();
    if shared == 0 || per_interest == 0.0 {
        return 0.0;
    }

    if shared == 1 {
        reasons.push("1 shared interest".to_string());
    } else {
        reasons.push(format!("{} shared interests", shared));
    }
    (shared as f64 * per_interest).min(full)
}

fn preference_points(
    viewer: &Profile,
    candidate: &Profile,
    full: f64,
    per_preference: f64,
    reasons: &mut Vec<String>,
) -> f64 {
    let per_preference = non_negative(per_preference);
    if per_preference == 0.0 {
        return 0.0;
    }

    let shared = shared_preferences(viewer, candidate);
    reasons.extend(shared.iter().map(|flag| flag.shared_reason().to_string()));
    (shared.len() as f64 * per_preference).min(full)
}

fn year_points(viewer: &Profile, candidate: &Profile, full: f64, reasons: &mut Vec<String>) -> f64 {
    match (viewer.year, candidate.year) {
        (Some(a), Some(b)) if a == b => {
            reasons.push("Same year".to_string());
            full
        }
        _ => 0.0,
    }
}

fn major_points(viewer: &Profile, candidate: &Profile, full: f64, reasons: &mut Vec<String>) -> f64 {
    let same = match (viewer.major.as_deref(), candidate.major.as_deref()) {
        (Some(a), Some(b)) => {
            let (a, b) = (a.trim(), b.trim());
            !a.is_empty() && a.eq_ignore_ascii_case(b)
        }
        _ => false,
    };

    if same {
        reasons.push("Same major".to_string());
        full
    } else {
        0.0
    }
}

fn move_in_points(viewer: &Profile, candidate: &Profile, full: f64, reasons: &mut Vec<String>) -> f64 {
    match (&viewer.move_in_date, &candidate.move_in_date) {
        (Some(a), Some(b)) if a == b => {
            reasons.push("Same move-in date".to_string());
            full
        }
        _ => 0.0,
    }
}
