use crate::core::{filters::matches_criteria, scoring::calculate_compatibility};
use crate::models::{FilterCriteria, MatchResult, Profile, ScoringWeights};

/// Counts from one pass of the ranking pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingSummary {
    pub considered: usize,
    pub incomplete: usize,
    pub filtered_out: usize,
}

/// Ranked matches plus the counts behind them
#[derive(Debug)]
pub struct Ranking {
    pub matches: Vec<MatchResult>,
    pub summary: RankingSummary,
}

/// Main matching orchestrator - implements the roommate ranking pipeline
///
/// # Pipeline Stages
/// 1. Drop the viewer's own profile
/// 2. Completeness gate (name, major, year)
/// 3. Scoring
/// 4. Viewer filters
/// 5. Sort by score (descending), then candidate id
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single candidate against the viewer
    pub fn score(&self, viewer: &Profile, candidate: &Profile) -> MatchResult {
        let compatibility = calculate_compatibility(viewer, candidate, &self.weights);
        MatchResult::new(candidate.clone(), compatibility)
    }

    /// Rank candidates for a viewer, returning every match that survives the filters
    pub fn rank_candidates<I>(
        &self,
        viewer: &Profile,
        candidates: I,
        criteria: &FilterCriteria,
    ) -> Vec<MatchResult>
    where
        I: IntoIterator<Item = Profile>,
    {
        self.rank(viewer, candidates, criteria).matches
    }

    /// Same as [`Matcher::rank_candidates`], keeping the pipeline counts
    ///
    /// # Arguments
    /// * `viewer` - Profile of the user asking for roommates
    /// * `candidates` - Snapshot of the candidate pool
    /// * `criteria` - Viewer filters applied after scoring
    pub fn rank<I>(&self, viewer: &Profile, candidates: I, criteria: &FilterCriteria) -> Ranking
    where
        I: IntoIterator<Item = Profile>,
    {
        let mut summary = RankingSummary::default();

        let mut matches = Vec::new();

        for candidate in candidates {
            // Stage 1: never match the viewer with themselves
            if candidate.id == viewer.id {
                continue;
            }
            summary.considered += 1;

            // Stage 2: incomplete profiles are skipped, not errors
            if !candidate.is_complete() {
                summary.incomplete += 1;
                continue;
            }

            // Stage 3 & 4: score, then apply viewer filters
            let compatibility = calculate_compatibility(viewer, &candidate, &self.weights);
            let result = MatchResult::new(candidate, compatibility);
            if !matches_criteria(&result, criteria) {
                summary.filtered_out += 1;
                continue;
            }

            matches.push(result);
        }

        // Stage 5: score descending, id ascending for equal scores
        matches.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| a.candidate.id.cmp(&b.candidate.id))
        });

        tracing::debug!(
            viewer = %viewer.id,
            considered = summary.considered,
            incomplete = summary.incomplete,
            filtered_out = summary.filtered_out,
            matched = matches.len(),
            "Ranked roommate candidates"
        );

        Ranking { matches, summary }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcademicYear, SleepSchedule};

    fn create_candidate(id: &str, sleep: SleepSchedule, cleanliness: u8) -> Profile {
        Profile {
            id: id.to_string(),
            name: Some(format!("User {}", id)),
            major: Some("Informatics".to_string()),
            year: Some(AcademicYear::Sophomore),
            sleep_schedule: Some(sleep),
            cleanliness: Some(cleanliness),
            budget_min: Some(700),
            budget_max: Some(900),
            ..Profile::default()
        }
    }

    fn create_viewer() -> Profile {
        create_candidate("viewer", SleepSchedule::EarlyBird, 3)
    }

    #[test]
    fn test_rank_basic() {
        let matcher = Matcher::with_default_weights();
        let viewer = create_viewer();

        let mut incomplete = create_candidate("3", SleepSchedule::EarlyBird, 3);
        incomplete.major = None;

        let candidates = vec![
            create_candidate("1", SleepSchedule::NightOwl, 1),
            create_candidate("2", SleepSchedule::EarlyBird, 3),
            incomplete,
            viewer.clone(),
        ];

        let ranking = matcher.rank(&viewer, candidates, &FilterCriteria::default());

        let ids: Vec<&str> = ranking.matches.iter().map(|m| m.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(
            ranking.summary,
            RankingSummary {
                considered: 3,
                incomplete: 1,
                filtered_out: 0,
            }
        );
    }

    #[test]
    fn test_equal_scores_ordered_by_id() {
        let matcher = Matcher::with_default_weights();
        let viewer = create_viewer();

        let candidates = vec![
            create_candidate("c", SleepSchedule::EarlyBird, 3),
            create_candidate("a", SleepSchedule::EarlyBird, 3),
            create_candidate("b", SleepSchedule::EarlyBird, 3),
        ];

        let matches = matcher.rank_candidates(&viewer, candidates, &FilterCriteria::default());
        let ids: Vec<&str> = matches.iter().map(|m| m.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_filters_counted() {
        let matcher = Matcher::with_default_weights();
        let viewer = create_viewer();
        let criteria = FilterCriteria {
            cleanliness_min: Some(3),
            ..FilterCriteria::default()
        };

        let candidates = vec![
            create_candidate("1", SleepSchedule::NightOwl, 1),
            create_candidate("2", SleepSchedule::EarlyBird, 4),
        ];

        let ranking = matcher.rank(&viewer, candidates, &criteria);
        assert_eq!(ranking.matches.len(), 1);
        assert_eq!(ranking.summary.filtered_out, 1);
    }

    #[test]
    fn test_score_matches_pipeline() {
        let matcher = Matcher::with_default_weights();
        let viewer = create_viewer();
        let candidate = create_candidate("1", SleepSchedule::Flexible, 2);

        let single = matcher.score(&viewer, &candidate);
        let ranked = matcher.rank_candidates(&viewer, vec![candidate], &FilterCriteria::default());
        assert_eq!(ranked, vec![single]);
    }
}
