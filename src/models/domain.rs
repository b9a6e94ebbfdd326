use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when an enumerated profile field holds a value outside its set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised value: {0:?}")]
pub struct UnknownVariant(pub String);

/// Academic standing chosen during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AcademicYear {
    Freshman,
    Sophomore,
    Junior,
    Senior,
    Graduate,
    Transfer,
}

impl AcademicYear {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicYear::Freshman => "Freshman",
            AcademicYear::Sophomore => "Sophomore",
            AcademicYear::Junior => "Junior",
            AcademicYear::Senior => "Senior",
            AcademicYear::Graduate => "Graduate",
            AcademicYear::Transfer => "Transfer",
        }
    }
}

impl FromStr for AcademicYear {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "freshman" => Ok(AcademicYear::Freshman),
            "sophomore" => Ok(AcademicYear::Sophomore),
            "junior" => Ok(AcademicYear::Junior),
            "senior" => Ok(AcademicYear::Senior),
            "graduate" | "grad" => Ok(AcademicYear::Graduate),
            "transfer" => Ok(AcademicYear::Transfer),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcademicYear> for String {
    fn from(value: AcademicYear) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported sleep rhythm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SleepSchedule {
    EarlyBird,
    Moderate,
    NightOwl,
    Flexible,
}

impl SleepSchedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepSchedule::EarlyBird => "early-bird",
            SleepSchedule::Moderate => "moderate",
            SleepSchedule::NightOwl => "night-owl",
            SleepSchedule::Flexible => "flexible",
        }
    }
}

impl FromStr for SleepSchedule {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "early-bird" => Ok(SleepSchedule::EarlyBird),
            "moderate" => Ok(SleepSchedule::Moderate),
            "night-owl" => Ok(SleepSchedule::NightOwl),
            "flexible" => Ok(SleepSchedule::Flexible),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl TryFrom<String> for SleepSchedule {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SleepSchedule> for String {
    fn from(value: SleepSchedule) -> Self {
        value.as_str().to_string()
    }
}

/// Target move-in month, e.g. "August 2025", or "Flexible"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MoveInDate {
    Flexible,
    Month(String),
}

impl MoveInDate {
    pub fn is_flexible(&self) -> bool {
        matches!(self, MoveInDate::Flexible)
    }
}

impl FromStr for MoveInDate {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(UnknownVariant(s.to_string()));
        }
        if trimmed.eq_ignore_ascii_case("flexible") {
            Ok(MoveInDate::Flexible)
        } else {
            Ok(MoveInDate::Month(trimmed.to_string()))
        }
    }
}

impl TryFrom<String> for MoveInDate {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MoveInDate> for String {
    fn from(value: MoveInDate) -> Self {
        match value {
            MoveInDate::Flexible => "Flexible".to_string(),
            MoveInDate::Month(month) => month,
        }
    }
}

impl fmt::Display for MoveInDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveInDate::Flexible => f.write_str("Flexible"),
            MoveInDate::Month(month) => f.write_str(month),
        }
    }
}

/// The five household rules a user can opt into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LivingPreferences {
    pub clean_organized: bool,
    pub quiet_hours: bool,
    pub non_smoker: bool,
    pub pets_allowed: bool,
    pub guests_ok: bool,
}

/// Typed key into [`LivingPreferences`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceFlag {
    CleanOrganized,
    QuietHours,
    NonSmoker,
    PetsAllowed,
    GuestsOk,
}

impl PreferenceFlag {
    /// Evaluation order for scoring and reasons
    pub const ALL: [PreferenceFlag; 5] = [
        PreferenceFlag::CleanOrganized,
        PreferenceFlag::QuietHours,
        PreferenceFlag::NonSmoker,
        PreferenceFlag::PetsAllowed,
        PreferenceFlag::GuestsOk,
    ];

    #[inline]
    pub fn is_set(self, preferences: &LivingPreferences) -> bool {
        match self {
            PreferenceFlag::CleanOrganized => preferences.clean_organized,
            PreferenceFlag::QuietHours => preferences.quiet_hours,
            PreferenceFlag::NonSmoker => preferences.non_smoker,
            PreferenceFlag::PetsAllowed => preferences.pets_allowed,
            PreferenceFlag::GuestsOk => preferences.guests_ok,
        }
    }

    /// Match reason shown when both sides have this flag set
    pub fn shared_reason(self) -> &'static str {
        match self {
            PreferenceFlag::CleanOrganized => "Both want clean & organized",
            PreferenceFlag::QuietHours => "Both want quiet hours",
            PreferenceFlag::NonSmoker => "Both non-smokers",
            PreferenceFlag::PetsAllowed => "Both okay with pets",
            PreferenceFlag::GuestsOk => "Both okay with guests",
        }
    }
}

/// Inclusive monthly budget range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRange {
    pub min: u32,
    pub max: u32,
}

impl BudgetRange {
    /// Returns `None` for an inverted range
    pub fn new(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }
}

/// Roommate profile as stored in the `users` collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoURL", alias = "photoUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub year: Option<AcademicYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sleep_schedule: Option<SleepSchedule>,
    #[serde(default, deserialize_with = "cleanliness_level", skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<MoveInDate>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub preferences: LivingPreferences,
}

impl Profile {
    /// Budget range, if both bounds are set (a zero bound counts as unset)
    pub fn budget(&self) -> Option<BudgetRange> {
        match (self.budget_min, self.budget_max) {
            (Some(min), Some(max)) if min > 0 && max > 0 => BudgetRange::new(min, max),
            _ => None,
        }
    }

    /// Candidates must have a name, a major and a year to be listed
    pub fn is_complete(&self) -> bool {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        present(&self.name) && present(&self.major) && self.year.is_some()
    }
}

/// Partial profile write
///
/// `None` fields keep their stored value. Only the fields that are set are
/// serialized, so the serialized keys double as the store's update mask.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<AcademicYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_schedule: Option<SleepSchedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<MoveInDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<LivingPreferences>,
}

impl ProfileUpdate {
    /// Overwrite every field of `stored` this update sets
    pub fn apply_to(self, stored: &mut Profile) {
        fn merge<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        merge(&mut stored.name, self.name);
        merge(&mut stored.email, self.email);
        merge(&mut stored.photo_url, self.photo_url);
        merge(&mut stored.year, self.year);
        merge(&mut stored.major, self.major);
        merge(&mut stored.bio, self.bio);
        merge(&mut stored.sleep_schedule, self.sleep_schedule);
        merge(&mut stored.cleanliness, self.cleanliness);
        merge(&mut stored.budget_min, self.budget_min);
        merge(&mut stored.budget_max, self.budget_max);
        merge(&mut stored.move_in_date, self.move_in_date);
        if let Some(interests) = self.interests {
            stored.interests = interests;
        }
        if let Some(preferences) = self.preferences {
            stored.preferences = preferences;
        }
    }

    /// Profile for a user with nothing stored yet
    pub fn into_profile(self) -> Profile {
        let mut profile = Profile {
            id: self.id.clone(),
            ..Profile::default()
        };
        self.apply_to(&mut profile);
        profile
    }
}

impl From<Profile> for ProfileUpdate {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            photo_url: profile.photo_url,
            year: profile.year,
            major: profile.major,
            bio: profile.bio,
            sleep_schedule: profile.sleep_schedule,
            cleanliness: profile.cleanliness,
            budget_min: profile.budget_min,
            budget_max: profile.budget_max,
            move_in_date: profile.move_in_date,
            interests: Some(profile.interests),
            preferences: Some(profile.preferences),
        }
    }
}

/// Decode an optional enumerated string, treating blank or unknown values as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Year criterion from the roommate filters
///
/// `Unrecognised` keeps a value outside the known years so the filter can
/// match nothing instead of rejecting the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum YearFilter {
    Year(AcademicYear),
    Unrecognised,
}

impl YearFilter {
    pub fn matches(self, year: Option<AcademicYear>) -> bool {
        match self {
            YearFilter::Year(wanted) => year == Some(wanted),
            YearFilter::Unrecognised => false,
        }
    }
}

impl From<AcademicYear> for YearFilter {
    fn from(year: AcademicYear) -> Self {
        YearFilter::Year(year)
    }
}

/// "All years", "any" and blank mean no year filter
fn year_filter<'de, D>(deserializer: D) -> Result<Option<YearFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || ["all", "any", "all years"]
                .iter()
                .any(|wildcard| trimmed.eq_ignore_ascii_case(wildcard))
        {
            return None;
        }
        Some(
            trimmed
                .parse()
                .map_or(YearFilter::Unrecognised, YearFilter::Year),
        )
    }))
}

/// Cleanliness arrives either as a number or as a one-element slider array (`[3]`)
fn cleanliness_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Level {
        Scalar(f64),
        Slider(Vec<f64>),
    }

    let level: Option<Level> = Option::deserialize(deserializer)?;
    let value = match level {
        Some(Level::Scalar(v)) => Some(v),
        Some(Level::Slider(values)) => values.first().copied(),
        None => None,
    };

    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, u8::MAX as f64) as u8))
}

/// Score, reasons and shared interests for one viewer/candidate pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compatibility {
    pub match_score: u8,
    pub match_reasons: Vec<String>,
    pub shared_interests: BTreeSet<String>,
}

/// Scored candidate returned to the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub candidate: Profile,
    pub match_score: u8,
    pub match_reasons: Vec<String>,
    pub shared_interests: BTreeSet<String>,
}

impl MatchResult {
    pub fn new(candidate: Profile, compatibility: Compatibility) -> Self {
        Self {
            candidate,
            match_score: compatibility.match_score,
            match_reasons: compatibility.match_reasons,
            shared_interests: compatibility.shared_interests,
        }
    }
}

/// Viewer-supplied narrowing of the ranked roommate list
///
/// Every field is optional; an absent field lets every candidate through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring over name, major, bio and interests
    pub search: Option<String>,
    #[serde(deserialize_with = "year_filter")]
    pub year: Option<YearFilter>,
    pub budget_min: Option<u32>,
    pub budget_max: Option<u32>,
    pub sleep_schedule: Option<SleepSchedule>,
    pub cleanliness_min: Option<u8>,
    pub cleanliness_max: Option<u8>,
    pub move_in_date: Option<MoveInDate>,
    /// Candidate must have every listed flag set
    pub preferences: Vec<PreferenceFlag>,
    pub min_match_score: Option<u8>,
}

/// Points available per scoring dimension
///
/// A dimension with zero weight is inactive and does not count towards the
/// maximum. Year, major and move-in date are inactive by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub budget: f64,
    pub sleep: f64,
    pub cleanliness: f64,
    pub interests: f64,
    pub preferences: f64,
    pub per_interest: f64,
    pub per_preference: f64,
    pub year: f64,
    pub major: f64,
    pub move_in: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: 20.0,
            sleep: 15.0,
            cleanliness: 15.0,
            interests: 25.0,
            preferences: 25.0,
            per_interest: 5.0,
            per_preference: 5.0,
            year: 0.0,
            major: 0.0,
            move_in: 0.0,
        }
    }
}

impl ScoringWeights {
    /// Turn on the same-year, same-major and same-move-in dimensions
    pub fn with_academic_dimensions(self) -> Self {
        Self {
            year: 20.0,
            major: 15.0,
            move_in: 15.0,
            ..self
        }
    }
}
