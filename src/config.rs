use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{CampusLocation, ScoringWeights};
use crate::services::firestore::DEFAULT_ENDPOINT;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub firestore: FirestoreSettings,
    pub collection: CollectionSettings,
    pub store: StoreSettings,
    pub cache: CacheSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub campus: CampusSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirestoreSettings {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub page_size: Option<u32>,
}

impl Default for FirestoreSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: String::new(),
            database_id: "(default)".to_string(),
            access_token: None,
            api_key: None,
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    pub users: String,
    pub listings: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            listings: "listings".to_string(),
        }
    }
}

/// Which document store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firestore,
    #[default]
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// JSON seed for the in-memory store
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Runs L1-only when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
}

impl MatchingSettings {
    pub fn default_limit(&self) -> u16 {
        self.default_limit.unwrap_or(20)
    }

    pub fn max_limit(&self) -> u16 {
        self.max_limit.unwrap_or(100)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_sleep_weight")]
    pub sleep: f64,
    #[serde(default = "default_cleanliness_weight")]
    pub cleanliness: f64,
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_preferences_weight")]
    pub preferences: f64,
    #[serde(default = "default_per_item_points")]
    pub per_interest: f64,
    #[serde(default = "default_per_item_points")]
    pub per_preference: f64,
    #[serde(default)]
    pub year: f64,
    #[serde(default)]
    pub major: f64,
    #[serde(default)]
    pub move_in: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_weight(),
            sleep: default_sleep_weight(),
            cleanliness: default_cleanliness_weight(),
            interests: default_interests_weight(),
            preferences: default_preferences_weight(),
            per_interest: default_per_item_points(),
            per_preference: default_per_item_points(),
            year: 0.0,
            major: 0.0,
            move_in: 0.0,
        }
    }
}

fn default_budget_weight() -> f64 { 20.0 }
fn default_sleep_weight() -> f64 { 15.0 }
fn default_cleanliness_weight() -> f64 { 15.0 }
fn default_interests_weight() -> f64 { 25.0 }
fn default_preferences_weight() -> f64 { 25.0 }
fn default_per_item_points() -> f64 { 5.0 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            budget: config.budget,
            sleep: config.sleep,
            cleanliness: config.cleanliness,
            interests: config.interests,
            preferences: config.preferences,
            per_interest: config.per_interest,
            per_preference: config.per_preference,
            year: config.year,
            major: config.major,
            move_in: config.move_in,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CampusSettings {
    pub latitude: f64,
    pub longitude: f64,
    /// Profile emails must end in this domain when set
    pub allowed_email_domain: Option<String>,
}

impl Default for CampusSettings {
    fn default() -> Self {
        Self {
            latitude: 33.6405,
            longitude: -117.8443,
            allowed_email_domain: Some("uci.edu".to_string()),
        }
    }
}

impl CampusSettings {
    pub fn location(&self) -> CampusLocation {
        CampusLocation {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "full".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ZOTHOMES__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ZOTHOMES__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("ZOTHOMES")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional Firebase and Redis variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("FIREBASE_PROJECT_ID", "firestore.project_id"),
        ("FIRESTORE_ACCESS_TOKEN", "firestore.access_token"),
        ("REDIS_URL", "cache.redis_url"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "full");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("zothomes-match-settings-test.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[store]
backend = "firestore"

[matching]
max_limit = 50

[scoring.weights]
year = 20.0
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.store.backend, StoreBackend::Firestore);
        assert_eq!(settings.matching.max_limit(), 50);
        assert_eq!(settings.matching.default_limit(), 20);
        assert_eq!(settings.scoring.weights.year, 20.0);
        assert_eq!(settings.scoring.weights.budget, 20.0);
        assert_eq!(settings.firestore.database_id, "(default)");
        assert_eq!(settings.campus.allowed_email_domain.as_deref(), Some("uci.edu"));
    }

    #[test]
    fn test_partial_server_section() {
        let path = std::env::temp_dir().join("zothomes-match-server-port-test.toml");
        std::fs::write(&path, "[server]\nport = 9100\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.workers, None);
    }
}
