use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Listing, Profile, ProfileUpdate};

/// Errors that can occur when talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: missing or expired access token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to load seed data: {0}")]
    Seed(String),
}

/// Document store holding profiles and housing listings
///
/// Ranking only ever reads through this trait, so the scoring core never
/// sees a transport error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one profile; `Ok(None)` when the user has not onboarded yet
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Every stored profile except `excluding`
    async fn list_profiles(&self, excluding: Option<&str>) -> Result<Vec<Profile>, StoreError>;

    /// Write the fields an update sets, keeping every other stored field
    async fn save_profile(&self, update: &ProfileUpdate) -> Result<(), StoreError>;

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError>;
}

/// Seed file layout: `{ "profiles": [...], "listings": [...] }`
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

/// Process-local store for development and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: RwLock<BTreeMap<String, Profile>>,
    listings: RwLock<Vec<Listing>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(profiles: Vec<Profile>, listings: Vec<Listing>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();

        Self {
            profiles: RwLock::new(profiles),
            listings: RwLock::new(listings),
        }
    }

    /// Build a store from a JSON seed file
    pub async fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;

        let seed: SeedData = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            profiles = seed.profiles.len(),
            listings = seed.listings.len(),
            "Loaded seed data from {}",
            path.display()
        );

        Ok(Self::with_data(seed.profiles, seed.listings))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn list_profiles(&self, excluding: Option<&str>) -> Result<Vec<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .filter(|profile| Some(profile.id.as_str()) != excluding)
            .cloned()
            .collect())
    }

    async fn save_profile(&self, update: &ProfileUpdate) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(&update.id) {
            Some(stored) => update.clone().apply_to(stored),
            None => {
                profiles.insert(update.id.clone(), update.clone().into_profile());
            }
        }
        Ok(())
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self.listings.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AcademicYear;

    fn profile(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            name: Some(format!("User {}", id)),
            ..Profile::default()
        }
    }

    #[tokio::test]
    async fn test_get_and_list_profiles() {
        let store = InMemoryStore::with_data(vec![profile("a"), profile("b")], vec![]);

        assert!(store.get_profile("a").await.unwrap().is_some());
        assert!(store.get_profile("missing").await.unwrap().is_none());

        let others = store.list_profiles(Some("a")).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, "b");
    }

    #[tokio::test]
    async fn test_save_merges_fields() {
        let mut stored = profile("a");
        stored.bio = Some("Surfing on weekends".to_string());
        let store = InMemoryStore::with_data(vec![stored], vec![]);

        let update = ProfileUpdate {
            id: "a".to_string(),
            year: Some(AcademicYear::Junior),
            ..ProfileUpdate::default()
        };
        store.save_profile(&update).await.unwrap();

        let saved = store.get_profile("a").await.unwrap().unwrap();
        assert_eq!(saved.year, Some(AcademicYear::Junior));
        assert_eq!(saved.bio.as_deref(), Some("Surfing on weekends"));
        assert_eq!(saved.name.as_deref(), Some("User a"));
    }

    #[tokio::test]
    async fn test_save_creates_missing_profile() {
        let store = InMemoryStore::new();
        let update = ProfileUpdate {
            id: "new".to_string(),
            name: Some("Jordan".to_string()),
            ..ProfileUpdate::default()
        };
        store.save_profile(&update).await.unwrap();

        let saved = store.get_profile("new").await.unwrap().unwrap();
        assert_eq!(saved.id, "new");
        assert_eq!(saved.name.as_deref(), Some("Jordan"));
    }

    #[test]
    fn test_bundled_seed_file() {
        let store = tokio_test::block_on(InMemoryStore::from_seed_file("data/seed.json")).unwrap();

        let profiles = tokio_test::block_on(store.list_profiles(None)).unwrap();
        let listings = tokio_test::block_on(store.list_listings()).unwrap();
        assert_eq!(profiles.len(), 4);
        assert_eq!(listings.len(), 7);
        assert!(profiles.iter().all(Profile::is_complete));
    }

    #[tokio::test]
    async fn test_missing_seed_file() {
        let result = InMemoryStore::from_seed_file("does/not/exist.json").await;
        assert!(matches!(result, Err(StoreError::Seed(_))));
    }
}
