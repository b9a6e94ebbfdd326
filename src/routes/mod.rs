// Route exports
pub mod listings;
pub mod matches;
pub mod profiles;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::{CampusLocation, ErrorResponse, Listing, Profile};
use crate::services::{CacheError, CacheKey, CacheManager, DocumentStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub campus: CampusLocation,
    /// Profile emails must belong to this domain when set
    pub allowed_email_domain: Option<String>,
    pub default_limit: u16,
    pub max_limit: u16,
}

impl AppState {
    /// Requested page size, falling back to the default and capped at the maximum
    pub fn page_size(&self, requested: Option<u16>) -> usize {
        usize::from(requested.unwrap_or(self.default_limit).min(self.max_limit))
    }

    /// Viewer or candidate profile, cache first
    pub async fn load_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let key = CacheKey::profile(user_id);
        if let Some(profile) = self.cached::<Profile>(&key).await {
            return Ok(Some(profile));
        }

        let profile = self.store.get_profile(user_id).await?;
        if let Some(profile) = &profile {
            self.remember(&key, profile).await;
        }
        Ok(profile)
    }

    /// One snapshot of the whole candidate pool
    pub async fn load_candidates(&self) -> Result<Vec<Profile>, StoreError> {
        if let Some(pool) = self.cached::<Vec<Profile>>(CacheKey::CANDIDATES).await {
            return Ok(pool);
        }

        let pool = self.store.list_profiles(None).await?;
        tracing::debug!("Refreshed candidate pool snapshot ({} profiles)", pool.len());
        self.remember(CacheKey::CANDIDATES, &pool).await;
        Ok(pool)
    }

    pub async fn load_listings(&self) -> Result<Vec<Listing>, StoreError> {
        if let Some(listings) = self.cached::<Vec<Listing>>(CacheKey::LISTINGS).await {
            return Ok(listings);
        }

        let listings = self.store.list_listings().await?;
        self.remember(CacheKey::LISTINGS, &listings).await;
        Ok(listings)
    }

    /// Cache read where any failure is treated as a miss
    async fn cached<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.cache.get(key).await {
            Ok(value) => Some(value),
            Err(CacheError::CacheMiss(_)) => None,
            Err(e) => {
                tracing::warn!("Cache read failed for {}, falling back to store: {}", key, e);
                None
            }
        }
    }

    async fn remember<T>(&self, key: &str, value: &T)
    where
        T: serde::Serialize,
    {
        if let Err(e) = self.cache.set(key, value).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }
    }
}

/// Map a store failure onto the JSON error body
pub(crate) fn store_error_response(context: &str, err: &StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: context.to_string(),
        message: err.to_string(),
        status_code: 500,
    })
}

pub(crate) fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure)
            .configure(listings::configure),
    );
}
