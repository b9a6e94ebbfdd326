use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use zothomes_match::config::{LoggingSettings, Settings, StoreBackend};
use zothomes_match::core::Matcher;
use zothomes_match::models::ScoringWeights;
use zothomes_match::routes::{self, AppState};
use zothomes_match::services::{
    CacheManager, DocumentStore, FirestoreClient, FirestoreCollections, InMemoryStore,
};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// RUST_LOG wins over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},actix_web=info", logging.level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn DocumentStore>> {
    match settings.store.backend {
        StoreBackend::Firestore => {
            let firestore = &settings.firestore;
            if firestore.project_id.is_empty() {
                return Err(std::io::Error::other(
                    "firestore.project_id (or FIREBASE_PROJECT_ID) is required for the firestore backend",
                ));
            }

            let collections = FirestoreCollections {
                users: settings.collection.users.clone(),
                listings: settings.collection.listings.clone(),
            };

            let client = FirestoreClient::new(
                firestore.endpoint.clone(),
                firestore.project_id.clone(),
                firestore.database_id.clone(),
                collections,
            )
            .map_err(std::io::Error::other)?
            .with_access_token(firestore.access_token.clone())
            .with_api_key(firestore.api_key.clone())
            .with_page_size(firestore.page_size.unwrap_or(300));

            info!("Firestore client initialized (project: {})", firestore.project_id);
            Ok(Arc::new(client))
        }
        StoreBackend::Memory => {
            let store = match &settings.store.seed_path {
                Some(path) => InMemoryStore::from_seed_file(path)
                    .await
                    .map_err(std::io::Error::other)?,
                None => InMemoryStore::new(),
            };

            info!("In-memory store initialized");
            Ok(Arc::new(store))
        }
    }
}

async fn build_cache(settings: &Settings) -> CacheManager {
    let ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let Some(redis_url) = settings.cache.redis_url.as_deref().filter(|u| !u.is_empty()) else {
        info!("Cache manager initialized without Redis (L1: {} entries, TTL: {}s)", l1_size, ttl);
        return CacheManager::in_memory(l1_size, ttl);
    };

    match CacheManager::new(redis_url, l1_size, ttl).await {
        Ok(cache) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis L2)", l1_size, ttl);
            cache
        }
        Err(e) => {
            warn!("Failed to connect to Redis ({}), running with L1 cache only", e);
            CacheManager::in_memory(l1_size, ttl)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    init_logging(
        settings
            .as_ref()
            .map(|s| &s.logging)
            .unwrap_or(&LoggingSettings::default()),
    );

    info!("Starting ZotHomes roommate matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    let store = build_store(&settings).await.inspect_err(|e| {
        error!("Failed to initialize document store: {}", e);
    })?;
    let cache = Arc::new(build_cache(&settings).await);

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        store,
        cache,
        matcher,
        campus: settings.campus.location(),
        allowed_email_domain: settings.campus.allowed_email_domain.clone(),
        default_limit: settings.matching.default_limit(),
        max_limit: settings.matching.max_limit(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
