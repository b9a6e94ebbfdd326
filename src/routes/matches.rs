use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{bad_request, store_error_response, AppState};
use crate::models::{FindMatchesRequest, FindMatchesResponse, HealthResponse};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20,
///   "filters": { "sleepSchedule": "night-owl", "cleanlinessMin": 3 }
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let user_id = req.user_id.as_str();
    let limit = state.page_size(req.limit);

    tracing::info!("Finding matches for user: {}, limit: {}", user_id, limit);

    let viewer = match state.load_profile(user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            // Viewer hasn't onboarded yet; the client shows the profile form
            tracing::info!("No profile for user {}, returning empty match list", user_id);
            return HttpResponse::Ok().json(FindMatchesResponse {
                matches: vec![],
                total_results: 0,
                profile_missing: true,
            });
        }
        Err(e) => return store_error_response("Failed to fetch user profile", &e),
    };

    let candidates = match state.load_candidates().await {
        Ok(candidates) => candidates,
        Err(e) => return store_error_response("Failed to load candidates", &e),
    };

    let ranking = state.matcher.rank(&viewer, candidates, &req.filters);
    let total_results = ranking.matches.len();

    let mut matches = ranking.matches;
    matches.truncate(limit);

    tracing::info!(
        "Returning {} matches for user {} ({} considered, {} incomplete, {} filtered out)",
        matches.len(),
        user_id,
        ranking.summary.considered,
        ranking.summary.incomplete,
        ranking.summary.filtered_out
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_results,
        profile_missing: false,
    })
}
