use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{bad_request, store_error_response, AppState};
use crate::models::{ErrorResponse, ProfileUpdateRequest};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles/{id}", web::get().to(get_profile))
        .route("/profiles/{id}", web::put().to(update_profile));
}

/// GET /api/v1/profiles/{id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match state.load_profile(&user_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: format!("No profile for user {}", user_id),
            status_code: 404,
        }),
        Err(e) => store_error_response("Failed to fetch profile", &e),
    }
}

/// Save an onboarding or profile-page edit
///
/// PUT /api/v1/profiles/{id}
///
/// Fields the request leaves out keep their stored values. The candidate
/// pool snapshot is dropped so the next ranking sees the edit.
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ProfileUpdateRequest>,
) -> impl Responder {
    let user_id = path.into_inner();

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for profile {}: {:?}", user_id, errors);
        return bad_request("Validation failed", errors.to_string());
    }

    if let (Some(allowed), Some(domain)) = (&state.allowed_email_domain, req.email_domain()) {
        if !domain.eq_ignore_ascii_case(allowed) {
            return bad_request(
                "Invalid email domain",
                format!("Email must be a @{} address", allowed),
            );
        }
    }

    let update = req.into_inner().into_update(user_id.clone());
    if let Err(e) = state.store.save_profile(&update).await {
        return store_error_response("Failed to save profile", &e);
    }

    if let Err(e) = state.cache.invalidate_profile(&user_id).await {
        tracing::warn!("Failed to invalidate cache for {}: {}", user_id, e);
    }

    tracing::info!("Saved profile for user {}", user_id);

    match state.load_profile(&user_id).await {
        Ok(Some(saved)) => HttpResponse::Ok().json(saved),
        Ok(None) => HttpResponse::Ok().json(update.into_profile()),
        Err(e) => store_error_response("Failed to fetch profile", &e),
    }
}
