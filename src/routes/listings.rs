use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use super::{bad_request, store_error_response, AppState};
use crate::core::filter_listings;
use crate::models::{SearchListingsRequest, SearchListingsResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/listings/search", web::post().to(search_listings));
}

/// POST /api/v1/listings/search
async fn search_listings(
    state: web::Data<AppState>,
    req: web::Json<SearchListingsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let listings = match state.load_listings().await {
        Ok(listings) => listings,
        Err(e) => return store_error_response("Failed to load listings", &e),
    };

    let mut found = filter_listings(listings, &req.filter, state.campus);
    let total_results = found.len();
    found.truncate(state.page_size(req.limit));

    tracing::info!("Returning {} of {} listings", found.len(), total_results);

    HttpResponse::Ok().json(SearchListingsResponse {
        listings: found,
        total_results,
    })
}
