// Integration tests for the ZotHomes Match HTTP service

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use zothomes_match::core::Matcher;
use zothomes_match::models::{
    AcademicYear, CampusLocation, FindMatchesResponse, Listing, Profile, ProfileUpdate,
    SearchListingsResponse, SleepSchedule,
};
use zothomes_match::routes::{configure_routes, AppState};
use zothomes_match::services::{CacheManager, DocumentStore, InMemoryStore, StoreError};

const CAMPUS: CampusLocation = CampusLocation {
    latitude: 33.6405,
    longitude: -117.8443,
};

fn create_profile(id: &str, sleep: SleepSchedule, cleanliness: u8) -> Profile {
    Profile {
        id: id.to_string(),
        name: Some(format!("Student {}", id)),
        email: Some(format!("{}@uci.edu", id)),
        major: Some("Computer Science".to_string()),
        year: Some(AcademicYear::Junior),
        sleep_schedule: Some(sleep),
        cleanliness: Some(cleanliness),
        budget_min: Some(700),
        budget_max: Some(900),
        interests: ["Coding", "Hiking"].map(String::from).into(),
        ..Profile::default()
    }
}

fn create_state(store: Arc<dyn DocumentStore>) -> AppState {
    AppState {
        store,
        cache: Arc::new(CacheManager::in_memory(100, 60)),
        matcher: Matcher::with_default_weights(),
        campus: CAMPUS,
        allowed_email_domain: Some("uci.edu".to_string()),
        default_limit: 20,
        max_limit: 2,
    }
}

fn seeded_store() -> Arc<dyn DocumentStore> {
    let mut incomplete = create_profile("incomplete", SleepSchedule::EarlyBird, 3);
    incomplete.year = None;

    Arc::new(InMemoryStore::with_data(
        vec![
            create_profile("viewer", SleepSchedule::EarlyBird, 3),
            create_profile("alex", SleepSchedule::EarlyBird, 3),
            create_profile("blake", SleepSchedule::NightOwl, 1),
            create_profile("casey", SleepSchedule::Flexible, 4),
            incomplete,
        ],
        vec![],
    ))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_check() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_find_matches_ranks_pool() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "viewer" }))
        .to_request();
    let body: FindMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert!(!body.profile_missing);
    assert_eq!(body.total_results, 3);
    // max_limit caps the page
    let ids: Vec<&str> = body.matches.iter().map(|m| m.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["alex", "casey"]);
    assert_eq!(body.matches[0].match_score, 60);
}

#[actix_web::test]
async fn test_find_matches_applies_filters() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({
            "userId": "viewer",
            "filters": { "sleepSchedule": "night-owl" },
        }))
        .to_request();
    let body: FindMatchesResponse = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<&str> = body.matches.iter().map(|m| m.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["casey", "blake"]);
}

#[actix_web::test]
async fn test_find_matches_year_filter_is_lenient() {
    let mut state = create_state(seeded_store());
    state.max_limit = 100;
    let app = init_app!(state);

    let find = |year: &str| {
        test::TestRequest::post()
            .uri("/api/v1/matches/find")
            .set_json(json!({ "userId": "viewer", "filters": { "year": year } }))
            .to_request()
    };

    let all: FindMatchesResponse = test::call_and_read_body_json(&app, find("all")).await;
    assert_eq!(all.total_results, 3);

    let resp = test::call_service(&app, find("postdoc")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let none: FindMatchesResponse = test::read_body_json(resp).await;
    assert_eq!(none.total_results, 0);
    assert!(none.matches.is_empty());
}

#[actix_web::test]
async fn test_find_matches_without_viewer_profile() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "newcomer" }))
        .to_request();
    let body: FindMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.profile_missing);
    assert!(body.matches.is_empty());
}

#[actix_web::test]
async fn test_find_matches_rejects_empty_user_id() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_get_profile() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::get().uri("/api/v1/profiles/alex").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["sleepSchedule"], "early-bird");

    let req = test::TestRequest::get().uri("/api/v1/profiles/nobody").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

fn update_body(email: &str, cleanliness: u8) -> Value {
    json!({
        "name": "Blake Rivera",
        "email": email,
        "year": "Junior",
        "major": "Computer Science",
        "sleepSchedule": "early-bird",
        "cleanliness": cleanliness,
        "budgetMin": 700,
        "budgetMax": 900,
        "interests": ["Coding", "Hiking"],
    })
}

#[actix_web::test]
async fn test_profile_edit_refreshes_rankings() {
    let app = init_app!(create_state(seeded_store()));

    let find = || {
        test::TestRequest::post()
            .uri("/api/v1/matches/find")
            .set_json(json!({ "userId": "viewer", "filters": { "minMatchScore": 60 } }))
            .to_request()
    };

    // Warm the candidate pool snapshot
    let before: FindMatchesResponse = test::call_and_read_body_json(&app, find()).await;
    assert_eq!(before.total_results, 1);

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/blake")
        .set_json(update_body("blake@uci.edu", 3))
        .to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["name"], "Blake Rivera");
    assert_eq!(saved["cleanliness"], 3);

    let after: FindMatchesResponse = test::call_and_read_body_json(&app, find()).await;
    let ids: Vec<&str> = after.matches.iter().map(|m| m.candidate.id.as_str()).collect();
    assert_eq!(ids, vec!["alex", "blake"]);
}

#[actix_web::test]
async fn test_profile_edit_keeps_unsent_interests_and_preferences() {
    let mut alex = create_profile("alex", SleepSchedule::EarlyBird, 3);
    alex.preferences.non_smoker = true;
    let store = Arc::new(InMemoryStore::with_data(vec![alex], vec![]));
    let app = init_app!(create_state(store));

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/alex")
        .set_json(json!({
            "name": "Alex Kim",
            "year": "Junior",
            "major": "Computer Science",
            "sleepSchedule": "night-owl",
            "cleanliness": 4,
            "bio": "Night shifts at the library",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/profiles/alex").to_request();
    let saved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["sleepSchedule"], "night-owl");
    assert_eq!(saved["interests"], json!(["Coding", "Hiking"]));
    assert_eq!(saved["preferences"]["nonSmoker"], true);
}

#[actix_web::test]
async fn test_profile_edit_rejects_foreign_email() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/blake")
        .set_json(update_body("blake@gmail.com", 3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid email domain");
}

#[actix_web::test]
async fn test_profile_edit_rejects_out_of_range_cleanliness() {
    let app = init_app!(create_state(seeded_store()));

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/blake")
        .set_json(update_body("blake@uci.edu", 9))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_search_listings_from_seed_file() {
    let store = InMemoryStore::from_seed_file("data/seed.json")
        .await
        .expect("seed file should load");
    let mut state = create_state(Arc::new(store));
    state.max_limit = 100;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/listings/search")
        .set_json(json!({
            "filter": { "propertyType": "apartment", "priceMax": 1600, "amenities": ["Pool"] },
        }))
        .to_request();
    let body: SearchListingsResponse = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<&str> = body.listings.iter().map(|m| m.listing.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert!(body.listings.iter().all(|m| m.distance_km.is_some()));
}

#[actix_web::test]
async fn test_seed_file_profiles_rank() {
    let store = InMemoryStore::from_seed_file("data/seed.json")
        .await
        .expect("seed file should load");
    let mut state = create_state(Arc::new(store));
    state.max_limit = 100;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "sarah-j" }))
        .to_request();
    let body: FindMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total_results, 3);
    assert_eq!(body.matches[0].candidate.id, "emma-r");
}

/// Store that fails every call
struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn get_profile(&self, _user_id: &str) -> Result<Option<Profile>, StoreError> {
        Err(StoreError::Unauthorized)
    }

    async fn list_profiles(&self, _excluding: Option<&str>) -> Result<Vec<Profile>, StoreError> {
        Err(StoreError::Unauthorized)
    }

    async fn save_profile(&self, _update: &ProfileUpdate) -> Result<(), StoreError> {
        Err(StoreError::Unauthorized)
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        Err(StoreError::Unauthorized)
    }
}

#[actix_web::test]
async fn test_store_failure_is_server_error() {
    let app = init_app!(create_state(Arc::new(UnavailableStore)));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "userId": "viewer" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 500);
}
