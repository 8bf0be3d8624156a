pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sequencer;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::services::{
    content_service::ContentService, deck_service::DeckService,
    extraction_service::ExtractionService, image_set_service::ImageSetService,
    user_service::UserService,
};

/// Multipart framing allowance on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub content_service: ContentService,
    pub user_service: UserService,
    pub image_set_service: ImageSetService,
    pub deck_service: DeckService,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let content_service = ContentService::new(pool.clone());
        let user_service = UserService::new(pool.clone());
        let extraction = ExtractionService::new(&config.uploads_dir, config.max_upload_bytes);
        let image_set_service = ImageSetService::new(pool.clone(), extraction);
        let deck_service = DeckService::new(
            content_service.clone(),
            config.timing,
            config.sample_cap,
            config.image_set_size,
        );

        Self {
            pool,
            config: Arc::new(config),
            content_service,
            user_service,
            image_set_service,
            deck_service,
        }
    }
}

/// The full HTTP surface: API routes, uploaded images and health.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/login", post(routes::auth::login))
        .route("/api/register", post(routes::auth::register))
        .route(
            "/api/tat",
            get(routes::content::list_tat).post(routes::content::create_tat),
        )
        .route("/api/tat/all", get(routes::content::list_all_tat))
        .route("/api/tat/random-set", get(routes::upload::random_set))
        .route("/api/tat/sets", get(routes::upload::list_sets))
        .route(
            "/api/tat/:id",
            axum::routing::patch(routes::content::update_tat).delete(routes::content::delete_tat),
        )
        .route(
            "/api/wat",
            get(routes::content::list_wat).post(routes::content::create_wat),
        )
        .route("/api/wat/all", get(routes::content::list_all_wat))
        .route(
            "/api/wat/:id",
            axum::routing::patch(routes::content::update_wat).delete(routes::content::delete_wat),
        )
        .route(
            "/api/srt",
            get(routes::content::list_srt).post(routes::content::create_srt),
        )
        .route("/api/srt/all", get(routes::content::list_all_srt))
        .route(
            "/api/srt/:id",
            axum::routing::patch(routes::content::update_srt).delete(routes::content::delete_srt),
        )
        .route(
            "/api/sdt/:persona",
            get(routes::content::list_sdt).post(routes::content::create_sdt),
        )
        .route("/api/sdt/:persona/all", get(routes::content::list_all_sdt))
        .route(
            "/api/sdt/:persona/:id",
            axum::routing::patch(routes::content::update_sdt).delete(routes::content::delete_sdt),
        )
        .route("/api/upload/ppt", post(routes::upload::upload_ppt))
        .route("/api/deck/:kind", get(routes::deck::get_deck))
        .layer(middleware::cache::no_store());

    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let uploads_dir = state.config.uploads_dir.clone();

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(api)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
        .layer(middleware::cors::api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
