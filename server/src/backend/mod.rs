//! # Backend Module
//!
//! Everything behind the HTTP port of the cat health tracker.
//!
//! ```text
//! IO Layer (REST handlers, session guard middleware)
//!     ↓
//! Domain Layer (cat and health record services, auth gate, route guard)
//!     ↓
//! Storage Layer (cat store, identity provider)
//! ```
//!
//! [`initialize_backend`] builds the services from a [`Config`];
//! [`create_router`] mounts the public auth routes, the guarded API and page
//! routes, and the static front-end bundle.

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use log::{info, warn};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::config::Config;
use domain::image_service::MAX_IMAGE_BYTES;
use domain::{CatService, HealthRecordService, ImageService};
use io::rest::{auth_apis, cat_apis, guard, health_record_apis, image_apis};
use storage::{CatStorage, IdentityProvider, InMemoryCatStore, InMemoryIdentityProvider};

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub cat_service: CatService,
    pub health_record_service: HealthRecordService,
    pub image_service: ImageService,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatStorage>,
        identity: Arc<dyn IdentityProvider>,
        upload_latency: Duration,
    ) -> Self {
        Self {
            cat_service: CatService::new(store.clone()),
            health_record_service: HealthRecordService::new(store),
            image_service: ImageService::new(upload_latency),
            identity,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up cat store");
    let store = if config.seed_demo_data {
        InMemoryCatStore::with_demo_data(config.store_latency)
    } else {
        InMemoryCatStore::new(config.store_latency)
    };

    info!("Setting up identity provider");
    let identity =
        InMemoryIdentityProvider::new(&config.oauth_authorize_url, &config.oauth_redirect_uri());
    if let Some(account) = &config.demo_account {
        match identity
            .register_account(&account.email, &account.password)
            .await
            .context("Failed to register demo account")?
        {
            Ok(user) => info!("Demo account ready: {}", user.email),
            Err(rejection) => warn!("Demo account not registered: {}", rejection),
        }
    }

    info!("Setting up application state");
    Ok(AppState::new(
        Arc::new(store),
        Arc::new(identity),
        config.store_latency,
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &Config) -> Result<Router> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin: {}", config.allowed_origin))?;
    // Credentialed requests carry the session cookie, so no wildcards here
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let session_guard = middleware::from_fn_with_state(app_state.clone(), guard::require_session);

    let public_api = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth_apis::login))
        .route("/auth/signup", post(auth_apis::signup))
        .route("/auth/google", get(auth_apis::google_sign_in))
        .route("/auth/google/callback", get(auth_apis::google_callback))
        .route("/auth/logout", post(auth_apis::logout))
        .route("/auth/session", get(auth_apis::get_session));

    let private_api = Router::new()
        .route("/cats", get(cat_apis::list_cats).post(cat_apis::create_cat))
        .route(
            "/cats/:cat_id",
            get(cat_apis::get_cat)
                .put(cat_apis::update_cat)
                .delete(cat_apis::delete_cat),
        )
        .route(
            "/cats/:cat_id/weights",
            get(health_record_apis::get_weight_history).post(health_record_apis::add_weight),
        )
        .route(
            "/cats/:cat_id/weights/:weight_id",
            delete(health_record_apis::delete_weight),
        )
        .route(
            "/cats/:cat_id/vet-visits",
            post(health_record_apis::add_vet_visit),
        )
        .route(
            "/cats/:cat_id/vet-visits/:visit_id",
            delete(health_record_apis::delete_vet_visit),
        )
        .route(
            "/cats/:cat_id/vaccinations",
            post(health_record_apis::add_vaccination),
        )
        .route(
            "/cats/:cat_id/vaccinations/:vaccination_id",
            delete(health_record_apis::delete_vaccination),
        )
        .route(
            "/images",
            post(image_apis::upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route_layer(session_guard.clone());

    // Front-end pages that need a signed-in user get the app shell only
    // after the guard lets them through
    let index = config.static_dir.join("index.html");
    let private_pages = Router::new()
        .route_service("/cats", ServeFile::new(&index))
        .route_service("/cats/*rest", ServeFile::new(&index))
        .route_service("/profile", ServeFile::new(&index))
        .route_layer(session_guard);

    let static_files = ServeDir::new(&config.static_dir).fallback(ServeFile::new(&index));

    Ok(Router::new()
        .nest("/api", public_api.merge(private_api))
        .merge(private_pages)
        .fallback_service(static_files)
        .layer(cors)
        .with_state(app_state))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
