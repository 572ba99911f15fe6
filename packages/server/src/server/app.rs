//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::notifications::Dispatcher;
use crate::kernel::ServerDeps;
use crate::server::middleware::identity_middleware;
use crate::server::routes;

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the Axum application router
pub fn build_app(deps: Arc<ServerDeps>) -> Router {
    let dispatcher = Arc::new(Dispatcher::new(
        deps.db_pool.clone(),
        deps.push_hub.clone(),
        deps.clock.clone(),
    ));

    let app_state = AxumAppState { deps, dispatcher };

    // CORS: the mobile app and the web console run on other origins
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-member-id"),
        ]);

    Router::new()
        // Breeding workflow
        .route("/api/matings", post(routes::breeding::register_mating_handler))
        .route(
            "/api/matings/:id",
            patch(routes::breeding::update_mating_handler)
                .delete(routes::breeding::delete_mating_handler),
        )
        .route(
            "/api/animals/:id/matings",
            get(routes::breeding::list_matings_handler),
        )
        .route(
            "/api/matings/:id/diagnosis",
            post(routes::breeding::record_diagnosis_handler),
        )
        .route(
            "/api/diagnoses/:id",
            patch(routes::breeding::update_diagnosis_handler)
                .delete(routes::breeding::delete_diagnosis_handler),
        )
        .route(
            "/api/diagnoses/:id/birth",
            post(routes::breeding::record_birth_handler),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(routes::notifications::list_handler),
        )
        .route(
            "/api/notifications/:id/read",
            post(routes::notifications::mark_read_handler),
        )
        .route(
            "/api/notifications/read-all",
            post(routes::notifications::mark_all_read_handler),
        )
        .route(
            "/api/notifications/read",
            delete(routes::notifications::clear_read_handler),
        )
        // Husbandry + stock
        .route("/api/feedings", post(routes::husbandry::record_feeding_handler))
        .route(
            "/api/feedings/:id",
            delete(routes::husbandry::delete_feeding_handler),
        )
        .route(
            "/api/health-events",
            post(routes::husbandry::record_health_event_handler),
        )
        .route(
            "/api/health-events/:id",
            delete(routes::husbandry::delete_health_event_handler),
        )
        .route("/api/stock/:id", get(routes::husbandry::get_stock_item_handler))
        // Real-time push
        .route("/api/streams/:topic", get(routes::stream::stream_handler))
        // Health check
        .route("/health", get(routes::health::health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(identity_middleware))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
