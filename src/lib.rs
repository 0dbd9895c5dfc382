pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod seed;
pub mod state;
pub mod validation;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore as SessionMemoryStore, SessionManagerLayer};

use crate::config::AppConfig;
use crate::state::AppState;

/// Build the full application router over the given state
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let sessions = SessionManagerLayer::new(SessionMemoryStore::default())
        .with_name(config.session.cookie_name.clone())
        .with_secure(config.session.secure_cookie)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(config.session.inactivity_days)));

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::home::root))
        .route("/health", get(handlers::public::home::health))
        .merge(auth_routes())
        .merge(campground_routes())
        .merge(review_routes())
        .fallback(handlers::fallback)
        .with_state(state)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(sessions),
        );

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    router
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth::{login, logout, register};

    Router::new()
        .route("/register", get(register::form).post(register::submit))
        .route("/login", get(login::form).post(login::submit))
        .route("/logout", get(logout::get))
}

fn campground_routes() -> Router<AppState> {
    use handlers::protected::campgrounds;
    use handlers::public::campgrounds as listing;

    Router::new()
        .route("/campgrounds", get(listing::index).post(campgrounds::create))
        // Registered before /:id so "new" is never read as an id
        .route("/campgrounds/new", get(campgrounds::new_form))
        .route(
            "/campgrounds/:id",
            get(listing::show).put(campgrounds::update).delete(campgrounds::delete),
        )
        .route("/campgrounds/:id/edit", get(campgrounds::edit_form))
}

fn review_routes() -> Router<AppState> {
    use handlers::protected::reviews;

    Router::new()
        .route("/campgrounds/:id/reviews", post(reviews::create))
        .route("/campgrounds/:id/reviews/:review_id", delete(reviews::delete))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
