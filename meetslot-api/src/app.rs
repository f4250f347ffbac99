/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use meetslot_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = meetslot_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    routing::{get, post},
    Router,
};
use meetslot_shared::service::booking::BookingService;
use meetslot_shared::service::users::UserService;
use meetslot_shared::store::postgres::{PgAppointmentStore, PgUserDirectory};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Booking service wired over the Postgres adapters
pub type PgBookingService = BookingService<PgUserDirectory, PgAppointmentStore>;

/// User service wired over the Postgres directory
pub type PgUserService = UserService<PgUserDirectory>;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The
/// services receive their storage adapters here, by construction — there
/// is no ambient database state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks)
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// User directory service
    pub users: PgUserService,

    /// Booking service
    pub booking: PgBookingService,
}

impl AppState {
    /// Creates new application state over a connection pool
    pub fn new(db: PgPool, config: Config) -> Self {
        let directory = PgUserDirectory::new(db.clone());
        let store = PgAppointmentStore::new(db.clone());

        Self {
            db,
            config: Arc::new(config),
            users: UserService::new(directory.clone()),
            booking: BookingService::new(directory, store),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check
/// └── /api/v1/
///     ├── /users/
///     │   ├── POST /                 # Create user
///     │   └── GET  /:id              # Get user by id
///     └── /appointments/
///         ├── POST /                 # Create appointment
///         └── GET  /:id              # Get appointment by id
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/", post(routes::users::create_user))
        .route("/:id", get(routes::users::get_user));

    let appointment_routes = Router::new()
        .route("/", post(routes::appointments::create_appointment))
        .route("/:id", get(routes::appointments::get_appointment));

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/appointments", appointment_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
