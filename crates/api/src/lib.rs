//! `api` crate — HTTP REST API of the hotel manager.
//!
//! Routes are grouped by the role allowed to call them:
//!   /api/auth            register, login, own profile
//!   /api/superadmin      hotels, hotel admins, plans, subscriptions, stats
//!   /api/admin           everything inside the admin's own hotel
//!   /api/employee        front desk, housekeeping and store room
//!   /api/client          catalogue, availability and own reservations
//!   /api/notifications   in-app notifications of the caller

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use db::DbPool;

pub use config::ApiConfig;
pub use error::ApiError;
pub use state::AppState;

use handlers::{
    auth as auth_handlers, client, dashboard, employees, notifications, planning, reservations, rooms,
    stocks, superadmin,
};

fn auth_routes(state: &AppState) -> Router<AppState> {
    let account = Router::new()
        .route("/me", get(auth_handlers::me))
        .route("/password", put(auth_handlers::change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_any));

    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .merge(account)
}

fn superadmin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/hotels", get(superadmin::list_hotels).post(superadmin::create_hotel))
        .route(
            "/hotels/:id",
            get(superadmin::get_hotel)
                .put(superadmin::update_hotel)
                .delete(superadmin::delete_hotel),
        )
        .route(
            "/hotels/:id/admins",
            get(superadmin::list_admins).post(superadmin::create_admin),
        )
        .route("/plans", get(superadmin::list_plans).post(superadmin::create_plan))
        .route("/plans/:id", put(superadmin::update_plan))
        .route(
            "/subscriptions",
            get(superadmin::list_subscriptions).post(superadmin::create_subscription),
        )
        .route("/subscriptions/expire", post(superadmin::expire_subscriptions))
        .route("/subscriptions/:id/cancel", post(superadmin::cancel_subscription))
        .route("/stats", get(superadmin::stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_superadmin))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/room-types", get(rooms::list_room_types).post(rooms::create_room_type))
        .route(
            "/room-types/:id",
            put(rooms::update_room_type).delete(rooms::delete_room_type),
        )
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/rooms/:id",
            get(rooms::get_room).put(rooms::update_room).delete(rooms::delete_room),
        )
        .route("/rooms/:id/status", patch(rooms::set_room_status))
        .route(
            "/reservations",
            get(reservations::admin_list).post(reservations::admin_create),
        )
        .route("/reservations/:id", get(reservations::admin_get))
        .route("/reservations/:id/status", patch(reservations::admin_set_status))
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/:id",
            put(employees::update).delete(employees::deactivate),
        )
        .route("/planning", get(planning::admin_week).post(planning::create))
        .route("/planning/copy-week", post(planning::copy_week))
        .route("/planning/:id", put(planning::update).delete(planning::delete))
        .route("/stocks", get(stocks::list).post(stocks::create))
        .route("/stocks/alerts", get(stocks::alerts))
        .route(
            "/stocks/:id",
            get(stocks::get).put(stocks::update).delete(stocks::delete),
        )
        .route(
            "/stocks/:id/movements",
            get(stocks::movements).post(stocks::record_movement),
        )
        .route("/dashboard", get(dashboard::dashboard))
        .route("/subscription", get(dashboard::subscription))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin))
}

fn employee_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/planning", get(planning::own_week))
        .route("/reservations", get(reservations::staff_list))
        .route("/reservations/:id/status", patch(reservations::staff_set_status))
        .route("/rooms", get(rooms::list_rooms))
        .route("/rooms/:id/status", patch(rooms::set_room_status))
        .route("/stocks", get(stocks::list))
        .route("/stocks/:id/movements", post(stocks::record_movement))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_staff))
}

fn client_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/hotels", get(client::list_hotels))
        .route("/hotels/:id/room-types", get(client::hotel_room_types))
        .route("/availability", get(client::availability))
        .route(
            "/reservations",
            get(reservations::client_list).post(reservations::client_create),
        )
        .route("/reservations/:id", get(reservations::client_get))
        .route("/reservations/:id/cancel", post(reservations::client_cancel))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_client))
}

fn notification_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/:id", axum::routing::delete(notifications::delete))
        .route("/:id/read", patch(notifications::mark_read))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_any))
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth_routes(&state))
        .nest("/api/superadmin", superadmin_routes(&state))
        .nest("/api/admin", admin_routes(&state))
        .nest("/api/employee", employee_routes(&state))
        .nest("/api/client", client_routes(&state))
        .nest("/api/notifications", notification_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `bind` and serve the API until the process is stopped.
pub async fn serve(bind: &str, pool: DbPool, config: ApiConfig) -> std::io::Result<()> {
    let app = router(AppState::new(pool, config));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
