use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::trace_id;
use crate::routes::{accounts, device_data, devices, groups, health, members};
use crate::services::AuthService;
use persistence::repositories::{
    DeviceDataRepository, DeviceGroupRepository, DeviceRepository, SessionRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn session_repository(&self) -> SessionRepository {
        SessionRepository::new(self.pool.clone())
    }

    pub fn group_repository(&self) -> DeviceGroupRepository {
        DeviceGroupRepository::new(self.pool.clone())
    }

    pub fn device_repository(&self) -> DeviceRepository {
        DeviceRepository::new(self.pool.clone())
    }

    pub fn data_repository(&self) -> DeviceDataRepository {
        DeviceDataRepository::new(self.pool.clone())
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.pool.clone(), self.config.clone())
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Account lifecycle routes; the handlers themselves distinguish
    // anonymous-only endpoints from session-bound ones.
    let account_routes = Router::new()
        .route("/api/v1/accounts/signup", post(accounts::signup))
        .route("/api/v1/accounts/login", post(accounts::login))
        .route("/api/v1/accounts/logout", post(accounts::logout))
        .route(
            "/api/v1/accounts/password/change",
            post(accounts::change_password),
        )
        .route(
            "/api/v1/accounts/password/reset",
            post(accounts::start_password_reset),
        )
        .route(
            "/api/v1/accounts/password/reset/confirm",
            post(accounts::confirm_password_reset),
        )
        .route("/api/v1/accounts/deactivate", post(accounts::deactivate))
        .route("/api/v1/accounts/delete", post(accounts::delete_account));

    // Ownership-scoped resource routes, nested member -> group ->
    // device -> data. Every handler authorizes the path member first.
    let resource_routes = Router::new()
        .route("/api/v1/members/:username", get(members::get_member))
        .route(
            "/api/v1/members/:username/groups",
            get(groups::list_groups).post(groups::create_group),
        )
        .route(
            "/api/v1/members/:username/groups/:group_name",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/api/v1/members/:username/groups/:group_name/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/api/v1/members/:username/groups/:group_name/devices/:uid",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route(
            "/api/v1/members/:username/groups/:group_name/devices/:uid/data",
            get(device_data::list_data).post(device_data::create_data),
        )
        .route(
            "/api/v1/members/:username/groups/:group_name/devices/:uid/data/:data_id",
            get(device_data::get_data)
                .put(device_data::update_data)
                .delete(device_data::delete_data),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(account_routes)
        .merge(resource_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
