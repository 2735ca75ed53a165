use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    audit_logs, auth, companies, dashboard, employees, employment_history, search, user_profiles,
};
use crate::api::state::AppState;

/// Builds the application router with all middleware attached
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // Company routes
        .route(
            "/api/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/api/companies/bulk_upload",
            post(companies::bulk_upload_companies),
        )
        .route(
            "/api/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        // Employee routes
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employees/bulk_upload",
            post(employees::bulk_upload_employees),
        )
        .route(
            "/api/employees/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        // User administration
        .route("/api/user-profiles", get(user_profiles::list_user_profiles))
        .route(
            "/api/user-profiles/:id",
            get(user_profiles::get_user_profile).put(user_profiles::update_user_profile),
        )
        // Read-only routes
        .route(
            "/api/employment-history",
            get(employment_history::list_history),
        )
        .route("/api/audit-logs", get(audit_logs::list_audit_logs))
        .route("/api/search", get(search::search_employees))
        .route("/api/dashboard", get(dashboard::dashboard))
        // Middleware
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}

fn handle_panic(_: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    use axum::response::IntoResponse;

    tracing::error!("Handler panicked");
    crate::api::errors::ApiError::internal_server_error("Internal server error").into_response()
}
