use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn hospital_routes(state: Arc<AppConfig>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/{hospital_id}", get(handlers::get_hospital_public));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/", post(handlers::register_hospital))
        .route("/me", get(handlers::get_own_hospital))
        .route("/me", put(handlers::update_hospital_profile))
        .route("/me/departments", post(handlers::create_department))
        .route("/me/departments", get(handlers::list_departments))
        .route("/me/departments/{department_id}", put(handlers::update_department))
        .route("/me/departments/{department_id}", delete(handlers::delete_department))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state)
}
