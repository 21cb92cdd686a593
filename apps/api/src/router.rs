use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use hospital_cell::router::hospital_routes;
use shared_config::AppConfig;
use slot_cell::router::slot_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "MedBook API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/hospitals", hospital_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/slots", slot_routes(state))
}
