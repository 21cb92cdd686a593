use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn slot_routes(state: Arc<AppConfig>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::list_slots_public));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/generate", post(handlers::generate_slots))
        .route("/{slot_id}/block", patch(handlers::block_slot))
        .route("/{slot_id}/unblock", patch(handlers::unblock_slot))
        .route("/{slot_id}/book", patch(handlers::book_slot))
        .route("/{slot_id}", delete(handlers::delete_slot))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
