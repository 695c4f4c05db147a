//! services/api/src/web/router.rs
//!
//! Assembles every route of the service into a single axum `Router`.

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    auth::{login_handler, login_page_handler, logout_handler},
    middleware::require_login,
    pages::{home_handler, services_handler},
    rest::{
        api_doc, create_post_handler, list_posts_handler, not_found_handler, system_handler,
        time_handler,
    },
    session::with_session,
    state::AppState,
};

/// Build the router with the JSON API, the browser pages and the API docs.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // JSON API (no session)
    let api_routes = Router::new()
        .route("/api/blog", get(list_posts_handler).post(create_post_handler))
        .route("/api/time", get(time_handler))
        .route("/api/system", get(system_handler));

    // Pages behind the login gate
    let protected_routes = Router::new()
        .route("/services", get(services_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_login,
        ));

    // Browser pages; every one of them carries a session
    let page_routes = Router::new()
        .route("/", get(home_handler))
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/logout", get(logout_handler))
        .merge(protected_routes)
        .layer(axum_middleware::from_fn(with_session));

    let app_router = Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .fallback(not_found_handler)
        .with_state(app_state);

    Router::new()
        .merge(app_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc()))
        .layer(TraceLayer::new_for_http())
}
