use axum::{
    routing::{get, post, MethodRouter},
    Router,
};

use super::handlers;
use super::server::AppState;

/// Register `path` with and without a trailing slash
fn route_both(router: Router<AppState>, path: &str, method: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, method.clone())
        .route(&format!("{}/", path), method)
}

/// Create API router with all endpoints
pub fn api_routes() -> Router<AppState> {
    let mut router = Router::new();

    // Tasks
    router = route_both(
        router,
        "/tasks",
        get(handlers::list_tasks).post(handlers::create_task),
    );
    router = route_both(
        router,
        "/tasks/:id",
        get(handlers::get_task)
            .put(handlers::replace_task)
            .patch(handlers::update_task)
            .delete(handlers::delete_task),
    );

    // Categories
    router = route_both(
        router,
        "/categories",
        get(handlers::list_categories).post(handlers::create_category),
    );
    router = route_both(
        router,
        "/categories/:id",
        get(handlers::get_category)
            .put(handlers::replace_category)
            .patch(handlers::update_category)
            .delete(handlers::delete_category),
    );

    // Context entries
    router = route_both(
        router,
        "/contexts",
        get(handlers::list_contexts).post(handlers::create_context),
    );
    router = route_both(
        router,
        "/contexts/:id",
        get(handlers::get_context)
            .put(handlers::replace_context)
            .patch(handlers::update_context)
            .delete(handlers::delete_context),
    );

    router = route_both(router, "/ai-suggestions", post(handlers::ai_suggestions));

    route_both(router, "/health", get(handlers::health_handler))
}
