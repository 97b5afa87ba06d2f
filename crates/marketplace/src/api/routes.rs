//! Application route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_handler, auth_handler, booking_handler, health_handler, order_handler, plan_handler,
    product_handler, seller_handler, service_handler, store_handler,
};
use super::middleware::{
    admin_only, auth_middleware, rate_limit_auth_middleware, rate_limit_middleware,
    seller_or_admin,
};
use super::openapi::ApiDoc;
use super::AppState;

fn authenticated(state: &AppState, routes: Router<AppState>) -> Router<AppState> {
    routes.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

fn sellers_and_admins(state: &AppState, routes: Router<AppState>) -> Router<AppState> {
    authenticated(state, routes.route_layer(middleware::from_fn(seller_or_admin)))
}

fn admins(state: &AppState, routes: Router<AppState>) -> Router<AppState> {
    authenticated(state, routes.route_layer(middleware::from_fn(admin_only)))
}

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let auth = auth_handler::registration_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_auth_middleware,
        ))
        .merge(authenticated(&state, auth_handler::session_routes()));

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/plans", plan_handler::plan_routes())
        .nest(
            "/sellers",
            sellers_and_admins(&state, seller_handler::seller_routes()),
        )
        .nest(
            "/stores",
            store_handler::public_routes()
                .merge(sellers_and_admins(&state, store_handler::owner_routes())),
        )
        .nest(
            "/products",
            product_handler::public_routes()
                .merge(sellers_and_admins(&state, product_handler::owner_routes())),
        )
        .nest(
            "/services",
            service_handler::public_routes()
                .merge(sellers_and_admins(&state, service_handler::owner_routes())),
        )
        .nest(
            "/orders",
            authenticated(&state, order_handler::customer_routes())
                .merge(sellers_and_admins(&state, order_handler::store_routes())),
        )
        .nest(
            "/bookings",
            authenticated(&state, booking_handler::customer_routes())
                .merge(sellers_and_admins(&state, booking_handler::store_routes())),
        )
        .nest("/admin", admins(&state, admin_handler::admin_routes()))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health and docs are not rate limited
        .route("/health", get(health_handler::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
