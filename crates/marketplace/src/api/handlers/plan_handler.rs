//! Public plan catalogue.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::SubscriptionPlan;

use crate::api::AppState;

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans))
        .route("/:id", get(get_plan))
}

/// Active plans, lowest priority first
#[utoipa::path(
    get,
    path = "/plans",
    tag = "Plans",
    responses((status = 200, description = "Active plans", body = [SubscriptionPlan]))
)]
pub async fn list_plans(State(state): State<AppState>) -> AppResult<Json<Vec<SubscriptionPlan>>> {
    Ok(Json(state.services.subscriptions().list_active_plans().await?))
}

/// One offered plan; retired plans are not public
#[utoipa::path(
    get,
    path = "/plans/{id}",
    tag = "Plans",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan", body = SubscriptionPlan),
        (status = 404, description = "Unknown or retired plan")
    )
)]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubscriptionPlan>> {
    let plan = state.services.subscriptions().get_plan(id).await?;
    if !plan.is_active {
        return Err(AppError::NotFound);
    }
    Ok(Json(plan))
}
