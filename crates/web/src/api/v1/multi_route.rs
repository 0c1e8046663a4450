use axum::{
    extract::State,
    routing::{on, post},
    Json, Router,
};
use model::AggregateRoute;
use serde::Deserialize;

use crate::{
    common::{route_not_found, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/multi", post(calculate_multi))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiRouteRequest {
    location_ids: Vec<i64>,
    #[serde(default)]
    force: bool,
    /// Issue one multi-waypoint request instead of stitching per-pair
    /// segments. Requires coordinates on every stop.
    #[serde(default)]
    direct: bool,
}

async fn calculate_multi(
    State(WebState { service }): State<WebState>,
    Json(request): Json<MultiRouteRequest>,
) -> RouteResult<Json<AggregateRoute>> {
    let route = if request.direct {
        service.aggregate_direct(&request.location_ids).await?
    } else {
        service.aggregate(&request.location_ids, request.force).await?
    };
    Ok(Json(route))
}
