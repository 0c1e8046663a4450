use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, on},
    Json, Router,
};
use distance::store::{LocationStore, PageRequest};
use distance::RecalcEvent;
use model::{Location, LocationDraft};
use serde::Deserialize;

use crate::{
    common::{
        route_not_found, schema, RouteErrorResponse, RouteResult, VecResponse,
        METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Location>))
        .route("/", get(list).post(create))
        .route("/:id", get(show).put(update).delete(destroy))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct ListQuery {
    search: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(15).clamp(1, 100),
        }
    }
}

async fn list(
    State(WebState { service }): State<WebState>,
    Query(params): Query<ListQuery>,
) -> RouteResult<Json<VecResponse<Location>>> {
    let page = params.page_request();
    let paged = service
        .store()
        .list_locations(params.search.as_deref(), page)
        .await?;

    let total_pages = paged.total_pages();
    Ok(VecResponse::paginated(
        paged.items,
        paged.page,
        total_pages,
        paged.total,
        paged.per_page,
    )
    .json())
}

async fn create(
    State(WebState { service }): State<WebState>,
    Json(draft): Json<LocationDraft>,
) -> RouteResult<(StatusCode, Json<Location>)> {
    draft
        .validate_pairing()
        .map_err(|why| RouteErrorResponse::unprocessable(why.to_string()))?;

    let location = service.store().insert_location(&draft).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

async fn show(
    State(WebState { service }): State<WebState>,
    Path(id): Path<i64>,
) -> RouteResult<Json<Location>> {
    service
        .store()
        .location(id)
        .await?
        .map(Json)
        .ok_or_else(|| RouteErrorResponse::from(distance::StoreError::NotFound))
}

async fn update(
    State(WebState { service }): State<WebState>,
    Path(id): Path<i64>,
    Json(draft): Json<LocationDraft>,
) -> RouteResult<Json<Location>> {
    draft
        .validate_pairing()
        .map_err(|why| RouteErrorResponse::unprocessable(why.to_string()))?;

    let before = service
        .store()
        .location(id)
        .await?
        .ok_or_else(|| RouteErrorResponse::from(distance::StoreError::NotFound))?;

    let updated = service.store().update_location(id, &draft).await?;

    // Cached distances follow the write; a failed recompute never fails the
    // save itself.
    if let Some(event) = RecalcEvent::detect(&before, &updated) {
        if let Err(why) = service.recalc(event).await {
            log::warn!("distance recalculation after update of {}: {}", id, why);
        }
    }

    Ok(Json(updated))
}

async fn destroy(
    State(WebState { service }): State<WebState>,
    Path(id): Path<i64>,
) -> RouteResult<StatusCode> {
    service.store().delete_location(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
