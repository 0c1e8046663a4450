use axum::{
    extract::{Path, Query, State},
    routing::{get, on},
    Json, Router,
};
use distance::store::{LocationStore, PageRequest, PairingFilter};
use model::{
    distance::OUTDATED_AFTER_DAYS, DistanceRecord, DistanceSource, Location,
};
use serde::{Deserialize, Serialize};

use crate::{
    common::{route_not_found, Pagination, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/recycling", get(recycling_distances))
        .route("/:from/:to", get(pair_distance))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct PairQuery {
    #[serde(default)]
    force: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PairDistanceDto {
    source: DistanceSource,
    #[serde(flatten)]
    record: DistanceRecord,
}

async fn pair_distance(
    State(WebState { service }): State<WebState>,
    Path((from, to)): Path<(i64, i64)>,
    Query(params): Query<PairQuery>,
) -> RouteResult<Json<PairDistanceDto>> {
    let outcome = service.distance_between(from, to, params.force).await?;
    Ok(Json(PairDistanceDto {
        source: outcome.source,
        record: outcome.record,
    }))
}

#[derive(Deserialize)]
struct RecyclingQuery {
    /// "none" lists DCs without a pairing; a numeric id filters to DCs paired
    /// to that recycling site.
    recycling_id: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

#[serde_with::skip_serializing_none]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecyclingDistanceRow {
    dc_id: i64,
    dc_short_code: String,
    rec_id: Option<i64>,
    rec_short_code: Option<String>,
    distance_km: Option<f64>,
    distance_miles: Option<f64>,
    duration_text: String,
    route_coords: Vec<[f64; 2]>,
    outdated: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecyclingShortRef {
    id: i64,
    short_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecyclingDistancesResponse {
    data: Vec<RecyclingDistanceRow>,
    pagination: Pagination,
    recycling_locations: Vec<RecyclingShortRef>,
}

/// DC -> recycling distance report. Missing pairs compute lazily; individual
/// lookup failures degrade to a "No route" row instead of failing the page.
async fn recycling_distances(
    State(WebState { service }): State<WebState>,
    Query(params): Query<RecyclingQuery>,
) -> RouteResult<Json<RecyclingDistancesResponse>> {
    let filter = match params.recycling_id.as_deref() {
        Some("none") => Some(PairingFilter::Unpaired),
        Some(raw) => raw.parse().ok().map(PairingFilter::PairedTo),
        None => None,
    };
    let page = PageRequest {
        page: params.page.unwrap_or(1).max(1),
        per_page: params.per_page.unwrap_or(15).clamp(1, 100),
    };

    let paged = service
        .store()
        .distribution_centers_page(filter, page)
        .await?;

    let mut rows = Vec::with_capacity(paged.items.len());
    for dc in &paged.items {
        rows.push(distance_row(&service, dc).await);
    }

    let recycling_locations = service
        .store()
        .recycling_sites()
        .await?
        .into_iter()
        .map(|site| RecyclingShortRef {
            id: site.id,
            short_code: site.short_code,
        })
        .collect();

    Ok(Json(RecyclingDistancesResponse {
        data: rows,
        pagination: Pagination {
            current_page: paged.page,
            total_pages: paged.total_pages(),
            total_items: paged.total,
            page_size: paged.per_page,
        },
        recycling_locations,
    }))
}

async fn distance_row(
    service: &crate::Service,
    dc: &Location,
) -> RecyclingDistanceRow {
    let Some(rec_id) = dc.recycling_location_id else {
        return RecyclingDistanceRow {
            dc_id: dc.id,
            dc_short_code: dc.short_code.clone(),
            rec_id: None,
            rec_short_code: None,
            distance_km: None,
            distance_miles: None,
            duration_text: "No recycling assigned".to_owned(),
            route_coords: Vec::new(),
            outdated: false,
        };
    };

    let rec_short_code = match service.store().location(rec_id).await {
        Ok(Some(rec)) => Some(rec.short_code),
        _ => None,
    };

    match service.distance_between(dc.id, rec_id, false).await {
        Ok(outcome) => RecyclingDistanceRow {
            dc_id: dc.id,
            dc_short_code: dc.short_code.clone(),
            rec_id: Some(rec_id),
            rec_short_code,
            distance_km: Some(outcome.record.distance_km),
            distance_miles: Some(outcome.record.distance_miles),
            duration_text: outcome.record.duration_display(),
            outdated: outcome.record.is_outdated(OUTDATED_AFTER_DAYS),
            route_coords: outcome.record.route_coords,
        },
        Err(why) => {
            log::warn!(
                "distance lookup failed for DC {} -> recycling {}: {}",
                dc.short_code,
                rec_id,
                why
            );
            RecyclingDistanceRow {
                dc_id: dc.id,
                dc_short_code: dc.short_code.clone(),
                rec_id: Some(rec_id),
                rec_short_code,
                distance_km: None,
                distance_miles: None,
                duration_text: "No route".to_owned(),
                route_coords: Vec::new(),
                outdated: false,
            }
        }
    }
}
