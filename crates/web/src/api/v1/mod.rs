use axum::{
    routing::{get, on},
    Router,
};

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

mod distances;
mod locations;
mod multi_route;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(route_not_found))
        .nest_service("/locations", locations::routes(state.clone()))
        .nest_service("/distances", distances::routes(state.clone()))
        .nest_service("/routes", multi_route::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
