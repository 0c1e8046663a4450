pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::Router;
use database::PgDatabase;
use distance::DistanceService;
use mapbox::MapboxClient;
use tokio::net::TcpListener;

pub mod api;
pub mod common;

/// The concrete engine this binary serves: Postgres persistence, Mapbox
/// routing.
pub type Service = DistanceService<PgDatabase, MapboxClient>;

#[derive(Clone)]
pub struct WebState {
    pub service: Service,
}

impl WebState {
    pub fn new(database: PgDatabase, routing: Arc<MapboxClient>) -> Self {
        Self {
            service: DistanceService::new(database, routing),
        }
    }
}

pub async fn start_web_server(state: WebState) -> std::io::Result<()> {
    let routes = Router::new().nest_service("/api", api::routes(state));

    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
