use std::sync::Arc;

use database::{DatabaseConnectionInfo, PgDatabase};
use mapbox::MapboxClient;
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // routing client; startable without credentials, lookups then fail with
    // a typed error until MAPBOX_ACCESS_TOKEN is provided.
    let routing = MapboxClient::from_env();
    if !routing.is_configured() {
        log::warn!("MAPBOX_ACCESS_TOKEN not set; distance lookups will fail");
    }

    let web_future = start_web_server(WebState::new(database, Arc::new(routing)));

    let _ = web_future.await;
}
