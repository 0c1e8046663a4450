use distance::provider::DrivingRoute;
use model::Coordinate;
use serde::Deserialize;

use crate::client::MapboxClient;
use crate::ApiError;

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<[f64; 2]>,
}

/// Driving route through the waypoints in order, with full-resolution GeoJSON
/// geometry. `Ok(None)` means the service found no route.
pub async fn driving(
    client: &MapboxClient,
    waypoints: &[Coordinate],
) -> Result<Option<DrivingRoute>, ApiError> {
    let credentials = client.credentials()?;

    let mut url = client.url(&[
        "directions",
        "v5",
        "mapbox",
        "driving",
        &coords_path(waypoints),
    ])?;
    url.query_pairs_mut()
        .append_pair("access_token", &credentials.access_token)
        .append_pair("geometries", "geojson")
        .append_pair("overview", "full");

    let response: DirectionsResponse = client.get(url).await?;
    if let Some(code) = &response.code {
        if code != "Ok" {
            log::warn!("directions request answered with code {:?}", code);
        }
    }

    Ok(response.routes.into_iter().next().map(|route| DrivingRoute {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        geometry: route.geometry.coordinates,
    }))
}

/// `lng,lat;lng,lat;...` path segment, waypoints in request order.
fn coords_path(waypoints: &[Coordinate]) -> String {
    waypoints
        .iter()
        .map(|coordinate| {
            format!("{},{}", coordinate.longitude, coordinate.latitude)
        })
        .collect::<Vec<_>>()
        .join(";")
}
