use model::Coordinate;
use serde::Deserialize;

use crate::client::MapboxClient;
use crate::ApiError;

/// Response shape of the Mapbox Geocoding v5 API. Only the pieces the engine
/// consumes are modeled.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    /// `[lng, lat]` of the match.
    pub center: [f64; 2],
    pub place_name: Option<String>,
}

/// Forward-geocode a free-text address to its best match, constrained to
/// address-type results within one country. `Ok(None)` means the service had
/// no match.
pub async fn forward(
    client: &MapboxClient,
    address: &str,
    country: &str,
) -> Result<Option<Coordinate>, ApiError> {
    let credentials = client.credentials()?;

    let mut url = client.url(&[
        "geocoding",
        "v5",
        "mapbox.places",
        &format!("{}.json", address),
    ])?;
    url.query_pairs_mut()
        .append_pair("access_token", &credentials.access_token)
        .append_pair("limit", "1")
        .append_pair("types", "address")
        .append_pair("country", country);

    let response: GeocodeResponse = client.get(url).await?;
    match response.features.first() {
        Some(feature) => {
            log::debug!(
                "geocoded {:?} to {:?}",
                address,
                feature.place_name.as_deref().unwrap_or("<unnamed>")
            );
            let [longitude, latitude] = feature.center;
            Ok(Some(Coordinate::new(latitude, longitude)))
        }
        None => {
            log::warn!("no geocoding match for {:?}", address);
            Ok(None)
        }
    }
}
