use chrono::{DateTime, Utc};
use distance::store::Result;
use model::Coordinate;
use sqlx::{Executor, Postgres};

use crate::data_model::geocode::GeocodeRow;

use super::convert_error;

/// A hit requires the entry to still be alive; expired rows read as misses
/// and are overwritten by the next store.
pub async fn lookup<'c, E>(
    executor: E,
    address_hash: &str,
) -> Result<Option<Coordinate>>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<GeocodeRow> = sqlx::query_as(
        "
        SELECT address_hash, latitude, longitude, expires_at
        FROM geocode_cache
        WHERE address_hash = $1 AND expires_at > NOW();
        ",
    )
    .bind(address_hash)
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?;

    Ok(row.map(|row| row.coordinate()))
}

pub async fn put<'c, E>(
    executor: E,
    address_hash: &str,
    coordinate: Coordinate,
    expires_at: DateTime<Utc>,
) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        INSERT INTO geocode_cache(address_hash, latitude, longitude, expires_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (address_hash)
        DO UPDATE SET
            latitude = EXCLUDED.latitude,
            longitude = EXCLUDED.longitude,
            expires_at = EXCLUDED.expires_at;
        ",
    )
    .bind(address_hash)
    .bind(coordinate.latitude)
    .bind(coordinate.longitude)
    .bind(expires_at)
    .execute(executor)
    .await
    .map_err(convert_error)?;

    Ok(())
}
