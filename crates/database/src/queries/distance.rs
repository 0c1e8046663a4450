use distance::store::Result;
use model::{DistanceRecord, PairKey};
use sqlx::types::Json;
use sqlx::{Executor, Postgres};

use crate::data_model::distance::DistanceRow;

use super::convert_error;

const COLUMNS: &str = "
    from_location_id, to_location_id, distance_km, distance_miles,
    duration_text, duration_minutes, route_coords, calculated_at
";

pub async fn get<'c, E>(executor: E, key: PairKey) -> Result<Option<DistanceRecord>>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<DistanceRow> = sqlx::query_as(&format!(
        "
        SELECT {COLUMNS}
        FROM location_distances
        WHERE from_location_id = $1 AND to_location_id = $2;
        "
    ))
    .bind(key.from_location_id())
    .bind(key.to_location_id())
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?;

    Ok(row.map(DistanceRecord::from))
}

/// Insert or overwrite the record for its pair. The unique constraint on the
/// normalized pair is the only concurrency control; the last writer wins.
pub async fn upsert<'c, E>(
    executor: E,
    record: &DistanceRecord,
) -> Result<DistanceRecord>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: DistanceRow = sqlx::query_as(&format!(
        "
        INSERT INTO location_distances(
            from_location_id,
            to_location_id,
            distance_km,
            distance_miles,
            duration_text,
            duration_minutes,
            route_coords,
            calculated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (from_location_id, to_location_id)
        DO UPDATE SET
            distance_km = EXCLUDED.distance_km,
            distance_miles = EXCLUDED.distance_miles,
            duration_text = EXCLUDED.duration_text,
            duration_minutes = EXCLUDED.duration_minutes,
            route_coords = EXCLUDED.route_coords,
            calculated_at = EXCLUDED.calculated_at,
            updated_at = NOW()
        RETURNING {COLUMNS};
        "
    ))
    .bind(record.from_location_id)
    .bind(record.to_location_id)
    .bind(record.distance_km)
    .bind(record.distance_miles)
    .bind(&record.duration_text)
    .bind(record.duration_minutes)
    .bind(Json(&record.route_coords))
    .bind(record.calculated_at)
    .fetch_one(executor)
    .await
    .map_err(convert_error)?;

    Ok(DistanceRecord::from(row))
}

pub async fn delete<'c, E>(executor: E, key: PairKey) -> Result<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query(
        "
        DELETE FROM location_distances
        WHERE from_location_id = $1 AND to_location_id = $2;
        ",
    )
    .bind(key.from_location_id())
    .bind(key.to_location_id())
    .execute(executor)
    .await
    .map_err(convert_error)?;

    Ok(result.rows_affected() > 0)
}
