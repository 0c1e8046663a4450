use distance::store::{PageRequest, Paged, PairingFilter, Result};
use model::{Location, LocationDraft};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::data_model::location::{into_locations, LocationRow};

use super::convert_error;

const COLUMNS: &str = "
    id, guid, short_code, name, address, city, state, zip, country,
    location_type, latitude, longitude, recycling_location_id, is_active,
    created_at, updated_at
";

pub async fn get<'c, E>(executor: E, id: i64) -> Result<Option<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: Option<LocationRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM locations WHERE id = $1;"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(convert_error)?;

    row.map(Location::try_from).transpose()
}

pub async fn get_many<'c, E>(executor: E, ids: &[i64]) -> Result<Vec<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM locations WHERE id = ANY($1) ORDER BY id;"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
    .map_err(convert_error)
    .and_then(into_locations)
}

pub async fn list<'c, E>(
    executor: E,
    search: Option<&str>,
    page: PageRequest,
) -> Result<Paged<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    let pattern = search.map(|search| format!("%{}%", search.replace('%', "")));

    let rows: Vec<LocationRow> = sqlx::query_as(&format!(
        "
        SELECT {COLUMNS}
        FROM locations
        WHERE $1::text IS NULL
            OR short_code ILIKE $1 OR name ILIKE $1 OR address ILIKE $1
            OR city ILIKE $1 OR state ILIKE $1 OR zip ILIKE $1
            OR country ILIKE $1 OR location_type ILIKE $1
        ORDER BY id
        LIMIT $2 OFFSET $3;
        "
    ))
    .bind(&pattern)
    .bind(page.per_page as i64)
    .bind(page.offset() as i64)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    Ok(Paged {
        items: into_locations(rows)?,
        // Total count is fetched separately by the caller when needed; the
        // store impl runs both queries.
        total: 0,
        page: page.page,
        per_page: page.per_page,
    })
}

pub async fn count<'c, E>(executor: E, search: Option<&str>) -> Result<usize>
where
    E: Executor<'c, Database = Postgres>,
{
    let pattern = search.map(|search| format!("%{}%", search.replace('%', "")));

    let (count,): (i64,) = sqlx::query_as(
        "
        SELECT COUNT(*)
        FROM locations
        WHERE $1::text IS NULL
            OR short_code ILIKE $1 OR name ILIKE $1 OR address ILIKE $1
            OR city ILIKE $1 OR state ILIKE $1 OR zip ILIKE $1
            OR country ILIKE $1 OR location_type ILIKE $1;
        ",
    )
    .bind(&pattern)
    .fetch_one(executor)
    .await
    .map_err(convert_error)?;

    Ok(count as usize)
}

pub async fn insert<'c, E>(executor: E, draft: &LocationDraft) -> Result<Location>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: LocationRow = sqlx::query_as(&format!(
        "
        INSERT INTO locations(
            guid, short_code, name, address, city, state, zip, country,
            location_type, latitude, longitude, recycling_location_id,
            is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {COLUMNS};
        "
    ))
    .bind(Uuid::new_v4())
    .bind(&draft.short_code)
    .bind(&draft.name)
    .bind(&draft.address)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.zip)
    .bind(&draft.country)
    .bind(draft.location_type.as_str())
    .bind(draft.latitude)
    .bind(draft.longitude)
    .bind(draft.recycling_location_id)
    .bind(draft.is_active)
    .fetch_one(executor)
    .await
    .map_err(convert_error)?;

    Location::try_from(row)
}

pub async fn update<'c, E>(
    executor: E,
    id: i64,
    draft: &LocationDraft,
) -> Result<Location>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: LocationRow = sqlx::query_as(&format!(
        "
        UPDATE locations
        SET short_code = $1,
            name = $2,
            address = $3,
            city = $4,
            state = $5,
            zip = $6,
            country = $7,
            location_type = $8,
            latitude = $9,
            longitude = $10,
            recycling_location_id = $11,
            is_active = $12,
            updated_at = NOW()
        WHERE id = $13
        RETURNING {COLUMNS};
        "
    ))
    .bind(&draft.short_code)
    .bind(&draft.name)
    .bind(&draft.address)
    .bind(&draft.city)
    .bind(&draft.state)
    .bind(&draft.zip)
    .bind(&draft.country)
    .bind(draft.location_type.as_str())
    .bind(draft.latitude)
    .bind(draft.longitude)
    .bind(draft.recycling_location_id)
    .bind(draft.is_active)
    .bind(id)
    .fetch_one(executor)
    .await
    .map_err(convert_error)?;

    Location::try_from(row)
}

pub async fn delete<'c, E>(executor: E, id: i64) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM locations WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await
        .map_err(convert_error)?;

    if result.rows_affected() == 0 {
        return Err(distance::StoreError::NotFound);
    }
    Ok(())
}

pub async fn paired_to<'c, E>(executor: E, recycling_id: i64) -> Result<Vec<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "
        SELECT {COLUMNS}
        FROM locations
        WHERE location_type = 'distribution_center'
            AND recycling_location_id = $1
        ORDER BY id;
        "
    ))
    .bind(recycling_id)
    .fetch_all(executor)
    .await
    .map_err(convert_error)
    .and_then(into_locations)
}

pub async fn paired_distribution_centers<'c, E>(executor: E) -> Result<Vec<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "
        SELECT {COLUMNS}
        FROM locations
        WHERE location_type = 'distribution_center'
            AND recycling_location_id IS NOT NULL
        ORDER BY id;
        "
    ))
    .fetch_all(executor)
    .await
    .map_err(convert_error)
    .and_then(into_locations)
}

pub async fn distribution_centers_page<'c, E>(
    executor: E,
    filter: Option<PairingFilter>,
    page: PageRequest,
) -> Result<Paged<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    let (unpaired_only, paired_to) = match filter {
        Some(PairingFilter::Unpaired) => (true, None),
        Some(PairingFilter::PairedTo(id)) => (false, Some(id)),
        None => (false, None),
    };

    let rows: Vec<LocationRow> = sqlx::query_as(&format!(
        "
        SELECT {COLUMNS}
        FROM locations
        WHERE location_type = 'distribution_center'
            AND (NOT $1 OR recycling_location_id IS NULL)
            AND ($2::bigint IS NULL OR recycling_location_id = $2)
        ORDER BY id
        LIMIT $3 OFFSET $4;
        "
    ))
    .bind(unpaired_only)
    .bind(paired_to)
    .bind(page.per_page as i64)
    .bind(page.offset() as i64)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    Ok(Paged {
        items: into_locations(rows)?,
        total: 0,
        page: page.page,
        per_page: page.per_page,
    })
}

pub async fn distribution_centers_count<'c, E>(
    executor: E,
    filter: Option<PairingFilter>,
) -> Result<usize>
where
    E: Executor<'c, Database = Postgres>,
{
    let (unpaired_only, paired_to) = match filter {
        Some(PairingFilter::Unpaired) => (true, None),
        Some(PairingFilter::PairedTo(id)) => (false, Some(id)),
        None => (false, None),
    };

    let (count,): (i64,) = sqlx::query_as(
        "
        SELECT COUNT(*)
        FROM locations
        WHERE location_type = 'distribution_center'
            AND (NOT $1 OR recycling_location_id IS NULL)
            AND ($2::bigint IS NULL OR recycling_location_id = $2);
        ",
    )
    .bind(unpaired_only)
    .bind(paired_to)
    .fetch_one(executor)
    .await
    .map_err(convert_error)?;

    Ok(count as usize)
}

pub async fn recycling_sites<'c, E>(executor: E) -> Result<Vec<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(&format!(
        "
        SELECT {COLUMNS}
        FROM locations
        WHERE location_type = 'recycling'
        ORDER BY short_code;
        "
    ))
    .fetch_all(executor)
    .await
    .map_err(convert_error)
    .and_then(into_locations)
}
