use std::{env, error::Error};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use distance::store::{
    DistanceStore, GeocodeStore, LocationStore, PageRequest, Paged, PairingFilter,
    Result, ShipmentStore,
};
use model::{Coordinate, DistanceRecord, Location, LocationDraft, PairKey, Shipment};

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> std::result::Result<Self, Box<dyn Error>> {
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl LocationStore for PgDatabase {
    async fn location(&self, id: i64) -> Result<Option<Location>> {
        queries::location::get(&self.connection, id).await
    }

    async fn locations_by_ids(&self, ids: &[i64]) -> Result<Vec<Location>> {
        queries::location::get_many(&self.connection, ids).await
    }

    async fn list_locations(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Paged<Location>> {
        let mut paged =
            queries::location::list(&self.connection, search, page).await?;
        paged.total = queries::location::count(&self.connection, search).await?;
        Ok(paged)
    }

    async fn insert_location(&self, draft: &LocationDraft) -> Result<Location> {
        queries::location::insert(&self.connection, draft).await
    }

    async fn update_location(
        &self,
        id: i64,
        draft: &LocationDraft,
    ) -> Result<Location> {
        queries::location::update(&self.connection, id, draft).await
    }

    async fn delete_location(&self, id: i64) -> Result<()> {
        queries::location::delete(&self.connection, id).await
    }

    async fn distribution_centers_paired_to(
        &self,
        recycling_id: i64,
    ) -> Result<Vec<Location>> {
        queries::location::paired_to(&self.connection, recycling_id).await
    }

    async fn paired_distribution_centers(&self) -> Result<Vec<Location>> {
        queries::location::paired_distribution_centers(&self.connection).await
    }

    async fn distribution_centers_page(
        &self,
        filter: Option<PairingFilter>,
        page: PageRequest,
    ) -> Result<Paged<Location>> {
        let mut paged = queries::location::distribution_centers_page(
            &self.connection,
            filter,
            page,
        )
        .await?;
        paged.total =
            queries::location::distribution_centers_count(&self.connection, filter)
                .await?;
        Ok(paged)
    }

    async fn recycling_sites(&self) -> Result<Vec<Location>> {
        queries::location::recycling_sites(&self.connection).await
    }
}

#[async_trait]
impl DistanceStore for PgDatabase {
    async fn distance(&self, key: PairKey) -> Result<Option<DistanceRecord>> {
        queries::distance::get(&self.connection, key).await
    }

    async fn upsert_distance(
        &self,
        record: &DistanceRecord,
    ) -> Result<DistanceRecord> {
        queries::distance::upsert(&self.connection, record).await
    }

    async fn delete_distance(&self, key: PairKey) -> Result<bool> {
        queries::distance::delete(&self.connection, key).await
    }
}

#[async_trait]
impl GeocodeStore for PgDatabase {
    async fn cached_coordinate(
        &self,
        address_hash: &str,
    ) -> Result<Option<Coordinate>> {
        queries::geocode::lookup(&self.connection, address_hash).await
    }

    async fn store_coordinate(
        &self,
        address_hash: &str,
        coordinate: Coordinate,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        queries::geocode::put(&self.connection, address_hash, coordinate, expires_at)
            .await
    }
}

#[async_trait]
impl ShipmentStore for PgDatabase {
    async fn routable_shipments(&self) -> Result<Vec<Shipment>> {
        queries::shipment::routable(&self.connection).await
    }
}
