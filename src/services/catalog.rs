use crate::core::matcher::ContactDirectory;
use crate::models::{Area, Expert};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors from the area catalog and expert directory
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL-backed catalog and contact directory
///
/// Read-only from this service's point of view: areas, experts and their
/// links are mutated by separate administrative flows, concurrently with
/// requests. Callers must treat any snapshot they read as possibly stale.
pub struct CatalogClient {
    pool: PgPool,
}

impl CatalogClient {
    /// Connect and run migrations.
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a client from settings, filling in pool defaults.
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, CatalogError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// List all catalog areas, ordered by id.
    ///
    /// This is the per-request snapshot used to build the classifier
    /// vocabulary.
    pub async fn list_areas(&self) -> Result<Vec<Area>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT area_id, area_name
            FROM innovation_areas
            ORDER BY area_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let areas = rows
            .iter()
            .map(|row| Area {
                id: row.get("area_id"),
                name: row.get("area_name"),
            })
            .collect();

        Ok(areas)
    }

    /// Resolve an area by its (unique) name.
    pub async fn area_by_name(&self, name: &str) -> Result<Option<Area>, CatalogError> {
        let row = sqlx::query(
            r#"
            SELECT area_id, area_name
            FROM innovation_areas
            WHERE area_name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Area {
            id: row.get("area_id"),
            name: row.get("area_name"),
        }))
    }

    /// All experts linked to an area, in stored (id) order.
    pub async fn experts_by_area(&self, area_id: i32) -> Result<Vec<Expert>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT e.expert_id, e.expert_name, e.expert_description,
                   e.expert_institution, e.expert_email, e.expert_website
            FROM experts e
            JOIN expert_areas ea ON ea.expert_id = e.expert_id
            WHERE ea.area_id = $1
            ORDER BY e.expert_id
            "#,
        )
        .bind(area_id)
        .fetch_all(&self.pool)
        .await?;

        let experts = rows
            .iter()
            .map(|row| Expert {
                id: row.get("expert_id"),
                name: row.get("expert_name"),
                description: row.get("expert_description"),
                institution: row.get("expert_institution"),
                email: row.get("expert_email"),
                website: row.get("expert_website"),
            })
            .collect();

        Ok(experts)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, CatalogError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ContactDirectory for CatalogClient {
    async fn find_area_by_name(&self, name: &str) -> Result<Option<Area>, CatalogError> {
        self.area_by_name(name).await
    }

    async fn find_experts_by_area(&self, area_id: i32) -> Result<Vec<Expert>, CatalogError> {
        self.experts_by_area(area_id).await
    }
}
