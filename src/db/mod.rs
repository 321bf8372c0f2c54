use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};
use tracing::info;

use crate::models::person::{CastAppearance, CrewAppearance};
use crate::models::series::Series;

pub mod migrator;
pub mod repositories;

use repositories::cache::CacheRepository;
use repositories::credits::CreditsRepository;
use repositories::genres::GenreRepository;
use repositories::series::SeriesRepository;
use repositories::tracklist::TracklistRepository;

/// Explicitly constructed, injectable store over one sqlite database. All
/// mutation paths are merge-insert or idempotent removal; nothing updates a
/// stored field in place.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn series_repo(&self) -> SeriesRepository {
        SeriesRepository::new(self.conn.clone())
    }

    fn credits_repo(&self) -> CreditsRepository {
        CreditsRepository::new(self.conn.clone())
    }

    fn tracklist_repo(&self) -> TracklistRepository {
        TracklistRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> GenreRepository {
        GenreRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn cache_repo(&self) -> CacheRepository {
        CacheRepository::new(self.conn.clone())
    }

    pub async fn add_series(&self, series: &Series) -> Result<bool> {
        self.series_repo().add(series).await
    }

    /// Writes a series together with its cast, crew, and creator pseudo-crew
    /// in one transaction, so a reader never observes a partially normalized
    /// series.
    pub async fn normalize(
        &self,
        series: &Series,
        cast: &[CastAppearance],
        crew: &[CrewAppearance],
    ) -> Result<()> {
        let txn = self.conn.begin().await?;

        SeriesRepository::add_in(&txn, series).await?;
        CreditsRepository::add_cast_in(&txn, series.id, cast).await?;
        CreditsRepository::add_crew_in(&txn, series.id, crew).await?;

        txn.commit().await?;
        Ok(())
    }

    pub async fn get_series(&self, id: i64) -> Result<Option<Series>> {
        self.series_repo().get(id).await
    }

    pub async fn get_series_by_ids(&self, ids: &[i64]) -> Result<Vec<Series>> {
        self.series_repo().get_by_ids(ids).await
    }

    pub async fn has_series(&self, id: i64) -> Result<bool> {
        self.series_repo().has(id).await
    }

    pub async fn add_cast(&self, series_id: i64, people: &[CastAppearance]) -> Result<usize> {
        self.credits_repo().add_cast(series_id, people).await
    }

    pub async fn add_crew(&self, series_id: i64, people: &[CrewAppearance]) -> Result<usize> {
        self.credits_repo().add_crew(series_id, people).await
    }

    pub async fn cast_for_series(&self, series_id: i64) -> Result<Vec<CastAppearance>> {
        self.credits_repo().cast_for_series(series_id).await
    }

    pub async fn crew_for_series(&self, series_id: i64) -> Result<Vec<CrewAppearance>> {
        self.credits_repo().crew_for_series(series_id).await
    }

    pub async fn credit_counts(&self, series_id: i64) -> Result<(u64, u64)> {
        self.credits_repo().counts_for_series(series_id).await
    }

    pub async fn track(&self, series_id: i64) -> Result<bool> {
        self.tracklist_repo().add(series_id).await
    }

    pub async fn untrack(&self, series_id: i64) -> Result<bool> {
        self.tracklist_repo().remove(series_id).await
    }

    pub async fn is_tracked(&self, series_id: i64) -> Result<bool> {
        self.tracklist_repo().has(series_id).await
    }

    pub async fn tracked_ids(&self) -> Result<Vec<i64>> {
        self.tracklist_repo().ids().await
    }

    /// Tracked series with a stored record, in tracked order.
    pub async fn tracked_series(&self) -> Result<Vec<Series>> {
        let ids = self.tracked_ids().await?;
        let mut by_id: HashMap<i64, Series> = self
            .get_series_by_ids(&ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub async fn cache_get(&self, url: &str) -> Result<Option<String>> {
        self.cache_repo().get(url).await
    }

    pub async fn cache_put(&self, url: &str, body: &str) -> Result<()> {
        self.cache_repo().put(url, body).await
    }

    pub async fn put_genres(&self, genres: &[(i64, String)]) -> Result<()> {
        self.genre_repo().put_many(genres).await
    }

    pub async fn genre_names(&self) -> Result<HashMap<i64, String>> {
        self.genre_repo().all().await
    }
}
