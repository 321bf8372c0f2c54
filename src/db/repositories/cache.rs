use crate::entities::{prelude::RequestCache, request_cache};
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing::debug;

/// Durable request-level cache keyed by the exact outbound URL. Entries are
/// append-only and never expire; re-putting an existing URL is a no-op.
#[derive(Clone)]
pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, url: &str) -> anyhow::Result<Option<String>> {
        let row = RequestCache::find_by_id(url).one(&self.conn).await?;
        if row.is_some() {
            debug!("Cache hit: {}", url);
        }
        Ok(row.map(|m| m.body))
    }

    pub async fn put(&self, url: &str, body: &str) -> anyhow::Result<()> {
        if RequestCache::find_by_id(url).one(&self.conn).await?.is_some() {
            return Ok(());
        }

        RequestCache::insert(request_cache::ActiveModel {
            url: Set(url.to_string()),
            body: Set(body.to_string()),
            fetched_at: Set(chrono::Utc::now().to_rfc3339()),
        })
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(request_cache::Column::Url)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        debug!("Cached response for {}", url);
        Ok(())
    }
}
