use crate::entities::{prelude::TrackedSeries, tracked_series};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

/// The user's tracked-series list. Membership only; series records are kept
/// even after untracking.
pub struct TracklistRepository {
    conn: DatabaseConnection,
}

impl TracklistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Idempotent add. Returns whether the id was newly tracked.
    pub async fn add(&self, series_id: i64) -> anyhow::Result<bool> {
        if self.has(series_id).await? {
            return Ok(false);
        }

        TrackedSeries::insert(tracked_series::ActiveModel {
            series_id: Set(series_id),
            added_at: Set(chrono::Utc::now().to_rfc3339()),
        })
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(tracked_series::Column::SeriesId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await?;

        info!("Tracking series {}", series_id);
        Ok(true)
    }

    /// Idempotent remove. Returns whether the id was present.
    pub async fn remove(&self, series_id: i64) -> anyhow::Result<bool> {
        let result = TrackedSeries::delete_by_id(series_id)
            .exec(&self.conn)
            .await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Untracked series {}", series_id);
        }
        Ok(removed)
    }

    pub async fn has(&self, series_id: i64) -> anyhow::Result<bool> {
        Ok(TrackedSeries::find_by_id(series_id)
            .one(&self.conn)
            .await?
            .is_some())
    }

    pub async fn ids(&self) -> anyhow::Result<Vec<i64>> {
        let rows = TrackedSeries::find()
            .order_by_asc(tracked_series::Column::AddedAt)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|m| m.series_id).collect())
    }
}
