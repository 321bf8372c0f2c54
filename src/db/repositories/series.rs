use crate::entities::{prelude::Series as SeriesEntity, series};
use crate::models::series::Series;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

pub struct SeriesRepository {
    conn: DatabaseConnection,
}

impl SeriesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: series::Model) -> Series {
        Series {
            id: model.id,
            name: model.name,
            original_name: model.original_name,
            overview: model.overview,
            genre_ids: model
                .genre_ids
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            popularity: model.popularity,
            vote_average: model.vote_average,
            vote_count: model.vote_count,
            poster_path: model.poster_path,
            backdrop_path: model.backdrop_path,
            first_air_date: model.first_air_date,
            origin_country: model
                .origin_country
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            original_language: model.original_language,
            added_at: model.added_at,
        }
    }

    fn to_active(series: &Series) -> series::ActiveModel {
        series::ActiveModel {
            id: Set(series.id),
            name: Set(series.name.clone()),
            original_name: Set(series.original_name.clone()),
            overview: Set(series.overview.clone()),
            genre_ids: Set(serde_json::to_string(&series.genre_ids).ok()),
            popularity: Set(series.popularity),
            vote_average: Set(series.vote_average),
            vote_count: Set(series.vote_count),
            poster_path: Set(series.poster_path.clone()),
            backdrop_path: Set(series.backdrop_path.clone()),
            first_air_date: Set(series.first_air_date.clone()),
            origin_country: Set(serde_json::to_string(&series.origin_country).ok()),
            original_language: Set(series.original_language.clone()),
            added_at: Set(series.added_at.clone()),
        }
    }

    /// Merge-insert: a series already present keeps its first-written record.
    /// Returns whether a new row was appended.
    pub async fn add_in<C: ConnectionTrait>(conn: &C, series: &Series) -> anyhow::Result<bool> {
        if SeriesEntity::find_by_id(series.id).one(conn).await?.is_some() {
            return Ok(false);
        }

        SeriesEntity::insert(Self::to_active(series))
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(series::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        debug!("Stored series {}: {}", series.id, series.name);
        Ok(true)
    }

    pub async fn add(&self, series: &Series) -> anyhow::Result<bool> {
        Self::add_in(&self.conn, series).await
    }

    pub async fn get(&self, id: i64) -> anyhow::Result<Option<Series>> {
        let row = SeriesEntity::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn get_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<Series>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = SeriesEntity::find()
            .filter(series::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(series::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn has(&self, id: i64) -> anyhow::Result<bool> {
        Ok(SeriesEntity::find_by_id(id).one(&self.conn).await?.is_some())
    }
}
