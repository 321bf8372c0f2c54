use std::collections::HashSet;

use crate::entities::{cast_appearance, crew_appearance, prelude::*};
use crate::models::person::{CastAppearance as Cast, CrewAppearance as Crew};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

pub struct CreditsRepository {
    conn: DatabaseConnection,
}

impl CreditsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_cast(model: cast_appearance::Model) -> Cast {
        Cast {
            person_id: model.person_id,
            series_id: model.series_id,
            name: model.name,
            character: model.character,
            billing_order: model.billing_order,
            profile_path: model.profile_path,
        }
    }

    fn map_crew(model: crew_appearance::Model) -> Crew {
        Crew {
            person_id: model.person_id,
            series_id: model.series_id,
            name: model.name,
            job: model.job,
            department: model.department,
            profile_path: model.profile_path,
        }
    }

    /// Merge-insert cast appearances for one series. Rows whose
    /// (`person_id`, `series_id`) key already exists are skipped; the batch
    /// itself is deduplicated the same way, so the first credit listed for a
    /// person wins. Returns how many rows were appended.
    pub async fn add_cast_in<C: ConnectionTrait>(
        conn: &C,
        series_id: i64,
        people: &[Cast],
    ) -> anyhow::Result<usize> {
        if people.is_empty() {
            return Ok(0);
        }

        let mut seen: HashSet<i64> = CastAppearance::find()
            .filter(cast_appearance::Column::SeriesId.eq(series_id))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| m.person_id)
            .collect();

        let fresh: Vec<cast_appearance::ActiveModel> = people
            .iter()
            .filter(|p| seen.insert(p.person_id))
            .map(|p| cast_appearance::ActiveModel {
                person_id: Set(p.person_id),
                series_id: Set(series_id),
                name: Set(p.name.clone()),
                character: Set(p.character.clone()),
                billing_order: Set(p.billing_order),
                profile_path: Set(p.profile_path.clone()),
            })
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        let appended = fresh.len();
        CastAppearance::insert_many(fresh)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    cast_appearance::Column::PersonId,
                    cast_appearance::Column::SeriesId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        debug!("Appended {} cast rows for series {}", appended, series_id);
        Ok(appended)
    }

    /// Merge-insert crew appearances, same discipline as cast.
    pub async fn add_crew_in<C: ConnectionTrait>(
        conn: &C,
        series_id: i64,
        people: &[Crew],
    ) -> anyhow::Result<usize> {
        if people.is_empty() {
            return Ok(0);
        }

        let mut seen: HashSet<i64> = CrewAppearance::find()
            .filter(crew_appearance::Column::SeriesId.eq(series_id))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| m.person_id)
            .collect();

        let fresh: Vec<crew_appearance::ActiveModel> = people
            .iter()
            .filter(|p| seen.insert(p.person_id))
            .map(|p| crew_appearance::ActiveModel {
                person_id: Set(p.person_id),
                series_id: Set(series_id),
                name: Set(p.name.clone()),
                job: Set(p.job.clone()),
                department: Set(p.department.clone()),
                profile_path: Set(p.profile_path.clone()),
            })
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        let appended = fresh.len();
        CrewAppearance::insert_many(fresh)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    crew_appearance::Column::PersonId,
                    crew_appearance::Column::SeriesId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        debug!("Appended {} crew rows for series {}", appended, series_id);
        Ok(appended)
    }

    pub async fn add_cast(&self, series_id: i64, people: &[Cast]) -> anyhow::Result<usize> {
        Self::add_cast_in(&self.conn, series_id, people).await
    }

    pub async fn add_crew(&self, series_id: i64, people: &[Crew]) -> anyhow::Result<usize> {
        Self::add_crew_in(&self.conn, series_id, people).await
    }

    pub async fn cast_for_series(&self, series_id: i64) -> anyhow::Result<Vec<Cast>> {
        let rows = CastAppearance::find()
            .filter(cast_appearance::Column::SeriesId.eq(series_id))
            .order_by_asc(cast_appearance::Column::BillingOrder)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_cast).collect())
    }

    pub async fn crew_for_series(&self, series_id: i64) -> anyhow::Result<Vec<Crew>> {
        let rows = CrewAppearance::find()
            .filter(crew_appearance::Column::SeriesId.eq(series_id))
            .order_by_asc(crew_appearance::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_crew).collect())
    }

    pub async fn counts_for_series(&self, series_id: i64) -> anyhow::Result<(u64, u64)> {
        let cast = CastAppearance::find()
            .filter(cast_appearance::Column::SeriesId.eq(series_id))
            .count(&self.conn)
            .await?;
        let crew = CrewAppearance::find()
            .filter(crew_appearance::Column::SeriesId.eq(series_id))
            .count(&self.conn)
            .await?;

        Ok((cast, crew))
    }
}
