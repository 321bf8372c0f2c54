use std::collections::HashMap;

use crate::entities::{genre, prelude::Genre};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn put_many(&self, genres: &[(i64, String)]) -> anyhow::Result<()> {
        if genres.is_empty() {
            return Ok(());
        }

        let existing: std::collections::HashSet<i64> = Genre::find()
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        let fresh: Vec<genre::ActiveModel> = genres
            .iter()
            .filter(|(id, _)| !existing.contains(id))
            .map(|(id, name)| genre::ActiveModel {
                id: Set(*id),
                name: Set(name.clone()),
            })
            .collect();

        if fresh.is_empty() {
            return Ok(());
        }

        Genre::insert_many(fresh)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(genre::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn all(&self) -> anyhow::Result<HashMap<i64, String>> {
        let rows = Genre::find().all(&self.conn).await?;
        Ok(rows.into_iter().map(|m| (m.id, m.name)).collect())
    }
}
