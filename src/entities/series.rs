use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "series")]
pub struct Model {
    /// External TMDB series id. Never reused, never mutated after first write.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: String,
    pub original_name: String,
    #[sea_orm(column_type = "Text")]
    pub overview: String,
    /// JSON array of TMDB genre ids.
    pub genre_ids: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    /// JSON array of ISO country codes.
    pub origin_country: Option<String>,
    pub original_language: Option<String>,
    pub added_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cast_appearance::Entity")]
    CastAppearance,
    #[sea_orm(has_many = "super::crew_appearance::Entity")]
    CrewAppearance,
}

impl Related<super::cast_appearance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CastAppearance.def()
    }
}

impl Related<super::crew_appearance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrewAppearance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
