use sea_orm::entity::prelude::*;

/// Raw response body keyed by the exact outbound request URL, query string
/// included. Written once per URL, never invalidated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "request_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub url: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub fetched_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
