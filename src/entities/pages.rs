use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub page_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub contents: Option<String>,
    pub thumb: Option<String>,
    pub published: bool,
    #[sea_orm(unique)]
    pub alias: String,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    pub ordering: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
