use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub contents: Option<String>,
    pub thumb: Option<String>,
    pub published: bool,
    #[sea_orm(unique)]
    pub alias: String,
    pub author: Option<String>,
    pub account_id: Option<i32>,
    pub cat_id: Option<i32>,
    pub is_hot: bool,
    pub is_newfeed: bool,
    pub views: i32,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
