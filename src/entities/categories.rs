use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cat_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub levels: i32,
    pub ordering: i32,
    pub published: bool,
    pub thumb: Option<String>,
    #[sea_orm(unique)]
    pub alias: String,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
