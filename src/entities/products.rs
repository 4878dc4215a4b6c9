use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 商品
/// 说明:
/// - price: 原价（最小货币单位）
/// - discount: 商品自身折扣百分比 0-100
/// - units_in_stock: 所有启用变体库存之和，只能通过 inventory::recalculate_units_in_stock 维护
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_name: String,
    pub short_desc: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub cat_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub price: i64,
    pub discount: i32,
    pub thumb: Option<String>,
    pub best_seller: bool,
    pub home_flag: bool,
    pub active: bool,
    pub tags: Option<String>,
    pub alias: String,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    pub units_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
