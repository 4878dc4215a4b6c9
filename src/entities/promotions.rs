use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 商品促销：对 promotion_products 中的商品按百分比减价
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub discount_percent: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_usage_per_user: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// 是否在有效期内且启用
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.active && self.start_date <= now && now <= self.end_date
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
