use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 订单明细
/// - product_name: 下单时的商品名称快照
/// - price: 下单时单价；total = price * amount
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "order_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    pub product_detail_id: i32,
    pub product_name: String,
    pub amount: i32,
    pub price: i64,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
