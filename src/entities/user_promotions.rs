use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 客户促销 / 优惠券使用台账
/// used_date 为 None 表示未使用（订单取消后回退到此状态），Some 表示已核销
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user_promotions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub promotion_id: Option<i32>,
    pub voucher_id: Option<i32>,
    pub order_id: Option<i32>,
    pub used_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
