use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 积分兑换记录
/// - voucher_id: 兑换生成的个人优惠券
/// - confirmed: 奖励是否已确认发放
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reward_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub reward_name: String,
    pub points_spent: i64,
    pub voucher_id: Option<i32>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
