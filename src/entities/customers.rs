use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// 前台客户
/// 说明:
/// - points: 当前可用积分
/// - check_in_streak: 连续签到天数（中断即归 1）
/// - last_check_in: 最近一次签到日期
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    pub birthday: Option<NaiveDate>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub location_id: Option<i32>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub password_hash: String,
    pub active: bool,
    pub points: i64,
    pub check_in_streak: i32,
    pub last_check_in: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
