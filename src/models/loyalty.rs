use crate::entities::{check_in_entity, reward_entity};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    pub check_in_date: NaiveDate,
    pub streak: i32,
    pub points_earned: i64,
    pub streak_bonus: bool,
    pub total_points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInHistoryResponse {
    pub id: i32,
    pub check_in_date: NaiveDate,
    pub points_earned: i64,
    pub streak: i32,
    pub created_at: DateTime<Utc>,
}

impl From<check_in_entity::Model> for CheckInHistoryResponse {
    fn from(m: check_in_entity::Model) -> Self {
        Self {
            id: m.id,
            check_in_date: m.check_in_date,
            points_earned: m.points_earned,
            streak: m.streak,
            created_at: m.created_at,
        }
    }
}

/// 积分兑换档位
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RewardTier {
    pub id: i32,
    pub name: String,
    pub points_cost: i64,
    /// 兑换得到的固定金额优惠券面值
    pub voucher_value: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoyaltyStatusResponse {
    pub points: i64,
    pub streak: i32,
    pub checked_in_today: bool,
    /// 距离下一次连续签到奖励还需签到的天数
    pub days_to_bonus: i32,
    pub recent: Vec<CheckInHistoryResponse>,
    pub tiers: Vec<RewardTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RewardHistoryResponse {
    pub id: i32,
    pub customer_id: i32,
    pub reward_name: String,
    pub points_spent: i64,
    pub voucher_id: Option<i32>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<reward_entity::Model> for RewardHistoryResponse {
    fn from(m: reward_entity::Model) -> Self {
        Self {
            id: m.id,
            customer_id: m.customer_id,
            reward_name: m.reward_name,
            points_spent: m.points_spent,
            voucher_id: m.voucher_id,
            confirmed: m.confirmed,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemRequest {
    pub tier_id: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemResponse {
    pub reward: RewardHistoryResponse,
    pub voucher_code: String,
    pub remaining_points: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RewardQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub confirmed: Option<bool>,
    pub customer_id: Option<i32>,
}
