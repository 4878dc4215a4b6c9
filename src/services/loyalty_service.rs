use crate::config::LoyaltyConfig;
use crate::entities::{
    DiscountType, check_in_entity as check_ins, customer_entity as customers,
    reward_entity as rewards, voucher_entity as vouchers,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::voucher_service::fresh_code;
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashSet;

/// 兑换得到的优惠券有效天数
const REWARD_VOUCHER_DAYS: i64 = 30;

/// 积分兑换档位
pub fn reward_tiers() -> Vec<RewardTier> {
    [
        (1, "20K voucher", 200, 20_000),
        (2, "50K voucher", 450, 50_000),
        (3, "100K voucher", 850, 100_000),
    ]
    .into_iter()
    .map(|(id, name, points_cost, voucher_value)| RewardTier {
        id,
        name: name.to_string(),
        points_cost,
        voucher_value,
    })
    .collect()
}

/// 连续签到天数：上次签到恰好是昨天则 +1，否则从 1 开始
pub fn next_streak(last_check_in: Option<NaiveDate>, streak: i32, today: NaiveDate) -> i32 {
    match last_check_in {
        Some(last) if today.pred_opt() == Some(last) => streak.max(0) + 1,
        _ => 1,
    }
}

/// 本次签到获得的积分，以及是否包含连续签到奖励
pub fn points_for(streak: i32, config: &LoyaltyConfig) -> (i64, bool) {
    let bonus = config.streak_length > 0 && streak > 0 && streak % config.streak_length == 0;
    let points = config.daily_points + if bonus { config.streak_bonus_points } else { 0 };
    (points, bonus)
}

#[derive(Clone)]
pub struct LoyaltyService {
    pool: DatabaseConnection,
    config: LoyaltyConfig,
}

impl LoyaltyService {
    pub fn new(pool: DatabaseConnection, config: LoyaltyConfig) -> Self {
        Self { pool, config }
    }

    async fn customer(&self, customer_id: i32) -> AppResult<customers::Model> {
        customers::Entity::find_by_id(customer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
    }

    async fn checked_in_on(&self, customer_id: i32, date: NaiveDate) -> AppResult<bool> {
        let count = check_ins::Entity::find()
            .filter(check_ins::Column::CustomerId.eq(customer_id))
            .filter(check_ins::Column::CheckInDate.eq(date))
            .count(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn check_in(&self, customer_id: i32) -> AppResult<CheckInResponse> {
        self.check_in_on(customer_id, Utc::now().date_naive()).await
    }

    /// 每天只能签到一次：代码检查 + (customer_id, check_in_date) 唯一索引
    pub async fn check_in_on(&self, customer_id: i32, today: NaiveDate) -> AppResult<CheckInResponse> {
        let customer = self.customer(customer_id).await?;
        if customer.last_check_in == Some(today) || self.checked_in_on(customer_id, today).await? {
            return Err(already_checked_in());
        }

        let streak = next_streak(customer.last_check_in, customer.check_in_streak, today);
        let (points, streak_bonus) = points_for(streak, &self.config);
        let now = Utc::now();

        let txn = self.pool.begin().await?;
        let inserted = check_ins::ActiveModel {
            customer_id: Set(customer_id),
            check_in_date: Set(today),
            points_earned: Set(points),
            streak: Set(streak),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await;
        if let Err(err) = inserted {
            txn.rollback().await?;
            if self.checked_in_on(customer_id, today).await? {
                return Err(already_checked_in());
            }
            return Err(err.into());
        }

        customers::Entity::update_many()
            .col_expr(
                customers::Column::Points,
                Expr::col(customers::Column::Points).add(points),
            )
            .col_expr(customers::Column::CheckInStreak, Expr::value(streak))
            .col_expr(customers::Column::LastCheckIn, Expr::value(Some(today)))
            .filter(customers::Column::Id.eq(customer_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        log::info!(
            "Customer {customer_id} checked in: streak {streak}, +{points} point(s)"
        );
        Ok(CheckInResponse {
            check_in_date: today,
            streak,
            points_earned: points,
            streak_bonus,
            total_points: customer.points + points,
        })
    }

    pub async fn status(&self, customer_id: i32) -> AppResult<LoyaltyStatusResponse> {
        let customer = self.customer(customer_id).await?;
        let today = Utc::now().date_naive();
        let checked_in_today = customer.last_check_in == Some(today);

        // 断签后连续天数归零
        let streak = match customer.last_check_in {
            Some(last) if last == today || today.pred_opt() == Some(last) => {
                customer.check_in_streak
            }
            _ => 0,
        };
        let length = self.config.streak_length.max(1);
        let days_to_bonus = length - streak.rem_euclid(length);

        let recent = check_ins::Entity::find()
            .filter(check_ins::Column::CustomerId.eq(customer_id))
            .order_by_desc(check_ins::Column::CheckInDate)
            .limit(7)
            .all(&self.pool)
            .await?;

        Ok(LoyaltyStatusResponse {
            points: customer.points,
            streak,
            checked_in_today,
            days_to_bonus,
            recent: recent.into_iter().map(Into::into).collect(),
            tiers: reward_tiers(),
        })
    }

    pub async fn history(
        &self,
        customer_id: i32,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<CheckInHistoryResponse>> {
        let base = check_ins::Entity::find().filter(check_ins::Column::CustomerId.eq(customer_id));
        let total = base.clone().count(&self.pool).await? as i64;
        let rows = base
            .order_by_desc(check_ins::Column::CheckInDate)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::from_params(
            rows.into_iter().map(Into::into).collect(),
            params,
            total,
        ))
    }

    pub async fn reward_history(
        &self,
        customer_id: i32,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<RewardHistoryResponse>> {
        self.list_rewards(&RewardQuery {
            page: Some(params.page() as u32),
            per_page: Some(params.page_size() as u32),
            confirmed: None,
            customer_id: Some(customer_id),
        })
        .await
    }

    /// 兑换积分：扣积分、生成个人优惠券、写兑换记录在同一事务中完成
    pub async fn redeem(&self, customer_id: i32, tier_id: i32) -> AppResult<RedeemResponse> {
        let tier = reward_tiers()
            .into_iter()
            .find(|t| t.id == tier_id)
            .ok_or_else(|| AppError::NotFound("Reward not found".to_string()))?;
        let now = Utc::now();

        let txn = self.pool.begin().await?;
        let deducted = customers::Entity::update_many()
            .col_expr(
                customers::Column::Points,
                Expr::col(customers::Column::Points).sub(tier.points_cost),
            )
            .filter(customers::Column::Id.eq(customer_id))
            .filter(customers::Column::Points.gte(tier.points_cost))
            .exec(&txn)
            .await?;
        if deducted.rows_affected != 1 {
            return Err(AppError::ValidationError(format!(
                "You need {} points to redeem {}",
                tier.points_cost, tier.name
            )));
        }

        let code = fresh_code(&txn, "REWARD", &HashSet::new()).await?;
        let voucher = vouchers::ActiveModel {
            code: Set(code),
            description: Set(Some(format!("Loyalty reward: {}", tier.name))),
            discount_type: Set(DiscountType::Fixed),
            discount_value: Set(tier.voucher_value),
            max_discount: Set(None),
            min_order_value: Set(0),
            max_usage: Set(1),
            used_count: Set(0),
            max_usage_per_user: Set(1),
            start_date: Set(now),
            end_date: Set(now + Duration::days(REWARD_VOUCHER_DAYS)),
            active: Set(true),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let reward = rewards::ActiveModel {
            customer_id: Set(customer_id),
            reward_name: Set(tier.name.clone()),
            points_spent: Set(tier.points_cost),
            voucher_id: Set(Some(voucher.id)),
            confirmed: Set(true),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let remaining_points = customers::Entity::find_by_id(customer_id)
            .one(&txn)
            .await?
            .map(|c| c.points)
            .unwrap_or_default();
        txn.commit().await?;

        log::info!(
            "Customer {customer_id} redeemed {} for {} point(s), voucher {}",
            tier.name,
            tier.points_cost,
            voucher.code
        );
        Ok(RedeemResponse {
            reward: reward.into(),
            voucher_code: voucher.code,
            remaining_points,
        })
    }

    pub async fn list_rewards(
        &self,
        query: &RewardQuery,
    ) -> AppResult<PaginatedResponse<RewardHistoryResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut base = rewards::Entity::find();
        if let Some(customer_id) = query.customer_id {
            base = base.filter(rewards::Column::CustomerId.eq(customer_id));
        }
        if let Some(confirmed) = query.confirmed {
            base = base.filter(rewards::Column::Confirmed.eq(confirmed));
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let rows = base
            .order_by_desc(rewards::Column::CreatedAt)
            .order_by_desc(rewards::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::from_params(
            rows.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    pub async fn confirm_reward(&self, reward_id: i32) -> AppResult<RewardHistoryResponse> {
        let reward = rewards::Entity::find_by_id(reward_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Reward not found".to_string()))?;
        if reward.confirmed {
            return Ok(reward.into());
        }
        let mut model = reward.into_active_model();
        model.confirmed = Set(true);
        Ok(model.update(&self.pool).await?.into())
    }
}

fn already_checked_in() -> AppError {
    AppError::ValidationError("You have already checked in today".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_streak_continues_from_yesterday() {
        assert_eq!(next_streak(Some(day(9)), 3, day(10)), 4);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        assert_eq!(next_streak(Some(day(7)), 3, day(10)), 1);
        assert_eq!(next_streak(None, 0, day(10)), 1);
    }

    #[test]
    fn test_bonus_on_every_fifth_day() {
        let config = LoyaltyConfig::default();
        assert_eq!(points_for(4, &config), (10, false));
        assert_eq!(points_for(5, &config), (60, true));
        assert_eq!(points_for(10, &config), (60, true));
    }

    #[test]
    fn test_tiers_are_ordered_by_cost() {
        let tiers = reward_tiers();
        assert!(tiers.windows(2).all(|w| w[0].points_cost < w[1].points_cost));
    }
}
