//! 价格计算：商品折扣、促销、优惠券与订单合计
//!
//! 纯函数部分不访问数据库；`load_*` 系列负责读取计算所需的数据。

use crate::entities::{
    DiscountType, promotion_entity, promotion_product_entity, reward_entity,
    user_promotion_entity, voucher_entity,
};
use crate::error::AppResult;
use crate::models::AppliedPromotion;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// 商品折后单价
pub fn unit_price(price: i64, discount_percent: i32) -> i64 {
    let pct = discount_percent.clamp(0, 100) as i64;
    price * (100 - pct) / 100
}

/// 参与计价的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i32,
    pub product_detail_id: i32,
    pub amount: i32,
    pub unit_price: i64,
}

impl PricedLine {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.amount as i64
    }
}

#[derive(Debug, Clone)]
pub struct PromotionCandidate {
    pub promotion: promotion_entity::Model,
    pub product_ids: HashSet<i32>,
    /// 该客户已消耗的次数
    pub customer_uses: i64,
}

impl PromotionCandidate {
    fn usable(&self, now: DateTime<Utc>) -> bool {
        let p = &self.promotion;
        p.active
            && p.start_date <= now
            && now <= p.end_date
            && (0..=100).contains(&p.discount_percent)
            && self.customer_uses < p.max_usage_per_user as i64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionOutcome {
    pub applied: Vec<AppliedPromotion>,
    pub total_discount: i64,
}

impl PromotionOutcome {
    /// 订单上记录优惠最多的促销
    pub fn primary_promotion_id(&self) -> Option<i32> {
        self.applied
            .iter()
            .max_by_key(|a| a.discount)
            .map(|a| a.promotion_id)
    }
}

/// 每一行选择优惠最大的一个促销
pub fn best_promotions(
    lines: &[PricedLine],
    candidates: &[PromotionCandidate],
    now: DateTime<Utc>,
) -> PromotionOutcome {
    let usable: Vec<&PromotionCandidate> = candidates.iter().filter(|c| c.usable(now)).collect();
    let mut by_promotion: HashMap<i32, AppliedPromotion> = HashMap::new();
    let mut order: Vec<i32> = Vec::new();

    for line in lines {
        let best = usable
            .iter()
            .filter(|c| c.product_ids.contains(&line.product_id))
            .map(|c| {
                let discount = line.line_total() * c.promotion.discount_percent as i64 / 100;
                (c, discount)
            })
            .filter(|(_, d)| *d > 0)
            .max_by(|(a, da), (b, db)| da.cmp(db).then(b.promotion.id.cmp(&a.promotion.id)));

        if let Some((c, discount)) = best {
            let entry = by_promotion.entry(c.promotion.id).or_insert_with(|| {
                order.push(c.promotion.id);
                AppliedPromotion {
                    promotion_id: c.promotion.id,
                    name: c.promotion.name.clone(),
                    discount_percent: c.promotion.discount_percent,
                    discount: 0,
                }
            });
            entry.discount += discount;
        }
    }

    let applied: Vec<AppliedPromotion> = order
        .into_iter()
        .filter_map(|id| by_promotion.remove(&id))
        .collect();
    let total_discount = applied.iter().map(|a| a.discount).sum();
    PromotionOutcome {
        applied,
        total_discount,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoucherRejection {
    Inactive,
    NotStarted,
    Expired,
    UsageExhausted,
    PerUserLimitReached,
    BelowMinimum { min_order_value: i64 },
}

impl fmt::Display for VoucherRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoucherRejection::Inactive => write!(f, "Voucher is not active"),
            VoucherRejection::NotStarted => write!(f, "Voucher is not valid yet"),
            VoucherRejection::Expired => write!(f, "Voucher has expired"),
            VoucherRejection::UsageExhausted => write!(f, "Voucher has been fully used"),
            VoucherRejection::PerUserLimitReached => {
                write!(f, "You have already used this voucher the maximum number of times")
            }
            VoucherRejection::BelowMinimum { min_order_value } => {
                write!(f, "Order subtotal must be at least {min_order_value} to use this voucher")
            }
        }
    }
}

/// 优惠券可用性判断
pub fn check_voucher(
    voucher: &voucher_entity::Model,
    customer_uses: i64,
    subtotal: i64,
    now: DateTime<Utc>,
) -> Result<(), VoucherRejection> {
    if !voucher.active {
        return Err(VoucherRejection::Inactive);
    }
    if now < voucher.start_date {
        return Err(VoucherRejection::NotStarted);
    }
    if now > voucher.end_date {
        return Err(VoucherRejection::Expired);
    }
    if voucher.used_count >= voucher.max_usage {
        return Err(VoucherRejection::UsageExhausted);
    }
    if customer_uses >= voucher.max_usage_per_user as i64 {
        return Err(VoucherRejection::PerUserLimitReached);
    }
    if subtotal < voucher.min_order_value {
        return Err(VoucherRejection::BelowMinimum {
            min_order_value: voucher.min_order_value,
        });
    }
    Ok(())
}

/// 优惠券金额：base 为扣除促销后的金额
pub fn voucher_discount(voucher: &voucher_entity::Model, base: i64) -> i64 {
    if base <= 0 {
        return 0;
    }
    let raw = match voucher.discount_type {
        DiscountType::Percent => {
            let pct = voucher.discount_value.clamp(0, 100);
            let d = base * pct / 100;
            match voucher.max_discount {
                Some(cap) if cap >= 0 => d.min(cap),
                _ => d,
            }
        }
        DiscountType::Fixed => voucher.discount_value.max(0),
    };
    raw.min(base)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

/// 订单合计的唯一计算入口：total = subtotal - discount，且不小于 0
pub fn order_totals(line_totals: impl IntoIterator<Item = i64>, discount: i64) -> OrderTotals {
    let subtotal: i64 = line_totals.into_iter().sum();
    let discount = discount.clamp(0, subtotal.max(0));
    OrderTotals {
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

/// 已经挂在订单上的优惠券只在停用或低于门槛时失效
pub fn check_held_voucher(
    voucher: &voucher_entity::Model,
    subtotal: i64,
) -> Result<(), VoucherRejection> {
    if !voucher.active {
        return Err(VoucherRejection::Inactive);
    }
    if subtotal < voucher.min_order_value {
        return Err(VoucherRejection::BelowMinimum {
            min_order_value: voucher.min_order_value,
        });
    }
    Ok(())
}

/// 参与计价的优惠券
#[derive(Debug, Clone)]
pub enum VoucherApplication {
    /// 下单时新使用的优惠券，做完整校验
    New(voucher_entity::Model),
    /// 编辑订单时订单已占用的优惠券
    Held(voucher_entity::Model),
}

#[derive(Debug, Clone)]
pub struct OrderQuote {
    pub promotions: PromotionOutcome,
    /// 最终生效的优惠券
    pub voucher: Option<voucher_entity::Model>,
    pub voucher_discount: i64,
    pub voucher_rejection: Option<VoucherRejection>,
    pub totals: OrderTotals,
}

/// 计算一组订单行的促销、优惠券与合计
pub async fn quote_order<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
    lines: &[PricedLine],
    voucher: Option<VoucherApplication>,
    exclude_order: Option<i32>,
    now: DateTime<Utc>,
) -> AppResult<OrderQuote> {
    let product_ids: Vec<i32> = lines
        .iter()
        .map(|l| l.product_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let candidates = load_promotion_candidates(conn, customer_id, &product_ids, exclude_order).await?;
    let promotions = best_promotions(lines, &candidates, now);

    let subtotal: i64 = lines.iter().map(PricedLine::line_total).sum();
    let base = subtotal - promotions.total_discount;

    let (voucher, check) = match voucher {
        None => (None, Ok(())),
        Some(VoucherApplication::New(v)) => {
            let uses = count_voucher_uses(conn, customer_id, v.id, exclude_order).await?;
            let check = check_voucher(&v, uses, subtotal, now);
            (Some(v), check)
        }
        Some(VoucherApplication::Held(v)) => {
            let check = check_held_voucher(&v, subtotal);
            (Some(v), check)
        }
    };
    let (voucher, voucher_discount, voucher_rejection) = match (voucher, check) {
        (Some(v), Ok(())) => {
            let d = voucher_discount(&v, base);
            (Some(v), d, None)
        }
        (_, Err(r)) => (None, 0, Some(r)),
        (None, Ok(())) => (None, 0, None),
    };

    let totals = order_totals(
        lines.iter().map(PricedLine::line_total),
        promotions.total_discount + voucher_discount,
    );
    Ok(OrderQuote {
        promotions,
        voucher,
        voucher_discount,
        voucher_rejection,
        totals,
    })
}

/// 按代码查找优惠券（不区分大小写）
pub async fn find_voucher_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> AppResult<Option<voucher_entity::Model>> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Ok(None);
    }
    Ok(voucher_entity::Entity::find()
        .filter(voucher_entity::Column::Code.eq(code))
        .one(conn)
        .await?)
}

/// 积分兑换的优惠券只属于兑换人
pub async fn reward_voucher_owner<C: ConnectionTrait>(
    conn: &C,
    voucher_id: i32,
) -> AppResult<Option<i32>> {
    Ok(reward_entity::Entity::find()
        .filter(reward_entity::Column::VoucherId.eq(voucher_id))
        .one(conn)
        .await?
        .map(|r| r.customer_id))
}

/// 读取与给定商品相关的促销及客户已用次数
///
/// exclude_order: 重新计价已有订单时，不计入该订单本身的使用记录
pub async fn load_promotion_candidates<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
    product_ids: &[i32],
    exclude_order: Option<i32>,
) -> AppResult<Vec<PromotionCandidate>> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }
    let links = promotion_product_entity::Entity::find()
        .filter(promotion_product_entity::Column::ProductId.is_in(product_ids.to_vec()))
        .all(conn)
        .await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let mut products_by_promotion: HashMap<i32, HashSet<i32>> = HashMap::new();
    for link in links {
        products_by_promotion
            .entry(link.promotion_id)
            .or_default()
            .insert(link.product_id);
    }

    let promotion_ids: Vec<i32> = products_by_promotion.keys().copied().collect();
    let promotions = promotion_entity::Entity::find()
        .filter(promotion_entity::Column::Id.is_in(promotion_ids.clone()))
        .filter(promotion_entity::Column::Active.eq(true))
        .all(conn)
        .await?;

    let mut usage_query = user_promotion_entity::Entity::find()
        .filter(user_promotion_entity::Column::CustomerId.eq(customer_id))
        .filter(user_promotion_entity::Column::PromotionId.is_in(promotion_ids))
        .filter(user_promotion_entity::Column::UsedDate.is_not_null());
    if let Some(order_id) = exclude_order {
        usage_query = usage_query.filter(not_for_order(order_id));
    }
    let mut uses: HashMap<i32, i64> = HashMap::new();
    for row in usage_query.all(conn).await? {
        if let Some(pid) = row.promotion_id {
            *uses.entry(pid).or_default() += 1;
        }
    }

    Ok(promotions
        .into_iter()
        .map(|p| PromotionCandidate {
            product_ids: products_by_promotion.remove(&p.id).unwrap_or_default(),
            customer_uses: uses.get(&p.id).copied().unwrap_or(0),
            promotion: p,
        })
        .collect())
}

fn not_for_order(order_id: i32) -> Condition {
    Condition::any()
        .add(user_promotion_entity::Column::OrderId.is_null())
        .add(user_promotion_entity::Column::OrderId.ne(order_id))
}

/// 客户对某张优惠券的已消耗次数
pub async fn count_voucher_uses<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
    voucher_id: i32,
    exclude_order: Option<i32>,
) -> AppResult<i64> {
    let mut query = user_promotion_entity::Entity::find()
        .filter(user_promotion_entity::Column::CustomerId.eq(customer_id))
        .filter(user_promotion_entity::Column::VoucherId.eq(voucher_id))
        .filter(user_promotion_entity::Column::UsedDate.is_not_null());
    if let Some(order_id) = exclude_order {
        query = query.filter(not_for_order(order_id));
    }
    Ok(query.all(conn).await?.len() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn voucher(discount_type: DiscountType, value: i64) -> voucher_entity::Model {
        let now = Utc::now();
        voucher_entity::Model {
            id: 1,
            code: "TEST".into(),
            description: None,
            discount_type,
            discount_value: value,
            max_discount: None,
            min_order_value: 0,
            max_usage: 10,
            used_count: 0,
            max_usage_per_user: 1,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(1),
            active: true,
            created_at: now,
        }
    }

    fn promotion(id: i32, percent: i32, product_ids: &[i32]) -> PromotionCandidate {
        let now = Utc::now();
        PromotionCandidate {
            promotion: promotion_entity::Model {
                id,
                name: format!("Promo {id}"),
                description: None,
                discount_percent: percent,
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(1),
                max_usage_per_user: 2,
                active: true,
                created_at: now,
            },
            product_ids: product_ids.iter().copied().collect(),
            customer_uses: 0,
        }
    }

    fn line(product_id: i32, amount: i32, unit_price: i64) -> PricedLine {
        PricedLine {
            product_id,
            product_detail_id: product_id * 10,
            amount,
            unit_price,
        }
    }

    #[test]
    fn test_unit_price() {
        assert_eq!(unit_price(200_000, 10), 180_000);
        assert_eq!(unit_price(99_999, 0), 99_999);
        assert_eq!(unit_price(50_000, 150), 0);
    }

    #[test]
    fn test_best_promotion_per_line() {
        let lines = vec![line(1, 2, 100_000), line(2, 1, 50_000)];
        let candidates = vec![promotion(1, 10, &[1, 2]), promotion(2, 20, &[1])];

        let outcome = best_promotions(&lines, &candidates, Utc::now());
        // 商品 1 使用 20%，商品 2 只能使用 10%
        assert_eq!(outcome.total_discount, 40_000 + 5_000);
        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.primary_promotion_id(), Some(2));
    }

    #[test]
    fn test_promotion_per_user_cap_and_dates() {
        let lines = vec![line(1, 1, 100_000)];
        let mut capped = promotion(1, 10, &[1]);
        capped.customer_uses = 2;
        let mut expired = promotion(2, 30, &[1]);
        expired.promotion.end_date = Utc::now() - Duration::hours(1);

        let outcome = best_promotions(&lines, &[capped, expired], Utc::now());
        assert_eq!(outcome, PromotionOutcome::default());
    }

    #[test]
    fn test_voucher_exhausted_is_rejected() {
        let mut v = voucher(DiscountType::Fixed, 20_000);
        v.min_order_value = 100_000;
        v.max_usage = 10;
        v.used_count = 10;
        assert_eq!(
            check_voucher(&v, 0, 500_000, Utc::now()),
            Err(VoucherRejection::UsageExhausted)
        );
    }

    #[test]
    fn test_voucher_minimum_and_per_user() {
        let mut v = voucher(DiscountType::Fixed, 20_000);
        v.min_order_value = 100_000;
        assert_eq!(
            check_voucher(&v, 0, 99_999, Utc::now()),
            Err(VoucherRejection::BelowMinimum {
                min_order_value: 100_000
            })
        );
        assert_eq!(
            check_voucher(&v, 1, 100_000, Utc::now()),
            Err(VoucherRejection::PerUserLimitReached)
        );
        assert!(check_voucher(&v, 0, 100_000, Utc::now()).is_ok());
    }

    #[test]
    fn test_voucher_discount_percent_cap_and_fixed_clamp() {
        let mut pct = voucher(DiscountType::Percent, 10);
        assert_eq!(voucher_discount(&pct, 300_000), 30_000);
        pct.max_discount = Some(25_000);
        assert_eq!(voucher_discount(&pct, 300_000), 25_000);

        let fixed = voucher(DiscountType::Fixed, 50_000);
        assert_eq!(voucher_discount(&fixed, 30_000), 30_000);
        assert_eq!(voucher_discount(&fixed, 0), 0);
    }

    #[test]
    fn test_order_totals_never_negative() {
        let t = order_totals([100_000, 50_000], 20_000);
        assert_eq!(
            t,
            OrderTotals {
                subtotal: 150_000,
                discount: 20_000,
                total: 130_000
            }
        );
        let t = order_totals([10_000], 50_000);
        assert_eq!(t.total, 0);
        assert_eq!(t.discount, 10_000);
    }

    #[test]
    fn test_held_voucher_ignores_usage_counters() {
        let mut v = voucher(DiscountType::Fixed, 10_000);
        v.used_count = 10;
        v.max_usage = 10;
        v.min_order_value = 50_000;
        assert_eq!(check_held_voucher(&v, 60_000), Ok(()));
        assert!(matches!(
            check_held_voucher(&v, 40_000),
            Err(VoucherRejection::BelowMinimum { .. })
        ));
        v.active = false;
        assert_eq!(check_held_voucher(&v, 60_000), Err(VoucherRejection::Inactive));
    }
}
