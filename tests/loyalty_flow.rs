//! 签到与积分兑换
//!
//! 运行：cargo test --test loyalty_flow

mod common;

use chrono::NaiveDate;
use webshop_backend::config::LoyaltyConfig;
use webshop_backend::error::AppError;
use webshop_backend::services::LoyaltyService;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

#[tokio::test]
async fn test_check_in_only_once_per_day() {
    let app = common::setup().await;
    let customer_id = app.register("daily@shop.vn", "0912345678").await;
    let loyalty = LoyaltyService::new(app.pool.clone(), LoyaltyConfig::default());

    let first = loyalty.check_in_on(customer_id, day(3)).await.unwrap();
    assert_eq!(first.streak, 1);
    assert_eq!(first.points_earned, 10);
    assert_eq!(first.total_points, 10);

    let second = loyalty.check_in_on(customer_id, day(3)).await;
    assert!(matches!(second, Err(AppError::ValidationError(_))));

    let history = loyalty
        .history(customer_id, &Default::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);
}

#[tokio::test]
async fn test_streak_bonus_and_reset() {
    let app = common::setup().await;
    let customer_id = app.register("streak@shop.vn", "0912345679").await;
    let loyalty = LoyaltyService::new(app.pool.clone(), LoyaltyConfig::default());

    let mut last = None;
    for d in 1..=5 {
        last = Some(loyalty.check_in_on(customer_id, day(d)).await.unwrap());
    }
    let fifth = last.unwrap();
    assert_eq!(fifth.streak, 5);
    assert!(fifth.streak_bonus);
    assert_eq!(fifth.points_earned, 60);
    assert_eq!(fifth.total_points, 100);

    // 断签一天后从 1 重新计算
    let restart = loyalty.check_in_on(customer_id, day(7)).await.unwrap();
    assert_eq!(restart.streak, 1);
    assert!(!restart.streak_bonus);
}

#[tokio::test]
async fn test_redeem_creates_voucher_owned_by_customer() {
    let app = common::setup().await;
    let owner = app.register("owner@shop.vn", "0912345670").await;
    let other = app.register("other@shop.vn", "0912345671").await;
    let loyalty = LoyaltyService::new(app.pool.clone(), LoyaltyConfig::default());

    let poor = loyalty.redeem(owner, 1).await;
    assert!(matches!(poor, Err(AppError::ValidationError(_))));

    for d in 1..=10 {
        loyalty.check_in_on(owner, day(d)).await.unwrap();
    }
    let redeemed = loyalty.redeem(owner, 1).await.unwrap();
    assert_eq!(redeemed.remaining_points, 0);
    assert_eq!(redeemed.reward.points_spent, 200);
    assert!(redeemed.voucher_code.starts_with("REWARD"));

    let mine = app.checkout.available_vouchers(owner, 50_000).await.unwrap();
    assert!(mine.iter().any(|v| v.voucher.code == redeemed.voucher_code));
    let theirs = app.checkout.available_vouchers(other, 50_000).await.unwrap();
    assert!(theirs.iter().all(|v| v.voucher.code != redeemed.voucher_code));

    let unknown = loyalty.redeem(owner, 99).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}
