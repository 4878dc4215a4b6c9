//! 后台订单：状态流转、编辑与删除的限制
//!
//! 运行：cargo test --test admin_orders

mod common;

use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use webshop_backend::cart::{CartOwner, CartSlot};
use webshop_backend::entities::{
    TransactStatus, order_entity as orders, product_detail_entity as variants,
    user_promotion_entity as usage, voucher_entity as vouchers,
};
use webshop_backend::error::AppError;
use webshop_backend::models::*;
use webshop_backend::services::admin_order_service::update_if_unchanged;
use webshop_backend::services::{AdminOrderService, PromotionService};

async fn stock_of(app: &common::TestApp, pd_id: i32) -> i32 {
    variants::Entity::find_by_id(pd_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap()
        .stock
}

/// 下一笔单行订单，返回 (order_id, product_detail_id)
async fn place(app: &common::TestApp, email: &str, phone: &str, stock: i32, amount: i32) -> (i32, i32) {
    let customer_id = app.register(email, phone).await;
    let location_id = app.location().await;
    let (_, pd_id) = app.simple_product("Ao len", 320_000, stock).await;

    let store = app.fresh_store();
    app.cart
        .add_item(
            &store,
            &CartOwner::Customer(customer_id),
            CartSlot::Standing,
            pd_id,
            amount,
        )
        .await
        .unwrap();
    let placed = app
        .checkout
        .place_order(&store, customer_id, common::order_request(location_id, None))
        .await
        .unwrap();
    (placed.order.id, pd_id)
}

fn status(next: TransactStatus) -> UpdateOrderStatusRequest {
    UpdateOrderStatusRequest {
        status: Some(next),
        paid: None,
    }
}

#[tokio::test]
async fn test_shipping_order_rejects_edit_and_delete() {
    let app = common::setup().await;
    let (order_id, pd_id) = place(&app, "ship@shop.vn", "0912345678", 10, 2).await;
    let admin = AdminOrderService::new(app.pool.clone());

    admin
        .update_status(order_id, status(TransactStatus::Confirmed))
        .await
        .unwrap();
    admin
        .update_status(order_id, status(TransactStatus::Shipping))
        .await
        .unwrap();
    let before = orders::Entity::find_by_id(order_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap();

    let edit = admin
        .edit(
            order_id,
            EditOrderRequest {
                lines: vec![OrderLineInput {
                    product_detail_id: pd_id,
                    amount: 1,
                }],
                address: Some("99 Hang Bac".to_string()),
                ..Default::default()
            },
        )
        .await;
    match edit {
        Err(AppError::ValidationError(msg)) => assert!(msg.contains("shipping")),
        other => panic!("expected validation error, got {other:?}"),
    }

    let delete = admin.delete(order_id).await;
    assert!(matches!(delete, Err(AppError::ValidationError(_))));

    let after = orders::Entity::find_by_id(order_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before, after);
    assert_eq!(stock_of(&app, pd_id).await, 8);
}

#[tokio::test]
async fn test_delete_pending_order_restores_stock() {
    let app = common::setup().await;
    let (order_id, pd_id) = place(&app, "delete@shop.vn", "0912345679", 6, 4).await;
    let admin = AdminOrderService::new(app.pool.clone());
    assert_eq!(stock_of(&app, pd_id).await, 2);

    admin.delete(order_id).await.unwrap();

    let order = orders::Entity::find_by_id(order_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap();
    assert!(order.deleted);
    assert_eq!(stock_of(&app, pd_id).await, 6);

    // 已删除的订单不能再修改
    let again = admin
        .update_status(order_id, status(TransactStatus::Confirmed))
        .await;
    assert!(again.is_err());
}

#[tokio::test]
async fn test_edit_adjusts_stock_by_difference() {
    let app = common::setup().await;
    let (order_id, pd_id) = place(&app, "edit@shop.vn", "0912345670", 10, 2).await;
    let admin = AdminOrderService::new(app.pool.clone());

    let edited = admin
        .edit(
            order_id,
            EditOrderRequest {
                lines: vec![OrderLineInput {
                    product_detail_id: pd_id,
                    amount: 5,
                }],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.details[0].amount, 5);
    assert_eq!(edited.details[0].price, 320_000);
    assert_eq!(edited.order.total_money, 1_600_000);
    assert_eq!(stock_of(&app, pd_id).await, 5);

    let too_many = admin
        .edit(
            order_id,
            EditOrderRequest {
                lines: vec![OrderLineInput {
                    product_detail_id: pd_id,
                    amount: 20,
                }],
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(too_many, Err(AppError::ValidationError(_))));
    assert_eq!(stock_of(&app, pd_id).await, 5);
}

#[tokio::test]
async fn test_invalid_transition_is_rejected() {
    let app = common::setup().await;
    let (order_id, pd_id) = place(&app, "flow@shop.vn", "0912345671", 10, 1).await;
    let admin = AdminOrderService::new(app.pool.clone());

    let skip = admin
        .update_status(order_id, status(TransactStatus::Completed))
        .await;
    assert!(matches!(skip, Err(AppError::ValidationError(_))));

    let cancelled = admin
        .update_status(order_id, status(TransactStatus::Cancelled))
        .await
        .unwrap();
    assert_eq!(cancelled.order.transact_status, TransactStatus::Cancelled);
    assert!(cancelled.order.next_statuses.is_empty());
    assert_eq!(stock_of(&app, pd_id).await, 10);

    let reopen = admin
        .update_status(order_id, status(TransactStatus::Pending))
        .await;
    assert!(reopen.is_err());
}

#[tokio::test]
async fn test_completed_order_records_ship_date() {
    let app = common::setup().await;
    let (order_id, _) = place(&app, "done@shop.vn", "0912345672", 10, 1).await;
    let admin = AdminOrderService::new(app.pool.clone());

    for next in [
        TransactStatus::Confirmed,
        TransactStatus::Shipping,
        TransactStatus::Completed,
    ] {
        admin.update_status(order_id, status(next)).await.unwrap();
    }
    let done = admin
        .update_status(
            order_id,
            UpdateOrderStatusRequest {
                status: None,
                paid: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(done.order.transact_status, TransactStatus::Completed);
    assert!(done.order.paid);
    assert!(done.order.ship_date.is_some());
    assert!(done.order.payment_date.is_some());
}

/// 同时使用促销与优惠券的订单：3 件 x 200k，促销 10%，优惠券减 10k
struct DiscountedOrder {
    order_id: i32,
    pd_id: i32,
    voucher_id: i32,
    promotion_id: i32,
}

async fn place_discounted(app: &common::TestApp, email: &str, phone: &str) -> DiscountedOrder {
    let customer_id = app.register(email, phone).await;
    let location_id = app.location().await;
    let (product_id, pd_id) = app.simple_product("Dam maxi", 200_000, 10).await;
    let now = Utc::now();
    let promotion = PromotionService::new(app.pool.clone())
        .create_bulk(CreatePromotionRequest {
            name: "Summer sale".to_string(),
            description: None,
            discount_percent: 10,
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(7),
            max_usage_per_user: 3,
            active: Some(true),
            product_ids: vec![product_id],
            cat_id: None,
        })
        .await
        .unwrap();
    let voucher = app.voucher("SUMMER10", 0, 5).await;

    let store = app.fresh_store();
    app.cart
        .add_item(
            &store,
            &CartOwner::Customer(customer_id),
            CartSlot::Standing,
            pd_id,
            3,
        )
        .await
        .unwrap();
    let placed = app
        .checkout
        .place_order(
            &store,
            customer_id,
            common::order_request(location_id, Some("SUMMER10")),
        )
        .await
        .unwrap();
    assert_eq!(placed.order.promotion_id, Some(promotion.id));
    assert_eq!(placed.order.voucher_id, Some(voucher.id));
    assert_eq!(placed.order.total_discount, 70_000);
    assert_eq!(stock_of(app, pd_id).await, 7);

    DiscountedOrder {
        order_id: placed.order.id,
        pd_id,
        voucher_id: voucher.id,
        promotion_id: promotion.id,
    }
}

async fn voucher_used_count(app: &common::TestApp, voucher_id: i32) -> i32 {
    vouchers::Entity::find_by_id(voucher_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap()
        .used_count
}

async fn usage_rows(app: &common::TestApp, order_id: i32) -> Vec<usage::Model> {
    usage::Entity::find()
        .filter(usage::Column::OrderId.eq(order_id))
        .all(&app.pool)
        .await
        .unwrap()
}

/// 库存、优惠券次数与使用记录都已归还
async fn assert_released(app: &common::TestApp, placed: &DiscountedOrder) {
    assert_eq!(stock_of(app, placed.pd_id).await, 10);
    assert_eq!(voucher_used_count(app, placed.voucher_id).await, 0);

    let rows = usage_rows(app, placed.order_id).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.used_date.is_none()));
    assert!(rows.iter().any(|r| r.promotion_id == Some(placed.promotion_id)));
    assert!(rows.iter().any(|r| r.voucher_id == Some(placed.voucher_id)));
}

#[tokio::test]
async fn test_admin_cancel_from_shipping_releases_everything() {
    let app = common::setup().await;
    let placed = place_discounted(&app, "shipcancel@shop.vn", "0912345675").await;
    let admin = AdminOrderService::new(app.pool.clone());

    assert_eq!(voucher_used_count(&app, placed.voucher_id).await, 1);
    let rows = usage_rows(&app, placed.order_id).await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.used_date.is_some()));

    for next in [TransactStatus::Confirmed, TransactStatus::Shipping] {
        admin.update_status(placed.order_id, status(next)).await.unwrap();
    }
    // 运输中仍保持占用
    assert_eq!(stock_of(&app, placed.pd_id).await, 7);

    let cancelled = admin
        .update_status(placed.order_id, status(TransactStatus::Cancelled))
        .await
        .unwrap();
    assert_eq!(cancelled.order.transact_status, TransactStatus::Cancelled);
    assert_released(&app, &placed).await;
}

#[tokio::test]
async fn test_admin_delete_releases_stock_and_usage() {
    let app = common::setup().await;
    let placed = place_discounted(&app, "discdelete@shop.vn", "0912345676").await;
    let admin = AdminOrderService::new(app.pool.clone());

    admin
        .update_status(placed.order_id, status(TransactStatus::Confirmed))
        .await
        .unwrap();
    admin.delete(placed.order_id).await.unwrap();

    let order = orders::Entity::find_by_id(placed.order_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap();
    assert!(order.deleted);
    assert_released(&app, &placed).await;
}

#[tokio::test]
async fn test_stale_order_write_is_rejected() {
    let app = common::setup().await;
    let (order_id, _) = place(&app, "stale@shop.vn", "0912345677", 10, 1).await;
    let admin = AdminOrderService::new(app.pool.clone());

    let seen = orders::Entity::find_by_id(order_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap();
    for next in [TransactStatus::Confirmed, TransactStatus::Shipping] {
        admin.update_status(order_id, status(next)).await.unwrap();
    }

    let stale = update_if_unchanged(
        &app.pool,
        &seen,
        orders::ActiveModel {
            address: Set("99 Hang Bac".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));

    let current = orders::Entity::find_by_id(order_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.transact_status, TransactStatus::Shipping);
    assert_eq!(current.address, seen.address);

    // 状态未变时正常写入
    let fresh = update_if_unchanged(
        &app.pool,
        &current,
        orders::ActiveModel {
            note: Set(Some("Leave at the door".to_string())),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(fresh.note.as_deref(), Some("Leave at the door"));
    assert_eq!(fresh.transact_status, TransactStatus::Shipping);
}
