//! 下单：事务写入、库存扣减、失败回滚、优惠券门槛与次数
//!
//! 运行：cargo test --test checkout_flow

mod common;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use webshop_backend::cart::{
    CartOwner, CartSlot, CartStore, CookieCartStore, SaveOutcome, SimpleCart,
};
use webshop_backend::entities::{
    TransactStatus, order_entity as orders, product_detail_entity as variants,
    product_entity as products, user_promotion_entity as usage, voucher_entity as vouchers,
};
use webshop_backend::error::{AppError, AppResult};
use webshop_backend::services::OrderService;
use webshop_backend::services::checkout_service::{PreparedLine, PreparedOrder, ShippingInfo};
use webshop_backend::services::pricing::{self, PricedLine};

async fn stock_of(app: &common::TestApp, pd_id: i32) -> i32 {
    variants::Entity::find_by_id(pd_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap()
        .stock
}

async fn units_of(app: &common::TestApp, product_id: i32) -> i32 {
    products::Entity::find_by_id(product_id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap()
        .units_in_stock
}

#[tokio::test]
async fn test_place_order_reserves_stock_and_clears_cart() {
    let app = common::setup().await;
    let customer_id = app.register("order@shop.vn", "0912345678").await;
    let location_id = app.location().await;
    let (product_id, pd_id) = app.simple_product("Ao polo", 200_000, 5).await;

    let store = app.fresh_store();
    let owner = CartOwner::Customer(customer_id);
    app.cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 2)
        .await
        .unwrap();

    let placed = app
        .checkout
        .place_order(&store, customer_id, common::order_request(location_id, None))
        .await
        .unwrap();

    assert_eq!(placed.order.transact_status, TransactStatus::Pending);
    assert!(!placed.order.paid);
    assert_eq!(placed.order.total_money, 400_000);
    assert_eq!(placed.details.len(), 1);
    assert_eq!(placed.details[0].price, 200_000);
    assert_eq!(stock_of(&app, pd_id).await, 3);
    assert_eq!(units_of(&app, product_id).await, 3);
    assert!(store.load(&owner, CartSlot::Standing).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_place_order_with_empty_cart_is_rejected() {
    let app = common::setup().await;
    let customer_id = app.register("empty@shop.vn", "0912345679").await;
    let location_id = app.location().await;

    let store = app.fresh_store();
    let result = app
        .checkout
        .place_order(&store, customer_id, common::order_request(location_id, None))
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_failed_line_rolls_back_whole_order() {
    let app = common::setup().await;
    let customer_id = app.register("rollback@shop.vn", "0912345670").await;
    let location_id = app.location().await;
    let (first_product, first) = app.simple_product("Giay the thao", 900_000, 5).await;
    let (second_product, second) = app.simple_product("Dep", 100_000, 1).await;

    let lines = vec![
        PreparedLine {
            product_detail_id: first,
            product_id: first_product,
            product_name: "Giay the thao".to_string(),
            amount: 2,
            unit_price: 900_000,
        },
        PreparedLine {
            product_detail_id: second,
            product_id: second_product,
            product_name: "Dep".to_string(),
            amount: 3,
            unit_price: 100_000,
        },
    ];
    let priced: Vec<PricedLine> = lines
        .iter()
        .map(|l| PricedLine {
            product_id: l.product_id,
            product_detail_id: l.product_detail_id,
            amount: l.amount,
            unit_price: l.unit_price,
        })
        .collect();
    let quote = pricing::quote_order(&app.pool, customer_id, &priced, None, None, Utc::now())
        .await
        .unwrap();
    let shipping = ShippingInfo::validate(
        &app.pool,
        "Nguyen Van A",
        "0912345678",
        "1 Trang Tien",
        location_id,
        None,
        None,
        None,
    )
    .await
    .unwrap();

    let result = app
        .checkout
        .commit_order(PreparedOrder {
            customer_id,
            shipping,
            payment_method: webshop_backend::entities::PaymentMethod::Cod,
            lines,
            quote,
        })
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(orders::Entity::find().count(&app.pool).await.unwrap(), 0);
    assert_eq!(stock_of(&app, first).await, 5);
    assert_eq!(stock_of(&app, second).await, 1);
    assert_eq!(units_of(&app, first_product).await, 5);
}

#[tokio::test]
async fn test_exhausted_voucher_is_never_offered_or_applied() {
    let app = common::setup().await;
    let customer_id = app.register("voucher@shop.vn", "0912345671").await;
    let location_id = app.location().await;
    let (_, pd_id) = app.simple_product("Ao dai", 1_000_000, 10).await;

    let voucher = app.voucher("FULL10", 100_000, 10).await;
    vouchers::Entity::update_many()
        .col_expr(vouchers::Column::UsedCount, Expr::value(10))
        .filter(vouchers::Column::Id.eq(voucher.id))
        .exec(&app.pool)
        .await
        .unwrap();

    for subtotal in [100_000, 5_000_000] {
        let offered = app
            .checkout
            .available_vouchers(customer_id, subtotal)
            .await
            .unwrap();
        assert!(offered.iter().all(|v| v.voucher.id != voucher.id));
    }

    let store = app.fresh_store();
    let owner = CartOwner::Customer(customer_id);
    app.cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 2)
        .await
        .unwrap();

    let preview = app
        .checkout
        .preview(&store, customer_id, CartSlot::Standing, Some("full10".to_string()))
        .await
        .unwrap();
    let evaluation = preview.voucher.unwrap();
    assert!(!evaluation.applicable);
    assert_eq!(evaluation.discount, 0);
    assert_eq!(preview.total, 2_000_000);

    let result = app
        .checkout
        .place_order(
            &store,
            customer_id,
            common::order_request(location_id, Some("FULL10")),
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(orders::Entity::find().count(&app.pool).await.unwrap(), 0);
    assert_eq!(stock_of(&app, pd_id).await, 10);
}

#[tokio::test]
async fn test_voucher_below_minimum_is_not_offered() {
    let app = common::setup().await;
    let customer_id = app.register("minimum@shop.vn", "0912345672").await;
    let voucher = app.voucher("BIG100", 100_000, 10).await;

    let offered = app
        .checkout
        .available_vouchers(customer_id, 99_999)
        .await
        .unwrap();
    assert!(offered.is_empty());

    let offered = app
        .checkout
        .available_vouchers(customer_id, 100_000)
        .await
        .unwrap();
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0].voucher.id, voucher.id);
    assert_eq!(offered[0].discount, 10_000);
}

#[tokio::test]
async fn test_customer_cancel_restores_stock_and_voucher() {
    let app = common::setup().await;
    let customer_id = app.register("cancel@shop.vn", "0912345673").await;
    let location_id = app.location().await;
    let (product_id, pd_id) = app.simple_product("Khan choang", 150_000, 4).await;
    let voucher = app.voucher("SAVE10", 100_000, 10).await;

    let store = app.fresh_store();
    let owner = CartOwner::Customer(customer_id);
    app.cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 3)
        .await
        .unwrap();
    let placed = app
        .checkout
        .place_order(
            &store,
            customer_id,
            common::order_request(location_id, Some("save10")),
        )
        .await
        .unwrap();
    assert_eq!(placed.order.voucher_id, Some(voucher.id));
    assert_eq!(placed.order.total_discount, 10_000);
    assert_eq!(placed.order.total_money, 440_000);
    assert_eq!(stock_of(&app, pd_id).await, 1);

    let cancelled = OrderService::new(app.pool.clone())
        .cancel(customer_id, placed.order.id)
        .await
        .unwrap();
    assert_eq!(cancelled.transact_status, TransactStatus::Cancelled);
    assert_eq!(stock_of(&app, pd_id).await, 4);
    assert_eq!(units_of(&app, product_id).await, 4);

    let voucher = vouchers::Entity::find_by_id(voucher.id)
        .one(&app.pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(voucher.used_count, 0);
    // 使用记录保留订单关联，只是恢复为未使用
    let usages = usage::Entity::find()
        .filter(usage::Column::OrderId.eq(placed.order.id))
        .all(&app.pool)
        .await
        .unwrap();
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].voucher_id, Some(voucher.id));
    assert!(usages[0].used_date.is_none());

    // 已取消的订单不能再次取消
    let again = OrderService::new(app.pool.clone())
        .cancel(customer_id, placed.order.id)
        .await;
    assert!(again.is_err());
}

/// 读取正常、写入总是失败的购物车存储
struct ReadOnlyCart<'a>(&'a CookieCartStore);

#[async_trait::async_trait(?Send)]
impl CartStore for ReadOnlyCart<'_> {
    async fn load(&self, owner: &CartOwner, slot: CartSlot) -> AppResult<SimpleCart> {
        self.0.load(owner, slot).await
    }

    async fn save(
        &self,
        _owner: &CartOwner,
        _slot: CartSlot,
        _cart: &SimpleCart,
    ) -> AppResult<SaveOutcome> {
        Err(AppError::InternalError("cart storage is read-only".to_string()))
    }

    async fn clear(&self, _owner: &CartOwner, _slot: CartSlot) -> AppResult<()> {
        Err(AppError::InternalError("cart storage is read-only".to_string()))
    }
}

#[tokio::test]
async fn test_order_stands_when_cart_cleanup_fails() {
    let app = common::setup().await;
    let customer_id = app.register("cleanup@shop.vn", "0912345674").await;
    let location_id = app.location().await;
    let (_, pd_id) = app.simple_product("Mu len", 90_000, 5).await;

    let store = app.fresh_store();
    let owner = CartOwner::Customer(customer_id);
    app.cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 2)
        .await
        .unwrap();

    let placed = app
        .checkout
        .place_order(
            &ReadOnlyCart(&store),
            customer_id,
            common::order_request(location_id, None),
        )
        .await
        .unwrap();

    assert_eq!(placed.details.len(), 1);
    assert_eq!(stock_of(&app, pd_id).await, 3);
    assert_eq!(orders::Entity::find().count(&app.pool).await.unwrap(), 1);
    // 购物车未能清理，商品仍在
    let cart = store.load(&owner, CartSlot::Standing).await.unwrap();
    assert_eq!(cart.amount_of(pd_id), 2);
}
