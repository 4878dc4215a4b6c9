//! 购物车：读取时的库存核对、登录合并、立即购买
//!
//! 运行：cargo test --test cart_flow

mod common;

use webshop_backend::cart::{CartOwner, CartSlot, CartStore};
use webshop_backend::models::CartItemInput;

#[tokio::test]
async fn test_read_removes_line_when_stock_drops_below_amount() {
    let app = common::setup().await;
    let customer_id = app.register("buyer@shop.vn", "0912345678").await;
    let (_, pd_id) = app.simple_product("Ao thun basic", 150_000, 5).await;

    let store = app.fresh_store();
    let owner = CartOwner::Customer(customer_id);
    let cart = app
        .cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 2)
        .await
        .unwrap();
    assert_eq!(cart.total_items, 2);
    assert!(cart.warnings.is_empty());

    app.products.set_variant_stock(pd_id, 1).await.unwrap();

    let cart = app
        .cart
        .get_cart(&store, &owner, CartSlot::Standing)
        .await
        .unwrap();
    assert!(cart.lines.is_empty());
    assert_eq!(cart.warnings.len(), 1);
    assert!(cart.warnings[0].contains("Ao thun basic"));

    // 修复结果已写回存储，再次读取不再提示
    let persisted = store.load(&owner, CartSlot::Standing).await.unwrap();
    assert!(persisted.is_empty());
    let again = app
        .cart
        .get_cart(&store, &owner, CartSlot::Standing)
        .await
        .unwrap();
    assert!(again.warnings.is_empty());
}

#[tokio::test]
async fn test_read_removes_deactivated_variant() {
    let app = common::setup().await;
    let (_, pd_id) = app.simple_product("Quan jean", 300_000, 10).await;
    let (_, other_id) = app.simple_product("That lung", 90_000, 10).await;

    let store = app.fresh_store();
    let owner = store.owner_for(None);
    app.cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 1)
        .await
        .unwrap();
    app.cart
        .add_item(&store, &owner, CartSlot::Standing, other_id, 3)
        .await
        .unwrap();

    app.products.toggle_variant(pd_id).await.unwrap();

    let cart = app
        .cart
        .get_cart(&store, &owner, CartSlot::Standing)
        .await
        .unwrap();
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].product_detail_id, other_id);
    assert_eq!(cart.subtotal, 270_000);
    assert!(cart.warnings[0].contains("Quan jean"));
}

#[tokio::test]
async fn test_add_beyond_stock_is_rejected() {
    let app = common::setup().await;
    let (_, pd_id) = app.simple_product("Mu luoi trai", 80_000, 3).await;

    let store = app.fresh_store();
    let owner = store.owner_for(None);
    app.cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 2)
        .await
        .unwrap();
    let result = app
        .cart
        .add_item(&store, &owner, CartSlot::Standing, pd_id, 2)
        .await;
    assert!(result.is_err());

    let cart = store.load(&owner, CartSlot::Standing).await.unwrap();
    assert_eq!(cart.amount_of(pd_id), 2);
}

#[tokio::test]
async fn test_guest_cart_merges_into_customer_cart_on_login() {
    let app = common::setup().await;
    let customer_id = app.register("merge@shop.vn", "0987654321").await;
    let (_, shirt) = app.simple_product("So mi", 200_000, 10).await;
    let (_, socks) = app.simple_product("Tat", 20_000, 10).await;

    let store = app.fresh_store();
    let customer = CartOwner::Customer(customer_id);
    app.cart
        .add_item(&store, &customer, CartSlot::Standing, shirt, 1)
        .await
        .unwrap();

    let guest = store.owner_for(None);
    app.cart
        .sync_cart(
            &store,
            &guest,
            vec![
                CartItemInput {
                    product_detail_id: shirt,
                    amount: 2,
                },
                CartItemInput {
                    product_detail_id: socks,
                    amount: 4,
                },
            ],
        )
        .await
        .unwrap();
    app.cart
        .buy_now(&store, &guest, socks, 1)
        .await
        .unwrap();

    app.cart
        .merge_on_login(&store, &guest, customer_id)
        .await
        .unwrap();

    let standing = store.load(&customer, CartSlot::Standing).await.unwrap();
    assert_eq!(standing.amount_of(shirt), 3);
    assert_eq!(standing.amount_of(socks), 4);
    let buy_now = store.load(&customer, CartSlot::BuyNow).await.unwrap();
    assert_eq!(buy_now.amount_of(socks), 1);
    assert_eq!(buy_now.items.len(), 1);

    assert!(store.load(&guest, CartSlot::Standing).await.unwrap().is_empty());
    assert!(store.load(&guest, CartSlot::BuyNow).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_buy_now_keeps_single_line() {
    let app = common::setup().await;
    let (_, first) = app.simple_product("Vay hoa", 250_000, 5).await;
    let (_, second) = app.simple_product("Ao khoac", 450_000, 5).await;

    let store = app.fresh_store();
    let owner = store.owner_for(None);
    app.cart.buy_now(&store, &owner, first, 1).await.unwrap();
    let cart = app.cart.buy_now(&store, &owner, second, 2).await.unwrap();

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].product_detail_id, second);
    assert_eq!(cart.total_items, 2);

    // 常规购物车不受影响
    let standing = app
        .cart
        .get_cart(&store, &owner, CartSlot::Standing)
        .await
        .unwrap();
    assert!(standing.lines.is_empty());
}
