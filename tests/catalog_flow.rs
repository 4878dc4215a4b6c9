//! 商品变体矩阵、总库存与前台浏览
//!
//! 运行：cargo test --test catalog_flow

mod common;

use webshop_backend::models::*;
use webshop_backend::services::{CatalogService, CategoryService};

#[tokio::test]
async fn test_variant_matrix_and_units_in_stock() {
    let app = common::setup().await;
    let created = app
        .products
        .create(ProductRequest {
            product_name: "Ao so mi oxford".to_string(),
            price: 350_000,
            discount: 10,
            size_ids: vec![1, 2, 2],
            color_ids: vec![1, 2, 3],
            default_stock: 4,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.variants.len(), 6);
    assert_eq!(created.product.units_in_stock, 24);
    assert_eq!(created.product.sale_price, 315_000);
    assert!(created.variants.iter().all(|v| v.size_name.is_some() && v.color_name.is_some()));

    let first = created.variants[0].id;
    app.products.toggle_variant(first).await.unwrap();
    app.products
        .set_variant_stock(created.variants[1].id, 10)
        .await
        .unwrap();

    let reloaded = app.products.get(created.product.id).await.unwrap();
    // 停用的变体不计入总库存
    assert_eq!(reloaded.product.units_in_stock, 4 * 4 + 10);

    let unknown_size = app
        .products
        .create(ProductRequest {
            product_name: "Bad sizes".to_string(),
            price: 100_000,
            size_ids: vec![999],
            ..Default::default()
        })
        .await;
    assert!(unknown_size.is_err());
}

#[tokio::test]
async fn test_edit_replaces_variants_and_keeps_ordered_ones_inactive() {
    let app = common::setup().await;
    let customer_id = app.register("variant@shop.vn", "0912345678").await;
    let location_id = app.location().await;
    let created = app
        .products
        .create(ProductRequest {
            product_name: "Quan short".to_string(),
            price: 120_000,
            size_ids: vec![1, 2],
            default_stock: 5,
            ..Default::default()
        })
        .await
        .unwrap();
    let ordered = created.variants[0].id;

    let store = app.fresh_store();
    app.cart
        .add_item(
            &store,
            &webshop_backend::cart::CartOwner::Customer(customer_id),
            webshop_backend::cart::CartSlot::Standing,
            ordered,
            1,
        )
        .await
        .unwrap();
    app.checkout
        .place_order(&store, customer_id, common::order_request(location_id, None))
        .await
        .unwrap();

    let edited = app
        .products
        .edit(
            created.product.id,
            ProductRequest {
                product_name: "Quan short".to_string(),
                price: 120_000,
                size_ids: vec![3, 4, 5],
                default_stock: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let active: Vec<_> = edited.variants.iter().filter(|v| v.active).collect();
    assert_eq!(active.len(), 3);
    let kept = edited.variants.iter().find(|v| v.id == ordered).unwrap();
    assert!(!kept.active);
    assert_eq!(kept.stock, 0);
    assert!(edited.variants.iter().all(|v| v.id != created.variants[1].id));
    assert_eq!(edited.product.units_in_stock, 6);
    assert_eq!(edited.product.alias, created.product.alias);
}

#[tokio::test]
async fn test_category_page_lists_active_products() {
    let app = common::setup().await;
    let category = CategoryService::new(app.pool.clone())
        .create(CategoryRequest {
            cat_name: "Ao nam".to_string(),
            description: None,
            parent_id: None,
            levels: None,
            ordering: None,
            published: Some(true),
            thumb: None,
            alias: None,
            meta_title: None,
            meta_desc: None,
            meta_key: None,
        })
        .await
        .unwrap();

    for (name, active) in [("Ao thun nam", true), ("Ao ba lo", false)] {
        app.products
            .create(ProductRequest {
                product_name: name.to_string(),
                price: 99_000,
                cat_id: Some(category.id),
                active: Some(active),
                default_stock: 3,
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let catalog = CatalogService::new(app.pool.clone());
    let page = catalog
        .category_by_alias(&category.alias, &ProductQuery::default())
        .await
        .unwrap();
    assert_eq!(page.products.total, 1);
    assert_eq!(page.products.data[0].product_name, "Ao thun nam");

    // 分类页响应体的 JSON 形状
    let body = serde_json::to_value(&page).unwrap();
    assert_eq!(body["category"]["id"], category.id);
    assert_eq!(body["products"]["total"], 1);
    assert_eq!(body["products"]["data"][0]["product_name"], "Ao thun nam");

    let detail = catalog
        .product_detail(&page.products.data[0].alias)
        .await
        .unwrap();
    assert_eq!(detail.category.unwrap().id, category.id);
    assert_eq!(detail.variants.len(), 1);

    let missing = catalog
        .category_by_alias("khong-ton-tai", &ProductQuery::default())
        .await;
    assert!(missing.is_err());
}
