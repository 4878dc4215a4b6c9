//! 集成测试公共设施：内存 SQLite + 全量迁移
#![allow(dead_code)]

use actix_web::cookie::Cookie;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use webshop_backend::cart::{CartLocks, CartStorage, CookieCartStore};
use webshop_backend::config::CartConfig;
use webshop_backend::database::run_migrations;
use webshop_backend::entities::{DiscountType, PaymentMethod, location_entity as locations};
use webshop_backend::models::*;
use webshop_backend::services::{
    AuthService, CartService, CheckoutService, ProductService, VoucherService,
};
use webshop_backend::utils::JwtService;

pub struct TestApp {
    pub pool: DatabaseConnection,
    pub storage: CartStorage,
    pub cart: CartService,
    pub checkout: CheckoutService,
    pub products: ProductService,
    pub auth: AuthService,
}

/// 单连接的内存库，连接断开即数据消失
pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let pool = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

pub async fn setup() -> TestApp {
    let pool = connect().await;
    let storage = CartStorage::new(&CartConfig {
        cookie_secret: "integration-test-cookie-secret-0123456789".to_string(),
        secure_cookies: false,
        max_cookie_bytes: 4000,
        session_ttl_secs: 3600,
    })
    .expect("Failed to create cart storage");
    let cart = CartService::new(pool.clone(), CartLocks::new());
    TestApp {
        checkout: CheckoutService::new(pool.clone(), cart.clone()),
        products: ProductService::new(pool.clone()),
        auth: AuthService::new(pool.clone(), JwtService::new("test-secret", 3600, 3600)),
        storage,
        cart,
        pool,
    }
}

impl TestApp {
    /// 模拟一个没有任何 Cookie 的新请求
    pub fn fresh_store(&self) -> CookieCartStore {
        self.storage.from_cookies(Vec::<Cookie<'static>>::new())
    }

    pub async fn register(&self, email: &str, phone: &str) -> i32 {
        self.auth
            .register(RegisterRequest {
                full_name: "Test Customer".to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                password: "secret123".to_string(),
            })
            .await
            .expect("Failed to register customer")
            .customer
            .id
    }

    /// 单变体商品（不区分尺码与颜色），返回 (product_id, product_detail_id)
    pub async fn simple_product(&self, name: &str, price: i64, stock: i32) -> (i32, i32) {
        let created = self
            .products
            .create(ProductRequest {
                product_name: name.to_string(),
                price,
                default_stock: stock,
                ..Default::default()
            })
            .await
            .expect("Failed to create product");
        (created.product.id, created.variants[0].id)
    }

    pub async fn location(&self) -> i32 {
        locations::ActiveModel {
            name: Set("Ha Noi".to_string()),
            parent_id: Set(None),
            levels: Set(1),
            slug: Set(Some("ha-noi".to_string())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .expect("Failed to insert location")
        .id
    }

    pub async fn voucher(&self, code: &str, min_order_value: i64, max_usage: i32) -> VoucherResponse {
        let now = Utc::now();
        VoucherService::new(self.pool.clone())
            .create_single(VoucherRequest {
                code: Some(code.to_string()),
                description: None,
                discount_type: DiscountType::Fixed,
                discount_value: 10_000,
                max_discount: None,
                min_order_value,
                max_usage,
                max_usage_per_user: 5,
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(30),
                active: Some(true),
            })
            .await
            .expect("Failed to create voucher")
    }
}

pub fn order_request(location_id: i32, voucher_code: Option<&str>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        source: Default::default(),
        receiver_name: "Nguyen Van A".to_string(),
        phone: "0912345678".to_string(),
        address: "1 Trang Tien".to_string(),
        location_id,
        district: None,
        ward: None,
        note: None,
        payment_method: PaymentMethod::Cod,
        voucher_code: voucher_code.map(str::to_string),
    }
}
