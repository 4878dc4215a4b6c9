use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use webshop_backend::{
    cart::{CartLocks, CartStorage},
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.customer_token_expires_in,
        config.jwt.admin_token_expires_in,
    );

    // 购物车存储与锁
    let cart_storage = CartStorage::new(&config.cart).expect("Invalid cart configuration");
    let cart_locks = CartLocks::new();

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let account_service = AccountService::new(pool.clone());
    let customer_service = CustomerService::new(pool.clone());
    let cart_service = CartService::new(pool.clone(), cart_locks.clone());
    let checkout_service = CheckoutService::new(pool.clone(), cart_service.clone());
    let order_service = OrderService::new(pool.clone());
    let admin_order_service = AdminOrderService::new(pool.clone());
    let catalog_service = CatalogService::new(pool.clone());
    let product_service = ProductService::new(pool.clone());
    let category_service = CategoryService::new(pool.clone());
    let supplier_service = SupplierService::new(pool.clone());
    let promotion_service = PromotionService::new(pool.clone());
    let voucher_service = VoucherService::new(pool.clone());
    let content_service = ContentService::new(pool.clone());
    let loyalty_service = LoyaltyService::new(pool.clone(), config.loyalty.clone());
    let dashboard_service = DashboardService::new(pool.clone());
    let upload_service = UploadService::new(config.uploads.clone());

    // 首次部署时创建后台管理员
    match account_service.ensure_bootstrap_admin(&config.admin).await {
        Ok(Some(id)) => log::info!("Bootstrap administrator created: account {id}"),
        Ok(None) => {}
        Err(e) => log::error!("Failed to create bootstrap administrator: {e:?}"),
    }

    let upload_root = upload_service.root();
    if let Err(e) = tokio::fs::create_dir_all(&upload_root).await {
        log::error!("Failed to create upload directory {}: {e}", upload_root.display());
    }

    // 启动后台定时任务
    tasks::spawn_all(cart_storage.clone(), cart_locks.clone());

    let admin_config = config.admin.clone();

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(web::Data::new(cart_storage.clone()))
            .app_data(web::Data::new(admin_config.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(account_service.clone()))
            .app_data(web::Data::new(customer_service.clone()))
            .app_data(web::Data::new(cart_service.clone()))
            .app_data(web::Data::new(checkout_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(admin_order_service.clone()))
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .app_data(web::Data::new(category_service.clone()))
            .app_data(web::Data::new(supplier_service.clone()))
            .app_data(web::Data::new(promotion_service.clone()))
            .app_data(web::Data::new(voucher_service.clone()))
            .app_data(web::Data::new(content_service.clone()))
            .app_data(web::Data::new(loyalty_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .configure(swagger_config)
            .service(actix_files::Files::new("/uploads", upload_root.clone()))
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::account_config)
                    .configure(handlers::cart_config)
                    .configure(handlers::checkout_config)
                    .configure(handlers::order_config)
                    .configure(handlers::catalog_config)
                    .configure(handlers::content_config)
                    .configure(handlers::loyalty_config)
                    .configure(handlers::admin_config)
                    .configure(handlers::category_page_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
