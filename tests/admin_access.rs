//! 后台路由的访问控制：令牌校验挂在路由组上，与请求路径的编码方式无关
//!
//! 运行：cargo test --test admin_access

mod common;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, Error, test, web};
use webshop_backend::config::AdminConfig;
use webshop_backend::handlers;
use webshop_backend::middlewares::AuthMiddleware;
use webshop_backend::services::{AccountService, AdminOrderService};

async fn status_of<S, R, B>(app: &S, req: R) -> StatusCode
where
    S: Service<R, Response = ServiceResponse<B>, Error = Error>,
{
    match app.call(req).await {
        Ok(res) => res.status(),
        Err(e) => e.error_response().status(),
    }
}

#[actix_web::test]
async fn test_admin_routes_require_admin_token() {
    let ctx = common::setup().await;
    let jwt = ctx.auth.jwt().clone();
    let admin_token = jwt.generate_admin_token(1, "admin@shop.vn", 1).unwrap();
    let customer_token = jwt.generate_customer_token(7, "buyer@shop.vn").unwrap();

    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt.clone()))
            .app_data(web::Data::new(jwt.clone()))
            .app_data(web::Data::new(AdminOrderService::new(ctx.pool.clone())))
            .service(web::scope("/api/v1").configure(handlers::admin_config)),
    )
    .await;

    let paths = [
        "/api/v1/admin/orders",
        "/api/v1/%61dmin/orders",
        "/api/v1/%61%64%6D%69%6E/orders",
        "/api/v1/admin/%6Frders",
    ];
    for path in paths {
        let anonymous = test::TestRequest::get().uri(path).to_request();
        assert_eq!(status_of(&app, anonymous).await, StatusCode::UNAUTHORIZED, "{path}");

        let customer = test::TestRequest::get()
            .uri(path)
            .insert_header(("Authorization", format!("Bearer {customer_token}")))
            .to_request();
        assert_eq!(status_of(&app, customer).await, StatusCode::UNAUTHORIZED, "{path}");

        let admin = test::TestRequest::get()
            .uri(path)
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .to_request();
        assert_eq!(status_of(&app, admin).await, StatusCode::OK, "{path}");
    }

    // 写操作同样被拦截
    let cancel = test::TestRequest::put()
        .uri("/api/v1/%61dmin/orders/1/status")
        .set_json(serde_json::json!({ "status": "cancelled" }))
        .to_request();
    assert_eq!(status_of(&app, cancel).await, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_admin_login_stays_public() {
    let ctx = common::setup().await;
    let accounts = AccountService::new(ctx.pool.clone());
    accounts
        .ensure_bootstrap_admin(&AdminConfig {
            super_admin_role_id: 1,
            bootstrap_email: Some("root@shop.vn".to_string()),
            bootstrap_password: Some("secret123".to_string()),
        })
        .await
        .unwrap();

    let jwt = ctx.auth.jwt().clone();
    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt.clone()))
            .app_data(web::Data::new(jwt.clone()))
            .app_data(web::Data::new(ctx.auth.clone()))
            .app_data(web::Data::new(ctx.storage.clone()))
            .service(web::scope("/api/v1").configure(handlers::admin_config)),
    )
    .await;

    let login = test::TestRequest::post()
        .uri("/api/v1/admin/auth/login")
        .set_json(serde_json::json!({
            "email": "root@shop.vn",
            "password": "secret123"
        }))
        .to_request();
    assert_eq!(status_of(&app, login).await, StatusCode::OK);
}
