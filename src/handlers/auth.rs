use crate::cart::CartStorage;
use crate::error::AppError;
use crate::middlewares::{CUSTOMER_AUTH_COOKIE, auth_cookie, current_customer, expired_cookie};
use crate::models::*;
use crate::services::{AuthService, CartService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 登录 / 注册成功：写入登录 Cookie，并把匿名购物车合并到客户购物车
async fn signed_in(
    req: &HttpRequest,
    storage: &CartStorage,
    cart_service: &CartService,
    auth: CustomerAuthResponse,
    message: &str,
) -> Result<HttpResponse, AppError> {
    let store = storage.for_request(req);
    let guest = store.owner_for(None);
    let warnings = cart_service
        .merge_on_login(&store, &guest, auth.customer.id)
        .await?;
    store.forget_guest().await;

    let cookie = auth_cookie(
        CUSTOMER_AUTH_COOKIE,
        auth.token.clone(),
        auth.expires_in,
        storage.secure(),
    );
    let mut resp = HttpResponse::Ok().json(json!({
        "success": true,
        "data": auth,
        "warnings": warnings,
        "message": message
    }));
    store.apply(&mut resp)?;
    resp.add_cookie(&cookie)
        .map_err(|e| AppError::InternalError(format!("Failed to set cookie: {e}")))?;
    Ok(resp)
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = CustomerAuthResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let result = match auth_service.register(request.into_inner()).await {
        Ok(auth) => signed_in(&req, &storage, &cart_service, auth, "Registration successful").await,
        Err(e) => Err(e),
    };
    match result {
        Ok(resp) => Ok(resp),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = CustomerAuthResponse),
        (status = 401, description = "账号或密码错误")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let result = match auth_service.login(request.into_inner()).await {
        Ok(auth) => signed_in(&req, &storage, &cart_service, auth, "Signed in").await,
        Err(e) => Err(e),
    };
    match result {
        Ok(resp) => Ok(resp),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "已退出登录")
    )
)]
pub async fn logout(storage: web::Data<CartStorage>, req: HttpRequest) -> Result<HttpResponse> {
    if let Some(customer) = current_customer(&req) {
        log::info!("Customer {} signed out", customer.customer_id);
    }
    let store = storage.for_request(&req);
    store.forget_guest().await;

    let mut resp = HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Signed out"
    }));
    if let Err(e) = store.apply(&mut resp) {
        return Ok(e.error_response());
    }
    if let Err(e) = resp.add_cookie(&expired_cookie(CUSTOMER_AUTH_COOKIE)) {
        return Ok(AppError::InternalError(format!("Failed to set cookie: {e}")).error_response());
    }
    Ok(resp)
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout)),
    );
}
