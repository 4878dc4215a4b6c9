use crate::cart::CartStorage;
use crate::error::AppError;
use crate::handlers::respond;
use crate::middlewares::{ADMIN_AUTH_COOKIE, auth_cookie, expired_cookie, require_admin};
use crate::models::*;
use crate::services::{AccountService, AuthService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/admin/auth/login",
    tag = "admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "后台登录成功", body = AdminAuthResponse),
        (status = 401, description = "账号或密码错误，或账号已停用")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    storage: web::Data<CartStorage>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse> {
    let auth = match auth_service.admin_login(request.into_inner()).await {
        Ok(auth) => auth,
        Err(e) => return Ok(e.error_response()),
    };
    let cookie = auth_cookie(
        ADMIN_AUTH_COOKIE,
        auth.token.clone(),
        auth.expires_in,
        storage.secure(),
    );
    let mut resp = HttpResponse::Ok().json(json!({
        "success": true,
        "data": auth,
        "message": "Signed in"
    }));
    if let Err(e) = resp.add_cookie(&cookie) {
        return Ok(AppError::InternalError(format!("Failed to set cookie: {e}")).error_response());
    }
    Ok(resp)
}

#[utoipa::path(
    post,
    path = "/admin/auth/logout",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已退出后台")
    )
)]
pub async fn logout() -> Result<HttpResponse> {
    let mut resp = HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Signed out"
    }));
    if let Err(e) = resp.add_cookie(&expired_cookie(ADMIN_AUTH_COOKIE)) {
        return Ok(AppError::InternalError(format!("Failed to set cookie: {e}")).error_response());
    }
    Ok(resp)
}

#[utoipa::path(
    get,
    path = "/admin/auth/me",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前后台账号", body = AccountResponse)
    )
)]
pub async fn me(
    account_service: web::Data<AccountService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let admin = match require_admin(&req) {
        Ok(a) => a,
        Err(e) => return Ok(e.error_response()),
    };
    respond(account_service.get(admin.account_id).await, None)
}

pub fn admin_auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}
