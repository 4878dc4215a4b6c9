use super::upload::read_upload;
use crate::middlewares::require_customer;
use crate::models::*;
use crate::services::{CustomerService, UploadService};
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/account/profile",
    tag = "account",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取个人资料成功", body = CustomerResponse),
        (status = 401, description = "未登录")
    )
)]
pub async fn get_profile(
    customer_service: web::Data<CustomerService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match customer_service.profile(customer.customer_id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/account/profile",
    tag = "account",
    request_body = UpdateProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新个人资料成功", body = CustomerResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn update_profile(
    customer_service: web::Data<CustomerService>,
    req: HttpRequest,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match customer_service
        .update_profile(customer.customer_id, request.into_inner())
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile,
            "message": "Profile updated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/account/password",
    tag = "account",
    request_body = ChangePasswordRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "修改密码成功"),
        (status = 400, description = "当前密码错误或新密码不合规")
    )
)]
pub async fn change_password(
    customer_service: web::Data<CustomerService>,
    req: HttpRequest,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match customer_service
        .change_password(customer.customer_id, request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Password changed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/account/avatar",
    tag = "account",
    request_body(content = String, description = "multipart 表单，字段 file", content_type = "multipart/form-data"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "头像已更新", body = CustomerResponse),
        (status = 400, description = "文件类型或大小不合规")
    )
)]
pub async fn upload_avatar(
    customer_service: web::Data<CustomerService>,
    upload_service: web::Data<UploadService>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    let file = match read_upload(payload, upload_service.max_bytes()).await {
        Ok(f) => f,
        Err(e) => return Ok(e.error_response()),
    };
    let hint = format!("avatar-{}", customer.customer_id);
    let path = match upload_service
        .save("avatars", &hint, &file.original_name, &file.bytes)
        .await
    {
        Ok(p) => p,
        Err(e) => return Ok(e.error_response()),
    };
    match customer_service.set_avatar(customer.customer_id, path).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile,
            "message": "Avatar updated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn account_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/account")
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::put().to(update_profile))
            .route("/password", web::post().to(change_password))
            .route("/avatar", web::post().to(upload_avatar)),
    );
}
