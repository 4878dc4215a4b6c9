use crate::config::AdminConfig;
use crate::handlers::respond;
use crate::middlewares::require_super_admin;
use crate::models::*;
use crate::services::AccountService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/admin/accounts",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "后台账号列表", body = [AccountResponse]),
        (status = 403, description = "仅限超级管理员")
    )
)]
pub async fn list_accounts(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(account_service.list().await, None)
}

#[utoipa::path(
    get,
    path = "/admin/accounts/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "账号 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "账号详情", body = AccountResponse),
        (status = 404, description = "账号不存在")
    )
)]
pub async fn get_account(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(account_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/accounts",
    tag = "admin",
    request_body = CreateAccountRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "账号已创建", body = AccountResponse),
        (status = 400, description = "邮箱已被使用或参数错误")
    )
)]
pub async fn create_account(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    request: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(
        account_service.create(request.into_inner()).await,
        Some("Account created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/accounts/{id}",
    tag = "admin",
    request_body = UpdateAccountRequest,
    params(("id" = i32, Path, description = "账号 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "账号已更新", body = AccountResponse)
    )
)]
pub async fn update_account(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(
        account_service
            .update(path.into_inner(), request.into_inner())
            .await,
        Some("Account updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/accounts/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "账号 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "账号已删除"),
        (status = 409, description = "账号仍被引用")
    )
)]
pub async fn delete_account(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let admin = match require_super_admin(&req, admin_config.super_admin_role_id) {
        Ok(a) => a,
        Err(e) => return Ok(e.error_response()),
    };
    respond(
        account_service
            .delete(path.into_inner(), admin.account_id)
            .await,
        Some("Account deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/accounts/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "账号 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "启用状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_account(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let admin = match require_super_admin(&req, admin_config.super_admin_role_id) {
        Ok(a) => a,
        Err(e) => return Ok(e.error_response()),
    };
    respond(
        account_service
            .toggle(path.into_inner(), admin.account_id)
            .await,
        None,
    )
}

#[utoipa::path(
    get,
    path = "/admin/roles",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "角色列表", body = [RoleResponse])
    )
)]
pub async fn list_roles(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(account_service.list_roles().await, None)
}

#[utoipa::path(
    get,
    path = "/admin/roles/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "角色 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "角色详情", body = RoleResponse),
        (status = 404, description = "角色不存在")
    )
)]
pub async fn get_role(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(account_service.get_role(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/roles",
    tag = "admin",
    request_body = RoleRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "角色已创建", body = RoleResponse)
    )
)]
pub async fn create_role(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    request: web::Json<RoleRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(
        account_service.create_role(request.into_inner()).await,
        Some("Role created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/roles/{id}",
    tag = "admin",
    request_body = RoleRequest,
    params(("id" = i32, Path, description = "角色 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "角色已更新", body = RoleResponse)
    )
)]
pub async fn update_role(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<RoleRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(
        account_service
            .update_role(path.into_inner(), request.into_inner())
            .await,
        Some("Role updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/roles/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "角色 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "角色已删除"),
        (status = 409, description = "角色仍有账号在使用")
    )
)]
pub async fn delete_role(
    account_service: web::Data<AccountService>,
    admin_config: web::Data<AdminConfig>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    if let Err(e) = require_super_admin(&req, admin_config.super_admin_role_id) {
        return Ok(e.error_response());
    }
    respond(
        account_service.delete_role(path.into_inner()).await,
        Some("Role deleted"),
    )
}

pub fn accounts_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .route("", web::get().to(list_accounts))
            .route("", web::post().to(create_account))
            .route("/{id}", web::get().to(get_account))
            .route("/{id}", web::put().to(update_account))
            .route("/{id}", web::delete().to(delete_account))
            .route("/{id}/toggle", web::post().to(toggle_account)),
    )
    .service(
        web::scope("/roles")
            .route("", web::get().to(list_roles))
            .route("", web::post().to(create_role))
            .route("/{id}", web::get().to(get_role))
            .route("/{id}", web::put().to(update_role))
            .route("/{id}", web::delete().to(delete_role)),
    );
}
