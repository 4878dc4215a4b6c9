use crate::handlers::respond;
use crate::models::*;
use crate::services::CustomerService;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/admin/customers",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("search" = Option<String>, Query, description = "姓名 / 邮箱 / 手机号"),
        ("active" = Option<bool>, Query, description = "启用状态")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "客户列表（分页）")
    )
)]
pub async fn list_customers(
    customer_service: web::Data<CustomerService>,
    query: web::Query<AdminCustomerQuery>,
) -> Result<HttpResponse> {
    respond(customer_service.list(&query).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/customers/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "客户 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "客户详情与订单数", body = AdminCustomerDetail),
        (status = 404, description = "客户不存在")
    )
)]
pub async fn get_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(customer_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/customers/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "客户 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "启用状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(customer_service.toggle(path.into_inner()).await, None)
}

#[utoipa::path(
    delete,
    path = "/admin/customers/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "客户 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "客户已删除"),
        (status = 409, description = "客户已有订单")
    )
)]
pub async fn delete_customer(
    customer_service: web::Data<CustomerService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        customer_service.delete(path.into_inner()).await,
        Some("Customer deleted"),
    )
}

pub fn customers_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::delete().to(delete_customer))
            .route("/{id}/toggle", web::post().to(toggle_customer)),
    );
}
