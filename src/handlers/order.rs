use crate::middlewares::require_customer;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("status" = Option<TransactStatus>, Query, description = "订单状态")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "我的订单（分页）"),
        (status = 401, description = "未登录")
    )
)]
pub async fn get_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service.list(customer.customer_id, &query).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(
        ("id" = i32, Path, description = "订单 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单详情", body = OrderWithDetails),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service.get(customer.customer_id, path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    tag = "order",
    params(
        ("id" = i32, Path, description = "订单 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单已取消，库存已恢复", body = OrderResponse),
        (status = 400, description = "订单当前状态不可取消"),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn cancel_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match order_service
        .cancel(customer.customer_id, path.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order,
            "message": "Order cancelled"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(get_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/cancel", web::post().to(cancel_order)),
    );
}
