use crate::handlers::respond;
use crate::models::*;
use crate::services::AdminOrderService;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("status" = Option<TransactStatus>, Query, description = "订单状态"),
        ("paid" = Option<bool>, Query, description = "是否已付款"),
        ("deleted" = Option<bool>, Query, description = "是否已删除，默认否"),
        ("customer_id" = Option<i32>, Query, description = "客户 ID"),
        ("start_date" = Option<String>, Query, description = "下单时间起 (RFC 3339)"),
        ("end_date" = Option<String>, Query, description = "下单时间止 (RFC 3339)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单列表（分页）")
    )
)]
pub async fn list_orders(
    order_service: web::Data<AdminOrderService>,
    query: web::Query<AdminOrderQuery>,
) -> Result<HttpResponse> {
    respond(order_service.list(&query).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/orders/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "订单 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单详情", body = OrderWithDetails),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn get_order(
    order_service: web::Data<AdminOrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(order_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    tag = "admin",
    request_body = UpdateOrderStatusRequest,
    params(("id" = i32, Path, description = "订单 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "状态已更新", body = OrderWithDetails),
        (status = 400, description = "不允许的状态流转"),
        (status = 409, description = "订单已被并发修改")
    )
)]
pub async fn update_status(
    order_service: web::Data<AdminOrderService>,
    path: web::Path<i32>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    respond(
        order_service
            .update_status(path.into_inner(), request.into_inner())
            .await,
        Some("Order updated"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/orders/{id}",
    tag = "admin",
    request_body = EditOrderRequest,
    params(("id" = i32, Path, description = "订单 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单明细已修改，库存与金额已重算", body = OrderWithDetails),
        (status = 400, description = "订单已发货或已结束，不能修改")
    )
)]
pub async fn edit_order(
    order_service: web::Data<AdminOrderService>,
    path: web::Path<i32>,
    request: web::Json<EditOrderRequest>,
) -> Result<HttpResponse> {
    respond(
        order_service
            .edit(path.into_inner(), request.into_inner())
            .await,
        Some("Order updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/orders/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "订单 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单已删除，库存已恢复"),
        (status = 400, description = "订单已发货或已结束，不能删除")
    )
)]
pub async fn delete_order(
    order_service: web::Data<AdminOrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        order_service.delete(path.into_inner()).await,
        Some("Order deleted"),
    )
}

pub fn orders_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::put().to(edit_order))
            .route("/{id}", web::delete().to(delete_order))
            .route("/{id}/status", web::put().to(update_status)),
    );
}
