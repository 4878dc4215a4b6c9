use crate::cart::CartStorage;
use crate::middlewares::require_customer;
use crate::models::*;
use crate::services::CheckoutService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/checkout",
    tag = "checkout",
    params(
        ("source" = Option<CartSlot>, Query, description = "standing（默认）或 buy_now"),
        ("voucher_code" = Option<String>, Query, description = "优惠券代码")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "结算预览", body = CheckoutPreviewResponse),
        (status = 400, description = "购物车为空")
    )
)]
pub async fn preview(
    checkout_service: web::Data<CheckoutService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    query: web::Query<CheckoutQuery>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    let query = query.into_inner();
    let store = storage.for_request(&req);
    let result = checkout_service
        .preview(
            &store,
            customer.customer_id,
            query.source.unwrap_or_default(),
            query.voucher_code,
        )
        .await;
    match result {
        Ok(preview) => {
            let mut resp = HttpResponse::Ok().json(json!({
                "success": true,
                "data": preview
            }));
            if let Err(e) = store.apply(&mut resp) {
                return Ok(e.error_response());
            }
            Ok(resp)
        }
        Err(e) => Ok(e.error_response()),
    }
}

/// 结算页面数据（常规购物车）
pub async fn checkout_page(
    checkout_service: web::Data<CheckoutService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    preview(
        checkout_service,
        storage,
        req,
        web::Query(CheckoutQuery::default()),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/checkout/vouchers",
    tag = "checkout",
    params(
        ("subtotal" = i64, Query, description = "促销前小计")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前可用的优惠券", body = [AvailableVoucher])
    )
)]
pub async fn available_vouchers(
    checkout_service: web::Data<CheckoutService>,
    req: HttpRequest,
    query: web::Query<AvailableVoucherQuery>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match checkout_service
        .available_vouchers(customer.customer_id, query.subtotal)
        .await
    {
        Ok(vouchers) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": vouchers
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/checkout",
    tag = "checkout",
    request_body = PlaceOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "下单成功", body = OrderWithDetails),
        (status = 400, description = "库存不足、优惠券不可用或收货信息不完整")
    )
)]
pub async fn place_order(
    checkout_service: web::Data<CheckoutService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    request: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    let store = storage.for_request(&req);
    match checkout_service
        .place_order(&store, customer.customer_id, request.into_inner())
        .await
    {
        Ok(order) => {
            let mut resp = HttpResponse::Ok().json(json!({
                "success": true,
                "data": order,
                "message": "Order placed successfully"
            }));
            if let Err(e) = store.apply(&mut resp) {
                return Ok(e.error_response());
            }
            Ok(resp)
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn checkout_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkout.html", web::get().to(checkout_page))
        .service(
            web::scope("/checkout")
                .route("", web::get().to(preview))
                .route("", web::post().to(place_order))
                .route("/vouchers", web::get().to(available_vouchers)),
        );
}
