use crate::handlers::respond;
use crate::models::*;
use crate::services::{PromotionService, VoucherService};
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/admin/promotions",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("active" = Option<bool>, Query, description = "启用状态")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "促销列表（分页）")
    )
)]
pub async fn list_promotions(
    promotion_service: web::Data<PromotionService>,
    query: web::Query<PromotionQuery>,
) -> Result<HttpResponse> {
    respond(promotion_service.list(&query).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/promotions/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "促销 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "促销详情", body = PromotionResponse),
        (status = 404, description = "促销不存在")
    )
)]
pub async fn get_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(promotion_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/promotions",
    tag = "admin",
    request_body = CreatePromotionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "促销已创建（指定商品或整个分类）", body = PromotionResponse),
        (status = 400, description = "参数错误")
    )
)]
pub async fn create_promotion(
    promotion_service: web::Data<PromotionService>,
    request: web::Json<CreatePromotionRequest>,
) -> Result<HttpResponse> {
    respond(
        promotion_service.create_bulk(request.into_inner()).await,
        Some("Promotion created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/promotions/{id}",
    tag = "admin",
    request_body = UpdatePromotionRequest,
    params(("id" = i32, Path, description = "促销 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "促销已更新", body = PromotionResponse)
    )
)]
pub async fn update_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
    request: web::Json<UpdatePromotionRequest>,
) -> Result<HttpResponse> {
    respond(
        promotion_service
            .update(path.into_inner(), request.into_inner())
            .await,
        Some("Promotion updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/promotions/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "促销 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "促销已删除"),
        (status = 409, description = "促销已被订单使用")
    )
)]
pub async fn delete_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        promotion_service.delete(path.into_inner()).await,
        Some("Promotion deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/promotions/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "促销 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "启用状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_promotion(
    promotion_service: web::Data<PromotionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(promotion_service.toggle(path.into_inner()).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/vouchers",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("active" = Option<bool>, Query, description = "启用状态"),
        ("search" = Option<String>, Query, description = "代码关键字")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券列表（分页）")
    )
)]
pub async fn list_vouchers(
    voucher_service: web::Data<VoucherService>,
    query: web::Query<VoucherQuery>,
) -> Result<HttpResponse> {
    respond(voucher_service.list(&query).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/vouchers/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "优惠券 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券详情", body = VoucherResponse),
        (status = 404, description = "优惠券不存在")
    )
)]
pub async fn get_voucher(
    voucher_service: web::Data<VoucherService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(voucher_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/vouchers",
    tag = "admin",
    request_body = VoucherRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券已创建", body = VoucherResponse),
        (status = 400, description = "代码重复或参数错误")
    )
)]
pub async fn create_voucher(
    voucher_service: web::Data<VoucherService>,
    request: web::Json<VoucherRequest>,
) -> Result<HttpResponse> {
    respond(
        voucher_service.create_single(request.into_inner()).await,
        Some("Voucher created"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/vouchers/batch",
    tag = "admin",
    request_body = CreateVoucherBatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "批量生成的优惠券", body = [VoucherResponse]),
        (status = 400, description = "数量超出范围")
    )
)]
pub async fn create_voucher_batch(
    voucher_service: web::Data<VoucherService>,
    request: web::Json<CreateVoucherBatchRequest>,
) -> Result<HttpResponse> {
    respond(
        voucher_service.create_batch(request.into_inner()).await,
        Some("Vouchers created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/vouchers/{id}",
    tag = "admin",
    request_body = VoucherRequest,
    params(("id" = i32, Path, description = "优惠券 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券已更新", body = VoucherResponse)
    )
)]
pub async fn update_voucher(
    voucher_service: web::Data<VoucherService>,
    path: web::Path<i32>,
    request: web::Json<VoucherRequest>,
) -> Result<HttpResponse> {
    respond(
        voucher_service
            .update(path.into_inner(), request.into_inner())
            .await,
        Some("Voucher updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/vouchers/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "优惠券 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "优惠券已删除"),
        (status = 409, description = "优惠券已被使用")
    )
)]
pub async fn delete_voucher(
    voucher_service: web::Data<VoucherService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        voucher_service.delete(path.into_inner()).await,
        Some("Voucher deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/vouchers/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "优惠券 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "启用状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_voucher(
    voucher_service: web::Data<VoucherService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(voucher_service.toggle(path.into_inner()).await, None)
}

pub fn promotions_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/promotions")
            .route("", web::get().to(list_promotions))
            .route("", web::post().to(create_promotion))
            .route("/{id}", web::get().to(get_promotion))
            .route("/{id}", web::put().to(update_promotion))
            .route("/{id}", web::delete().to(delete_promotion))
            .route("/{id}/toggle", web::post().to(toggle_promotion)),
    )
    .service(
        web::scope("/vouchers")
            .route("", web::get().to(list_vouchers))
            .route("", web::post().to(create_voucher))
            .route("/batch", web::post().to(create_voucher_batch))
            .route("/{id}", web::get().to(get_voucher))
            .route("/{id}", web::put().to(update_voucher))
            .route("/{id}", web::delete().to(delete_voucher))
            .route("/{id}/toggle", web::post().to(toggle_voucher)),
    );
}
