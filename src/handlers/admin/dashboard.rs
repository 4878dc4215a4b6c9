use crate::handlers::respond;
use crate::handlers::upload::read_upload;
use crate::models::*;
use crate::services::{DashboardService, LoyaltyService, UploadService};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};

const DEFAULT_REVENUE_DAYS: u32 = 30;

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "看板汇总", body = DashboardSummary)
    )
)]
pub async fn summary(dashboard_service: web::Data<DashboardService>) -> Result<HttpResponse> {
    respond(dashboard_service.summary().await, None)
}

#[utoipa::path(
    get,
    path = "/admin/dashboard/revenue",
    tag = "admin",
    params(
        ("days" = Option<u32>, Query, description = "最近天数，默认 30")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "每日营收", body = [RevenuePoint])
    )
)]
pub async fn revenue(
    dashboard_service: web::Data<DashboardService>,
    query: web::Query<RevenueQuery>,
) -> Result<HttpResponse> {
    let days = query.days.unwrap_or(DEFAULT_REVENUE_DAYS);
    respond(dashboard_service.revenue_by_day(days).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/rewards",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("confirmed" = Option<bool>, Query, description = "是否已确认"),
        ("customer_id" = Option<i32>, Query, description = "客户 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "积分兑换记录（分页）")
    )
)]
pub async fn list_rewards(
    loyalty_service: web::Data<LoyaltyService>,
    query: web::Query<RewardQuery>,
) -> Result<HttpResponse> {
    respond(loyalty_service.list_rewards(&query).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/rewards/{id}/confirm",
    tag = "admin",
    params(("id" = i32, Path, description = "兑换记录 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "已确认", body = RewardHistoryResponse),
        (status = 404, description = "记录不存在")
    )
)]
pub async fn confirm_reward(
    loyalty_service: web::Data<LoyaltyService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        loyalty_service.confirm_reward(path.into_inner()).await,
        Some("Reward confirmed"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/uploads/{folder}",
    tag = "admin",
    params(("folder" = String, Path, description = "products / categories / pages / news")),
    request_body(content = String, description = "multipart 表单：file 文件，name 可选", content_type = "multipart/form-data"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "上传成功，返回公开路径", body = UploadResponse),
        (status = 400, description = "文件类型或大小不合规")
    )
)]
pub async fn upload_image(
    upload_service: web::Data<UploadService>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let file = match read_upload(payload, upload_service.max_bytes()).await {
        Ok(f) => f,
        Err(e) => return Ok(e.error_response()),
    };
    let result = upload_service
        .save(&path.into_inner(), &file.name_hint, &file.original_name, &file.bytes)
        .await
        .map(|path| UploadResponse { path });
    respond(result, Some("File uploaded"))
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(summary))
        .route("/dashboard/revenue", web::get().to(revenue))
        .route("/rewards", web::get().to(list_rewards))
        .route("/rewards/{id}/confirm", web::post().to(confirm_reward))
        .route("/uploads/{folder}", web::post().to(upload_image));
}
