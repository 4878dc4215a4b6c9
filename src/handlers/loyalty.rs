use crate::middlewares::require_customer;
use crate::models::*;
use crate::services::LoyaltyService;
use crate::services::loyalty_service::reward_tiers;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/loyalty/status",
    tag = "loyalty",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "积分与签到状态", body = LoyaltyStatusResponse)
    )
)]
pub async fn status(
    loyalty_service: web::Data<LoyaltyService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match loyalty_service.status(customer.customer_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/loyalty/check-in",
    tag = "loyalty",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "签到成功", body = CheckInResponse),
        (status = 400, description = "今天已签到")
    )
)]
pub async fn check_in(
    loyalty_service: web::Data<LoyaltyService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match loyalty_service.check_in(customer.customer_id).await {
        Ok(result) => {
            let message = if result.streak_bonus {
                format!(
                    "Checked in! +{} points including the {}-day streak bonus",
                    result.points_earned, result.streak
                )
            } else {
                format!("Checked in! +{} points", result.points_earned)
            };
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": result,
                "message": message
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty/history",
    tag = "loyalty",
    params(
        ("page" = Option<i64>, Query, description = "页码"),
        ("page_size" = Option<i64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "签到记录（分页）")
    )
)]
pub async fn history(
    loyalty_service: web::Data<LoyaltyService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match loyalty_service.history(customer.customer_id, &query).await {
        Ok(history) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": history
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty/rewards",
    tag = "loyalty",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "可兑换的档位", body = [RewardTier])
    )
)]
pub async fn tiers() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": reward_tiers()
    })))
}

#[utoipa::path(
    post,
    path = "/loyalty/redeem",
    tag = "loyalty",
    request_body = RedeemRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "兑换成功，返回优惠券代码", body = RedeemResponse),
        (status = 400, description = "积分不足"),
        (status = 404, description = "档位不存在")
    )
)]
pub async fn redeem(
    loyalty_service: web::Data<LoyaltyService>,
    req: HttpRequest,
    request: web::Json<RedeemRequest>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match loyalty_service
        .redeem(customer.customer_id, request.tier_id)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("Redeemed! Your voucher code is {}", result.voucher_code),
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty/reward-history",
    tag = "loyalty",
    params(
        ("page" = Option<i64>, Query, description = "页码"),
        ("page_size" = Option<i64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "兑换记录（分页）")
    )
)]
pub async fn reward_history(
    loyalty_service: web::Data<LoyaltyService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match loyalty_service
        .reward_history(customer.customer_id, &query)
        .await
    {
        Ok(history) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": history
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn loyalty_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/loyalty")
            .route("/status", web::get().to(status))
            .route("/check-in", web::post().to(check_in))
            .route("/history", web::get().to(history))
            .route("/rewards", web::get().to(tiers))
            .route("/redeem", web::post().to(redeem))
            .route("/reward-history", web::get().to(reward_history)),
    );
}
