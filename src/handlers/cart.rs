use crate::cart::{CartSlot, CartStorage, CookieCartStore};
use crate::error::AppResult;
use crate::middlewares::current_customer;
use crate::models::*;
use crate::services::CartService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde::Serialize;
use serde_json::json;

/// 成功时写回购物车 Cookie
fn reply<T: Serialize>(
    store: &CookieCartStore,
    result: AppResult<T>,
    message: Option<&str>,
) -> Result<HttpResponse> {
    let data = match result {
        Ok(data) => data,
        Err(e) => return Ok(e.error_response()),
    };
    let mut resp = HttpResponse::Ok().json(json!({
        "success": true,
        "data": data,
        "message": message
    }));
    if let Err(e) = store.apply(&mut resp) {
        return Ok(e.error_response());
    }
    Ok(resp)
}

fn slot_of(query: &CartSlotQuery) -> CartSlot {
    query.slot.unwrap_or_default()
}

#[utoipa::path(
    get,
    path = "/cart",
    tag = "cart",
    params(
        ("slot" = Option<CartSlot>, Query, description = "standing（默认）或 buy_now")
    ),
    responses(
        (status = 200, description = "购物车内容（已按最新库存核对）", body = CartResponse)
    )
)]
pub async fn get_cart(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    query: web::Query<CartSlotQuery>,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service.get_cart(&store, &owner, slot_of(&query)).await;
    reply(&store, result, None)
}

/// 购物车页面数据
pub async fn cart_page(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service
        .get_cart(&store, &owner, CartSlot::Standing)
        .await;
    reply(&store, result, None)
}

#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "cart",
    request_body = CartItemInput,
    params(
        ("slot" = Option<CartSlot>, Query, description = "standing（默认）或 buy_now")
    ),
    responses(
        (status = 200, description = "已加入购物车", body = CartResponse),
        (status = 400, description = "库存不足或商品不可售")
    )
)]
pub async fn add_item(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    query: web::Query<CartSlotQuery>,
    request: web::Json<CartItemInput>,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service
        .add_item(
            &store,
            &owner,
            slot_of(&query),
            request.product_detail_id,
            request.amount,
        )
        .await;
    reply(&store, result, Some("Added to cart"))
}

#[utoipa::path(
    put,
    path = "/cart/items/{product_detail_id}",
    tag = "cart",
    request_body = UpdateCartItemRequest,
    params(
        ("product_detail_id" = i32, Path, description = "商品变体 ID"),
        ("slot" = Option<CartSlot>, Query, description = "standing（默认）或 buy_now")
    ),
    responses(
        (status = 200, description = "数量已更新", body = CartResponse),
        (status = 400, description = "库存不足"),
        (status = 404, description = "购物车中没有该商品")
    )
)]
pub async fn update_item(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    path: web::Path<i32>,
    query: web::Query<CartSlotQuery>,
    request: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service
        .update_item(
            &store,
            &owner,
            slot_of(&query),
            path.into_inner(),
            request.amount,
        )
        .await;
    reply(&store, result, Some("Cart updated"))
}

#[utoipa::path(
    delete,
    path = "/cart/items/{product_detail_id}",
    tag = "cart",
    params(
        ("product_detail_id" = i32, Path, description = "商品变体 ID"),
        ("slot" = Option<CartSlot>, Query, description = "standing（默认）或 buy_now")
    ),
    responses(
        (status = 200, description = "已移除", body = CartResponse),
        (status = 404, description = "购物车中没有该商品")
    )
)]
pub async fn remove_item(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    path: web::Path<i32>,
    query: web::Query<CartSlotQuery>,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service
        .remove_item(&store, &owner, slot_of(&query), path.into_inner())
        .await;
    reply(&store, result, Some("Removed from cart"))
}

#[utoipa::path(
    put,
    path = "/cart",
    tag = "cart",
    request_body = SyncCartRequest,
    responses(
        (status = 200, description = "购物车已同步", body = CartResponse),
        (status = 400, description = "库存不足或商品不可售")
    )
)]
pub async fn sync_cart(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    request: web::Json<SyncCartRequest>,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service
        .sync_cart(&store, &owner, request.into_inner().items)
        .await;
    reply(&store, result, Some("Cart updated"))
}

#[utoipa::path(
    post,
    path = "/cart/buy-now",
    tag = "cart",
    request_body = CartItemInput,
    responses(
        (status = 200, description = "立即购买购物车已就绪", body = CartResponse),
        (status = 400, description = "库存不足或商品不可售")
    )
)]
pub async fn buy_now(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    request: web::Json<CartItemInput>,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service
        .buy_now(&store, &owner, request.product_detail_id, request.amount)
        .await;
    reply(&store, result, None)
}

#[utoipa::path(
    delete,
    path = "/cart",
    tag = "cart",
    params(
        ("slot" = Option<CartSlot>, Query, description = "standing（默认）或 buy_now")
    ),
    responses(
        (status = 200, description = "购物车已清空")
    )
)]
pub async fn clear_cart(
    cart_service: web::Data<CartService>,
    storage: web::Data<CartStorage>,
    req: HttpRequest,
    query: web::Query<CartSlotQuery>,
) -> Result<HttpResponse> {
    let store = storage.for_request(&req);
    let owner = store.owner_for(current_customer(&req).map(|c| c.customer_id));
    let result = cart_service.clear(&store, &owner, slot_of(&query)).await;
    reply(&store, result, Some("Cart cleared"))
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/cart.html", web::get().to(cart_page)).service(
        web::scope("/cart")
            .route("", web::get().to(get_cart))
            .route("", web::put().to(sync_cart))
            .route("", web::delete().to(clear_cart))
            .route("/items", web::post().to(add_item))
            .route("/items/{product_detail_id}", web::put().to(update_item))
            .route("/items/{product_detail_id}", web::delete().to(remove_item))
            .route("/buy-now", web::post().to(buy_now)),
    );
}
