use crate::middlewares::require_customer;
use crate::models::*;
use crate::services::CatalogService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/home",
    tag = "catalog",
    responses(
        (status = 200, description = "首页数据", body = HomeResponse)
    )
)]
pub async fn home(catalog_service: web::Data<CatalogService>) -> Result<HttpResponse> {
    match catalog_service.home().await {
        Ok(home) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": home
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("cat_id" = Option<i32>, Query, description = "分类 ID"),
        ("category" = Option<String>, Query, description = "分类别名"),
        ("search" = Option<String>, Query, description = "商品名关键字"),
        ("min_price" = Option<i64>, Query, description = "最低价"),
        ("max_price" = Option<i64>, Query, description = "最高价"),
        ("size_id" = Option<i32>, Query, description = "尺码"),
        ("color_id" = Option<i32>, Query, description = "颜色"),
        ("sort" = Option<ProductSort>, Query, description = "排序")
    ),
    responses(
        (status = 200, description = "商品列表（分页）"),
        (status = 404, description = "分类不存在")
    )
)]
pub async fn list_products(
    catalog_service: web::Data<CatalogService>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    match catalog_service.list_products(&query).await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": products
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/products/{key}",
    tag = "catalog",
    params(
        ("key" = String, Path, description = "商品别名或 ID")
    ),
    responses(
        (status = 200, description = "商品详情", body = ProductDetailResponse),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn product_detail(
    catalog_service: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match catalog_service.product_detail(&path.into_inner()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/products/{id}/comments",
    tag = "catalog",
    request_body = CreateCommentRequest,
    params(
        ("id" = i32, Path, description = "商品 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "评论已提交，等待审核", body = CommentResponse),
        (status = 401, description = "未登录"),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn post_comment(
    catalog_service: web::Data<CatalogService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let customer = match require_customer(&req) {
        Ok(c) => c,
        Err(e) => return Ok(e.error_response()),
    };
    match catalog_service
        .post_comment(customer.customer_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(comment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": comment,
            "message": "Thanks! Your review will appear after moderation"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "catalog",
    responses(
        (status = 200, description = "已发布的分类", body = [CategoryResponse])
    )
)]
pub async fn categories(catalog_service: web::Data<CatalogService>) -> Result<HttpResponse> {
    match catalog_service.categories().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": categories
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/categories/{alias}",
    tag = "catalog",
    params(
        ("alias" = String, Path, description = "分类别名"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("sort" = Option<ProductSort>, Query, description = "排序")
    ),
    responses(
        (status = 200, description = "分类及其商品", body = CategoryProductsResponse),
        (status = 404, description = "分类不存在")
    )
)]
pub async fn category_products(
    catalog_service: web::Data<CatalogService>,
    path: web::Path<String>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    match catalog_service
        .category_by_alias(&path.into_inner(), &query)
        .await
    {
        Ok(listing) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": listing
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/locations",
    tag = "catalog",
    params(
        ("parent_id" = Option<i32>, Query, description = "上级地区，为空返回省市")
    ),
    responses(
        (status = 200, description = "地区列表", body = [LocationResponse])
    )
)]
pub async fn locations(
    catalog_service: web::Data<CatalogService>,
    query: web::Query<LocationQuery>,
) -> Result<HttpResponse> {
    match catalog_service.locations(query.parent_id).await {
        Ok(locations) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": locations
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn catalog_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/home", web::get().to(home))
        .route("/locations", web::get().to(locations))
        .service(
            web::scope("/products")
                .route("", web::get().to(list_products))
                .route("/{key}", web::get().to(product_detail))
                .route("/{id}/comments", web::post().to(post_comment)),
        )
        .service(
            web::scope("/categories")
                .route("", web::get().to(categories))
                .route("/{alias}", web::get().to(category_products)),
        );
}

/// `/{alias}.html` 分类页，需在其他路由之后注册
pub fn category_page_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/{alias}.html", web::get().to(category_products));
}
