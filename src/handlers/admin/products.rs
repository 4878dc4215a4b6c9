use crate::handlers::respond;
use crate::models::*;
use crate::services::ProductService;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/admin/products",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("cat_id" = Option<i32>, Query, description = "分类 ID"),
        ("active" = Option<bool>, Query, description = "上架状态"),
        ("search" = Option<String>, Query, description = "商品名关键字")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "商品列表（分页）")
    )
)]
pub async fn list_products(
    product_service: web::Data<ProductService>,
    query: web::Query<AdminProductQuery>,
) -> Result<HttpResponse> {
    respond(product_service.list(&query).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/products/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "商品 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "商品及全部变体", body = AdminProductResponse),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn get_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(product_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/products",
    tag = "admin",
    request_body = ProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "商品已创建，变体按尺码×颜色生成", body = AdminProductResponse),
        (status = 400, description = "参数错误")
    )
)]
pub async fn create_product(
    product_service: web::Data<ProductService>,
    request: web::Json<ProductRequest>,
) -> Result<HttpResponse> {
    respond(
        product_service.create(request.into_inner()).await,
        Some("Product created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/products/{id}",
    tag = "admin",
    request_body = ProductRequest,
    params(("id" = i32, Path, description = "商品 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "商品已更新，变体已替换", body = AdminProductResponse)
    )
)]
pub async fn edit_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
    request: web::Json<ProductRequest>,
) -> Result<HttpResponse> {
    respond(
        product_service
            .edit(path.into_inner(), request.into_inner())
            .await,
        Some("Product updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "商品 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "商品已删除"),
        (status = 409, description = "商品已出现在订单中")
    )
)]
pub async fn delete_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        product_service.delete(path.into_inner()).await,
        Some("Product deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/products/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "商品 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "上架状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_product(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(product_service.toggle(path.into_inner()).await, None)
}

#[utoipa::path(
    put,
    path = "/admin/variants/{id}/stock",
    tag = "admin",
    request_body = SetVariantStockRequest,
    params(("id" = i32, Path, description = "变体 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "库存已更新", body = VariantResponse),
        (status = 400, description = "库存不能为负")
    )
)]
pub async fn set_variant_stock(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
    request: web::Json<SetVariantStockRequest>,
) -> Result<HttpResponse> {
    respond(
        product_service
            .set_variant_stock(path.into_inner(), request.stock)
            .await,
        Some("Stock updated"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/variants/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "变体 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "变体启用状态已切换", body = VariantResponse)
    )
)]
pub async fn toggle_variant(
    product_service: web::Data<ProductService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(product_service.toggle_variant(path.into_inner()).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/sizes",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "尺码列表", body = [SizeResponse])
    )
)]
pub async fn list_sizes(product_service: web::Data<ProductService>) -> Result<HttpResponse> {
    respond(product_service.list_sizes().await, None)
}

#[utoipa::path(
    post,
    path = "/admin/sizes",
    tag = "admin",
    request_body = SizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "尺码已创建", body = SizeResponse)
    )
)]
pub async fn create_size(
    product_service: web::Data<ProductService>,
    request: web::Json<SizeRequest>,
) -> Result<HttpResponse> {
    respond(
        product_service.create_size(request.into_inner()).await,
        Some("Size created"),
    )
}

#[utoipa::path(
    get,
    path = "/admin/colors",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "颜色列表", body = [ColorResponse])
    )
)]
pub async fn list_colors(product_service: web::Data<ProductService>) -> Result<HttpResponse> {
    respond(product_service.list_colors().await, None)
}

#[utoipa::path(
    post,
    path = "/admin/colors",
    tag = "admin",
    request_body = ColorRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "颜色已创建", body = ColorResponse)
    )
)]
pub async fn create_color(
    product_service: web::Data<ProductService>,
    request: web::Json<ColorRequest>,
) -> Result<HttpResponse> {
    respond(
        product_service.create_color(request.into_inner()).await,
        Some("Color created"),
    )
}

pub fn products_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(edit_product))
            .route("/{id}", web::delete().to(delete_product))
            .route("/{id}/toggle", web::post().to(toggle_product)),
    )
    .service(
        web::scope("/variants")
            .route("/{id}/stock", web::put().to(set_variant_stock))
            .route("/{id}/toggle", web::post().to(toggle_variant)),
    )
    .route("/sizes", web::get().to(list_sizes))
    .route("/sizes", web::post().to(create_size))
    .route("/colors", web::get().to(list_colors))
    .route("/colors", web::post().to(create_color));
}
