use crate::handlers::respond;
use crate::models::*;
use crate::services::{CategoryService, SupplierService};
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/admin/categories",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部分类", body = [CategoryResponse])
    )
)]
pub async fn list_categories(category_service: web::Data<CategoryService>) -> Result<HttpResponse> {
    respond(category_service.list().await, None)
}

#[utoipa::path(
    get,
    path = "/admin/categories/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "分类 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "分类详情", body = CategoryResponse),
        (status = 404, description = "分类不存在")
    )
)]
pub async fn get_category(
    category_service: web::Data<CategoryService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(category_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "admin",
    request_body = CategoryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "分类已创建", body = CategoryResponse)
    )
)]
pub async fn create_category(
    category_service: web::Data<CategoryService>,
    request: web::Json<CategoryRequest>,
) -> Result<HttpResponse> {
    respond(
        category_service.create(request.into_inner()).await,
        Some("Category created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    tag = "admin",
    request_body = CategoryRequest,
    params(("id" = i32, Path, description = "分类 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "分类已更新", body = CategoryResponse)
    )
)]
pub async fn update_category(
    category_service: web::Data<CategoryService>,
    path: web::Path<i32>,
    request: web::Json<CategoryRequest>,
) -> Result<HttpResponse> {
    respond(
        category_service
            .update(path.into_inner(), request.into_inner())
            .await,
        Some("Category updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "分类 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "分类已删除"),
        (status = 409, description = "分类下仍有商品或子分类")
    )
)]
pub async fn delete_category(
    category_service: web::Data<CategoryService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        category_service.delete(path.into_inner()).await,
        Some("Category deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/categories/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "分类 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "发布状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_category(
    category_service: web::Data<CategoryService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(category_service.toggle(path.into_inner()).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/suppliers",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "供应商列表", body = [SupplierResponse])
    )
)]
pub async fn list_suppliers(supplier_service: web::Data<SupplierService>) -> Result<HttpResponse> {
    respond(supplier_service.list().await, None)
}

#[utoipa::path(
    get,
    path = "/admin/suppliers/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "供应商 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "供应商详情", body = SupplierResponse),
        (status = 404, description = "供应商不存在")
    )
)]
pub async fn get_supplier(
    supplier_service: web::Data<SupplierService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(supplier_service.get(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/suppliers",
    tag = "admin",
    request_body = SupplierRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "供应商已创建", body = SupplierResponse)
    )
)]
pub async fn create_supplier(
    supplier_service: web::Data<SupplierService>,
    request: web::Json<SupplierRequest>,
) -> Result<HttpResponse> {
    respond(
        supplier_service.create(request.into_inner()).await,
        Some("Supplier created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/suppliers/{id}",
    tag = "admin",
    request_body = SupplierRequest,
    params(("id" = i32, Path, description = "供应商 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "供应商已更新", body = SupplierResponse)
    )
)]
pub async fn update_supplier(
    supplier_service: web::Data<SupplierService>,
    path: web::Path<i32>,
    request: web::Json<SupplierRequest>,
) -> Result<HttpResponse> {
    respond(
        supplier_service
            .update(path.into_inner(), request.into_inner())
            .await,
        Some("Supplier updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/suppliers/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "供应商 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "供应商已删除"),
        (status = 409, description = "仍有商品引用该供应商")
    )
)]
pub async fn delete_supplier(
    supplier_service: web::Data<SupplierService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        supplier_service.delete(path.into_inner()).await,
        Some("Supplier deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/suppliers/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "供应商 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "启用状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_supplier(
    supplier_service: web::Data<SupplierService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(supplier_service.toggle(path.into_inner()).await, None)
}

pub fn categories_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list_categories))
            .route("", web::post().to(create_category))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category))
            .route("/{id}", web::delete().to(delete_category))
            .route("/{id}/toggle", web::post().to(toggle_category)),
    )
    .service(
        web::scope("/suppliers")
            .route("", web::get().to(list_suppliers))
            .route("", web::post().to(create_supplier))
            .route("/{id}", web::get().to(get_supplier))
            .route("/{id}", web::put().to(update_supplier))
            .route("/{id}", web::delete().to(delete_supplier))
            .route("/{id}/toggle", web::post().to(toggle_supplier)),
    );
}
