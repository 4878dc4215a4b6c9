use crate::handlers::respond;
use crate::middlewares::require_admin;
use crate::models::*;
use crate::services::ContentService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/admin/pages",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部页面", body = [PageResponse])
    )
)]
pub async fn list_pages(content_service: web::Data<ContentService>) -> Result<HttpResponse> {
    respond(content_service.admin_pages().await, None)
}

#[utoipa::path(
    get,
    path = "/admin/pages/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "页面 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "页面详情", body = PageResponse),
        (status = 404, description = "页面不存在")
    )
)]
pub async fn get_page(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(content_service.get_page(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/pages",
    tag = "admin",
    request_body = PageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "页面已创建", body = PageResponse)
    )
)]
pub async fn create_page(
    content_service: web::Data<ContentService>,
    request: web::Json<PageRequest>,
) -> Result<HttpResponse> {
    respond(
        content_service.create_page(request.into_inner()).await,
        Some("Page created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/pages/{id}",
    tag = "admin",
    request_body = PageRequest,
    params(("id" = i32, Path, description = "页面 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "页面已更新", body = PageResponse)
    )
)]
pub async fn update_page(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
    request: web::Json<PageRequest>,
) -> Result<HttpResponse> {
    respond(
        content_service
            .update_page(path.into_inner(), request.into_inner())
            .await,
        Some("Page updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/pages/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "页面 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "页面已删除")
    )
)]
pub async fn delete_page(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        content_service.delete_page(path.into_inner()).await,
        Some("Page deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/pages/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "页面 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "发布状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_page(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(content_service.toggle_page(path.into_inner()).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/news",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("hot" = Option<bool>, Query, description = "只看热门"),
        ("search" = Option<String>, Query, description = "标题关键字")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新闻列表（含未发布，分页）")
    )
)]
pub async fn list_news(
    content_service: web::Data<ContentService>,
    query: web::Query<NewsQuery>,
) -> Result<HttpResponse> {
    respond(content_service.list_news(&query, false).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/news/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "新闻 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新闻详情", body = NewsResponse),
        (status = 404, description = "新闻不存在")
    )
)]
pub async fn get_news(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(content_service.get_news(path.into_inner()).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/news",
    tag = "admin",
    request_body = NewsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新闻已创建", body = NewsResponse)
    )
)]
pub async fn create_news(
    content_service: web::Data<ContentService>,
    req: HttpRequest,
    request: web::Json<NewsRequest>,
) -> Result<HttpResponse> {
    let admin = match require_admin(&req) {
        Ok(a) => a,
        Err(e) => return Ok(e.error_response()),
    };
    respond(
        content_service
            .create_news(admin.account_id, request.into_inner())
            .await,
        Some("News created"),
    )
}

#[utoipa::path(
    put,
    path = "/admin/news/{id}",
    tag = "admin",
    request_body = NewsRequest,
    params(("id" = i32, Path, description = "新闻 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新闻已更新", body = NewsResponse)
    )
)]
pub async fn update_news(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
    request: web::Json<NewsRequest>,
) -> Result<HttpResponse> {
    respond(
        content_service
            .update_news(path.into_inner(), request.into_inner())
            .await,
        Some("News updated"),
    )
}

#[utoipa::path(
    delete,
    path = "/admin/news/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "新闻 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新闻已删除")
    )
)]
pub async fn delete_news(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        content_service.delete_news(path.into_inner()).await,
        Some("News deleted"),
    )
}

#[utoipa::path(
    post,
    path = "/admin/news/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "新闻 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "发布状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_news(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(content_service.toggle_news(path.into_inner()).await, None)
}

#[utoipa::path(
    get,
    path = "/admin/comments",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("product_id" = Option<i32>, Query, description = "商品 ID"),
        ("active" = Option<bool>, Query, description = "是否已审核通过")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "评论列表（分页）")
    )
)]
pub async fn list_comments(
    content_service: web::Data<ContentService>,
    query: web::Query<CommentQuery>,
) -> Result<HttpResponse> {
    respond(content_service.list_comments(&query).await, None)
}

#[utoipa::path(
    post,
    path = "/admin/comments/{id}/toggle",
    tag = "admin",
    params(("id" = i32, Path, description = "评论 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "审核状态已切换", body = ToggleResponse)
    )
)]
pub async fn toggle_comment(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(content_service.toggle_comment(path.into_inner()).await, None)
}

#[utoipa::path(
    delete,
    path = "/admin/comments/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "评论 ID")),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "评论已删除")
    )
)]
pub async fn delete_comment(
    content_service: web::Data<ContentService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    respond(
        content_service.delete_comment(path.into_inner()).await,
        Some("Comment deleted"),
    )
}

pub fn content_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pages")
            .route("", web::get().to(list_pages))
            .route("", web::post().to(create_page))
            .route("/{id}", web::get().to(get_page))
            .route("/{id}", web::put().to(update_page))
            .route("/{id}", web::delete().to(delete_page))
            .route("/{id}/toggle", web::post().to(toggle_page)),
    )
    .service(
        web::scope("/news")
            .route("", web::get().to(list_news))
            .route("", web::post().to(create_news))
            .route("/{id}", web::get().to(get_news))
            .route("/{id}", web::put().to(update_news))
            .route("/{id}", web::delete().to(delete_news))
            .route("/{id}/toggle", web::post().to(toggle_news)),
    )
    .service(
        web::scope("/comments")
            .route("", web::get().to(list_comments))
            .route("/{id}", web::delete().to(delete_comment))
            .route("/{id}/toggle", web::post().to(toggle_comment)),
    );
}
