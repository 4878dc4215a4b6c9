use crate::models::*;
use crate::services::ContentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/pages",
    tag = "content",
    responses(
        (status = 200, description = "已发布的页面", body = [PageResponse])
    )
)]
pub async fn list_pages(content_service: web::Data<ContentService>) -> Result<HttpResponse> {
    match content_service.published_pages().await {
        Ok(pages) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": pages
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/pages/{alias}",
    tag = "content",
    params(
        ("alias" = String, Path, description = "页面别名")
    ),
    responses(
        (status = 200, description = "页面内容", body = PageResponse),
        (status = 404, description = "页面不存在")
    )
)]
pub async fn get_page(
    content_service: web::Data<ContentService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match content_service.page_by_alias(&path.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/news",
    tag = "content",
    params(
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量"),
        ("hot" = Option<bool>, Query, description = "只看热门"),
        ("search" = Option<String>, Query, description = "标题关键字")
    ),
    responses(
        (status = 200, description = "新闻列表（分页）")
    )
)]
pub async fn list_news(
    content_service: web::Data<ContentService>,
    query: web::Query<NewsQuery>,
) -> Result<HttpResponse> {
    match content_service.list_news(&query, true).await {
        Ok(news) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": news
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/news/{alias}",
    tag = "content",
    params(
        ("alias" = String, Path, description = "新闻别名")
    ),
    responses(
        (status = 200, description = "新闻内容（浏览量 +1）", body = NewsResponse),
        (status = 404, description = "新闻不存在")
    )
)]
pub async fn get_news(
    content_service: web::Data<ContentService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match content_service.news_by_alias(&path.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": item
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn content_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pages")
            .route("", web::get().to(list_pages))
            .route("/{alias}", web::get().to(get_page)),
    )
    .service(
        web::scope("/news")
            .route("", web::get().to(list_news))
            .route("/{alias}", web::get().to(get_news)),
    );
}
