use crate::entities::{comment_entity as comments, news_entity as news, page_entity as pages};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::catalog_service::with_authors;
use crate::utils::{optional_text, require_text, unique_slug};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 静态页面、新闻与评论审核
#[derive(Clone)]
pub struct ContentService {
    pool: DatabaseConnection,
}

impl ContentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    // ---- 前台 ----

    pub async fn published_pages(&self) -> AppResult<Vec<PageResponse>> {
        let rows = pages::Entity::find()
            .filter(pages::Column::Published.eq(true))
            .order_by_asc(pages::Column::Ordering)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn page_by_alias(&self, alias: &str) -> AppResult<PageResponse> {
        pages::Entity::find()
            .filter(pages::Column::Alias.eq(alias))
            .filter(pages::Column::Published.eq(true))
            .one(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Page not found".to_string()))
    }

    pub async fn list_news(
        &self,
        query: &NewsQuery,
        published_only: bool,
    ) -> AppResult<PaginatedResponse<NewsSummary>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = news::Entity::find();
        if published_only {
            base = base.filter(news::Column::Published.eq(true));
        }
        if let Some(hot) = query.hot {
            base = base.filter(news::Column::IsHot.eq(hot));
        }
        if let Some(search) = optional_text(query.search.clone()) {
            base = base.filter(news::Column::Title.contains(&search));
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let items = base
            .order_by_desc(news::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::from_params(
            items.into_iter().map(NewsSummary::from).collect(),
            &params,
            total,
        ))
    }

    /// 读取新闻并累加浏览量
    pub async fn news_by_alias(&self, alias: &str) -> AppResult<NewsResponse> {
        let item = news::Entity::find()
            .filter(news::Column::Alias.eq(alias))
            .filter(news::Column::Published.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;

        news::Entity::update_many()
            .col_expr(news::Column::Views, Expr::col(news::Column::Views).add(1))
            .filter(news::Column::Id.eq(item.id))
            .exec(&self.pool)
            .await?;

        let mut response = NewsResponse::from(item);
        response.views += 1;
        Ok(response)
    }

    // ---- 后台：页面 ----

    pub async fn admin_pages(&self) -> AppResult<Vec<PageResponse>> {
        let rows = pages::Entity::find()
            .order_by_asc(pages::Column::Ordering)
            .order_by_asc(pages::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_page(&self, id: i32) -> AppResult<pages::Model> {
        pages::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Page not found".to_string()))
    }

    pub async fn get_page(&self, id: i32) -> AppResult<PageResponse> {
        Ok(self.find_page(id).await?.into())
    }

    async fn page_alias(&self, req: &PageRequest, name: &str, exclude: Option<i32>) -> AppResult<String> {
        let source = optional_text(req.alias.clone()).unwrap_or_else(|| name.to_string());
        let pool = self.pool.clone();
        unique_slug(&source, "page", |alias| {
            let pool = pool.clone();
            async move {
                let mut q = pages::Entity::find().filter(pages::Column::Alias.eq(alias));
                if let Some(id) = exclude {
                    q = q.filter(pages::Column::Id.ne(id));
                }
                Ok::<bool, AppError>(q.count(&pool).await? > 0)
            }
        })
        .await
    }

    pub async fn create_page(&self, req: PageRequest) -> AppResult<PageResponse> {
        let page_name = require_text("Page name", &req.page_name)?;
        let alias = self.page_alias(&req, &page_name, None).await?;
        let page = pages::ActiveModel {
            page_name: Set(page_name),
            contents: Set(req.contents),
            thumb: Set(optional_text(req.thumb)),
            published: Set(req.published.unwrap_or(true)),
            alias: Set(alias),
            meta_title: Set(optional_text(req.meta_title)),
            meta_desc: Set(optional_text(req.meta_desc)),
            meta_key: Set(optional_text(req.meta_key)),
            ordering: Set(req.ordering.unwrap_or(0)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(page.into())
    }

    pub async fn update_page(&self, id: i32, req: PageRequest) -> AppResult<PageResponse> {
        let page = self.find_page(id).await?;
        let page_name = require_text("Page name", &req.page_name)?;
        let alias = self.page_alias(&req, &page_name, Some(page.id)).await?;

        let mut model = page.into_active_model();
        model.page_name = Set(page_name);
        model.contents = Set(req.contents);
        model.thumb = Set(optional_text(req.thumb));
        if let Some(published) = req.published {
            model.published = Set(published);
        }
        model.alias = Set(alias);
        model.meta_title = Set(optional_text(req.meta_title));
        model.meta_desc = Set(optional_text(req.meta_desc));
        model.meta_key = Set(optional_text(req.meta_key));
        if let Some(ordering) = req.ordering {
            model.ordering = Set(ordering);
        }
        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn delete_page(&self, id: i32) -> AppResult<()> {
        let page = self.find_page(id).await?;
        pages::Entity::delete_by_id(page.id).exec(&self.pool).await?;
        Ok(())
    }

    pub async fn toggle_page(&self, id: i32) -> AppResult<ToggleResponse> {
        let page = self.find_page(id).await?;
        let active = !page.published;
        let mut model = page.into_active_model();
        model.published = Set(active);
        let page = model.update(&self.pool).await?;
        Ok(ToggleResponse { id: page.id, active })
    }

    // ---- 后台：新闻 ----

    async fn find_news(&self, id: i32) -> AppResult<news::Model> {
        news::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("News not found".to_string()))
    }

    pub async fn get_news(&self, id: i32) -> AppResult<NewsResponse> {
        Ok(self.find_news(id).await?.into())
    }

    async fn news_alias(&self, req: &NewsRequest, title: &str, exclude: Option<i32>) -> AppResult<String> {
        let source = optional_text(req.alias.clone()).unwrap_or_else(|| title.to_string());
        let pool = self.pool.clone();
        unique_slug(&source, "news", |alias| {
            let pool = pool.clone();
            async move {
                let mut q = news::Entity::find().filter(news::Column::Alias.eq(alias));
                if let Some(id) = exclude {
                    q = q.filter(news::Column::Id.ne(id));
                }
                Ok::<bool, AppError>(q.count(&pool).await? > 0)
            }
        })
        .await
    }

    pub async fn create_news(&self, account_id: i32, req: NewsRequest) -> AppResult<NewsResponse> {
        let title = require_text("Title", &req.title)?;
        let alias = self.news_alias(&req, &title, None).await?;
        let item = news::ActiveModel {
            title: Set(title),
            summary: Set(optional_text(req.summary)),
            contents: Set(req.contents),
            thumb: Set(optional_text(req.thumb)),
            published: Set(req.published.unwrap_or(true)),
            alias: Set(alias),
            author: Set(optional_text(req.author)),
            account_id: Set(Some(account_id)),
            cat_id: Set(req.cat_id),
            is_hot: Set(req.is_hot),
            is_newfeed: Set(req.is_newfeed),
            views: Set(0),
            meta_desc: Set(optional_text(req.meta_desc)),
            meta_key: Set(optional_text(req.meta_key)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(item.into())
    }

    pub async fn update_news(&self, id: i32, req: NewsRequest) -> AppResult<NewsResponse> {
        let item = self.find_news(id).await?;
        let title = require_text("Title", &req.title)?;
        let alias = self.news_alias(&req, &title, Some(item.id)).await?;

        let mut model = item.into_active_model();
        model.title = Set(title);
        model.summary = Set(optional_text(req.summary));
        model.contents = Set(req.contents);
        model.thumb = Set(optional_text(req.thumb));
        if let Some(published) = req.published {
            model.published = Set(published);
        }
        model.alias = Set(alias);
        model.author = Set(optional_text(req.author));
        model.cat_id = Set(req.cat_id);
        model.is_hot = Set(req.is_hot);
        model.is_newfeed = Set(req.is_newfeed);
        model.meta_desc = Set(optional_text(req.meta_desc));
        model.meta_key = Set(optional_text(req.meta_key));
        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn delete_news(&self, id: i32) -> AppResult<()> {
        let item = self.find_news(id).await?;
        news::Entity::delete_by_id(item.id).exec(&self.pool).await?;
        Ok(())
    }

    pub async fn toggle_news(&self, id: i32) -> AppResult<ToggleResponse> {
        let item = self.find_news(id).await?;
        let active = !item.published;
        let mut model = item.into_active_model();
        model.published = Set(active);
        let item = model.update(&self.pool).await?;
        Ok(ToggleResponse { id: item.id, active })
    }

    // ---- 后台：评论 ----

    pub async fn list_comments(
        &self,
        query: &CommentQuery,
    ) -> AppResult<PaginatedResponse<CommentResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = comments::Entity::find();
        if let Some(product_id) = query.product_id {
            base = base.filter(comments::Column::ProductId.eq(product_id));
        }
        if let Some(active) = query.active {
            base = base.filter(comments::Column::Active.eq(active));
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let rows = base
            .order_by_desc(comments::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::from_params(
            with_authors(&self.pool, rows).await?,
            &params,
            total,
        ))
    }

    async fn find_comment(&self, id: i32) -> AppResult<comments::Model> {
        comments::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    /// 审核通过 / 隐藏评论
    pub async fn toggle_comment(&self, id: i32) -> AppResult<ToggleResponse> {
        let comment = self.find_comment(id).await?;
        let active = !comment.active;
        let mut model = comment.into_active_model();
        model.active = Set(active);
        let comment = model.update(&self.pool).await?;
        Ok(ToggleResponse {
            id: comment.id,
            active,
        })
    }

    pub async fn delete_comment(&self, id: i32) -> AppResult<()> {
        let comment = self.find_comment(id).await?;
        comments::Entity::delete_by_id(comment.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }
}
