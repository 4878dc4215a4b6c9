use crate::entities::{
    category_entity as categories, comment_entity as comments, customer_entity as customers,
    location_entity as locations, news_entity as news, product_detail_entity as variants,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::product_service::describe_variants;
use crate::utils::{optional_text, require_text};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use std::collections::HashMap;

const HOME_LIMIT: u64 = 8;
const RELATED_LIMIT: u64 = 4;
const COMMENT_LIMIT: u64 = 20;

/// 前台商品浏览
#[derive(Clone)]
pub struct CatalogService {
    pool: DatabaseConnection,
}

impl CatalogService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> AppResult<PaginatedResponse<ProductSummary>> {
        let cat_id = match (query.cat_id, optional_text(query.category.clone())) {
            (Some(id), _) => Some(id),
            (None, Some(alias)) => Some(self.published_category(&alias).await?.id),
            (None, None) => None,
        };
        self.search(query, cat_id).await
    }

    async fn search(
        &self,
        query: &ProductQuery,
        cat_id: Option<i32>,
    ) -> AppResult<PaginatedResponse<ProductSummary>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = products::Entity::find().filter(products::Column::Active.eq(true));
        if let Some(cat_id) = cat_id {
            base = base.filter(products::Column::CatId.eq(cat_id));
        }
        if let Some(search) = optional_text(query.search.clone()) {
            base = base.filter(products::Column::ProductName.contains(&search));
        }
        if let Some(min) = query.min_price {
            base = base.filter(products::Column::Price.gte(min));
        }
        if let Some(max) = query.max_price {
            base = base.filter(products::Column::Price.lte(max));
        }
        if query.size_id.is_some() || query.color_id.is_some() {
            let mut variant_query = variants::Entity::find()
                .filter(variants::Column::Active.eq(true))
                .filter(variants::Column::Stock.gt(0));
            if let Some(size_id) = query.size_id {
                variant_query = variant_query.filter(variants::Column::SizeId.eq(size_id));
            }
            if let Some(color_id) = query.color_id {
                variant_query = variant_query.filter(variants::Column::ColorId.eq(color_id));
            }
            let product_ids: Vec<i32> = variant_query
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|v| v.product_id)
                .collect();
            base = base.filter(products::Column::Id.is_in(product_ids));
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let items = sorted(base, query.sort.unwrap_or_default())
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::from_params(
            items.into_iter().map(ProductSummary::from).collect(),
            &params,
            total,
        ))
    }

    async fn published_category(&self, alias: &str) -> AppResult<categories::Model> {
        categories::Entity::find()
            .filter(categories::Column::Alias.eq(alias))
            .filter(categories::Column::Published.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// 商品详情，`key` 为别名或数字 ID
    pub async fn product_detail(&self, key: &str) -> AppResult<ProductDetailResponse> {
        let mut query = products::Entity::find().filter(products::Column::Active.eq(true));
        query = match key.parse::<i32>() {
            Ok(id) => query.filter(products::Column::Id.eq(id)),
            Err(_) => query.filter(products::Column::Alias.eq(key)),
        };
        let product = query
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let category = match product.cat_id {
            Some(id) => categories::Entity::find_by_id(id).one(&self.pool).await?,
            None => None,
        };

        let variant_rows = variants::Entity::find()
            .filter(variants::Column::ProductId.eq(product.id))
            .filter(variants::Column::Active.eq(true))
            .order_by_asc(variants::Column::Id)
            .all(&self.pool)
            .await?;

        let related = match product.cat_id {
            Some(cat_id) => products::Entity::find()
                .filter(products::Column::CatId.eq(cat_id))
                .filter(products::Column::Active.eq(true))
                .filter(products::Column::Id.ne(product.id))
                .order_by_desc(products::Column::CreatedAt)
                .limit(RELATED_LIMIT)
                .all(&self.pool)
                .await?,
            None => Vec::new(),
        };

        let comment_rows = comments::Entity::find()
            .filter(comments::Column::ProductId.eq(product.id))
            .filter(comments::Column::Active.eq(true))
            .order_by_desc(comments::Column::CreatedAt)
            .limit(COMMENT_LIMIT)
            .all(&self.pool)
            .await?;

        Ok(ProductDetailResponse {
            category: category.map(Into::into),
            variants: describe_variants(&self.pool, variant_rows).await?,
            related: related.into_iter().map(Into::into).collect(),
            comments: with_authors(&self.pool, comment_rows).await?,
            product: product.into(),
        })
    }

    pub async fn home(&self) -> AppResult<HomeResponse> {
        let home_products = products::Entity::find()
            .filter(products::Column::Active.eq(true))
            .filter(products::Column::HomeFlag.eq(true))
            .order_by_desc(products::Column::CreatedAt)
            .limit(HOME_LIMIT)
            .all(&self.pool)
            .await?;
        let best_sellers = products::Entity::find()
            .filter(products::Column::Active.eq(true))
            .filter(products::Column::BestSeller.eq(true))
            .order_by_desc(products::Column::CreatedAt)
            .limit(HOME_LIMIT)
            .all(&self.pool)
            .await?;
        let hot_news = news::Entity::find()
            .filter(news::Column::Published.eq(true))
            .filter(news::Column::IsHot.eq(true))
            .order_by_desc(news::Column::CreatedAt)
            .limit(5)
            .all(&self.pool)
            .await?;

        Ok(HomeResponse {
            categories: self.categories().await?,
            home_products: home_products.into_iter().map(Into::into).collect(),
            best_sellers: best_sellers.into_iter().map(Into::into).collect(),
            hot_news: hot_news.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn categories(&self) -> AppResult<Vec<CategoryResponse>> {
        let rows = categories::Entity::find()
            .filter(categories::Column::Published.eq(true))
            .order_by_asc(categories::Column::Ordering)
            .order_by_asc(categories::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// 分类页：`/{alias}.html`
    pub async fn category_by_alias(
        &self,
        alias: &str,
        query: &ProductQuery,
    ) -> AppResult<CategoryProductsResponse> {
        let category = self.published_category(alias).await?;
        let products = self.search(query, Some(category.id)).await?;
        Ok(CategoryProductsResponse {
            category: category.into(),
            products,
        })
    }

    /// 省市 / 区县列表，parent_id 为空时返回顶级
    pub async fn locations(&self, parent_id: Option<i32>) -> AppResult<Vec<LocationResponse>> {
        let query = match parent_id {
            Some(id) => locations::Entity::find().filter(locations::Column::ParentId.eq(id)),
            None => locations::Entity::find().filter(locations::Column::ParentId.is_null()),
        };
        let rows = query
            .order_by_asc(locations::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// 发表评论，需后台审核后显示
    pub async fn post_comment(
        &self,
        customer_id: i32,
        product_id: i32,
        req: CreateCommentRequest,
    ) -> AppResult<CommentResponse> {
        let content = require_text("Comment", &req.content)?;
        if !(1..=5).contains(&req.rating) {
            return Err(AppError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        let product = products::Entity::find_by_id(product_id)
            .filter(products::Column::Active.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let comment = comments::ActiveModel {
            customer_id: Set(customer_id),
            product_id: Set(product.id),
            content: Set(content),
            rating: Set(req.rating),
            active: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let mut described = with_authors(&self.pool, vec![comment]).await?;
        described
            .pop()
            .ok_or_else(|| AppError::InternalError("Comment description missing".to_string()))
    }
}

fn sorted(query: Select<products::Entity>, sort: ProductSort) -> Select<products::Entity> {
    match sort {
        ProductSort::Newest => query
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id),
        ProductSort::PriceAsc => query.order_by_asc(products::Column::Price),
        ProductSort::PriceDesc => query.order_by_desc(products::Column::Price),
        ProductSort::BestSeller => query
            .order_by_desc(products::Column::BestSeller)
            .order_by_desc(products::Column::CreatedAt),
    }
}

/// 评论附带客户姓名
pub async fn with_authors(
    pool: &DatabaseConnection,
    rows: Vec<comments::Model>,
) -> AppResult<Vec<CommentResponse>> {
    let ids: Vec<i32> = rows.iter().map(|c| c.customer_id).collect();
    let names: HashMap<i32, String> = if ids.is_empty() {
        HashMap::new()
    } else {
        customers::Entity::find()
            .filter(customers::Column::Id.is_in(ids))
            .all(pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c.full_name))
            .collect()
    };
    Ok(rows
        .into_iter()
        .map(|c| {
            let name = names.get(&c.customer_id).cloned();
            CommentResponse::with_author(c, name)
        })
        .collect())
}
