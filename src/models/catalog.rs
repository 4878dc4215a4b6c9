use crate::entities::{
    category_entity, color_entity, comment_entity, location_entity, product_entity, size_entity,
    supplier_entity,
};
use crate::services::pricing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    BestSeller,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub cat_id: Option<i32>,
    /// 分类别名，与 cat_id 二选一
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub size_id: Option<i32>,
    pub color_id: Option<i32>,
    pub sort: Option<ProductSort>,
}

/// 列表页商品卡片
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: i32,
    pub product_name: String,
    pub alias: String,
    pub thumb: Option<String>,
    pub cat_id: Option<i32>,
    pub price: i64,
    pub discount: i32,
    /// 折后单价
    pub sale_price: i64,
    pub units_in_stock: i32,
    pub best_seller: bool,
    pub active: bool,
}

impl From<product_entity::Model> for ProductSummary {
    fn from(m: product_entity::Model) -> Self {
        Self {
            sale_price: pricing::unit_price(m.price, m.discount),
            id: m.id,
            product_name: m.product_name,
            alias: m.alias,
            thumb: m.thumb,
            cat_id: m.cat_id,
            price: m.price,
            discount: m.discount,
            units_in_stock: m.units_in_stock,
            best_seller: m.best_seller,
            active: m.active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub product_name: String,
    pub short_desc: Option<String>,
    pub description: Option<String>,
    pub cat_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub price: i64,
    pub discount: i32,
    pub sale_price: i64,
    pub thumb: Option<String>,
    pub best_seller: bool,
    pub home_flag: bool,
    pub active: bool,
    pub tags: Option<String>,
    pub alias: String,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    pub units_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_entity::Model> for ProductResponse {
    fn from(m: product_entity::Model) -> Self {
        Self {
            sale_price: pricing::unit_price(m.price, m.discount),
            id: m.id,
            product_name: m.product_name,
            short_desc: m.short_desc,
            description: m.description,
            cat_id: m.cat_id,
            supplier_id: m.supplier_id,
            price: m.price,
            discount: m.discount,
            thumb: m.thumb,
            best_seller: m.best_seller,
            home_flag: m.home_flag,
            active: m.active,
            tags: m.tags,
            alias: m.alias,
            meta_title: m.meta_title,
            meta_desc: m.meta_desc,
            meta_key: m.meta_key,
            units_in_stock: m.units_in_stock,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VariantResponse {
    pub id: i32,
    pub product_id: i32,
    pub size_id: Option<i32>,
    pub size_name: Option<String>,
    pub color_id: Option<i32>,
    pub color_name: Option<String>,
    pub color_code: Option<String>,
    pub stock: i32,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailResponse {
    pub product: ProductResponse,
    pub category: Option<CategoryResponse>,
    pub variants: Vec<VariantResponse>,
    pub related: Vec<ProductSummary>,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub cat_name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub levels: i32,
    pub ordering: i32,
    pub published: bool,
    pub thumb: Option<String>,
    pub alias: String,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
}

impl From<category_entity::Model> for CategoryResponse {
    fn from(m: category_entity::Model) -> Self {
        Self {
            id: m.id,
            cat_name: m.cat_name,
            description: m.description,
            parent_id: m.parent_id,
            levels: m.levels,
            ordering: m.ordering,
            published: m.published,
            thumb: m.thumb,
            alias: m.alias,
            meta_title: m.meta_title,
            meta_desc: m.meta_desc,
            meta_key: m.meta_key,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub cat_name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub levels: Option<i32>,
    pub ordering: Option<i32>,
    pub published: Option<bool>,
    pub thumb: Option<String>,
    /// 为空时根据名称生成
    pub alias: Option<String>,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryProductsResponse {
    pub category: CategoryResponse,
    pub products: super::PaginatedResponse<ProductSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupplierResponse {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<supplier_entity::Model> for SupplierResponse {
    fn from(m: supplier_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            email: m.email,
            address: m.address,
            active: m.active,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupplierRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SizeResponse {
    pub id: i32,
    pub name: String,
}

impl From<size_entity::Model> for SizeResponse {
    fn from(m: size_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColorResponse {
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
}

impl From<color_entity::Model> for ColorResponse {
    fn from(m: color_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SizeRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ColorRequest {
    pub name: String,
    #[schema(example = "#1E88E5")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationResponse {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub levels: i32,
    pub slug: Option<String>,
}

impl From<location_entity::Model> for LocationResponse {
    fn from(m: location_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            parent_id: m.parent_id,
            levels: m.levels,
            slug: m.slug,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationQuery {
    /// 为空时返回顶级地区
    pub parent_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub customer_id: i32,
    pub customer_name: Option<String>,
    pub product_id: i32,
    pub content: String,
    pub rating: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn with_author(m: comment_entity::Model, customer_name: Option<String>) -> Self {
        Self {
            id: m.id,
            customer_id: m.customer_id,
            customer_name,
            product_id: m.product_id,
            content: m.content,
            rating: m.rating,
            active: m.active,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
    #[schema(example = 5)]
    pub rating: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub product_id: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HomeResponse {
    pub categories: Vec<CategoryResponse>,
    pub home_products: Vec<ProductSummary>,
    pub best_sellers: Vec<ProductSummary>,
    pub hot_news: Vec<super::NewsSummary>,
}
