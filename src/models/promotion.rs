use crate::entities::promotion_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromotionResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_usage_per_user: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub product_ids: Vec<i32>,
}

impl PromotionResponse {
    pub fn with_products(m: promotion_entity::Model, product_ids: Vec<i32>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            discount_percent: m.discount_percent,
            start_date: m.start_date,
            end_date: m.end_date,
            max_usage_per_user: m.max_usage_per_user,
            active: m.active,
            created_at: m.created_at,
            product_ids,
        }
    }
}

/// 批量创建促销：指定商品列表，或指定分类下的全部商品
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePromotionRequest {
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 15)]
    pub discount_percent: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[schema(example = 1)]
    pub max_usage_per_user: i32,
    pub active: Option<bool>,
    #[serde(default)]
    pub product_ids: Vec<i32>,
    pub cat_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePromotionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub discount_percent: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_usage_per_user: Option<i32>,
    pub active: Option<bool>,
    /// 提供时整体替换商品列表
    pub product_ids: Option<Vec<i32>>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PromotionQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub active: Option<bool>,
}
