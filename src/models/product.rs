use super::{ProductResponse, VariantResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminProductQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub cat_id: Option<i32>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

/// 新建 / 编辑商品
///
/// size_ids × color_ids 的笛卡尔积生成全部变体，每个变体库存为 default_stock；
/// 编辑时整体替换原有变体。
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub product_name: String,
    pub short_desc: Option<String>,
    pub description: Option<String>,
    pub cat_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub price: i64,
    #[serde(default)]
    pub discount: i32,
    pub thumb: Option<String>,
    #[serde(default)]
    pub best_seller: bool,
    #[serde(default)]
    pub home_flag: bool,
    pub active: Option<bool>,
    pub tags: Option<String>,
    pub alias: Option<String>,
    pub meta_title: Option<String>,
    pub meta_desc: Option<String>,
    pub meta_key: Option<String>,
    #[serde(default)]
    pub size_ids: Vec<i32>,
    #[serde(default)]
    pub color_ids: Vec<i32>,
    #[serde(default)]
    pub default_stock: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminProductResponse {
    pub product: ProductResponse,
    pub variants: Vec<VariantResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetVariantStockRequest {
    pub stock: i32,
}
