use crate::entities::{DiscountType, voucher_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoucherResponse {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub max_discount: Option<i64>,
    pub min_order_value: i64,
    pub max_usage: i32,
    pub used_count: i32,
    pub max_usage_per_user: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<voucher_entity::Model> for VoucherResponse {
    fn from(m: voucher_entity::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            description: m.description,
            discount_type: m.discount_type,
            discount_value: m.discount_value,
            max_discount: m.max_discount,
            min_order_value: m.min_order_value,
            max_usage: m.max_usage,
            used_count: m.used_count,
            max_usage_per_user: m.max_usage_per_user,
            start_date: m.start_date,
            end_date: m.end_date,
            active: m.active,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoucherRequest {
    /// 为空时自动生成
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub max_discount: Option<i64>,
    #[serde(default)]
    pub min_order_value: i64,
    pub max_usage: i32,
    pub max_usage_per_user: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVoucherBatchRequest {
    #[schema(example = 50)]
    pub count: u32,
    #[schema(example = "SALE")]
    pub prefix: String,
    pub voucher: VoucherRequest,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct VoucherQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub active: Option<bool>,
    pub search: Option<String>,
}
