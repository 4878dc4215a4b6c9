use crate::entities::TransactStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: TransactStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LowStockVariant {
    pub product_detail_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub stock: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub customers: i64,
    pub products: i64,
    pub orders: i64,
    pub orders_by_status: Vec<StatusCount>,
    /// 已完成且已付款订单的总额
    pub revenue: i64,
    pub low_stock: Vec<LowStockVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub orders: i64,
    pub revenue: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RevenueQuery {
    /// 默认 30 天
    pub days: Option<u32>,
}
