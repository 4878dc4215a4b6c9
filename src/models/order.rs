use crate::entities::{PaymentMethod, TransactStatus, order_detail_entity, order_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub customer_id: i32,
    pub receiver_name: String,
    pub phone: String,
    pub address: String,
    pub location_id: Option<i32>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub transact_status: TransactStatus,
    pub paid: bool,
    pub deleted: bool,
    pub promotion_id: Option<i32>,
    pub voucher_id: Option<i32>,
    pub total_money: i64,
    pub total_discount: i64,
    pub order_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    pub ship_date: Option<DateTime<Utc>>,
    /// 当前状态允许流转到的状态
    pub next_statuses: Vec<TransactStatus>,
    pub editable: bool,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            next_statuses: m.transact_status.allowed_transitions().to_vec(),
            editable: m.transact_status.is_editable() && !m.deleted,
            id: m.id,
            customer_id: m.customer_id,
            receiver_name: m.receiver_name,
            phone: m.phone,
            address: m.address,
            location_id: m.location_id,
            district: m.district,
            ward: m.ward,
            note: m.note,
            payment_method: m.payment_method,
            transact_status: m.transact_status,
            paid: m.paid,
            deleted: m.deleted,
            promotion_id: m.promotion_id,
            voucher_id: m.voucher_id,
            total_money: m.total_money,
            total_discount: m.total_discount,
            order_date: m.order_date,
            payment_date: m.payment_date,
            ship_date: m.ship_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    pub id: i32,
    pub product_detail_id: i32,
    pub product_name: String,
    pub amount: i32,
    pub price: i64,
    pub total: i64,
}

impl From<order_detail_entity::Model> for OrderDetailResponse {
    fn from(m: order_detail_entity::Model) -> Self {
        Self {
            id: m.id,
            product_detail_id: m.product_detail_id,
            product_name: m.product_name,
            amount: m.amount,
            price: m.price,
            total: m.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderWithDetails {
    pub order: OrderResponse,
    pub details: Vec<OrderDetailResponse>,
}

impl OrderWithDetails {
    pub fn new(order: order_entity::Model, details: Vec<order_detail_entity::Model>) -> Self {
        Self {
            order: order.into(),
            details: details.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<TransactStatus>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminOrderQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<TransactStatus>,
    pub paid: Option<bool>,
    /// 默认只显示未删除订单
    pub deleted: Option<bool>,
    pub customer_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<TransactStatus>,
    pub paid: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLineInput {
    pub product_detail_id: i32,
    pub amount: i32,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct EditOrderRequest {
    pub lines: Vec<OrderLineInput>,
    pub receiver_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub location_id: Option<i32>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub note: Option<String>,
}
