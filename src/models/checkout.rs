use super::CartLine;
use crate::cart::CartSlot;
use crate::entities::PaymentMethod;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CheckoutQuery {
    /// standing（默认）或 buy_now
    pub source: Option<CartSlot>,
    pub voucher_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AppliedPromotion {
    pub promotion_id: i32,
    pub name: String,
    pub discount_percent: i32,
    pub discount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoucherEvaluation {
    pub code: String,
    pub applicable: bool,
    pub discount: i64,
    /// 不可用原因
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutPreviewResponse {
    pub source: CartSlot,
    pub lines: Vec<CartLine>,
    pub subtotal: i64,
    pub promotions: Vec<AppliedPromotion>,
    pub promotion_discount: i64,
    pub voucher: Option<VoucherEvaluation>,
    pub total_discount: i64,
    pub total: i64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailableVoucherQuery {
    /// 促销前小计
    pub subtotal: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailableVoucher {
    pub voucher: super::VoucherResponse,
    /// 以给定小计计算的优惠金额
    pub discount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub source: CartSlot,
    pub receiver_name: String,
    pub phone: String,
    pub address: String,
    pub location_id: i32,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub voucher_code: Option<String>,
}
