use crate::cart::CartSlot;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 购物车中一行（已按最新库存与价格核对）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CartLine {
    pub product_detail_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub alias: String,
    pub thumb: Option<String>,
    pub size_name: Option<String>,
    pub color_name: Option<String>,
    pub unit_price: i64,
    pub amount: i32,
    pub line_total: i64,
    pub stock: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub slot: CartSlot,
    pub lines: Vec<CartLine>,
    pub total_items: i32,
    pub subtotal: i64,
    /// 被自动移除的商品提示
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItemInput {
    pub product_detail_id: i32,
    #[schema(example = 1)]
    pub amount: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    /// 0 表示移除
    pub amount: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncCartRequest {
    pub items: Vec<CartItemInput>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CartSlotQuery {
    pub slot: Option<CartSlot>,
}
