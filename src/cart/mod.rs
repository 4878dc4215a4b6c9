//! 购物车状态：Cookie / 会话存储、按所有者加锁、读取时的库存核对

mod locks;
pub mod reconcile;
mod session;
mod simple_cart;
mod store;

pub use locks::CartLocks;
pub use reconcile::{ReconciledCart, RemovalReason, RemovedLine, VariantSnapshot, reconcile};
pub use session::SessionCartStore;
pub use simple_cart::{SimpleCart, SimpleCartItem};
pub use store::{
    BUY_NOW_COOKIE_PREFIX, CartStorage, CartStore, CookieCartStore, GUEST_BUY_NOW_COOKIE,
    GUEST_STANDING_COOKIE, SESSION_COOKIE, STANDING_COOKIE_PREFIX, SaveOutcome,
};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 购物车所有者：登录客户或匿名会话
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartOwner {
    Customer(i32),
    Guest(String),
}

impl CartOwner {
    pub fn customer_id(&self) -> Option<i32> {
        match self {
            CartOwner::Customer(id) => Some(*id),
            CartOwner::Guest(_) => None,
        }
    }
}

/// 常规购物车或"立即购买"购物车（1 小时有效）
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CartSlot {
    #[default]
    Standing,
    BuyNow,
}
