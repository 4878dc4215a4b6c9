pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod content;
pub mod loyalty;
pub mod order;
pub mod upload;

pub use account::account_config;
pub use admin::admin_config;
pub use auth::auth_config;
pub use cart::cart_config;
pub use catalog::{catalog_config, category_page_config};
pub use checkout::checkout_config;
pub use content::content_config;
pub use loyalty::loyalty_config;
pub use order::order_config;

use crate::error::AppResult;
use actix_web::{HttpResponse, ResponseError, Result};
use serde::Serialize;
use serde_json::json;

/// 统一响应包装：`{ success, data, message }`
pub fn respond<T: Serialize>(result: AppResult<T>, message: Option<&str>) -> Result<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": data,
            "message": message
        }))),
        Err(e) => Ok(e.error_response()),
    }
}
