use crate::entities::{account_entity, role_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role_id: i32,
    pub role_name: Option<String>,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AccountResponse {
    pub fn with_role(m: account_entity::Model, role_name: Option<String>) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            phone: m.phone,
            role_id: m.role_id,
            role_name,
            active: m.active,
            last_login: m.last_login,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin@shop.vn")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminAuthResponse {
    pub account: AccountResponse,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role_id: i32,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// 为空则不修改密码
    pub password: Option<String>,
    pub role_id: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    pub role_name: String,
    pub description: Option<String>,
}

impl From<role_entity::Model> for RoleResponse {
    fn from(m: role_entity::Model) -> Self {
        Self {
            id: m.id,
            role_name: m.role_name,
            description: m.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleRequest {
    pub role_name: String,
    pub description: Option<String>,
}
