use crate::entities::customer_entity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub location_id: Option<i32>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub active: bool,
    pub points: i64,
    pub check_in_streak: i32,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<customer_entity::Model> for CustomerResponse {
    fn from(m: customer_entity::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            phone: m.phone,
            birthday: m.birthday,
            avatar: m.avatar,
            address: m.address,
            location_id: m.location_id,
            district: m.district,
            ward: m.ward,
            active: m.active,
            points: m.points,
            check_in_streak: m.check_in_streak,
            created_at: m.created_at,
            last_login: m.last_login,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Nguyen Van A")]
    pub full_name: String,
    #[schema(example = "customer@shop.vn")]
    pub email: String,
    #[schema(example = "0912345678")]
    pub phone: String,
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 邮箱或手机号
    #[schema(example = "customer@shop.vn")]
    pub login: String,
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerAuthResponse {
    pub customer: CustomerResponse,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "1995-08-20")]
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub location_id: Option<i32>,
    pub district: Option<String>,
    pub ward: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCustomerQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// 按姓名 / 邮箱 / 手机号搜索
    pub search: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCustomerDetail {
    pub customer: CustomerResponse,
    pub order_count: i64,
}
