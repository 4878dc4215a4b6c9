use crate::entities::{account_entity as accounts, customer_entity as customers, role_entity as roles};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};

const INVALID_CREDENTIALS: &str = "Incorrect login or password";

/// 客户注册 / 登录与后台登录
#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt_service
    }

    fn customer_auth(&self, customer: customers::Model) -> AppResult<CustomerAuthResponse> {
        let token = self
            .jwt_service
            .generate_customer_token(customer.id, &customer.email)?;
        Ok(CustomerAuthResponse {
            customer: customer.into(),
            token,
            expires_in: self.jwt_service.customer_token_expires_in(),
        })
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<CustomerAuthResponse> {
        let full_name = require_text("Full name", &request.full_name)?;
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;
        let phone = normalize_phone(&request.phone);
        validate_phone(&phone)?;
        validate_password(&request.password)?;

        let email_taken = customers::Entity::find()
            .filter(customers::Column::Email.eq(email.clone()))
            .count(&self.pool)
            .await?;
        if email_taken > 0 {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ));
        }
        let phone_taken = customers::Entity::find()
            .filter(customers::Column::Phone.eq(phone.clone()))
            .count(&self.pool)
            .await?;
        if phone_taken > 0 {
            return Err(AppError::ValidationError(
                "Phone number is already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let customer = customers::ActiveModel {
            full_name: Set(full_name),
            email: Set(email),
            phone: Set(Some(phone)),
            password_hash: Set(hash_password(&request.password)?),
            active: Set(true),
            points: Set(0),
            check_in_streak: Set(0),
            created_at: Set(now),
            last_login: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Customer {} registered", customer.id);
        self.customer_auth(customer)
    }

    /// 邮箱或手机号登录
    pub async fn login(&self, request: LoginRequest) -> AppResult<CustomerAuthResponse> {
        let login = request.login.trim();
        let query = if login.contains('@') {
            customers::Entity::find().filter(customers::Column::Email.eq(login.to_lowercase()))
        } else {
            customers::Entity::find().filter(customers::Column::Phone.eq(normalize_phone(login)))
        };
        let customer = query
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &customer.password_hash)? {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }
        if !customer.active {
            return Err(AppError::AuthError(
                "This account has been disabled".to_string(),
            ));
        }

        let mut model = customer.into_active_model();
        model.last_login = Set(Some(Utc::now()));
        let customer = model.update(&self.pool).await?;

        self.customer_auth(customer)
    }

    pub async fn admin_login(&self, request: AdminLoginRequest) -> AppResult<AdminAuthResponse> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(request.email.trim().to_lowercase()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &account.password_hash)? {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }
        if !account.active {
            return Err(AppError::AuthError(
                "This account has been disabled".to_string(),
            ));
        }

        let role = roles::Entity::find_by_id(account.role_id)
            .one(&self.pool)
            .await?;

        let mut model = account.into_active_model();
        model.last_login = Set(Some(Utc::now()));
        let account = model.update(&self.pool).await?;

        let token = self
            .jwt_service
            .generate_admin_token(account.id, &account.email, account.role_id)?;
        log::info!("Account {} signed in", account.id);

        Ok(AdminAuthResponse {
            account: AccountResponse::with_role(account, role.map(|r| r.role_name)),
            token,
            expires_in: self.jwt_service.admin_token_expires_in(),
        })
    }
}
