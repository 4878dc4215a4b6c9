use crate::config::AdminConfig;
use crate::entities::{account_entity as accounts, news_entity as news, role_entity as roles};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{
    hash_password, normalize_phone, optional_text, require_text, validate_email,
    validate_password, validate_phone,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

/// 后台员工账号与角色
#[derive(Clone)]
pub struct AccountService {
    pool: DatabaseConnection,
}

impl AccountService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn find(&self, id: i32) -> AppResult<accounts::Model> {
        accounts::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    async fn find_role(&self, id: i32) -> AppResult<roles::Model> {
        roles::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".to_string()))
    }

    async fn email_taken(&self, email: &str, exclude: Option<i32>) -> AppResult<bool> {
        let mut query = accounts::Entity::find().filter(accounts::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(accounts::Column::Id.ne(id));
        }
        Ok(query.count(&self.pool).await? > 0)
    }

    async fn describe(&self, account: accounts::Model) -> AppResult<AccountResponse> {
        let role = roles::Entity::find_by_id(account.role_id)
            .one(&self.pool)
            .await?;
        Ok(AccountResponse::with_role(account, role.map(|r| r.role_name)))
    }

    pub async fn list(&self) -> AppResult<Vec<AccountResponse>> {
        let role_names: HashMap<i32, String> = roles::Entity::find()
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|r| (r.id, r.role_name))
            .collect();
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|a| {
                let role_name = role_names.get(&a.role_id).cloned();
                AccountResponse::with_role(a, role_name)
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> AppResult<AccountResponse> {
        let account = self.find(id).await?;
        self.describe(account).await
    }

    pub async fn create(&self, req: CreateAccountRequest) -> AppResult<AccountResponse> {
        let full_name = require_text("Full name", &req.full_name)?;
        let email = req.email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(&req.password)?;
        let phone = match optional_text(req.phone) {
            Some(phone) => {
                let phone = normalize_phone(&phone);
                validate_phone(&phone)?;
                Some(phone)
            }
            None => None,
        };
        self.find_role(req.role_id).await?;
        if self.email_taken(&email, None).await? {
            return Err(AppError::ValidationError(
                "Email is already in use".to_string(),
            ));
        }

        let account = accounts::ActiveModel {
            full_name: Set(full_name),
            email: Set(email),
            phone: Set(phone),
            password_hash: Set(hash_password(&req.password)?),
            role_id: Set(req.role_id),
            active: Set(req.active.unwrap_or(true)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Account {} created with role {}", account.id, account.role_id);
        self.describe(account).await
    }

    pub async fn update(&self, id: i32, req: UpdateAccountRequest) -> AppResult<AccountResponse> {
        let account = self.find(id).await?;
        let mut model = account.into_active_model();

        if let Some(name) = req.full_name {
            model.full_name = Set(require_text("Full name", &name)?);
        }
        if let Some(email) = req.email {
            let email = email.trim().to_lowercase();
            validate_email(&email)?;
            if self.email_taken(&email, Some(id)).await? {
                return Err(AppError::ValidationError(
                    "Email is already in use".to_string(),
                ));
            }
            model.email = Set(email);
        }
        if let Some(phone) = req.phone {
            model.phone = Set(match optional_text(Some(phone)) {
                Some(phone) => {
                    let phone = normalize_phone(&phone);
                    validate_phone(&phone)?;
                    Some(phone)
                }
                None => None,
            });
        }
        if let Some(password) = optional_text(req.password) {
            validate_password(&password)?;
            model.password_hash = Set(hash_password(&password)?);
        }
        if let Some(role_id) = req.role_id {
            self.find_role(role_id).await?;
            model.role_id = Set(role_id);
        }
        if let Some(active) = req.active {
            model.active = Set(active);
        }

        let account = model.update(&self.pool).await?;
        self.describe(account).await
    }

    /// 不能删除当前登录的账号；发过新闻的账号只能停用
    pub async fn delete(&self, id: i32, current_account_id: i32) -> AppResult<()> {
        if id == current_account_id {
            return Err(AppError::ValidationError(
                "You cannot delete your own account".to_string(),
            ));
        }
        let account = self.find(id).await?;
        let authored = news::Entity::find()
            .filter(news::Column::AccountId.eq(account.id))
            .count(&self.pool)
            .await?;
        if authored > 0 {
            return Err(AppError::Conflict(
                "Account has authored news; deactivate it instead".to_string(),
            ));
        }
        accounts::Entity::delete_by_id(account.id)
            .exec(&self.pool)
            .await?;
        log::info!("Account {} deleted", account.id);
        Ok(())
    }

    pub async fn toggle(&self, id: i32, current_account_id: i32) -> AppResult<ToggleResponse> {
        if id == current_account_id {
            return Err(AppError::ValidationError(
                "You cannot deactivate your own account".to_string(),
            ));
        }
        let account = self.find(id).await?;
        let active = !account.active;
        let mut model = account.into_active_model();
        model.active = Set(active);
        let account = model.update(&self.pool).await?;
        Ok(ToggleResponse {
            id: account.id,
            active,
        })
    }

    // ---- 角色 ----

    pub async fn list_roles(&self) -> AppResult<Vec<RoleResponse>> {
        let rows = roles::Entity::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_role(&self, id: i32) -> AppResult<RoleResponse> {
        Ok(self.find_role(id).await?.into())
    }

    pub async fn create_role(&self, req: RoleRequest) -> AppResult<RoleResponse> {
        let role = roles::ActiveModel {
            role_name: Set(require_text("Role name", &req.role_name)?),
            description: Set(optional_text(req.description)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(role.into())
    }

    pub async fn update_role(&self, id: i32, req: RoleRequest) -> AppResult<RoleResponse> {
        let role = self.find_role(id).await?;
        let mut model = role.into_active_model();
        model.role_name = Set(require_text("Role name", &req.role_name)?);
        model.description = Set(optional_text(req.description));
        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn delete_role(&self, id: i32) -> AppResult<()> {
        let role = self.find_role(id).await?;
        let in_use = accounts::Entity::find()
            .filter(accounts::Column::RoleId.eq(role.id))
            .count(&self.pool)
            .await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Role {} is assigned to {in_use} account(s)",
                role.role_name
            )));
        }
        roles::Entity::delete_by_id(role.id).exec(&self.pool).await?;
        Ok(())
    }

    /// 启动时：没有任何后台账号且配置了初始邮箱密码，则创建超级管理员
    pub async fn ensure_bootstrap_admin(&self, config: &AdminConfig) -> AppResult<Option<i32>> {
        let (Some(email), Some(password)) = (
            optional_text(config.bootstrap_email.clone()),
            optional_text(config.bootstrap_password.clone()),
        ) else {
            return Ok(None);
        };
        if accounts::Entity::find().count(&self.pool).await? > 0 {
            return Ok(None);
        }

        let account = self
            .create(CreateAccountRequest {
                full_name: "Administrator".to_string(),
                email,
                phone: None,
                password,
                role_id: config.super_admin_role_id,
                active: Some(true),
            })
            .await?;
        log::warn!(
            "Bootstrap administrator {} created; change its password",
            account.email
        );
        Ok(Some(account.id))
    }
}
