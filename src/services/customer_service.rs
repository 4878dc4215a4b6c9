use crate::entities::{
    check_in_entity as check_ins, comment_entity as comments, customer_entity as customers,
    location_entity as locations, order_entity as orders, reward_entity as rewards,
    user_promotion_entity as usage,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{
    hash_password, normalize_phone, optional_text, require_text, validate_password,
    validate_phone, verify_password,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct CustomerService {
    pool: DatabaseConnection,
}

impl CustomerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn find(&self, customer_id: i32) -> AppResult<customers::Model> {
        customers::Entity::find_by_id(customer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
    }

    pub async fn profile(&self, customer_id: i32) -> AppResult<CustomerResponse> {
        Ok(self.find(customer_id).await?.into())
    }

    pub async fn update_profile(
        &self,
        customer_id: i32,
        req: UpdateProfileRequest,
    ) -> AppResult<CustomerResponse> {
        let customer = self.find(customer_id).await?;
        let mut model = customer.into_active_model();

        if let Some(name) = req.full_name {
            model.full_name = Set(require_text("Full name", &name)?);
        }
        if let Some(phone) = req.phone {
            let phone = normalize_phone(&phone);
            validate_phone(&phone)?;
            let taken = customers::Entity::find()
                .filter(customers::Column::Phone.eq(phone.clone()))
                .filter(customers::Column::Id.ne(customer_id))
                .count(&self.pool)
                .await?;
            if taken > 0 {
                return Err(AppError::ValidationError(
                    "Phone number is already registered".to_string(),
                ));
            }
            model.phone = Set(Some(phone));
        }
        if let Some(location_id) = req.location_id {
            if locations::Entity::find_by_id(location_id)
                .one(&self.pool)
                .await?
                .is_none()
            {
                return Err(AppError::ValidationError("Location not found".to_string()));
            }
            model.location_id = Set(Some(location_id));
        }
        if req.birthday.is_some() {
            model.birthday = Set(req.birthday);
        }
        if req.address.is_some() {
            model.address = Set(optional_text(req.address));
        }
        if req.district.is_some() {
            model.district = Set(optional_text(req.district));
        }
        if req.ward.is_some() {
            model.ward = Set(optional_text(req.ward));
        }

        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn change_password(
        &self,
        customer_id: i32,
        req: ChangePasswordRequest,
    ) -> AppResult<()> {
        let customer = self.find(customer_id).await?;
        if !verify_password(&req.current_password, &customer.password_hash)? {
            return Err(AppError::ValidationError(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password(&req.new_password)?;

        let mut model = customer.into_active_model();
        model.password_hash = Set(hash_password(&req.new_password)?);
        model.update(&self.pool).await?;
        log::info!("Customer {customer_id} changed password");
        Ok(())
    }

    pub async fn set_avatar(&self, customer_id: i32, path: String) -> AppResult<CustomerResponse> {
        let customer = self.find(customer_id).await?;
        let mut model = customer.into_active_model();
        model.avatar = Set(Some(path));
        Ok(model.update(&self.pool).await?.into())
    }

    // ---- 后台 ----

    pub async fn list(
        &self,
        query: &AdminCustomerQuery,
    ) -> AppResult<PaginatedResponse<CustomerResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut base = customers::Entity::find();
        if let Some(active) = query.active {
            base = base.filter(customers::Column::Active.eq(active));
        }
        if let Some(search) = optional_text(query.search.clone()) {
            base = base.filter(
                Condition::any()
                    .add(customers::Column::FullName.contains(&search))
                    .add(customers::Column::Email.contains(&search))
                    .add(customers::Column::Phone.contains(&search)),
            );
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let rows = base
            .order_by_desc(customers::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::from_params(
            rows.into_iter().map(CustomerResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get(&self, customer_id: i32) -> AppResult<AdminCustomerDetail> {
        let customer = self.find(customer_id).await?;
        let order_count = orders::Entity::find()
            .filter(orders::Column::CustomerId.eq(customer.id))
            .filter(orders::Column::Deleted.eq(false))
            .count(&self.pool)
            .await? as i64;
        Ok(AdminCustomerDetail {
            customer: customer.into(),
            order_count,
        })
    }

    pub async fn toggle(&self, customer_id: i32) -> AppResult<ToggleResponse> {
        let customer = self.find(customer_id).await?;
        let active = !customer.active;
        let mut model = customer.into_active_model();
        model.active = Set(active);
        let customer = model.update(&self.pool).await?;
        log::info!("Customer {} active = {active}", customer.id);
        Ok(ToggleResponse {
            id: customer.id,
            active,
        })
    }

    /// 有订单的客户不能删除（可停用）；否则连同其优惠使用、签到、兑换、评论一起删除
    pub async fn delete(&self, customer_id: i32) -> AppResult<()> {
        let customer = self.find(customer_id).await?;
        let order_count = orders::Entity::find()
            .filter(orders::Column::CustomerId.eq(customer.id))
            .count(&self.pool)
            .await?;
        if order_count > 0 {
            return Err(AppError::ValidationError(format!(
                "{} has {order_count} order(s) and cannot be deleted; deactivate the account instead",
                customer.full_name
            )));
        }

        let txn = self.pool.begin().await?;
        usage::Entity::delete_many()
            .filter(usage::Column::CustomerId.eq(customer.id))
            .exec(&txn)
            .await?;
        check_ins::Entity::delete_many()
            .filter(check_ins::Column::CustomerId.eq(customer.id))
            .exec(&txn)
            .await?;
        rewards::Entity::delete_many()
            .filter(rewards::Column::CustomerId.eq(customer.id))
            .exec(&txn)
            .await?;
        comments::Entity::delete_many()
            .filter(comments::Column::CustomerId.eq(customer.id))
            .exec(&txn)
            .await?;
        customers::Entity::delete_by_id(customer.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        log::info!("Customer {} deleted", customer.id);
        Ok(())
    }
}
