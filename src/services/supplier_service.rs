use crate::entities::{product_entity as products, supplier_entity as suppliers};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{optional_text, require_text, validate_email};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct SupplierService {
    pool: DatabaseConnection,
}

impl SupplierService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<SupplierResponse>> {
        let rows = suppliers::Entity::find()
            .order_by_asc(suppliers::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: i32) -> AppResult<suppliers::Model> {
        suppliers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier not found".to_string()))
    }

    pub async fn get(&self, id: i32) -> AppResult<SupplierResponse> {
        Ok(self.find(id).await?.into())
    }

    fn contact_email(req: &SupplierRequest) -> AppResult<Option<String>> {
        let email = optional_text(req.email.clone());
        if let Some(email) = &email {
            validate_email(email)?;
        }
        Ok(email)
    }

    pub async fn create(&self, req: SupplierRequest) -> AppResult<SupplierResponse> {
        let name = require_text("Supplier name", &req.name)?;
        let email = Self::contact_email(&req)?;
        let supplier = suppliers::ActiveModel {
            name: Set(name),
            phone: Set(optional_text(req.phone)),
            email: Set(email),
            address: Set(optional_text(req.address)),
            active: Set(req.active.unwrap_or(true)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(supplier.into())
    }

    pub async fn update(&self, id: i32, req: SupplierRequest) -> AppResult<SupplierResponse> {
        let supplier = self.find(id).await?;
        let name = require_text("Supplier name", &req.name)?;
        let email = Self::contact_email(&req)?;

        let mut model = supplier.into_active_model();
        model.name = Set(name);
        model.phone = Set(optional_text(req.phone));
        model.email = Set(email);
        model.address = Set(optional_text(req.address));
        if let Some(active) = req.active {
            model.active = Set(active);
        }
        Ok(model.update(&self.pool).await?.into())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let supplier = self.find(id).await?;
        let product_count = products::Entity::find()
            .filter(products::Column::SupplierId.eq(supplier.id))
            .count(&self.pool)
            .await?;
        if product_count > 0 {
            return Err(AppError::ValidationError(format!(
                "{} still supplies {product_count} product(s)",
                supplier.name
            )));
        }
        suppliers::Entity::delete_by_id(supplier.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn toggle(&self, id: i32) -> AppResult<ToggleResponse> {
        let supplier = self.find(id).await?;
        let active = !supplier.active;
        let mut model = supplier.into_active_model();
        model.active = Set(active);
        let supplier = model.update(&self.pool).await?;
        Ok(ToggleResponse {
            id: supplier.id,
            active,
        })
    }
}
