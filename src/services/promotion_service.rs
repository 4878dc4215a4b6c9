use crate::entities::{
    product_entity as products, promotion_entity as promotions,
    promotion_product_entity as promotion_products, user_promotion_entity as usage,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{optional_text, require_text};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone)]
pub struct PromotionService {
    pool: DatabaseConnection,
}

fn validate_terms(
    discount_percent: i32,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    max_usage_per_user: i32,
) -> AppResult<()> {
    if !(1..=100).contains(&discount_percent) {
        return Err(AppError::ValidationError(
            "Discount percent must be between 1 and 100".to_string(),
        ));
    }
    if start_date >= end_date {
        return Err(AppError::ValidationError(
            "End date must be after start date".to_string(),
        ));
    }
    if max_usage_per_user < 1 {
        return Err(AppError::ValidationError(
            "Usage per customer must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl PromotionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn product_ids_of(&self, promotion_ids: &[i32]) -> AppResult<HashMap<i32, Vec<i32>>> {
        let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
        if promotion_ids.is_empty() {
            return Ok(map);
        }
        let links = promotion_products::Entity::find()
            .filter(promotion_products::Column::PromotionId.is_in(promotion_ids.to_vec()))
            .order_by_asc(promotion_products::Column::ProductId)
            .all(&self.pool)
            .await?;
        for link in links {
            map.entry(link.promotion_id).or_default().push(link.product_id);
        }
        Ok(map)
    }

    pub async fn list(
        &self,
        query: &PromotionQuery,
    ) -> AppResult<PaginatedResponse<PromotionResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut base = promotions::Entity::find();
        if let Some(active) = query.active {
            base = base.filter(promotions::Column::Active.eq(active));
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let rows = base
            .order_by_desc(promotions::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
        let mut products_by_promotion = self.product_ids_of(&ids).await?;

        let items = rows
            .into_iter()
            .map(|p| {
                let product_ids = products_by_promotion.remove(&p.id).unwrap_or_default();
                PromotionResponse::with_products(p, product_ids)
            })
            .collect();
        Ok(PaginatedResponse::from_params(items, &params, total))
    }

    async fn find(&self, id: i32) -> AppResult<promotions::Model> {
        promotions::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Promotion not found".to_string()))
    }

    pub async fn get(&self, id: i32) -> AppResult<PromotionResponse> {
        let promotion = self.find(id).await?;
        let product_ids = self
            .product_ids_of(&[promotion.id])
            .await?
            .remove(&promotion.id)
            .unwrap_or_default();
        Ok(PromotionResponse::with_products(promotion, product_ids))
    }

    /// 校验商品是否存在，返回去重后的列表
    async fn existing_products(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        let wanted: BTreeSet<i32> = ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }
        let found: BTreeSet<i32> = products::Entity::find()
            .filter(products::Column::Id.is_in(wanted.iter().copied().collect::<Vec<_>>()))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if let Some(missing) = wanted.difference(&found).next() {
            return Err(AppError::ValidationError(format!(
                "Product {missing} not found"
            )));
        }
        Ok(found.into_iter().collect())
    }

    /// 一次创建促销及其商品列表（指定商品或整个分类）
    pub async fn create_bulk(&self, req: CreatePromotionRequest) -> AppResult<PromotionResponse> {
        let name = require_text("Promotion name", &req.name)?;
        validate_terms(
            req.discount_percent,
            req.start_date,
            req.end_date,
            req.max_usage_per_user,
        )?;

        let product_ids = match req.cat_id {
            Some(cat_id) => products::Entity::find()
                .filter(products::Column::CatId.eq(cat_id))
                .order_by_asc(products::Column::Id)
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect(),
            None => self.existing_products(&req.product_ids).await?,
        };
        if product_ids.is_empty() {
            return Err(AppError::ValidationError(
                "A promotion needs at least one product".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let promotion = promotions::ActiveModel {
            name: Set(name),
            description: Set(optional_text(req.description)),
            discount_percent: Set(req.discount_percent),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            max_usage_per_user: Set(req.max_usage_per_user),
            active: Set(req.active.unwrap_or(true)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        link_products(&txn, promotion.id, &product_ids).await?;
        txn.commit().await?;

        log::info!(
            "Promotion {} created for {} product(s)",
            promotion.id,
            product_ids.len()
        );
        Ok(PromotionResponse::with_products(promotion, product_ids))
    }

    pub async fn update(&self, id: i32, req: UpdatePromotionRequest) -> AppResult<PromotionResponse> {
        let promotion = self.find(id).await?;
        validate_terms(
            req.discount_percent.unwrap_or(promotion.discount_percent),
            req.start_date.unwrap_or(promotion.start_date),
            req.end_date.unwrap_or(promotion.end_date),
            req.max_usage_per_user.unwrap_or(promotion.max_usage_per_user),
        )?;
        let product_ids = match &req.product_ids {
            Some(ids) => {
                let ids = self.existing_products(ids).await?;
                if ids.is_empty() {
                    return Err(AppError::ValidationError(
                        "A promotion needs at least one product".to_string(),
                    ));
                }
                Some(ids)
            }
            None => None,
        };

        let txn = self.pool.begin().await?;
        let mut model = promotion.into_active_model();
        if let Some(name) = req.name {
            model.name = Set(require_text("Promotion name", &name)?);
        }
        if req.description.is_some() {
            model.description = Set(optional_text(req.description));
        }
        if let Some(v) = req.discount_percent {
            model.discount_percent = Set(v);
        }
        if let Some(v) = req.start_date {
            model.start_date = Set(v);
        }
        if let Some(v) = req.end_date {
            model.end_date = Set(v);
        }
        if let Some(v) = req.max_usage_per_user {
            model.max_usage_per_user = Set(v);
        }
        if let Some(v) = req.active {
            model.active = Set(v);
        }
        let promotion = model.update(&txn).await?;

        if let Some(ids) = &product_ids {
            promotion_products::Entity::delete_many()
                .filter(promotion_products::Column::PromotionId.eq(promotion.id))
                .exec(&txn)
                .await?;
            link_products(&txn, promotion.id, ids).await?;
        }
        txn.commit().await?;

        self.get(promotion.id).await
    }

    /// 已被订单使用的促销只能停用，不能删除
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let promotion = self.find(id).await?;
        let used = usage::Entity::find()
            .filter(usage::Column::PromotionId.eq(promotion.id))
            .filter(usage::Column::UsedDate.is_not_null())
            .count(&self.pool)
            .await?;
        if used > 0 {
            return Err(AppError::ValidationError(format!(
                "{} has been used {used} time(s); deactivate it instead",
                promotion.name
            )));
        }

        let txn = self.pool.begin().await?;
        promotion_products::Entity::delete_many()
            .filter(promotion_products::Column::PromotionId.eq(promotion.id))
            .exec(&txn)
            .await?;
        usage::Entity::delete_many()
            .filter(usage::Column::PromotionId.eq(promotion.id))
            .exec(&txn)
            .await?;
        promotions::Entity::delete_by_id(promotion.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn toggle(&self, id: i32) -> AppResult<ToggleResponse> {
        let promotion = self.find(id).await?;
        let active = !promotion.active;
        let mut model = promotion.into_active_model();
        model.active = Set(active);
        let promotion = model.update(&self.pool).await?;
        Ok(ToggleResponse {
            id: promotion.id,
            active,
        })
    }
}

async fn link_products<C: ConnectionTrait>(
    conn: &C,
    promotion_id: i32,
    product_ids: &[i32],
) -> AppResult<()> {
    if product_ids.is_empty() {
        return Ok(());
    }
    let rows = product_ids.iter().map(|product_id| promotion_products::ActiveModel {
        promotion_id: Set(promotion_id),
        product_id: Set(*product_id),
        ..Default::default()
    });
    promotion_products::Entity::insert_many(rows)
        .exec(conn)
        .await?;
    Ok(())
}
