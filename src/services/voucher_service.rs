use crate::entities::{
    DiscountType, reward_entity as rewards, user_promotion_entity as usage,
    voucher_entity as vouchers,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{generate_voucher_code, optional_text};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashSet;

const CODE_LENGTH: usize = 8;
const MAX_BATCH: u32 = 1000;

#[derive(Clone)]
pub struct VoucherService {
    pool: DatabaseConnection,
}

fn validate_request(req: &VoucherRequest) -> AppResult<()> {
    if req.discount_value <= 0 {
        return Err(AppError::ValidationError(
            "Discount value must be greater than 0".to_string(),
        ));
    }
    if req.discount_type == DiscountType::Percent && req.discount_value > 100 {
        return Err(AppError::ValidationError(
            "Percent discount cannot exceed 100".to_string(),
        ));
    }
    if req.max_discount.is_some_and(|m| m < 0) || req.min_order_value < 0 {
        return Err(AppError::ValidationError(
            "Amounts cannot be negative".to_string(),
        ));
    }
    if req.max_usage < 1 || req.max_usage_per_user < 1 {
        return Err(AppError::ValidationError(
            "Usage limits must be at least 1".to_string(),
        ));
    }
    if req.start_date >= req.end_date {
        return Err(AppError::ValidationError(
            "End date must be after start date".to_string(),
        ));
    }
    Ok(())
}

fn new_voucher(code: String, req: &VoucherRequest) -> vouchers::ActiveModel {
    vouchers::ActiveModel {
        code: Set(code),
        description: Set(optional_text(req.description.clone())),
        discount_type: Set(req.discount_type),
        discount_value: Set(req.discount_value),
        max_discount: Set(req.max_discount),
        min_order_value: Set(req.min_order_value),
        max_usage: Set(req.max_usage),
        used_count: Set(0),
        max_usage_per_user: Set(req.max_usage_per_user),
        start_date: Set(req.start_date),
        end_date: Set(req.end_date),
        active: Set(req.active.unwrap_or(true)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

async fn code_taken<C: ConnectionTrait>(conn: &C, code: &str, exclude: Option<i32>) -> AppResult<bool> {
    let mut query = vouchers::Entity::find().filter(vouchers::Column::Code.eq(code));
    if let Some(id) = exclude {
        query = query.filter(vouchers::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

/// 生成数据库中不存在的优惠券码
pub(crate) async fn fresh_code<C: ConnectionTrait>(
    conn: &C,
    prefix: &str,
    reserved: &HashSet<String>,
) -> AppResult<String> {
    for _ in 0..20 {
        let code = generate_voucher_code(prefix, CODE_LENGTH);
        if !reserved.contains(&code) && !code_taken(conn, &code, None).await? {
            return Ok(code);
        }
    }
    Err(AppError::InternalError(
        "Unable to generate a unique voucher code".to_string(),
    ))
}

impl VoucherService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &VoucherQuery) -> AppResult<PaginatedResponse<VoucherResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut base = vouchers::Entity::find();
        if let Some(active) = query.active {
            base = base.filter(vouchers::Column::Active.eq(active));
        }
        if let Some(search) = optional_text(query.search.clone()) {
            base = base.filter(vouchers::Column::Code.contains(search.to_uppercase()));
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let rows = base
            .order_by_desc(vouchers::Column::CreatedAt)
            .order_by_desc(vouchers::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::from_params(
            rows.into_iter().map(VoucherResponse::from).collect(),
            &params,
            total,
        ))
    }

    async fn find(&self, id: i32) -> AppResult<vouchers::Model> {
        vouchers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Voucher not found".to_string()))
    }

    pub async fn get(&self, id: i32) -> AppResult<VoucherResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create_single(&self, req: VoucherRequest) -> AppResult<VoucherResponse> {
        validate_request(&req)?;
        let code = match optional_text(req.code.clone()) {
            Some(code) => {
                let code = code.to_uppercase();
                if code_taken(&self.pool, &code, None).await? {
                    return Err(AppError::ValidationError(format!(
                        "Voucher code {code} already exists"
                    )));
                }
                code
            }
            None => fresh_code(&self.pool, "", &HashSet::new()).await?,
        };
        let voucher = new_voucher(code, &req).insert(&self.pool).await?;
        log::info!("Voucher {} created", voucher.code);
        Ok(voucher.into())
    }

    /// 批量生成 count 张相同规则、不同代码的优惠券
    pub async fn create_batch(&self, req: CreateVoucherBatchRequest) -> AppResult<Vec<VoucherResponse>> {
        validate_request(&req.voucher)?;
        if req.count == 0 || req.count > MAX_BATCH {
            return Err(AppError::ValidationError(format!(
                "Count must be between 1 and {MAX_BATCH}"
            )));
        }

        let txn = self.pool.begin().await?;
        let mut codes = HashSet::new();
        let mut created = Vec::with_capacity(req.count as usize);
        for _ in 0..req.count {
            let code = fresh_code(&txn, &req.prefix, &codes).await?;
            codes.insert(code.clone());
            let voucher = new_voucher(code, &req.voucher).insert(&txn).await?;
            created.push(VoucherResponse::from(voucher));
        }
        txn.commit().await?;

        log::info!(
            "Created {} voucher(s) with prefix {:?}",
            created.len(),
            req.prefix
        );
        Ok(created)
    }

    pub async fn update(&self, id: i32, req: VoucherRequest) -> AppResult<VoucherResponse> {
        validate_request(&req)?;
        let voucher = self.find(id).await?;
        if req.max_usage < voucher.used_count {
            return Err(AppError::ValidationError(format!(
                "Max usage cannot be below the {} time(s) already used",
                voucher.used_count
            )));
        }
        let code = match optional_text(req.code.clone()) {
            Some(code) => {
                let code = code.to_uppercase();
                if code_taken(&self.pool, &code, Some(voucher.id)).await? {
                    return Err(AppError::ValidationError(format!(
                        "Voucher code {code} already exists"
                    )));
                }
                code
            }
            None => voucher.code.clone(),
        };

        let mut model = voucher.into_active_model();
        model.code = Set(code);
        model.description = Set(optional_text(req.description));
        model.discount_type = Set(req.discount_type);
        model.discount_value = Set(req.discount_value);
        model.max_discount = Set(req.max_discount);
        model.min_order_value = Set(req.min_order_value);
        model.max_usage = Set(req.max_usage);
        model.max_usage_per_user = Set(req.max_usage_per_user);
        model.start_date = Set(req.start_date);
        model.end_date = Set(req.end_date);
        if let Some(active) = req.active {
            model.active = Set(active);
        }
        Ok(model.update(&self.pool).await?.into())
    }

    /// 只能删除从未使用过的优惠券
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let voucher = self.find(id).await?;
        let used_rows = usage::Entity::find()
            .filter(usage::Column::VoucherId.eq(voucher.id))
            .filter(usage::Column::UsedDate.is_not_null())
            .count(&self.pool)
            .await?;
        if voucher.used_count > 0 || used_rows > 0 {
            return Err(AppError::ValidationError(format!(
                "Voucher {} has been used and cannot be deleted",
                voucher.code
            )));
        }
        let reward_rows = rewards::Entity::find()
            .filter(rewards::Column::VoucherId.eq(voucher.id))
            .count(&self.pool)
            .await?;
        if reward_rows > 0 {
            return Err(AppError::ValidationError(format!(
                "Voucher {} was issued as a loyalty reward and cannot be deleted",
                voucher.code
            )));
        }

        let txn = self.pool.begin().await?;
        usage::Entity::delete_many()
            .filter(usage::Column::VoucherId.eq(voucher.id))
            .exec(&txn)
            .await?;
        vouchers::Entity::delete_by_id(voucher.id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn toggle(&self, id: i32) -> AppResult<ToggleResponse> {
        let voucher = self.find(id).await?;
        let active = !voucher.active;
        let mut model = voucher.into_active_model();
        model.active = Set(active);
        let voucher = model.update(&self.pool).await?;
        Ok(ToggleResponse {
            id: voucher.id,
            active,
        })
    }
}
