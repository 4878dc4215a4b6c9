use crate::entities::{
    TransactStatus, order_detail_entity as details, order_entity as orders,
    user_promotion_entity as usage, voucher_entity as vouchers,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::cart_service::CartService;
use crate::services::checkout_service::{ShippingInfo, record_usage};
use crate::services::pricing::{self, PricedLine, VoucherApplication};
use crate::services::{inventory, order_release};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::{BTreeMap, HashMap};

/// 后台订单管理
#[derive(Clone)]
pub struct AdminOrderService {
    pool: DatabaseConnection,
}

impl AdminOrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &AdminOrderQuery) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = orders::Entity::find()
            .filter(orders::Column::Deleted.eq(query.deleted.unwrap_or(false)));
        if let Some(status) = query.status {
            base = base.filter(orders::Column::TransactStatus.eq(status));
        }
        if let Some(paid) = query.paid {
            base = base.filter(orders::Column::Paid.eq(paid));
        }
        if let Some(customer_id) = query.customer_id {
            base = base.filter(orders::Column::CustomerId.eq(customer_id));
        }
        if let Some(start) = query.start_date {
            base = base.filter(orders::Column::OrderDate.gte(start));
        }
        if let Some(end) = query.end_date {
            base = base.filter(orders::Column::OrderDate.lte(end));
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let items = base
            .order_by_desc(orders::Column::OrderDate)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::from_params(
            items.into_iter().map(OrderResponse::from).collect(),
            &params,
            total,
        ))
    }

    async fn find(&self, order_id: i32) -> AppResult<orders::Model> {
        orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    pub async fn get(&self, order_id: i32) -> AppResult<OrderWithDetails> {
        let order = self.find(order_id).await?;
        let lines = details::Entity::find()
            .filter(details::Column::OrderId.eq(order.id))
            .order_by_asc(details::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(OrderWithDetails::new(order, lines))
    }

    /// 修改状态 / 付款标记
    ///
    /// 转为 cancelled 时归还库存与优惠使用；转为 completed 时记录发货时间。
    pub async fn update_status(
        &self,
        order_id: i32,
        req: UpdateOrderStatusRequest,
    ) -> AppResult<OrderWithDetails> {
        let order = self.find(order_id).await?;
        if order.deleted {
            return Err(AppError::ValidationError(format!(
                "Order #{} has been deleted",
                order.id
            )));
        }
        if req.status.is_none() && req.paid.is_none() {
            return Err(AppError::ValidationError("Nothing to update".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let mut status = order.transact_status;

        if let Some(next) = req.status
            && next != order.transact_status
        {
            if !order.transact_status.can_transition_to(next) {
                return Err(AppError::ValidationError(format!(
                    "Order #{} cannot change from {} to {}",
                    order.id, order.transact_status, next
                )));
            }

            let mut update = orders::Entity::update_many()
                .col_expr(orders::Column::TransactStatus, Expr::value(next))
                .filter(orders::Column::Id.eq(order.id))
                .filter(orders::Column::TransactStatus.eq(order.transact_status));
            if next == TransactStatus::Completed {
                update = update.col_expr(orders::Column::ShipDate, Expr::value(Some(now)));
            }
            if update.exec(&txn).await?.rows_affected != 1 {
                return Err(AppError::Conflict(
                    "Order status changed, please reload".to_string(),
                ));
            }

            if next == TransactStatus::Cancelled {
                order_release::release_order(&txn, &order).await?;
            }
            log::info!(
                "Order {} status {} -> {}",
                order.id,
                order.transact_status,
                next
            );
            status = next;
        }

        if let Some(paid) = req.paid
            && paid != order.paid
        {
            if status == TransactStatus::Cancelled {
                return Err(AppError::ValidationError(
                    "Payment of a cancelled order cannot be changed".to_string(),
                ));
            }
            orders::Entity::update_many()
                .col_expr(orders::Column::Paid, Expr::value(paid))
                .col_expr(
                    orders::Column::PaymentDate,
                    Expr::value(if paid { Some(now) } else { None }),
                )
                .filter(orders::Column::Id.eq(order.id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        self.get(order.id).await
    }

    /// 修改订单明细与收货信息，只允许待确认 / 已确认的订单
    ///
    /// 原有明细保留下单时的价格，新增明细按当前折后价计价；
    /// 促销与优惠券按新的小计重新计算，不再满足门槛的优惠券被移除。
    pub async fn edit(&self, order_id: i32, req: EditOrderRequest) -> AppResult<OrderWithDetails> {
        let order = self.find(order_id).await?;
        ensure_editable(&order, "edited")?;

        let mut wanted: BTreeMap<i32, i32> = BTreeMap::new();
        for line in &req.lines {
            if line.amount <= 0 {
                return Err(AppError::ValidationError(
                    "Quantity must be greater than 0".to_string(),
                ));
            }
            *wanted.entry(line.product_detail_id).or_default() += line.amount;
        }
        if wanted.is_empty() {
            return Err(AppError::ValidationError(
                "An order must have at least one line".to_string(),
            ));
        }

        let shipping = ShippingInfo::validate(
            &self.pool,
            req.receiver_name.as_deref().unwrap_or(&order.receiver_name),
            req.phone.as_deref().unwrap_or(&order.phone),
            req.address.as_deref().unwrap_or(&order.address),
            req.location_id.or(order.location_id).unwrap_or_default(),
            req.district.or_else(|| order.district.clone()),
            req.ward.or_else(|| order.ward.clone()),
            req.note.or_else(|| order.note.clone()),
        )
        .await?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let existing: HashMap<i32, details::Model> = details::Entity::find()
            .filter(details::Column::OrderId.eq(order.id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|d| (d.product_detail_id, d))
            .collect();

        let mut all_ids: Vec<i32> = wanted.keys().copied().collect();
        all_ids.extend(existing.keys().filter(|id| !wanted.contains_key(id)));
        let snapshots = CartService::load_snapshots(&txn, &all_ids).await?;

        // 新明细：(变体, 商品, 名称, 单价, 数量)
        let mut new_lines = Vec::with_capacity(wanted.len());
        for (&pd_id, &amount) in &wanted {
            let snap = snapshots
                .get(&pd_id)
                .ok_or_else(|| AppError::NotFound(format!("Product variant {pd_id} not found")))?;
            let product = snap
                .product
                .as_ref()
                .ok_or_else(|| AppError::NotFound(format!("Product variant {pd_id} not found")))?;

            let (name, price) = match existing.get(&pd_id) {
                Some(old) => (old.product_name.clone(), old.price),
                None => {
                    if !snap.variant.active || !product.active {
                        return Err(AppError::ValidationError(format!(
                            "{} is not available",
                            product.product_name
                        )));
                    }
                    (
                        product.product_name.clone(),
                        pricing::unit_price(product.price, product.discount),
                    )
                }
            };
            new_lines.push((pd_id, product.id, name, price, amount));
        }

        // 按差量调整库存
        for (pd_id, _, name, _, amount) in &new_lines {
            let old_amount = existing.get(pd_id).map(|d| d.amount).unwrap_or(0);
            let delta = amount - old_amount;
            if delta > 0 {
                inventory::reserve_stock(&txn, *pd_id, delta, name).await?;
            } else if delta < 0 {
                inventory::release_stock(&txn, *pd_id, -delta).await?;
            }
        }
        for (pd_id, old) in &existing {
            if !wanted.contains_key(pd_id) {
                inventory::release_stock(&txn, *pd_id, old.amount).await?;
            }
        }
        let product_ids: Vec<i32> = snapshots.values().map(|s| s.variant.product_id).collect();
        inventory::recalculate_units_in_stock(&txn, product_ids).await?;

        details::Entity::delete_many()
            .filter(details::Column::OrderId.eq(order.id))
            .exec(&txn)
            .await?;
        let mut order_lines = Vec::with_capacity(new_lines.len());
        for (pd_id, _, name, price, amount) in &new_lines {
            let created_at = existing.get(pd_id).map(|d| d.created_at).unwrap_or(now);
            let detail = details::ActiveModel {
                order_id: Set(order.id),
                product_detail_id: Set(*pd_id),
                product_name: Set(name.clone()),
                amount: Set(*amount),
                price: Set(*price),
                total: Set(price * *amount as i64),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            order_lines.push(detail);
        }

        // 重新计算促销：先去掉本订单的促销使用记录
        usage::Entity::delete_many()
            .filter(usage::Column::OrderId.eq(order.id))
            .filter(usage::Column::PromotionId.is_not_null())
            .exec(&txn)
            .await?;

        let held_voucher = match order.voucher_id {
            Some(id) => vouchers::Entity::find_by_id(id).one(&txn).await?,
            None => None,
        };
        let priced: Vec<PricedLine> = new_lines
            .iter()
            .map(|(pd_id, product_id, _, price, amount)| PricedLine {
                product_id: *product_id,
                product_detail_id: *pd_id,
                amount: *amount,
                unit_price: *price,
            })
            .collect();
        let quote = pricing::quote_order(
            &txn,
            order.customer_id,
            &priced,
            held_voucher.clone().map(VoucherApplication::Held),
            Some(order.id),
            now,
        )
        .await?;

        if let Some(voucher) = &held_voucher
            && quote.voucher.is_none()
        {
            order_release::decrement_voucher_usage(&txn, voucher.id).await?;
            usage::Entity::delete_many()
                .filter(usage::Column::OrderId.eq(order.id))
                .filter(usage::Column::VoucherId.eq(voucher.id))
                .exec(&txn)
                .await?;
            log::info!(
                "Voucher {} removed from order {}: {}",
                voucher.code,
                order.id,
                quote
                    .voucher_rejection
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default()
            );
        }
        for applied in &quote.promotions.applied {
            record_usage(
                &txn,
                order.customer_id,
                Some(applied.promotion_id),
                None,
                order.id,
                now,
            )
            .await?;
        }

        let changes = orders::ActiveModel {
            receiver_name: Set(shipping.receiver_name),
            phone: Set(shipping.phone),
            address: Set(shipping.address),
            location_id: Set(Some(shipping.location_id)),
            district: Set(shipping.district),
            ward: Set(shipping.ward),
            note: Set(shipping.note),
            promotion_id: Set(quote.promotions.primary_promotion_id()),
            voucher_id: Set(quote.voucher.as_ref().map(|v| v.id)),
            total_money: Set(quote.totals.total),
            total_discount: Set(quote.totals.discount),
            ..Default::default()
        };
        let updated = update_if_unchanged(&txn, &order, changes).await?;

        txn.commit().await?;

        log::info!(
            "Order {} edited: {} line(s), total {}",
            updated.id,
            order_lines.len(),
            updated.total_money
        );
        Ok(OrderWithDetails::new(updated, order_lines))
    }

    /// 软删除订单并归还库存与优惠使用，只允许待确认 / 已确认的订单
    pub async fn delete(&self, order_id: i32) -> AppResult<()> {
        let order = self.find(order_id).await?;
        ensure_editable(&order, "deleted")?;

        let txn = self.pool.begin().await?;
        let updated = orders::Entity::update_many()
            .col_expr(orders::Column::Deleted, Expr::value(true))
            .filter(orders::Column::Id.eq(order.id))
            .filter(orders::Column::Deleted.eq(false))
            .filter(orders::Column::TransactStatus.eq(order.transact_status))
            .exec(&txn)
            .await?;
        if updated.rows_affected != 1 {
            return Err(AppError::Conflict(
                "Order changed, please reload".to_string(),
            ));
        }
        order_release::release_order(&txn, &order).await?;
        txn.commit().await?;

        log::info!("Order {} deleted", order.id);
        Ok(())
    }
}

/// 仅当订单仍是读取时的状态且未被删除时写入修改，否则返回冲突
pub async fn update_if_unchanged<C: ConnectionTrait>(
    conn: &C,
    seen: &orders::Model,
    changes: orders::ActiveModel,
) -> AppResult<orders::Model> {
    let result = orders::Entity::update_many()
        .set(changes)
        .filter(orders::Column::Id.eq(seen.id))
        .filter(orders::Column::TransactStatus.eq(seen.transact_status))
        .filter(orders::Column::Deleted.eq(false))
        .exec(conn)
        .await?;
    if result.rows_affected != 1 {
        return Err(AppError::Conflict(format!(
            "Order #{} changed, please reload",
            seen.id
        )));
    }
    orders::Entity::find_by_id(seen.id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

fn ensure_editable(order: &orders::Model, action: &str) -> AppResult<()> {
    if order.deleted {
        return Err(AppError::ValidationError(format!(
            "Order #{} has been deleted",
            order.id
        )));
    }
    if !order.transact_status.is_editable() {
        return Err(AppError::ValidationError(format!(
            "Order #{} is {} and cannot be {action}; only pending or confirmed orders can be changed",
            order.id, order.transact_status
        )));
    }
    Ok(())
}
