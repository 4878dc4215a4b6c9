use crate::cart::{CartOwner, CartSlot, CartStore};
use crate::entities::{
    PaymentMethod, TransactStatus, location_entity as locations, order_detail_entity as details,
    order_entity as orders, reward_entity as rewards, user_promotion_entity as usage,
    voucher_entity as vouchers,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::cart_service::CartService;
use crate::services::inventory;
use crate::services::pricing::{self, OrderQuote, PricedLine, VoucherApplication};
use crate::utils::{normalize_phone, optional_text, require_text, validate_phone};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::collections::HashMap;

/// 收货信息（已校验）
#[derive(Debug, Clone)]
pub struct ShippingInfo {
    pub receiver_name: String,
    pub phone: String,
    pub address: String,
    pub location_id: i32,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub note: Option<String>,
}

impl ShippingInfo {
    pub async fn validate<C: ConnectionTrait>(
        conn: &C,
        receiver_name: &str,
        phone: &str,
        address: &str,
        location_id: i32,
        district: Option<String>,
        ward: Option<String>,
        note: Option<String>,
    ) -> AppResult<Self> {
        let receiver_name = require_text("Receiver name", receiver_name)?;
        let phone = normalize_phone(&require_text("Phone", phone)?);
        validate_phone(&phone)?;
        let address = require_text("Address", address)?;
        if locations::Entity::find_by_id(location_id)
            .one(conn)
            .await?
            .is_none()
        {
            return Err(AppError::ValidationError(
                "Please select a valid province/city".to_string(),
            ));
        }
        Ok(Self {
            receiver_name,
            phone,
            address,
            location_id,
            district: optional_text(district),
            ward: optional_text(ward),
            note: optional_text(note),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PreparedLine {
    pub product_detail_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub amount: i32,
    pub unit_price: i64,
}

impl PreparedLine {
    fn priced(&self) -> PricedLine {
        PricedLine {
            product_id: self.product_id,
            product_detail_id: self.product_detail_id,
            amount: self.amount,
            unit_price: self.unit_price,
        }
    }
}

impl From<&CartLine> for PreparedLine {
    fn from(l: &CartLine) -> Self {
        Self {
            product_detail_id: l.product_detail_id,
            product_id: l.product_id,
            product_name: l.product_name.clone(),
            amount: l.amount,
            unit_price: l.unit_price,
        }
    }
}

/// 通过校验、等待写入数据库的订单
#[derive(Debug, Clone)]
pub struct PreparedOrder {
    pub customer_id: i32,
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub lines: Vec<PreparedLine>,
    pub quote: OrderQuote,
}

#[derive(Clone)]
pub struct CheckoutService {
    pool: DatabaseConnection,
    cart_service: CartService,
}

impl CheckoutService {
    pub fn new(pool: DatabaseConnection, cart_service: CartService) -> Self {
        Self { pool, cart_service }
    }

    /// 查找客户可用的优惠券；不存在或属于他人时返回 None
    async fn voucher_for(
        &self,
        customer_id: i32,
        code: &str,
    ) -> AppResult<Option<vouchers::Model>> {
        let Some(voucher) = pricing::find_voucher_by_code(&self.pool, code).await? else {
            return Ok(None);
        };
        match pricing::reward_voucher_owner(&self.pool, voucher.id).await? {
            Some(owner) if owner != customer_id => Ok(None),
            _ => Ok(Some(voucher)),
        }
    }

    pub async fn preview(
        &self,
        store: &dyn CartStore,
        customer_id: i32,
        source: CartSlot,
        voucher_code: Option<String>,
    ) -> AppResult<CheckoutPreviewResponse> {
        let owner = CartOwner::Customer(customer_id);
        let (reconciled, warnings) = {
            let _guard = self.cart_service.locks().lock(&owner).await;
            self.cart_service
                .read_reconciled(store, &owner, source)
                .await?
        };

        let priced: Vec<PricedLine> = reconciled
            .lines
            .iter()
            .map(|l| PreparedLine::from(l).priced())
            .collect();

        let code = voucher_code
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        let voucher = match &code {
            Some(c) => self.voucher_for(customer_id, c).await?,
            None => None,
        };
        let found = voucher.is_some();

        let quote = pricing::quote_order(
            &self.pool,
            customer_id,
            &priced,
            voucher.map(VoucherApplication::New),
            None,
            Utc::now(),
        )
        .await?;

        let evaluation = code.map(|code| {
            if !found {
                VoucherEvaluation {
                    code,
                    applicable: false,
                    discount: 0,
                    reason: Some("Voucher not found".to_string()),
                }
            } else {
                VoucherEvaluation {
                    code,
                    applicable: quote.voucher.is_some(),
                    discount: quote.voucher_discount,
                    reason: quote.voucher_rejection.as_ref().map(ToString::to_string),
                }
            }
        });

        Ok(CheckoutPreviewResponse {
            source,
            subtotal: quote.totals.subtotal,
            promotion_discount: quote.promotions.total_discount,
            promotions: quote.promotions.applied.clone(),
            voucher: evaluation,
            total_discount: quote.totals.discount,
            total: quote.totals.total,
            lines: reconciled.lines,
            warnings,
        })
    }

    /// 客户当前可用的优惠券
    pub async fn available_vouchers(
        &self,
        customer_id: i32,
        subtotal: i64,
    ) -> AppResult<Vec<AvailableVoucher>> {
        self.available_vouchers_at(customer_id, subtotal, Utc::now())
            .await
    }

    pub async fn available_vouchers_at(
        &self,
        customer_id: i32,
        subtotal: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AvailableVoucher>> {
        let candidates = vouchers::Entity::find()
            .filter(vouchers::Column::Active.eq(true))
            .filter(vouchers::Column::StartDate.lte(now))
            .filter(vouchers::Column::EndDate.gte(now))
            .filter(vouchers::Column::MinOrderValue.lte(subtotal))
            .all(&self.pool)
            .await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = candidates.iter().map(|v| v.id).collect();
        let owners: HashMap<i32, i32> = rewards::Entity::find()
            .filter(rewards::Column::VoucherId.is_in(ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .filter_map(|r| r.voucher_id.map(|vid| (vid, r.customer_id)))
            .collect();

        let mut result = Vec::new();
        for voucher in candidates {
            if owners.get(&voucher.id).is_some_and(|owner| *owner != customer_id) {
                continue;
            }
            let uses =
                pricing::count_voucher_uses(&self.pool, customer_id, voucher.id, None).await?;
            if pricing::check_voucher(&voucher, uses, subtotal, now).is_err() {
                continue;
            }
            result.push(AvailableVoucher {
                discount: pricing::voucher_discount(&voucher, subtotal),
                voucher: voucher.into(),
            });
        }
        result.sort_by(|a, b| b.discount.cmp(&a.discount));
        Ok(result)
    }

    /// 下单：校验购物车与优惠，事务内写入订单，成功后清理购物车
    pub async fn place_order(
        &self,
        store: &dyn CartStore,
        customer_id: i32,
        req: PlaceOrderRequest,
    ) -> AppResult<OrderWithDetails> {
        let shipping = ShippingInfo::validate(
            &self.pool,
            &req.receiver_name,
            &req.phone,
            &req.address,
            req.location_id,
            req.district,
            req.ward,
            req.note,
        )
        .await?;

        let owner = CartOwner::Customer(customer_id);
        let _guard = self.cart_service.locks().lock(&owner).await;

        let (reconciled, warnings) = self
            .cart_service
            .read_reconciled(store, &owner, req.source)
            .await?;
        if reconciled.changed() {
            return Err(AppError::ValidationError(format!(
                "Your cart has changed, please review it before ordering: {}",
                warnings.join("; ")
            )));
        }
        if reconciled.lines.is_empty() {
            return Err(AppError::ValidationError("Your cart is empty".to_string()));
        }

        let lines: Vec<PreparedLine> = reconciled.lines.iter().map(PreparedLine::from).collect();
        let priced: Vec<PricedLine> = lines.iter().map(PreparedLine::priced).collect();

        let voucher = match req.voucher_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(
                self.voucher_for(customer_id, code)
                    .await?
                    .ok_or_else(|| {
                        AppError::ValidationError(format!("Voucher {code} not found"))
                    })?,
            ),
            _ => None,
        };

        let quote = pricing::quote_order(
            &self.pool,
            customer_id,
            &priced,
            voucher.map(VoucherApplication::New),
            None,
            Utc::now(),
        )
        .await?;
        if let Some(rejection) = &quote.voucher_rejection {
            return Err(AppError::ValidationError(rejection.to_string()));
        }

        let prepared = PreparedOrder {
            customer_id,
            shipping,
            payment_method: req.payment_method,
            lines,
            quote,
        };
        let purchased: Vec<i32> = prepared.lines.iter().map(|l| l.product_detail_id).collect();
        let (order, order_lines) = self.commit_order(prepared).await?;

        // 订单已提交，清理购物车失败不影响下单结果
        if let Err(e) = self
            .cart_service
            .remove_purchased(store, &owner, req.source, &purchased)
            .await
        {
            log::warn!(
                "Order {} placed but the cart of customer {customer_id} was not cleared: {e}",
                order.id
            );
        }

        log::info!(
            "Order {} placed by customer {customer_id}: {} line(s), total {}",
            order.id,
            order_lines.len(),
            order.total_money
        );
        Ok(OrderWithDetails::new(order, order_lines))
    }

    /// 在一个事务中写入订单、扣减库存、记录优惠使用；任一步失败则全部回滚
    pub async fn commit_order(
        &self,
        prepared: PreparedOrder,
    ) -> AppResult<(orders::Model, Vec<details::Model>)> {
        let now = Utc::now();
        let PreparedOrder {
            customer_id,
            shipping,
            payment_method,
            lines,
            quote,
        } = prepared;

        let txn = self.pool.begin().await?;

        let order = orders::ActiveModel {
            customer_id: Set(customer_id),
            receiver_name: Set(shipping.receiver_name),
            phone: Set(shipping.phone),
            address: Set(shipping.address),
            location_id: Set(Some(shipping.location_id)),
            district: Set(shipping.district),
            ward: Set(shipping.ward),
            note: Set(shipping.note),
            payment_method: Set(payment_method),
            transact_status: Set(TransactStatus::Pending),
            paid: Set(false),
            deleted: Set(false),
            promotion_id: Set(quote.promotions.primary_promotion_id()),
            voucher_id: Set(quote.voucher.as_ref().map(|v| v.id)),
            total_money: Set(quote.totals.total),
            total_discount: Set(quote.totals.discount),
            order_date: Set(now),
            payment_date: Set(None),
            ship_date: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut order_lines = Vec::with_capacity(lines.len());
        for line in &lines {
            inventory::reserve_stock(&txn, line.product_detail_id, line.amount, &line.product_name)
                .await?;
            let detail = details::ActiveModel {
                order_id: Set(order.id),
                product_detail_id: Set(line.product_detail_id),
                product_name: Set(line.product_name.clone()),
                amount: Set(line.amount),
                price: Set(line.unit_price),
                total: Set(line.unit_price * line.amount as i64),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            order_lines.push(detail);
        }
        inventory::recalculate_units_in_stock(&txn, lines.iter().map(|l| l.product_id)).await?;

        if let Some(voucher) = &quote.voucher {
            let claimed = vouchers::Entity::update_many()
                .col_expr(
                    vouchers::Column::UsedCount,
                    Expr::col(vouchers::Column::UsedCount).add(1),
                )
                .filter(vouchers::Column::Id.eq(voucher.id))
                .filter(
                    Expr::col(vouchers::Column::UsedCount)
                        .lt(Expr::col(vouchers::Column::MaxUsage)),
                )
                .exec(&txn)
                .await?;
            if claimed.rows_affected != 1 {
                return Err(AppError::ValidationError(format!(
                    "Voucher {} has been fully used",
                    voucher.code
                )));
            }
            record_usage(&txn, customer_id, None, Some(voucher.id), order.id, now).await?;
        }
        for applied in &quote.promotions.applied {
            record_usage(
                &txn,
                customer_id,
                Some(applied.promotion_id),
                None,
                order.id,
                now,
            )
            .await?;
        }

        txn.commit().await?;
        Ok((order, order_lines))
    }
}

/// 写入一条已使用的促销 / 优惠券记录
pub(crate) async fn record_usage<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
    promotion_id: Option<i32>,
    voucher_id: Option<i32>,
    order_id: i32,
    now: DateTime<Utc>,
) -> AppResult<()> {
    usage::ActiveModel {
        customer_id: Set(customer_id),
        promotion_id: Set(promotion_id),
        voucher_id: Set(voucher_id),
        order_id: Set(Some(order_id)),
        used_date: Set(Some(now)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}
