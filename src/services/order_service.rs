use crate::entities::{TransactStatus, order_detail_entity as details, order_entity as orders};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::order_release;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

/// 客户自己的订单
#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        customer_id: i32,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = orders::Entity::find()
            .filter(orders::Column::CustomerId.eq(customer_id))
            .filter(orders::Column::Deleted.eq(false));
        if let Some(status) = query.status {
            base = base.filter(orders::Column::TransactStatus.eq(status));
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

    async fn find_own(&self, customer_id: i32, order_id: i32) -> AppResult<orders::Model> {
        orders::Entity::find_by_id(order_id)
            .filter(orders::Column::CustomerId.eq(customer_id))
            .filter(orders::Column::Deleted.eq(false))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    pub async fn get(&self, customer_id: i32, order_id: i32) -> AppResult<OrderWithDetails> {
        let order = self.find_own(customer_id, order_id).await?;
        let lines = details::Entity::find()
            .filter(details::Column::OrderId.eq(order.id))
            .order_by_asc(details::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(OrderWithDetails::new(order, lines))
    }

    /// 客户只能取消待确认的订单
    pub async fn cancel(&self, customer_id: i32, order_id: i32) -> AppResult<OrderResponse> {
        let order = self.find_own(customer_id, order_id).await?;
        if order.transact_status != TransactStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Order #{} is {} and can no longer be cancelled",
                order.id, order.transact_status
            )));
        }

        let txn = self.pool.begin().await?;
        let updated = orders::Entity::update_many()
            .col_expr(
                orders::Column::TransactStatus,
                Expr::value(TransactStatus::Cancelled),
            )
            .filter(orders::Column::Id.eq(order.id))
            .filter(orders::Column::TransactStatus.eq(TransactStatus::Pending))
            .exec(&txn)
            .await?;
        if updated.rows_affected != 1 {
            return Err(AppError::Conflict(
                "Order status changed, please reload".to_string(),
            ));
        }
        order_release::release_order(&txn, &order).await?;
        txn.commit().await?;

        log::info!("Order {} cancelled by customer {customer_id}", order.id);

        let order = orders::Entity::find_by_id(order.id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        Ok(order.into())
    }
}
