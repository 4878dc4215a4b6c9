//! 订单取消 / 删除时的资源归还

use crate::entities::{
    order_detail_entity as details, order_entity as orders, user_promotion_entity as usage,
    voucher_entity as vouchers,
};
use crate::error::AppResult;
use crate::services::inventory;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// 归还订单占用的库存，并把促销 / 优惠券使用记录恢复为未使用
///
/// 必须在事务中调用。
pub async fn release_order<C: ConnectionTrait>(conn: &C, order: &orders::Model) -> AppResult<()> {
    let lines = details::Entity::find()
        .filter(details::Column::OrderId.eq(order.id))
        .all(conn)
        .await?;

    for line in &lines {
        inventory::release_stock(conn, line.product_detail_id, line.amount).await?;
    }
    let variant_ids: Vec<i32> = lines.iter().map(|l| l.product_detail_id).collect();
    let product_ids = inventory::product_ids_of_variants(conn, &variant_ids).await?;
    inventory::recalculate_units_in_stock(conn, product_ids).await?;

    release_usage(conn, order.id).await?;
    if let Some(voucher_id) = order.voucher_id {
        decrement_voucher_usage(conn, voucher_id).await?;
    }

    log::info!(
        "Released order {}: {} line(s) restocked",
        order.id,
        lines.len()
    );
    Ok(())
}

/// 订单相关的使用记录恢复为未使用，保留 order_id 以便追溯
pub async fn release_usage<C: ConnectionTrait>(conn: &C, order_id: i32) -> AppResult<u64> {
    let result = usage::Entity::update_many()
        .col_expr(usage::Column::UsedDate, Expr::value(Option::<chrono::DateTime<chrono::Utc>>::None))
        .filter(usage::Column::OrderId.eq(order_id))
        .filter(usage::Column::UsedDate.is_not_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// used_count 减一（不会小于 0）
pub async fn decrement_voucher_usage<C: ConnectionTrait>(conn: &C, voucher_id: i32) -> AppResult<()> {
    vouchers::Entity::update_many()
        .col_expr(
            vouchers::Column::UsedCount,
            Expr::col(vouchers::Column::UsedCount).sub(1),
        )
        .filter(vouchers::Column::Id.eq(voucher_id))
        .filter(vouchers::Column::UsedCount.gt(0))
        .exec(conn)
        .await?;
    Ok(())
}
