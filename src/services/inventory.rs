//! 库存：变体库存的预留 / 释放，以及商品总库存的重新计算

use crate::entities::{product_detail_entity as variants, product_entity as products};
use crate::error::{AppError, AppResult};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::collections::{BTreeSet, HashMap};

/// 条件扣减库存（stock >= amount），失败时返回校验错误，由调用方回滚事务
pub async fn reserve_stock<C: ConnectionTrait>(
    conn: &C,
    product_detail_id: i32,
    amount: i32,
    product_name: &str,
) -> AppResult<()> {
    if amount <= 0 {
        return Ok(());
    }
    let result = variants::Entity::update_many()
        .col_expr(
            variants::Column::Stock,
            Expr::col(variants::Column::Stock).sub(amount),
        )
        .filter(variants::Column::Id.eq(product_detail_id))
        .filter(variants::Column::Stock.gte(amount))
        .exec(conn)
        .await?;

    if result.rows_affected != 1 {
        return Err(AppError::ValidationError(format!(
            "{product_name} does not have enough stock"
        )));
    }
    Ok(())
}

/// 归还库存
pub async fn release_stock<C: ConnectionTrait>(
    conn: &C,
    product_detail_id: i32,
    amount: i32,
) -> AppResult<()> {
    if amount <= 0 {
        return Ok(());
    }
    let result = variants::Entity::update_many()
        .col_expr(
            variants::Column::Stock,
            Expr::col(variants::Column::Stock).add(amount),
        )
        .filter(variants::Column::Id.eq(product_detail_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        log::warn!("Variant {product_detail_id} no longer exists, {amount} unit(s) not restocked");
    }
    Ok(())
}

/// 商品总库存 = 启用变体库存之和；所有变体/库存变更后都调用此函数
pub async fn recalculate_units_in_stock<C: ConnectionTrait>(
    conn: &C,
    product_ids: impl IntoIterator<Item = i32>,
) -> AppResult<()> {
    let ids: BTreeSet<i32> = product_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(());
    }
    let ids: Vec<i32> = ids.into_iter().collect();

    let rows = variants::Entity::find()
        .filter(variants::Column::ProductId.is_in(ids.clone()))
        .filter(variants::Column::Active.eq(true))
        .all(conn)
        .await?;

    let mut totals: HashMap<i32, i32> = ids.iter().map(|id| (*id, 0)).collect();
    for v in rows {
        *totals.entry(v.product_id).or_default() += v.stock.max(0);
    }

    let now = Utc::now();
    for (product_id, units) in totals {
        products::Entity::update_many()
            .col_expr(products::Column::UnitsInStock, Expr::value(units))
            .col_expr(products::Column::UpdatedAt, Expr::value(now))
            .filter(products::Column::Id.eq(product_id))
            .exec(conn)
            .await?;
    }
    Ok(())
}

/// 查询变体所属商品
pub async fn product_ids_of_variants<C: ConnectionTrait>(
    conn: &C,
    product_detail_ids: &[i32],
) -> AppResult<Vec<i32>> {
    if product_detail_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = variants::Entity::find()
        .filter(variants::Column::Id.is_in(product_detail_ids.to_vec()))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|v| v.product_id).collect())
}
