use crate::entities::{
    TransactStatus, customer_entity as customers, order_entity as orders,
    product_detail_entity as variants, product_entity as products,
};
use crate::error::AppResult;
use crate::models::*;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Iterable, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::collections::{BTreeMap, HashMap};

/// 库存低于该值的变体出现在看板上
const LOW_STOCK_THRESHOLD: i32 = 5;
const LOW_STOCK_LIMIT: u64 = 20;
const MAX_REVENUE_DAYS: u32 = 366;

/// 按天汇总：只统计已完成且已付款的订单，没有订单的日子补 0
pub fn bucket_revenue(
    rows: &[(DateTime<Utc>, i64)],
    start: NaiveDate,
    days: u32,
) -> Vec<RevenuePoint> {
    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = (0..days as i64)
        .map(|offset| (start + Duration::days(offset), (0, 0)))
        .collect();
    for (date, total) in rows {
        if let Some(bucket) = buckets.get_mut(&date.date_naive()) {
            bucket.0 += 1;
            bucket.1 += total;
        }
    }
    buckets
        .into_iter()
        .map(|(date, (orders, revenue))| RevenuePoint {
            date,
            orders,
            revenue,
        })
        .collect()
}

#[derive(Clone)]
pub struct DashboardService {
    pool: DatabaseConnection,
}

impl DashboardService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    fn live_orders() -> sea_orm::Select<orders::Entity> {
        orders::Entity::find().filter(orders::Column::Deleted.eq(false))
    }

    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let customers = customers::Entity::find().count(&self.pool).await? as i64;
        let products = products::Entity::find().count(&self.pool).await? as i64;
        let orders = Self::live_orders().count(&self.pool).await? as i64;

        let mut orders_by_status = Vec::new();
        for status in TransactStatus::iter() {
            let count = Self::live_orders()
                .filter(orders::Column::TransactStatus.eq(status))
                .count(&self.pool)
                .await? as i64;
            orders_by_status.push(StatusCount { status, count });
        }

        let revenue = Self::live_orders()
            .filter(orders::Column::TransactStatus.eq(TransactStatus::Completed))
            .filter(orders::Column::Paid.eq(true))
            .all(&self.pool)
            .await?
            .iter()
            .map(|o| o.total_money)
            .sum();

        let low_rows = variants::Entity::find()
            .filter(variants::Column::Active.eq(true))
            .filter(variants::Column::Stock.lte(LOW_STOCK_THRESHOLD))
            .order_by_asc(variants::Column::Stock)
            .order_by_asc(variants::Column::Id)
            .limit(LOW_STOCK_LIMIT)
            .all(&self.pool)
            .await?;
        let product_ids: Vec<i32> = low_rows.iter().map(|v| v.product_id).collect();
        let names: HashMap<i32, String> = if product_ids.is_empty() {
            HashMap::new()
        } else {
            products::Entity::find()
                .filter(products::Column::Id.is_in(product_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|p| (p.id, p.product_name))
                .collect()
        };
        let low_stock = low_rows
            .into_iter()
            .map(|v| LowStockVariant {
                product_detail_id: v.id,
                product_id: v.product_id,
                product_name: names.get(&v.product_id).cloned().unwrap_or_default(),
                stock: v.stock,
            })
            .collect();

        Ok(DashboardSummary {
            customers,
            products,
            orders,
            orders_by_status,
            revenue,
            low_stock,
        })
    }

    /// 最近 N 天（含今天）的每日营收
    pub async fn revenue_by_day(&self, days: u32) -> AppResult<Vec<RevenuePoint>> {
        let days = days.clamp(1, MAX_REVENUE_DAYS);
        let today = Utc::now().date_naive();
        let start = today - Duration::days(days as i64 - 1);
        let since = start.and_time(chrono::NaiveTime::MIN).and_utc();

        let rows: Vec<(DateTime<Utc>, i64)> = Self::live_orders()
            .filter(orders::Column::TransactStatus.eq(TransactStatus::Completed))
            .filter(orders::Column::Paid.eq(true))
            .filter(orders::Column::OrderDate.gte(since))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|o| (o.order_date, o.total_money))
            .collect();

        Ok(bucket_revenue(&rows, start, days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bucket_revenue_fills_empty_days() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rows = vec![
            (Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(), 100_000),
            (Utc.with_ymd_and_hms(2024, 6, 1, 18, 30, 0).unwrap(), 50_000),
            (Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap(), 70_000),
            (Utc.with_ymd_and_hms(2024, 5, 31, 23, 0, 0).unwrap(), 999),
        ];

        let points = bucket_revenue(&rows, start, 3);
        assert_eq!(points.len(), 3);
        assert_eq!((points[0].orders, points[0].revenue), (2, 150_000));
        assert_eq!((points[1].orders, points[1].revenue), (0, 0));
        assert_eq!((points[2].orders, points[2].revenue), (1, 70_000));
    }
}
