use super::SimpleCart;
use crate::entities::{product_detail_entity, product_entity};
use crate::models::CartLine;
use crate::services::pricing;
use std::collections::HashMap;

/// 核对购物车时读取到的变体最新状态
#[derive(Debug, Clone)]
pub struct VariantSnapshot {
    pub variant: product_detail_entity::Model,
    pub product: Option<product_entity::Model>,
    pub size_name: Option<String>,
    pub color_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    Missing,
    Inactive,
    OutOfStock,
    InvalidAttributes,
    InvalidPrice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedLine {
    pub product_detail_id: i32,
    pub product_name: Option<String>,
    pub requested: i32,
    pub available: i32,
    pub reason: RemovalReason,
}

impl RemovedLine {
    pub fn warning(&self) -> String {
        let name = self
            .product_name
            .clone()
            .unwrap_or_else(|| format!("Item #{}", self.product_detail_id));
        match self.reason {
            RemovalReason::Missing | RemovalReason::Inactive => {
                format!("{name} is no longer available and was removed from your cart")
            }
            RemovalReason::OutOfStock => format!(
                "{name} only has {} left in stock (you had {}) and was removed from your cart",
                self.available, self.requested
            ),
            RemovalReason::InvalidAttributes => {
                format!("{name} has an invalid size or color and was removed from your cart")
            }
            RemovalReason::InvalidPrice => {
                format!("{name} has an invalid price and was removed from your cart")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconciledCart {
    /// 过滤后的购物车（需要写回存储）
    pub cart: SimpleCart,
    pub lines: Vec<CartLine>,
    pub removed: Vec<RemovedLine>,
}

impl ReconciledCart {
    pub fn changed(&self) -> bool {
        !self.removed.is_empty()
    }

    pub fn subtotal(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total).sum()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.removed.iter().map(RemovedLine::warning).collect()
    }
}

/// 根据最新数据过滤购物车：
/// 变体/商品不存在或停用、库存不足、尺码颜色无效、价格无效的条目被移除
pub fn reconcile(cart: &SimpleCart, snapshots: &HashMap<i32, VariantSnapshot>) -> ReconciledCart {
    let mut result = ReconciledCart::default();

    for item in &cart.items {
        let removed = |product_name: Option<String>, available: i32, reason| RemovedLine {
            product_detail_id: item.product_detail_id,
            product_name,
            requested: item.amount,
            available,
            reason,
        };

        let Some(snap) = snapshots.get(&item.product_detail_id) else {
            result.removed.push(removed(None, 0, RemovalReason::Missing));
            continue;
        };
        let Some(product) = snap.product.as_ref() else {
            result.removed.push(removed(None, 0, RemovalReason::Missing));
            continue;
        };
        let name = Some(product.product_name.clone());
        let variant = &snap.variant;

        if !variant.active || !product.active {
            result.removed.push(removed(name, 0, RemovalReason::Inactive));
            continue;
        }
        if (variant.size_id.is_some() && snap.size_name.is_none())
            || (variant.color_id.is_some() && snap.color_name.is_none())
        {
            result
                .removed
                .push(removed(name, variant.stock, RemovalReason::InvalidAttributes));
            continue;
        }
        if product.price <= 0 || !(0..=100).contains(&product.discount) {
            result
                .removed
                .push(removed(name, variant.stock, RemovalReason::InvalidPrice));
            continue;
        }
        if variant.stock < item.amount {
            result
                .removed
                .push(removed(name, variant.stock, RemovalReason::OutOfStock));
            continue;
        }

        let unit_price = pricing::unit_price(product.price, product.discount);
        result.cart.add(item.product_detail_id, item.amount);
        result.lines.push(CartLine {
            product_detail_id: variant.id,
            product_id: product.id,
            product_name: product.product_name.clone(),
            alias: product.alias.clone(),
            thumb: product.thumb.clone(),
            size_name: snap.size_name.clone(),
            color_name: snap.color_name.clone(),
            unit_price,
            amount: item.amount,
            line_total: unit_price * item.amount as i64,
            stock: variant.stock,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i32, name: &str, price: i64, discount: i32) -> product_entity::Model {
        let now = Utc::now();
        product_entity::Model {
            id,
            product_name: name.to_string(),
            short_desc: None,
            description: None,
            cat_id: None,
            supplier_id: None,
            price,
            discount,
            thumb: None,
            best_seller: false,
            home_flag: false,
            active: true,
            tags: None,
            alias: name.to_lowercase(),
            meta_title: None,
            meta_desc: None,
            meta_key: None,
            units_in_stock: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn snapshot(id: i32, product_id: i32, stock: i32) -> VariantSnapshot {
        VariantSnapshot {
            variant: product_detail_entity::Model {
                id,
                product_id,
                size_id: Some(1),
                color_id: Some(1),
                stock,
                active: true,
            },
            product: Some(product(product_id, "Linen Shirt", 200_000, 10)),
            size_name: Some("M".into()),
            color_name: Some("White".into()),
        }
    }

    #[test]
    fn test_understocked_line_is_removed_with_warning() {
        let cart = SimpleCart::single(42, 2);
        let snaps = HashMap::from([(42, snapshot(42, 1, 1))]);

        let result = reconcile(&cart, &snaps);
        assert!(result.cart.is_empty());
        assert!(result.lines.is_empty());
        assert!(result.changed());
        assert_eq!(result.removed[0].reason, RemovalReason::OutOfStock);
        assert!(result.warnings()[0].contains("Linen Shirt"));
    }

    #[test]
    fn test_valid_line_is_priced_with_product_discount() {
        let cart = SimpleCart::single(42, 2);
        let snaps = HashMap::from([(42, snapshot(42, 1, 5))]);

        let result = reconcile(&cart, &snaps);
        assert!(!result.changed());
        assert_eq!(result.lines[0].unit_price, 180_000);
        assert_eq!(result.subtotal(), 360_000);
        assert_eq!(result.cart, cart);
    }

    #[test]
    fn test_missing_inactive_and_invalid_attributes() {
        let mut cart = SimpleCart::new();
        cart.add(1, 1);
        cart.add(2, 1);
        cart.add(3, 1);
        cart.add(4, 1);

        let mut inactive = snapshot(2, 10, 5);
        inactive.variant.active = false;
        let mut no_color = snapshot(3, 11, 5);
        no_color.color_name = None;
        let ok = snapshot(4, 12, 5);
        let snaps = HashMap::from([(2, inactive), (3, no_color), (4, ok)]);

        let result = reconcile(&cart, &snaps);
        let reasons: Vec<_> = result.removed.iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![
                RemovalReason::Missing,
                RemovalReason::Inactive,
                RemovalReason::InvalidAttributes
            ]
        );
        assert_eq!(result.cart.product_detail_ids(), vec![4]);
    }

    #[test]
    fn test_inactive_product_removes_variant() {
        let mut snap = snapshot(8, 3, 10);
        if let Some(p) = snap.product.as_mut() {
            p.active = false;
        }
        let result = reconcile(&SimpleCart::single(8, 1), &HashMap::from([(8, snap)]));
        assert_eq!(result.removed[0].reason, RemovalReason::Inactive);
    }
}
