use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleCartItem {
    pub product_detail_id: i32,
    pub amount: i32,
}

/// Cookie / 会话中保存的购物车，只记录变体 ID 与数量
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleCart {
    #[serde(default)]
    pub items: Vec<SimpleCartItem>,
}

impl SimpleCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(product_detail_id: i32, amount: i32) -> Self {
        let mut cart = Self::new();
        cart.add(product_detail_id, amount);
        cart
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_items(&self) -> i32 {
        self.items.iter().map(|i| i.amount).sum()
    }

    pub fn amount_of(&self, product_detail_id: i32) -> i32 {
        self.items
            .iter()
            .find(|i| i.product_detail_id == product_detail_id)
            .map(|i| i.amount)
            .unwrap_or(0)
    }

    /// 同一变体数量累加
    pub fn add(&mut self, product_detail_id: i32, amount: i32) {
        if amount <= 0 {
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|i| i.product_detail_id == product_detail_id)
        {
            Some(item) => item.amount = item.amount.saturating_add(amount),
            None => self.items.push(SimpleCartItem {
                product_detail_id,
                amount,
            }),
        }
    }

    /// 设置数量，0 或负数视为移除
    pub fn set(&mut self, product_detail_id: i32, amount: i32) {
        if amount <= 0 {
            self.remove(product_detail_id);
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|i| i.product_detail_id == product_detail_id)
        {
            Some(item) => item.amount = amount,
            None => self.items.push(SimpleCartItem {
                product_detail_id,
                amount,
            }),
        }
    }

    pub fn remove(&mut self, product_detail_id: i32) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_detail_id != product_detail_id);
        before != self.items.len()
    }

    /// 合并另一个购物车：相同变体数量相加，不会减少已有数量
    pub fn merge(&mut self, other: &SimpleCart) {
        for item in &other.items {
            self.add(item.product_detail_id, item.amount);
        }
    }

    /// 清理来自客户端的数据：合并重复项并去掉非正数量
    pub fn normalized(self) -> Self {
        let mut cart = Self::new();
        for item in self.items {
            cart.add(item.product_detail_id, item.amount);
        }
        cart
    }

    pub fn product_detail_ids(&self) -> Vec<i32> {
        self.items.iter().map(|i| i.product_detail_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sums_same_variant() {
        let mut cart = SimpleCart::new();
        cart.add(42, 2);
        cart.add(7, 1);
        cart.add(42, 3);
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.amount_of(42), 5);
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn test_add_ignores_non_positive() {
        let mut cart = SimpleCart::new();
        cart.add(1, 0);
        cart.add(1, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_zero_removes() {
        let mut cart = SimpleCart::single(5, 2);
        cart.set(5, 4);
        assert_eq!(cart.amount_of(5), 4);
        cart.set(5, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_never_decreases() {
        let mut customer = SimpleCart::new();
        customer.add(1, 3);
        customer.add(2, 1);

        let mut guest = SimpleCart::new();
        guest.add(1, 1);
        guest.add(3, 2);

        customer.merge(&guest);
        assert_eq!(customer.amount_of(1), 4);
        assert_eq!(customer.amount_of(2), 1);
        assert_eq!(customer.amount_of(3), 2);
    }

    #[test]
    fn test_normalized_collapses_duplicates() {
        let cart = SimpleCart {
            items: vec![
                SimpleCartItem { product_detail_id: 9, amount: 1 },
                SimpleCartItem { product_detail_id: 9, amount: 2 },
                SimpleCartItem { product_detail_id: 4, amount: -1 },
            ],
        }
        .normalized();
        assert_eq!(cart.items, vec![SimpleCartItem { product_detail_id: 9, amount: 3 }]);
    }
}
