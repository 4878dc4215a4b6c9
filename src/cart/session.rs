use super::{CartSlot, SimpleCart};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct SessionEntry {
    cart: SimpleCart,
    touched_at: DateTime<Utc>,
}

/// 匿名用户的服务端购物车（Cookie 放不下的部分）
///
/// 以 (session_id, slot) 为键，闲置超过 ttl 的条目由后台任务清理。
#[derive(Clone)]
pub struct SessionCartStore {
    inner: Arc<RwLock<HashMap<(String, CartSlot), SessionEntry>>>,
    ttl: Duration,
}

impl SessionCartStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs.max(60)),
        }
    }

    pub async fn get(&self, session_id: &str, slot: CartSlot) -> SimpleCart {
        let mut map = self.inner.write().await;
        let now = Utc::now();
        let key = (session_id.to_string(), slot);
        match map.get_mut(&key) {
            Some(entry) if now - entry.touched_at <= self.ttl => {
                entry.touched_at = now;
                entry.cart.clone()
            }
            Some(_) => {
                map.remove(&key);
                SimpleCart::new()
            }
            None => SimpleCart::new(),
        }
    }

    /// 空购物车等同于删除
    pub async fn put(&self, session_id: &str, slot: CartSlot, cart: SimpleCart) {
        let mut map = self.inner.write().await;
        let key = (session_id.to_string(), slot);
        if cart.is_empty() {
            map.remove(&key);
        } else {
            map.insert(
                key,
                SessionEntry {
                    cart,
                    touched_at: Utc::now(),
                },
            );
        }
    }

    pub async fn remove(&self, session_id: &str, slot: CartSlot) {
        self.inner
            .write()
            .await
            .remove(&(session_id.to_string(), slot));
    }

    pub async fn sweep_expired(&self) -> usize {
        self.sweep_older_than(Utc::now() - self.ttl).await
    }

    async fn sweep_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, entry| entry.touched_at >= cutoff);
        before - map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_and_remove() {
        let store = SessionCartStore::new(3600);
        store
            .put("abc", CartSlot::Standing, SimpleCart::single(1, 2))
            .await;
        assert_eq!(store.get("abc", CartSlot::Standing).await.amount_of(1), 2);
        assert!(store.get("abc", CartSlot::BuyNow).await.is_empty());

        store.put("abc", CartSlot::Standing, SimpleCart::new()).await;
        assert!(store.get("abc", CartSlot::Standing).await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_drops_idle_entries() {
        let store = SessionCartStore::new(3600);
        store
            .put("old", CartSlot::Standing, SimpleCart::single(3, 1))
            .await;
        let removed = store
            .sweep_older_than(Utc::now() + Duration::seconds(1))
            .await;
        assert_eq!(removed, 1);
        assert_eq!(store.sweep_expired().await, 0);
    }
}
