use super::CartOwner;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 按购物车所有者串行化读-改-写（仅限单实例部署）
#[derive(Clone, Default)]
pub struct CartLocks {
    inner: Arc<Mutex<HashMap<CartOwner, Arc<Mutex<()>>>>>,
}

impl CartLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, owner: &CartOwner) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().await;
            map.entry(owner.clone()).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// 清理当前无人持有的锁
    pub async fn prune(&self) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, m| Arc::strong_count(m) > 1);
        before - map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_owner_is_serialized() {
        let locks = CartLocks::new();
        let owner = CartOwner::Customer(1);

        let guard = locks.lock(&owner).await;
        let locks2 = locks.clone();
        let owner2 = owner.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks2.lock(&owner2).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_owners_do_not_block() {
        let locks = CartLocks::new();
        let _a = locks.lock(&CartOwner::Customer(1)).await;
        let _b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.lock(&CartOwner::Guest("s-1".into())),
        )
        .await
        .expect("guest lock should not wait for customer lock");
    }

    #[tokio::test]
    async fn test_prune_releases_idle_entries() {
        let locks = CartLocks::new();
        {
            let _g = locks.lock(&CartOwner::Customer(3)).await;
        }
        assert_eq!(locks.prune().await, 1);
    }
}
