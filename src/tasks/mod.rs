//! 后台定时任务
//!
//! 目前只有购物车相关的内存清理：闲置的匿名会话购物车，以及无人持有的购物车锁。
//! 启动时调用一次 `spawn_all`。

use crate::cart::{CartLocks, CartStorage};
use std::time::Duration;

/// 清理间隔
const SWEEP_INTERVAL_SECS: u64 = 300;

/// 启动全部后台任务（通过 `tokio::spawn` 分离，不阻塞）
pub fn spawn_all(storage: CartStorage, locks: CartLocks) {
    // 匿名会话购物车过期清理
    {
        let sessions = storage.sessions().clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
                let removed = sessions.sweep_expired().await;
                if removed > 0 {
                    log::info!("Expired guest carts removed: {removed}");
                }
            }
        });
    }

    // 购物车锁表清理
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
            let pruned = locks.prune().await;
            if pruned > 0 {
                log::debug!("Idle cart locks pruned: {pruned}");
            }
        }
    });
}
