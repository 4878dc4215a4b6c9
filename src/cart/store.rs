use super::{CartOwner, CartSlot, SessionCartStore, SimpleCart, SimpleCartItem};
use crate::config::CartConfig;
use crate::error::{AppError, AppResult};
use actix_web::cookie::{Cookie, CookieJar, Key, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::cell::RefCell;

pub const STANDING_COOKIE_PREFIX: &str = "Cart_";
pub const BUY_NOW_COOKIE_PREFIX: &str = "BuyNowCart_";
pub const GUEST_STANDING_COOKIE: &str = "GlobalCartToken";
pub const GUEST_BUY_NOW_COOKIE: &str = "BuyNowCart_Guest";
pub const SESSION_COOKIE: &str = "WebShopSession";

const STANDING_LIFETIME_DAYS: i64 = 3650;
const BUY_NOW_LIFETIME_HOURS: i64 = 1;

/// 保存结果：因 Cookie 容量限制而未能保存的条目
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub dropped: Vec<SimpleCartItem>,
}

/// 购物车存储抽象
#[async_trait(?Send)]
pub trait CartStore {
    async fn load(&self, owner: &CartOwner, slot: CartSlot) -> AppResult<SimpleCart>;

    async fn save(
        &self,
        owner: &CartOwner,
        slot: CartSlot,
        cart: &SimpleCart,
    ) -> AppResult<SaveOutcome>;

    async fn clear(&self, owner: &CartOwner, slot: CartSlot) -> AppResult<()>;
}

/// 应用级购物车存储配置（加密密钥 + 会话存储），每个请求据此创建 [`CookieCartStore`]
#[derive(Clone)]
pub struct CartStorage {
    key: Key,
    secure: bool,
    max_cookie_bytes: usize,
    sessions: SessionCartStore,
}

impl CartStorage {
    pub fn new(config: &CartConfig) -> AppResult<Self> {
        if config.cookie_secret.len() < 32 {
            return Err(AppError::ConfigError(
                "cart.cookie_secret must be at least 32 bytes".to_string(),
            ));
        }
        Ok(Self {
            key: Key::derive_from(config.cookie_secret.as_bytes()),
            secure: config.secure_cookies,
            max_cookie_bytes: config.max_cookie_bytes,
            sessions: SessionCartStore::new(config.session_ttl_secs),
        })
    }

    pub fn sessions(&self) -> &SessionCartStore {
        &self.sessions
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn for_request(&self, req: &HttpRequest) -> CookieCartStore {
        let cookies = req
            .cookies()
            .map(|c| c.clone())
            .unwrap_or_default();
        self.from_cookies(cookies)
    }

    pub fn from_cookies(
        &self,
        cookies: impl IntoIterator<Item = Cookie<'static>>,
    ) -> CookieCartStore {
        let mut jar = CookieJar::new();
        for cookie in cookies {
            jar.add_original(cookie);
        }
        CookieCartStore {
            jar: RefCell::new(jar),
            storage: self.clone(),
        }
    }
}

/// 单个请求内的购物车存储：
/// - 登录客户：加密 Cookie `Cart_{id}` / `BuyNowCart_{id}`
/// - 匿名用户：加密 Cookie `GlobalCartToken` / `BuyNowCart_Guest`，放不下的条目转存到会话
pub struct CookieCartStore {
    jar: RefCell<CookieJar>,
    storage: CartStorage,
}

impl CookieCartStore {
    /// 匿名会话 ID，不存在时生成并写入 Cookie
    pub fn guest_session_id(&self) -> String {
        if let Some(c) = self.jar.borrow().get(SESSION_COOKIE)
            && !c.value().is_empty()
        {
            return c.value().to_string();
        }
        let id = uuid::Uuid::new_v4().to_string();
        let cookie = Cookie::build(SESSION_COOKIE, id.clone())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.storage.secure)
            .finish();
        self.jar.borrow_mut().add(cookie);
        id
    }

    pub fn owner_for(&self, customer_id: Option<i32>) -> CartOwner {
        match customer_id {
            Some(id) => CartOwner::Customer(id),
            None => CartOwner::Guest(self.guest_session_id()),
        }
    }

    /// 本次请求需要写回客户端的 Cookie（包括删除）
    pub fn response_cookies(&self) -> Vec<Cookie<'static>> {
        self.jar.borrow().delta().cloned().collect()
    }

    pub fn apply(&self, resp: &mut HttpResponse) -> AppResult<()> {
        for cookie in self.response_cookies() {
            resp.add_cookie(&cookie)
                .map_err(|e| AppError::InternalError(format!("Failed to set cookie: {e}")))?;
        }
        Ok(())
    }

    /// 注销时丢弃匿名会话
    pub async fn forget_guest(&self) {
        let session_id = self
            .jar
            .borrow()
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string());
        if let Some(session_id) = session_id {
            self.storage
                .sessions
                .remove(&session_id, CartSlot::Standing)
                .await;
            self.storage
                .sessions
                .remove(&session_id, CartSlot::BuyNow)
                .await;
            self.remove_cookie(SESSION_COOKIE);
        }
        self.remove_cookie(GUEST_STANDING_COOKIE);
        self.remove_cookie(GUEST_BUY_NOW_COOKIE);
    }

    fn cookie_name(owner: &CartOwner, slot: CartSlot) -> String {
        match (owner, slot) {
            (CartOwner::Customer(id), CartSlot::Standing) => {
                format!("{STANDING_COOKIE_PREFIX}{id}")
            }
            (CartOwner::Customer(id), CartSlot::BuyNow) => format!("{BUY_NOW_COOKIE_PREFIX}{id}"),
            (CartOwner::Guest(_), CartSlot::Standing) => GUEST_STANDING_COOKIE.to_string(),
            (CartOwner::Guest(_), CartSlot::BuyNow) => GUEST_BUY_NOW_COOKIE.to_string(),
        }
    }

    fn read_cookie(&self, name: &str) -> SimpleCart {
        let jar = self.jar.borrow();
        let Some(cookie) = jar.private(&self.storage.key).get(name) else {
            return SimpleCart::new();
        };
        match serde_json::from_str::<SimpleCart>(cookie.value()) {
            Ok(cart) => cart.normalized(),
            Err(e) => {
                log::warn!("Discarding unreadable cart cookie {name}: {e}");
                SimpleCart::new()
            }
        }
    }

    /// 写入加密 Cookie，返回加密后的值长度
    fn write_cookie(&self, name: &str, slot: CartSlot, cart: &SimpleCart) -> AppResult<usize> {
        let payload = serde_json::to_string(cart)?;
        let lifetime = match slot {
            CartSlot::Standing => CookieDuration::days(STANDING_LIFETIME_DAYS),
            CartSlot::BuyNow => CookieDuration::hours(BUY_NOW_LIFETIME_HOURS),
        };
        let cookie = Cookie::build(name.to_string(), payload)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.storage.secure)
            .max_age(lifetime)
            .finish();

        let mut jar = self.jar.borrow_mut();
        jar.private_mut(&self.storage.key).add(cookie);
        Ok(jar.get(name).map(|c| c.value().len()).unwrap_or(0))
    }

    fn remove_cookie(&self, name: &str) {
        let removal = Cookie::build(name.to_string(), "").path("/").finish();
        self.jar.borrow_mut().remove(removal);
    }

    /// 尽量写入 Cookie，超出容量的尾部条目按原顺序返回
    fn write_fitting(&self, name: &str, slot: CartSlot, cart: &SimpleCart) -> AppResult<Vec<SimpleCartItem>> {
        let mut kept = cart.items.clone();
        let mut overflow = Vec::new();
        loop {
            if kept.is_empty() {
                self.remove_cookie(name);
                break;
            }
            let len = self.write_cookie(name, slot, &SimpleCart { items: kept.clone() })?;
            if len <= self.storage.max_cookie_bytes {
                break;
            }
            if let Some(item) = kept.pop() {
                overflow.push(item);
            }
        }
        overflow.reverse();
        Ok(overflow)
    }
}

#[async_trait(?Send)]
impl CartStore for CookieCartStore {
    async fn load(&self, owner: &CartOwner, slot: CartSlot) -> AppResult<SimpleCart> {
        let mut cart = self.read_cookie(&Self::cookie_name(owner, slot));
        if let CartOwner::Guest(session_id) = owner {
            let spilled = self.storage.sessions.get(session_id, slot).await;
            cart.merge(&spilled);
        }
        Ok(cart)
    }

    async fn save(
        &self,
        owner: &CartOwner,
        slot: CartSlot,
        cart: &SimpleCart,
    ) -> AppResult<SaveOutcome> {
        let name = Self::cookie_name(owner, slot);
        let overflow = self.write_fitting(&name, slot, cart)?;

        match owner {
            CartOwner::Guest(session_id) => {
                // Cookie 与会话中的条目互不重叠
                self.storage
                    .sessions
                    .put(session_id, slot, SimpleCart { items: overflow })
                    .await;
                Ok(SaveOutcome::default())
            }
            CartOwner::Customer(id) => {
                if !overflow.is_empty() {
                    log::warn!(
                        "Cart cookie for customer {id} exceeds {} bytes, dropped {} item(s)",
                        self.storage.max_cookie_bytes,
                        overflow.len()
                    );
                }
                Ok(SaveOutcome { dropped: overflow })
            }
        }
    }

    async fn clear(&self, owner: &CartOwner, slot: CartSlot) -> AppResult<()> {
        self.remove_cookie(&Self::cookie_name(owner, slot));
        if let CartOwner::Guest(session_id) = owner {
            self.storage.sessions.remove(session_id, slot).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> CartStorage {
        CartStorage::new(&CartConfig {
            cookie_secret: "0123456789abcdef0123456789abcdef-test".to_string(),
            secure_cookies: false,
            max_cookie_bytes: 4000,
            session_ttl_secs: 3600,
        })
        .unwrap()
    }

    fn big_cart(n: i32) -> SimpleCart {
        let mut cart = SimpleCart::new();
        for id in 1..=n {
            cart.add(100_000 + id, 1);
        }
        cart
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = CartStorage::new(&CartConfig {
            cookie_secret: "short".to_string(),
            secure_cookies: false,
            max_cookie_bytes: 4000,
            session_ttl_secs: 3600,
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cookie_round_trip_between_requests() {
        let storage = storage();
        let owner = CartOwner::Customer(5);

        let first = storage.from_cookies(Vec::new());
        first
            .save(&owner, CartSlot::Standing, &SimpleCart::single(42, 2))
            .await
            .unwrap();
        let cookies = first.response_cookies();
        let cart_cookie = cookies.iter().find(|c| c.name() == "Cart_5").unwrap();
        assert!(cart_cookie.http_only().unwrap_or(false));
        assert!(!cart_cookie.value().contains("product_detail_id"));

        let second = storage.from_cookies(cookies);
        let cart = second.load(&owner, CartSlot::Standing).await.unwrap();
        assert_eq!(cart.amount_of(42), 2);
        assert!(second.load(&owner, CartSlot::BuyNow).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_cookie_reads_as_empty() {
        let storage = storage();
        let store = storage.from_cookies(vec![Cookie::new("Cart_1", "not-encrypted")]);
        let cart = store
            .load(&CartOwner::Customer(1), CartSlot::Standing)
            .await
            .unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_customer_cart_over_limit_drops_trailing_items() {
        let storage = storage();
        let store = storage.from_cookies(Vec::new());
        let owner = CartOwner::Customer(9);
        let cart = big_cart(300);

        let outcome = store.save(&owner, CartSlot::Standing, &cart).await.unwrap();
        assert!(!outcome.dropped.is_empty());
        assert_eq!(outcome.dropped.last(), cart.items.last());

        let stored = storage
            .from_cookies(store.response_cookies())
            .load(&owner, CartSlot::Standing)
            .await
            .unwrap();
        assert_eq!(stored.items.len() + outcome.dropped.len(), 300);
        assert_eq!(stored.items.first(), cart.items.first());
    }

    #[tokio::test]
    async fn test_guest_cart_over_limit_spills_to_session() {
        let storage = storage();
        let store = storage.from_cookies(Vec::new());
        let owner = store.owner_for(None);
        let cart = big_cart(300);

        let outcome = store.save(&owner, CartSlot::Standing, &cart).await.unwrap();
        assert!(outcome.dropped.is_empty());

        let next = storage.from_cookies(store.response_cookies());
        assert_eq!(next.owner_for(None), owner);
        let loaded = next.load(&owner, CartSlot::Standing).await.unwrap();
        assert_eq!(loaded.items.len(), 300);
        assert_eq!(loaded.total_items(), 300);
    }

    #[tokio::test]
    async fn test_clear_removes_cookie() {
        let storage = storage();
        let owner = CartOwner::Customer(2);
        let first = storage.from_cookies(Vec::new());
        first
            .save(&owner, CartSlot::BuyNow, &SimpleCart::single(1, 1))
            .await
            .unwrap();

        let second = storage.from_cookies(first.response_cookies());
        second.clear(&owner, CartSlot::BuyNow).await.unwrap();
        let removal = second
            .response_cookies()
            .into_iter()
            .find(|c| c.name() == "BuyNowCart_2")
            .unwrap();
        assert_eq!(removal.value(), "");
    }
}
