use crate::cart::{
    CartLocks, CartOwner, CartSlot, CartStore, ReconciledCart, SimpleCart, VariantSnapshot,
    reconcile,
};
use crate::entities::{
    color_entity as colors, product_detail_entity as variants, product_entity as products,
    size_entity as sizes,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::HashMap;

/// 单个变体在购物车中的最大数量
const MAX_LINE_AMOUNT: i32 = 999;

#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
    locks: CartLocks,
}

impl CartService {
    pub fn new(pool: DatabaseConnection, locks: CartLocks) -> Self {
        Self { pool, locks }
    }

    pub fn locks(&self) -> &CartLocks {
        &self.locks
    }

    /// 读取购物车引用到的变体、商品、尺码、颜色的最新数据
    pub async fn load_snapshots<C: ConnectionTrait>(
        conn: &C,
        product_detail_ids: &[i32],
    ) -> AppResult<HashMap<i32, VariantSnapshot>> {
        if product_detail_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let variant_rows = variants::Entity::find()
            .filter(variants::Column::Id.is_in(product_detail_ids.to_vec()))
            .all(conn)
            .await?;

        let product_ids: Vec<i32> = variant_rows.iter().map(|v| v.product_id).collect();
        let size_ids: Vec<i32> = variant_rows.iter().filter_map(|v| v.size_id).collect();
        let color_ids: Vec<i32> = variant_rows.iter().filter_map(|v| v.color_id).collect();

        let product_map: HashMap<i32, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let size_map: HashMap<i32, String> = if size_ids.is_empty() {
            HashMap::new()
        } else {
            sizes::Entity::find()
                .filter(sizes::Column::Id.is_in(size_ids))
                .all(conn)
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect()
        };
        let color_map: HashMap<i32, String> = if color_ids.is_empty() {
            HashMap::new()
        } else {
            colors::Entity::find()
                .filter(colors::Column::Id.is_in(color_ids))
                .all(conn)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        Ok(variant_rows
            .into_iter()
            .map(|v| {
                let snap = VariantSnapshot {
                    product: product_map.get(&v.product_id).cloned(),
                    size_name: v.size_id.and_then(|id| size_map.get(&id).cloned()),
                    color_name: v.color_id.and_then(|id| color_map.get(&id).cloned()),
                    variant: v,
                };
                (snap.variant.id, snap)
            })
            .collect())
    }

    async fn reconcile_cart(&self, cart: &SimpleCart) -> AppResult<ReconciledCart> {
        let snapshots = Self::load_snapshots(&self.pool, &cart.product_detail_ids()).await?;
        Ok(reconcile(cart, &snapshots))
    }

    /// 读取并核对购物车；有条目被移除时写回存储。调用方需持有该所有者的锁。
    pub(crate) async fn read_reconciled(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
    ) -> AppResult<(ReconciledCart, Vec<String>)> {
        let cart = store.load(owner, slot).await?;
        let reconciled = self.reconcile_cart(&cart).await?;
        let mut warnings = reconciled.warnings();
        if reconciled.changed() {
            log::info!(
                "Cart of {owner:?} ({slot:?}) repaired, {} line(s) removed",
                reconciled.removed.len()
            );
            let outcome = store.save(owner, slot, &reconciled.cart).await?;
            warnings.extend(storage_warnings(outcome.dropped.len()));
        }
        Ok((reconciled, warnings))
    }

    /// 核对后保存购物车并生成响应
    async fn persist(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
        cart: SimpleCart,
    ) -> AppResult<CartResponse> {
        let reconciled = self.reconcile_cart(&cart).await?;
        let mut warnings = reconciled.warnings();
        let outcome = store.save(owner, slot, &reconciled.cart).await?;
        warnings.extend(storage_warnings(outcome.dropped.len()));

        let mut lines = reconciled.lines;
        if !outcome.dropped.is_empty() {
            lines.retain(|l| {
                !outcome
                    .dropped
                    .iter()
                    .any(|d| d.product_detail_id == l.product_detail_id)
            });
        }
        Ok(build_response(slot, lines, warnings))
    }

    /// 校验加入后的数量不超过库存
    async fn validate_amount(&self, product_detail_id: i32, amount: i32) -> AppResult<()> {
        if amount > MAX_LINE_AMOUNT {
            return Err(AppError::ValidationError(format!(
                "Quantity cannot exceed {MAX_LINE_AMOUNT}"
            )));
        }
        let snapshots = Self::load_snapshots(&self.pool, &[product_detail_id]).await?;
        let snap = snapshots
            .get(&product_detail_id)
            .ok_or_else(|| AppError::NotFound("Product variant not found".to_string()))?;
        let product = snap
            .product
            .as_ref()
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if !snap.variant.active || !product.active {
            return Err(AppError::ValidationError(format!(
                "{} is not available",
                product.product_name
            )));
        }
        if amount > snap.variant.stock {
            return Err(AppError::ValidationError(format!(
                "Only {} left in stock for {}",
                snap.variant.stock, product.product_name
            )));
        }
        Ok(())
    }

    pub async fn get_cart(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
    ) -> AppResult<CartResponse> {
        let _guard = self.locks.lock(owner).await;
        let (reconciled, warnings) = self.read_reconciled(store, owner, slot).await?;
        Ok(build_response(slot, reconciled.lines, warnings))
    }

    pub async fn add_item(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
        product_detail_id: i32,
        amount: i32,
    ) -> AppResult<CartResponse> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Quantity must be greater than 0".to_string(),
            ));
        }
        let _guard = self.locks.lock(owner).await;
        let mut cart = store.load(owner, slot).await?;
        let resulting = cart.amount_of(product_detail_id).saturating_add(amount);
        self.validate_amount(product_detail_id, resulting).await?;
        cart.add(product_detail_id, amount);
        self.persist(store, owner, slot, cart).await
    }

    pub async fn update_item(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
        product_detail_id: i32,
        amount: i32,
    ) -> AppResult<CartResponse> {
        let _guard = self.locks.lock(owner).await;
        let mut cart = store.load(owner, slot).await?;
        if amount > 0 {
            self.validate_amount(product_detail_id, amount).await?;
        } else if cart.amount_of(product_detail_id) == 0 {
            return Err(AppError::NotFound("Item is not in the cart".to_string()));
        }
        cart.set(product_detail_id, amount);
        self.persist(store, owner, slot, cart).await
    }

    pub async fn remove_item(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
        product_detail_id: i32,
    ) -> AppResult<CartResponse> {
        let _guard = self.locks.lock(owner).await;
        let mut cart = store.load(owner, slot).await?;
        if !cart.remove(product_detail_id) {
            return Err(AppError::NotFound("Item is not in the cart".to_string()));
        }
        self.persist(store, owner, slot, cart).await
    }

    /// 用客户端提交的条目替换常规购物车
    pub async fn sync_cart(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        items: Vec<CartItemInput>,
    ) -> AppResult<CartResponse> {
        let mut cart = SimpleCart::new();
        for item in items {
            cart.add(item.product_detail_id, item.amount);
        }
        let _guard = self.locks.lock(owner).await;
        for item in &cart.items {
            self.validate_amount(item.product_detail_id, item.amount).await?;
        }
        self.persist(store, owner, CartSlot::Standing, cart).await
    }

    /// "立即购买"：购物车只保留这一行
    pub async fn buy_now(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        product_detail_id: i32,
        amount: i32,
    ) -> AppResult<CartResponse> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Quantity must be greater than 0".to_string(),
            ));
        }
        let _guard = self.locks.lock(owner).await;
        self.validate_amount(product_detail_id, amount).await?;
        let cart = SimpleCart::single(product_detail_id, amount);
        self.persist(store, owner, CartSlot::BuyNow, cart).await
    }

    pub async fn clear(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
    ) -> AppResult<()> {
        let _guard = self.locks.lock(owner).await;
        store.clear(owner, slot).await
    }

    /// 登录时合并匿名购物车：
    /// - 匿名常规购物车（Cookie + 会话）累加进客户常规购物车
    /// - 匿名"立即购买"购物车非空时整体覆盖客户的"立即购买"购物车
    /// - 最后清空匿名存储
    pub async fn merge_on_login(
        &self,
        store: &dyn CartStore,
        guest: &CartOwner,
        customer_id: i32,
    ) -> AppResult<Vec<String>> {
        let customer = CartOwner::Customer(customer_id);
        let _customer_guard = self.locks.lock(&customer).await;
        let _guest_guard = self.locks.lock(guest).await;

        let mut warnings = Vec::new();

        let guest_standing = store.load(guest, CartSlot::Standing).await?;
        if !guest_standing.is_empty() {
            let mut merged = store.load(&customer, CartSlot::Standing).await?;
            merged.merge(&guest_standing);
            let outcome = store.save(&customer, CartSlot::Standing, &merged).await?;
            warnings.extend(storage_warnings(outcome.dropped.len()));
        }

        let guest_buy_now = store.load(guest, CartSlot::BuyNow).await?;
        if !guest_buy_now.is_empty() {
            store
                .save(&customer, CartSlot::BuyNow, &guest_buy_now)
                .await?;
        }

        store.clear(guest, CartSlot::Standing).await?;
        store.clear(guest, CartSlot::BuyNow).await?;

        log::info!(
            "Merged guest cart into customer {customer_id}: {} standing item(s), {} buy-now item(s)",
            guest_standing.items.len(),
            guest_buy_now.items.len()
        );
        Ok(warnings)
    }

    /// 下单成功后清理购物车。调用方需持有该所有者的锁。
    pub(crate) async fn remove_purchased(
        &self,
        store: &dyn CartStore,
        owner: &CartOwner,
        slot: CartSlot,
        purchased: &[i32],
    ) -> AppResult<()> {
        match slot {
            CartSlot::BuyNow => store.clear(owner, slot).await,
            CartSlot::Standing => {
                let mut cart = store.load(owner, slot).await?;
                for id in purchased {
                    cart.remove(*id);
                }
                store.save(owner, slot, &cart).await?;
                Ok(())
            }
        }
    }
}

fn storage_warnings(dropped: usize) -> Vec<String> {
    if dropped == 0 {
        Vec::new()
    } else {
        vec![format!(
            "Your cart is full; {dropped} item(s) could not be saved"
        )]
    }
}

fn build_response(slot: CartSlot, lines: Vec<CartLine>, warnings: Vec<String>) -> CartResponse {
    CartResponse {
        slot,
        total_items: lines.iter().map(|l| l.amount).sum(),
        subtotal: lines.iter().map(|l| l.line_total).sum(),
        lines,
        warnings,
    }
}
