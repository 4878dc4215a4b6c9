use crate::entities::{
    category_entity as categories, color_entity as colors, comment_entity as comments,
    order_detail_entity as order_details, product_detail_entity as variants,
    product_entity as products, promotion_product_entity as promotion_products,
    size_entity as sizes, supplier_entity as suppliers,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::inventory;
use crate::utils::{optional_text, require_text, unique_slug};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};

/// 后台商品与变体管理
#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
}

/// 校验后的商品字段
struct ProductFields {
    product_name: String,
    size_ids: Vec<i32>,
    color_ids: Vec<i32>,
    default_stock: i32,
}

impl ProductService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        query: &AdminProductQuery,
    ) -> AppResult<PaginatedResponse<ProductResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = products::Entity::find();
        if let Some(cat_id) = query.cat_id {
            base = base.filter(products::Column::CatId.eq(cat_id));
        }
        if let Some(active) = query.active {
            base = base.filter(products::Column::Active.eq(active));
        }
        if let Some(search) = optional_text(query.search.clone()) {
            base = base.filter(
                Condition::any()
                    .add(products::Column::ProductName.contains(&search))
                    .add(products::Column::Tags.contains(&search)),
            );
        }

        let total = base.clone().count(&self.pool).await? as i64;
        let items = base
            .order_by_desc(products::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::from_params(
            items.into_iter().map(ProductResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get(&self, product_id: i32) -> AppResult<AdminProductResponse> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        let rows = variants::Entity::find()
            .filter(variants::Column::ProductId.eq(product.id))
            .order_by_asc(variants::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(AdminProductResponse {
            product: product.into(),
            variants: describe_variants(&self.pool, rows).await?,
        })
    }

    async fn validate(&self, req: &ProductRequest) -> AppResult<ProductFields> {
        let product_name = require_text("Product name", &req.product_name)?;
        if req.price <= 0 {
            return Err(AppError::ValidationError(
                "Price must be greater than 0".to_string(),
            ));
        }
        if !(0..=100).contains(&req.discount) {
            return Err(AppError::ValidationError(
                "Discount must be between 0 and 100".to_string(),
            ));
        }
        if req.default_stock < 0 {
            return Err(AppError::ValidationError(
                "Stock cannot be negative".to_string(),
            ));
        }
        if let Some(cat_id) = req.cat_id
            && categories::Entity::find_by_id(cat_id)
                .one(&self.pool)
                .await?
                .is_none()
        {
            return Err(AppError::ValidationError("Category not found".to_string()));
        }
        if let Some(supplier_id) = req.supplier_id
            && suppliers::Entity::find_by_id(supplier_id)
                .one(&self.pool)
                .await?
                .is_none()
        {
            return Err(AppError::ValidationError("Supplier not found".to_string()));
        }

        let size_ids: Vec<i32> = req.size_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let color_ids: Vec<i32> = req.color_ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if !size_ids.is_empty() {
            let found = sizes::Entity::find()
                .filter(sizes::Column::Id.is_in(size_ids.clone()))
                .count(&self.pool)
                .await?;
            if found as usize != size_ids.len() {
                return Err(AppError::ValidationError("Unknown size".to_string()));
            }
        }
        if !color_ids.is_empty() {
            let found = colors::Entity::find()
                .filter(colors::Column::Id.is_in(color_ids.clone()))
                .count(&self.pool)
                .await?;
            if found as usize != color_ids.len() {
                return Err(AppError::ValidationError("Unknown color".to_string()));
            }
        }

        Ok(ProductFields {
            product_name,
            size_ids,
            color_ids,
            default_stock: req.default_stock,
        })
    }

    async fn alias_for(&self, req: &ProductRequest, name: &str, exclude: Option<i32>) -> AppResult<String> {
        let source = optional_text(req.alias.clone()).unwrap_or_else(|| name.to_string());
        let pool = self.pool.clone();
        unique_slug(&source, "product", |alias| {
            let pool = pool.clone();
            async move { product_alias_taken(&pool, alias, exclude).await }
        })
        .await
    }

    pub async fn create(&self, req: ProductRequest) -> AppResult<AdminProductResponse> {
        let fields = self.validate(&req).await?;
        let alias = self.alias_for(&req, &fields.product_name, None).await?;
        let now = Utc::now();

        let txn = self.pool.begin().await?;
        let product = products::ActiveModel {
            product_name: Set(fields.product_name.clone()),
            short_desc: Set(optional_text(req.short_desc)),
            description: Set(optional_text(req.description)),
            cat_id: Set(req.cat_id),
            supplier_id: Set(req.supplier_id),
            price: Set(req.price),
            discount: Set(req.discount),
            thumb: Set(optional_text(req.thumb)),
            best_seller: Set(req.best_seller),
            home_flag: Set(req.home_flag),
            active: Set(req.active.unwrap_or(true)),
            tags: Set(optional_text(req.tags)),
            alias: Set(alias),
            meta_title: Set(optional_text(req.meta_title)),
            meta_desc: Set(optional_text(req.meta_desc)),
            meta_key: Set(optional_text(req.meta_key)),
            units_in_stock: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_variant_matrix(&txn, product.id, &fields).await?;
        inventory::recalculate_units_in_stock(&txn, [product.id]).await?;
        txn.commit().await?;

        log::info!(
            "Product {} created with {} variant(s)",
            product.id,
            variant_matrix(&fields.size_ids, &fields.color_ids).len()
        );
        self.get(product.id).await
    }

    /// 编辑商品并整体替换变体：
    /// 未被订单引用的旧变体删除，被引用的停用并清零库存，然后按新的尺码×颜色生成变体
    pub async fn edit(&self, product_id: i32, req: ProductRequest) -> AppResult<AdminProductResponse> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        let fields = self.validate(&req).await?;
        let alias = if req.alias.is_none() && product.product_name == fields.product_name {
            product.alias.clone()
        } else {
            self.alias_for(&req, &fields.product_name, Some(product.id)).await?
        };

        let txn = self.pool.begin().await?;

        let mut model = product.into_active_model();
        model.product_name = Set(fields.product_name.clone());
        model.short_desc = Set(optional_text(req.short_desc));
        model.description = Set(optional_text(req.description));
        model.cat_id = Set(req.cat_id);
        model.supplier_id = Set(req.supplier_id);
        model.price = Set(req.price);
        model.discount = Set(req.discount);
        model.thumb = Set(optional_text(req.thumb));
        model.best_seller = Set(req.best_seller);
        model.home_flag = Set(req.home_flag);
        if let Some(active) = req.active {
            model.active = Set(active);
        }
        model.tags = Set(optional_text(req.tags));
        model.alias = Set(alias);
        model.meta_title = Set(optional_text(req.meta_title));
        model.meta_desc = Set(optional_text(req.meta_desc));
        model.meta_key = Set(optional_text(req.meta_key));
        model.updated_at = Set(Utc::now());
        let product = model.update(&txn).await?;

        let old_ids: Vec<i32> = variants::Entity::find()
            .filter(variants::Column::ProductId.eq(product.id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect();
        let referenced = referenced_variants(&txn, &old_ids).await?;
        let (keep, remove): (Vec<i32>, Vec<i32>) =
            old_ids.into_iter().partition(|id| referenced.contains(id));

        if !remove.is_empty() {
            variants::Entity::delete_many()
                .filter(variants::Column::Id.is_in(remove))
                .exec(&txn)
                .await?;
        }
        if !keep.is_empty() {
            variants::Entity::update_many()
                .col_expr(variants::Column::Active, sea_orm::sea_query::Expr::value(false))
                .col_expr(variants::Column::Stock, sea_orm::sea_query::Expr::value(0))
                .filter(variants::Column::Id.is_in(keep))
                .exec(&txn)
                .await?;
        }

        insert_variant_matrix(&txn, product.id, &fields).await?;
        inventory::recalculate_units_in_stock(&txn, [product.id]).await?;
        txn.commit().await?;

        log::info!("Product {} updated, variants replaced", product.id);
        self.get(product.id).await
    }

    /// 被订单引用的商品不能删除（可改为停用）
    pub async fn delete(&self, product_id: i32) -> AppResult<()> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let variant_ids: Vec<i32> = variants::Entity::find()
            .filter(variants::Column::ProductId.eq(product.id))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect();
        if !referenced_variants(&self.pool, &variant_ids).await?.is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} has been ordered and cannot be deleted; deactivate it instead",
                product.product_name
            )));
        }

        let txn = self.pool.begin().await?;
        promotion_products::Entity::delete_many()
            .filter(promotion_products::Column::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
        comments::Entity::delete_many()
            .filter(comments::Column::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
        variants::Entity::delete_many()
            .filter(variants::Column::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
        products::Entity::delete_by_id(product.id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Product {} deleted", product.id);
        Ok(())
    }

    pub async fn toggle(&self, product_id: i32) -> AppResult<ToggleResponse> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        let active = !product.active;
        let mut model = product.into_active_model();
        model.active = Set(active);
        model.updated_at = Set(Utc::now());
        let product = model.update(&self.pool).await?;
        Ok(ToggleResponse {
            id: product.id,
            active,
        })
    }

    pub async fn set_variant_stock(&self, variant_id: i32, stock: i32) -> AppResult<VariantResponse> {
        if stock < 0 {
            return Err(AppError::ValidationError(
                "Stock cannot be negative".to_string(),
            ));
        }
        let variant = variants::Entity::find_by_id(variant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product variant not found".to_string()))?;

        let txn = self.pool.begin().await?;
        let mut model = variant.into_active_model();
        model.stock = Set(stock);
        let variant = model.update(&txn).await?;
        inventory::recalculate_units_in_stock(&txn, [variant.product_id]).await?;
        txn.commit().await?;

        single_variant(&self.pool, variant).await
    }

    pub async fn toggle_variant(&self, variant_id: i32) -> AppResult<VariantResponse> {
        let variant = variants::Entity::find_by_id(variant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product variant not found".to_string()))?;

        let txn = self.pool.begin().await?;
        let active = !variant.active;
        let mut model = variant.into_active_model();
        model.active = Set(active);
        let variant = model.update(&txn).await?;
        inventory::recalculate_units_in_stock(&txn, [variant.product_id]).await?;
        txn.commit().await?;

        single_variant(&self.pool, variant).await
    }

    pub async fn list_sizes(&self) -> AppResult<Vec<SizeResponse>> {
        let rows = sizes::Entity::find()
            .order_by_asc(sizes::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_size(&self, req: SizeRequest) -> AppResult<SizeResponse> {
        let name = require_text("Size name", &req.name)?;
        let exists = sizes::Entity::find()
            .filter(sizes::Column::Name.eq(name.clone()))
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(AppError::ValidationError(format!("Size {name} already exists")));
        }
        let size = sizes::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(size.into())
    }

    pub async fn list_colors(&self) -> AppResult<Vec<ColorResponse>> {
        let rows = colors::Entity::find()
            .order_by_asc(colors::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_color(&self, req: ColorRequest) -> AppResult<ColorResponse> {
        let name = require_text("Color name", &req.name)?;
        let exists = colors::Entity::find()
            .filter(colors::Column::Name.eq(name.clone()))
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(AppError::ValidationError(format!("Color {name} already exists")));
        }
        let color = colors::ActiveModel {
            name: Set(name),
            code: Set(optional_text(req.code)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(color.into())
    }
}

/// 尺码×颜色笛卡尔积；空列表表示该维度不区分
pub fn variant_matrix(size_ids: &[i32], color_ids: &[i32]) -> Vec<(Option<i32>, Option<i32>)> {
    let sizes: Vec<Option<i32>> = if size_ids.is_empty() {
        vec![None]
    } else {
        size_ids.iter().copied().map(Some).collect()
    };
    let colors: Vec<Option<i32>> = if color_ids.is_empty() {
        vec![None]
    } else {
        color_ids.iter().copied().map(Some).collect()
    };
    sizes
        .iter()
        .flat_map(|s| colors.iter().map(move |c| (*s, *c)))
        .collect()
}

async fn insert_variant_matrix<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
    fields: &ProductFields,
) -> AppResult<()> {
    for (size_id, color_id) in variant_matrix(&fields.size_ids, &fields.color_ids) {
        variants::ActiveModel {
            product_id: Set(product_id),
            size_id: Set(size_id),
            color_id: Set(color_id),
            stock: Set(fields.default_stock),
            active: Set(true),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn referenced_variants<C: ConnectionTrait>(conn: &C, variant_ids: &[i32]) -> AppResult<BTreeSet<i32>> {
    if variant_ids.is_empty() {
        return Ok(BTreeSet::new());
    }
    Ok(order_details::Entity::find()
        .filter(order_details::Column::ProductDetailId.is_in(variant_ids.to_vec()))
        .all(conn)
        .await?
        .into_iter()
        .map(|d| d.product_detail_id)
        .collect())
}

async fn product_alias_taken(
    pool: &DatabaseConnection,
    alias: String,
    exclude: Option<i32>,
) -> AppResult<bool> {
    let mut query = products::Entity::find().filter(products::Column::Alias.eq(alias));
    if let Some(id) = exclude {
        query = query.filter(products::Column::Id.ne(id));
    }
    Ok(query.count(pool).await? > 0)
}

async fn single_variant(
    pool: &DatabaseConnection,
    variant: variants::Model,
) -> AppResult<VariantResponse> {
    describe_variants(pool, vec![variant])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Variant description missing".to_string()))
}

/// 变体附带尺码 / 颜色名称
pub async fn describe_variants<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<variants::Model>,
) -> AppResult<Vec<VariantResponse>> {
    let size_map: HashMap<i32, sizes::Model> = sizes::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let color_map: HashMap<i32, colors::Model> = colors::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(rows
        .into_iter()
        .map(|v| {
            let size = v.size_id.and_then(|id| size_map.get(&id));
            let color = v.color_id.and_then(|id| color_map.get(&id));
            VariantResponse {
                id: v.id,
                product_id: v.product_id,
                size_id: v.size_id,
                size_name: size.map(|s| s.name.clone()),
                color_id: v.color_id,
                color_name: color.map(|c| c.name.clone()),
                color_code: color.and_then(|c| c.code.clone()),
                stock: v.stock,
                active: v.active,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_matrix_cross_product() {
        let m = variant_matrix(&[1, 2], &[10, 20, 30]);
        assert_eq!(m.len(), 6);
        assert!(m.contains(&(Some(2), Some(30))));
    }

    #[test]
    fn test_variant_matrix_missing_dimension() {
        assert_eq!(variant_matrix(&[], &[5]), vec![(None, Some(5))]);
        assert_eq!(variant_matrix(&[], &[]), vec![(None, None)]);
    }
}
