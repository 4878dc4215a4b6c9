use crate::entities::{category_entity as categories, product_entity as products};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{optional_text, require_text, unique_slug};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct CategoryService {
    pool: DatabaseConnection,
}

impl CategoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<CategoryResponse>> {
        let rows = categories::Entity::find()
            .order_by_asc(categories::Column::Ordering)
            .order_by_asc(categories::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: i32) -> AppResult<categories::Model> {
        categories::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn get(&self, id: i32) -> AppResult<CategoryResponse> {
        Ok(self.find(id).await?.into())
    }

    /// 校验上级分类，返回层级
    async fn resolve_level(&self, req: &CategoryRequest, own_id: Option<i32>) -> AppResult<i32> {
        let Some(parent_id) = req.parent_id else {
            return Ok(req.levels.unwrap_or(1));
        };
        if Some(parent_id) == own_id {
            return Err(AppError::ValidationError(
                "A category cannot be its own parent".to_string(),
            ));
        }
        let parent = categories::Entity::find_by_id(parent_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ValidationError("Parent category not found".to_string()))?;
        Ok(req.levels.unwrap_or(parent.levels + 1))
    }

    async fn alias_for(&self, req: &CategoryRequest, name: &str, exclude: Option<i32>) -> AppResult<String> {
        let source = optional_text(req.alias.clone()).unwrap_or_else(|| name.to_string());
        let pool = self.pool.clone();
        unique_slug(&source, "category", |alias| {
            let pool = pool.clone();
            async move {
                let mut q = categories::Entity::find().filter(categories::Column::Alias.eq(alias));
                if let Some(id) = exclude {
                    q = q.filter(categories::Column::Id.ne(id));
                }
                Ok::<bool, AppError>(q.count(&pool).await? > 0)
            }
        })
        .await
    }

    pub async fn create(&self, req: CategoryRequest) -> AppResult<CategoryResponse> {
        let cat_name = require_text("Category name", &req.cat_name)?;
        let levels = self.resolve_level(&req, None).await?;
        let alias = self.alias_for(&req, &cat_name, None).await?;

        let category = categories::ActiveModel {
            cat_name: Set(cat_name),
            description: Set(optional_text(req.description)),
            parent_id: Set(req.parent_id),
            levels: Set(levels),
            ordering: Set(req.ordering.unwrap_or(0)),
            published: Set(req.published.unwrap_or(true)),
            thumb: Set(optional_text(req.thumb)),
            alias: Set(alias),
            meta_title: Set(optional_text(req.meta_title)),
            meta_desc: Set(optional_text(req.meta_desc)),
            meta_key: Set(optional_text(req.meta_key)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(category.into())
    }

    pub async fn update(&self, id: i32, req: CategoryRequest) -> AppResult<CategoryResponse> {
        let category = self.find(id).await?;
        let cat_name = require_text("Category name", &req.cat_name)?;
        let levels = self.resolve_level(&req, Some(category.id)).await?;
        let alias = self.alias_for(&req, &cat_name, Some(category.id)).await?;

        let mut model = category.into_active_model();
        model.cat_name = Set(cat_name);
        model.description = Set(optional_text(req.description));
        model.parent_id = Set(req.parent_id);
        model.levels = Set(levels);
        if let Some(ordering) = req.ordering {
            model.ordering = Set(ordering);
        }
        if let Some(published) = req.published {
            model.published = Set(published);
        }
        model.thumb = Set(optional_text(req.thumb));
        model.alias = Set(alias);
        model.meta_title = Set(optional_text(req.meta_title));
        model.meta_desc = Set(optional_text(req.meta_desc));
        model.meta_key = Set(optional_text(req.meta_key));
        Ok(model.update(&self.pool).await?.into())
    }

    /// 仍有商品或子分类时拒绝删除
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let category = self.find(id).await?;
        let product_count = products::Entity::find()
            .filter(products::Column::CatId.eq(category.id))
            .count(&self.pool)
            .await?;
        if product_count > 0 {
            return Err(AppError::ValidationError(format!(
                "{} still has {product_count} product(s)",
                category.cat_name
            )));
        }
        let child_count = categories::Entity::find()
            .filter(categories::Column::ParentId.eq(category.id))
            .count(&self.pool)
            .await?;
        if child_count > 0 {
            return Err(AppError::ValidationError(format!(
                "{} still has sub-categories",
                category.cat_name
            )));
        }
        categories::Entity::delete_by_id(category.id)
            .exec(&self.pool)
            .await?;
        log::info!("Category {} deleted", category.id);
        Ok(())
    }

    pub async fn toggle(&self, id: i32) -> AppResult<ToggleResponse> {
        let category = self.find(id).await?;
        let active = !category.published;
        let mut model = category.into_active_model();
        model.published = Set(active);
        let category = model.update(&self.pool).await?;
        Ok(ToggleResponse {
            id: category.id,
            active,
        })
    }
}
