//! Product and variant repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel, LoaderTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::product::{self, Entity as ProductEntity};
use super::entities::product_variant::{self, Entity as VariantEntity};
use super::entities::{parse_or, to_json};
use super::{conflict_on_unique, lock_seller};
use crate::infra::in_transaction;
use common::{AppError, AppResult};
use domain::{
    ItemStatus, LimitGuard, NewProduct, PageRequest, Product, ProductUpdate, ProductVariant,
    QuotaKind, VariantUpdate,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A variant together with the product fields order pricing and ownership need.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub variant: ProductVariant,
    pub product_title: String,
    pub product_status: ItemStatus,
    pub store_id: Uuid,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Product with its variants, archived included
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Newest first, optionally filtered by status
    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Insert the product and variants if the seller is still under `guard.max`.
    ///
    /// The count and insert run under a lock on the seller row.
    async fn create_within_limit(&self, product: NewProduct, guard: LimitGuard)
        -> AppResult<Product>;

    async fn update(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product>;

    /// Soft delete
    async fn archive(&self, id: Uuid) -> AppResult<Product>;

    async fn find_variant(&self, variant_id: Uuid) -> AppResult<Option<VariantRecord>>;

    async fn find_variants(&self, variant_ids: Vec<Uuid>) -> AppResult<Vec<VariantRecord>>;

    async fn update_variant(&self, variant_id: Uuid, changes: VariantUpdate)
        -> AppResult<ProductVariant>;

    /// Which of `skus` are already taken
    async fn existing_skus(&self, skus: Vec<String>) -> AppResult<Vec<String>>;

    /// Products that are not archived
    async fn count_live_by_store(&self, store_id: Uuid) -> AppResult<u64>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_variants(&self, model: product::Model) -> AppResult<Product> {
        let variants = model
            .find_related(VariantEntity)
            .order_by_asc(product_variant::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(model.into_product(variants))
    }
}

fn variant_record(
    (variant, product): (product_variant::Model, Option<product::Model>),
) -> Option<VariantRecord> {
    let product = product?;
    Some(VariantRecord {
        variant: ProductVariant::from(variant),
        product_title: product.title,
        product_status: parse_or(&product.status, ItemStatus::Draft),
        store_id: product.store_id,
    })
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(model) => Ok(Some(self.with_variants(model).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut query = ProductEntity::find().filter(product::Column::StoreId.eq(store_id));
        if let Some(status) = status {
            query = query.filter(product::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(product::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(AppError::from)?;

        let variants = models
            .load_many(VariantEntity, &self.db)
            .await
            .map_err(AppError::from)?;

        let products = models
            .into_iter()
            .zip(variants)
            .map(|(model, variants)| model.into_product(variants))
            .collect();

        Ok((products, total))
    }

    async fn create_within_limit(
        &self,
        new_product: NewProduct,
        guard: LimitGuard,
    ) -> AppResult<Product> {
        in_transaction(&self.db, IsolationLevel::ReadCommitted, move |txn| {
            Box::pin(async move {
                lock_seller(txn, guard.seller_id).await?;

                let current = ProductEntity::find()
                    .filter(product::Column::StoreId.eq(new_product.store_id))
                    .filter(product::Column::Status.ne(ItemStatus::Archived.as_str()))
                    .count(txn)
                    .await?;
                if !guard.admits(current) {
                    tracing::warn!(
                        seller_id = %guard.seller_id,
                        current,
                        max = guard.max,
                        "Product limit reached at insert"
                    );
                    return Err(guard.exceeded(QuotaKind::Products).into());
                }

                let now = chrono::Utc::now();
                let product_id = Uuid::new_v4();
                let product_model = product::ActiveModel {
                    id: Set(product_id),
                    store_id: Set(new_product.store_id),
                    title: Set(new_product.title),
                    description: Set(new_product.description),
                    category: Set(new_product.category),
                    images: Set(to_json(&new_product.images)),
                    status: Set(ItemStatus::Draft.to_string()),
                    is_draft: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await?;

                let mut variants = Vec::with_capacity(new_product.variants.len());
                for variant in new_product.variants {
                    let model = product_variant::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        product_id: Set(product_id),
                        sku: Set(variant.sku),
                        name: Set(variant.name),
                        attributes: Set(to_json(&variant.attributes)),
                        price: Set(variant.price),
                        compare_at_price: Set(variant.compare_at_price),
                        stock: Set(variant.stock),
                        is_available: Set(variant.is_available),
                        images: Set(to_json(&variant.images)),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| conflict_on_unique(e, "SKU"))?;
                    variants.push(model);
                }

                Ok(product_model.into_product(variants))
            })
        })
        .await
    }

    async fn update(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product> {
        let existing = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = existing.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(images) = changes.images {
            active.images = Set(to_json(&images));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        if let Some(is_draft) = changes.is_draft {
            active.is_draft = Set(is_draft);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.with_variants(model).await
    }

    async fn archive(&self, id: Uuid) -> AppResult<Product> {
        let existing = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = existing.into();
        active.status = Set(ItemStatus::Archived.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.with_variants(model).await
    }

    async fn find_variant(&self, variant_id: Uuid) -> AppResult<Option<VariantRecord>> {
        let result = VariantEntity::find_by_id(variant_id)
            .find_also_related(ProductEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.and_then(variant_record))
    }

    async fn find_variants(&self, variant_ids: Vec<Uuid>) -> AppResult<Vec<VariantRecord>> {
        if variant_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = VariantEntity::find()
            .filter(product_variant::Column::Id.is_in(variant_ids))
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().filter_map(variant_record).collect())
    }

    async fn update_variant(
        &self,
        variant_id: Uuid,
        changes: VariantUpdate,
    ) -> AppResult<ProductVariant> {
        let existing = VariantEntity::find_by_id(variant_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product_variant::ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(attributes) = changes.attributes {
            active.attributes = Set(to_json(&attributes));
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(compare) = changes.compare_at_price {
            active.compare_at_price = Set(Some(compare));
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }
        if let Some(available) = changes.is_available {
            active.is_available = Set(available);
        }
        if let Some(images) = changes.images {
            active.images = Set(to_json(&images));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(ProductVariant::from(model))
    }

    async fn existing_skus(&self, skus: Vec<String>) -> AppResult<Vec<String>> {
        if skus.is_empty() {
            return Ok(Vec::new());
        }

        VariantEntity::find()
            .select_only()
            .column(product_variant::Column::Sku)
            .filter(product_variant::Column::Sku.is_in(skus))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_live_by_store(&self, store_id: Uuid) -> AppResult<u64> {
        ProductEntity::find()
            .filter(product::Column::StoreId.eq(store_id))
            .filter(product::Column::Status.ne(ItemStatus::Archived.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
