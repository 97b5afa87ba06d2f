//! In-memory repositories for exercising the real managers without Postgres.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    BusinessType, ItemStatus, LimitGuard, NewPlan, NewProduct, NewSeller, NewService, NewStore,
    NewUser, PageRequest, PlanUpdate, Product, ProductUpdate, ProductVariant, QuotaKind, Seller,
    SellerDocument, SellerFilter, SellerProfile, Service, ServiceUpdate, Store, StoreFilter,
    StoreStatus, StoreUpdate, SubscriptionPlan, SubscriptionStatus, User, VariantUpdate,
    VerificationStatus,
};
use marketplace_lib::repository::{
    PlanRepository, ProductRepository, SellerRepository, ServiceRepository, StoreRepository,
    UserRepository, VariantRecord,
};

/// One shared store behind every repository trait.
#[derive(Default)]
pub struct InMemory {
    pub users: Mutex<Vec<User>>,
    pub plans: Mutex<Vec<SubscriptionPlan>>,
    pub sellers: Mutex<Vec<Seller>>,
    pub stores: Mutex<Vec<Store>>,
    pub products: Mutex<Vec<Product>>,
    pub services: Mutex<Vec<Service>>,
}

impl InMemory {
    /// A seller without a plan, owning an approved store.
    pub fn add_seller_with_store(&self) -> (Seller, Store) {
        let now = Utc::now();
        let seller = Seller {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            owner_name: "Ravi".to_string(),
            business_type: BusinessType::Shop,
            verification_status: VerificationStatus::Verified,
            subscription_plan_id: None,
            subscription_status: SubscriptionStatus::Expired,
            subscription_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        let store = Store {
            id: Uuid::new_v4(),
            seller_id: seller.id,
            name: "Chai Point".to_string(),
            description: None,
            category: "Beverages".to_string(),
            address: domain::Address {
                area: "Indiranagar".to_string(),
                pincode: "560038".to_string(),
                ward: None,
                landmark: None,
            },
            contact_phone: "9876543210".to_string(),
            contact_email: "shop@example.com".to_string(),
            logo: None,
            cover_image: None,
            status: StoreStatus::Approved,
            is_featured: false,
            created_at: now,
            updated_at: now,
            approved_at: Some(now),
            approved_by: None,
        };

        self.sellers.lock().unwrap().push(seller.clone());
        self.stores.lock().unwrap().push(store.clone());
        (seller, store)
    }

    fn store_of(&self, store_id: Uuid) -> Option<Store> {
        self.stores
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == store_id)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            role: user.role,
            phone: user.phone,
            avatar: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl PlanRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<SubscriptionPlan>> {
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn list_active(&self) -> AppResult<Vec<SubscriptionPlan>> {
        let mut plans: Vec<_> = self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        plans.sort_by_key(|p| p.priority);
        Ok(plans)
    }

    async fn list_all(&self) -> AppResult<Vec<SubscriptionPlan>> {
        let mut plans = self.plans.lock().unwrap().clone();
        plans.sort_by_key(|p| p.priority);
        Ok(plans)
    }

    async fn create(&self, plan: NewPlan) -> AppResult<SubscriptionPlan> {
        let now = Utc::now();
        let created = SubscriptionPlan {
            id: Uuid::new_v4(),
            name: plan.name,
            slug: plan.slug,
            description: plan.description,
            price: plan.price,
            max_products: plan.max_products,
            max_services: plan.max_services,
            features: plan.features,
            commission_rate: plan.commission_rate,
            is_featured: plan.is_featured,
            analytics_access: plan.analytics_access,
            priority: plan.priority,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.plans.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: PlanUpdate) -> AppResult<SubscriptionPlan> {
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        if let Some(is_active) = changes.is_active {
            plan.is_active = is_active;
        }
        if let Some(max_products) = changes.max_products {
            plan.max_products = max_products;
        }
        plan.updated_at = Utc::now();
        Ok(plan.clone())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.plans.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl SellerRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Seller>> {
        Ok(self
            .sellers
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Seller>> {
        Ok(self
            .sellers
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn find_profile_by_user_id(&self, user_id: Uuid) -> AppResult<Option<SellerProfile>> {
        let Some(seller) = SellerRepository::find_by_user_id(self, user_id).await? else {
            return Ok(None);
        };
        let store = StoreRepository::find_by_seller_id(self, seller.id).await?;
        Ok(Some(SellerProfile { seller, store }))
    }

    async fn find_profile_by_id(&self, id: Uuid) -> AppResult<Option<SellerProfile>> {
        let Some(seller) = SellerRepository::find_by_id(self, id).await? else {
            return Ok(None);
        };
        let store = StoreRepository::find_by_seller_id(self, seller.id).await?;
        Ok(Some(SellerProfile { seller, store }))
    }

    async fn create_with_store(
        &self,
        _seller: NewSeller,
        _store: NewStore,
    ) -> AppResult<SellerProfile> {
        unimplemented!("onboarding is covered by the service unit tests")
    }

    async fn find_documents(&self, _seller_id: Uuid) -> AppResult<Vec<SellerDocument>> {
        unimplemented!("document review is covered by the service unit tests")
    }

    async fn update_subscription(
        &self,
        seller_id: Uuid,
        plan_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Seller> {
        let mut sellers = self.sellers.lock().unwrap();
        let seller = sellers
            .iter_mut()
            .find(|s| s.id == seller_id)
            .ok_or(AppError::NotFound)?;
        seller.subscription_plan_id = Some(plan_id);
        seller.subscription_status = SubscriptionStatus::Active;
        seller.subscription_expires_at = Some(expires_at);
        seller.updated_at = Utc::now();
        Ok(seller.clone())
    }

    async fn list(
        &self,
        _filter: SellerFilter,
        _page: PageRequest,
    ) -> AppResult<(Vec<Seller>, u64)> {
        let sellers = self.sellers.lock().unwrap().clone();
        let total = sellers.len() as u64;
        Ok((sellers, total))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.sellers.lock().unwrap().len() as u64)
    }

    async fn count_active_subscriptions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        Ok(self
            .sellers
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.has_active_subscription(now))
            .count() as u64)
    }
}

#[async_trait]
impl StoreRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        Ok(self.store_of(id))
    }

    async fn find_by_seller_id(&self, seller_id: Uuid) -> AppResult<Option<Store>> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.seller_id == seller_id)
            .cloned())
    }

    async fn create(&self, _seller_id: Uuid, _store: NewStore) -> AppResult<Store> {
        unimplemented!("stores are seeded through add_seller_with_store")
    }

    async fn update(&self, _id: Uuid, _changes: StoreUpdate) -> AppResult<Store> {
        unimplemented!("store edits are covered by the service unit tests")
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: StoreStatus,
        reviewer: Option<Uuid>,
    ) -> AppResult<Store> {
        let mut stores = self.stores.lock().unwrap();
        let store = stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound)?;
        store.status = status;
        if status == StoreStatus::Approved {
            store.approved_at = Some(Utc::now());
            store.approved_by = reviewer;
        }
        Ok(store.clone())
    }

    async fn search(
        &self,
        _filter: StoreFilter,
        _page: PageRequest,
    ) -> AppResult<(Vec<Store>, u64)> {
        let stores = self.stores.lock().unwrap().clone();
        let total = stores.len() as u64;
        Ok((stores, total))
    }

    async fn list_pending(&self) -> AppResult<Vec<Store>> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == StoreStatus::Pending)
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.stores.lock().unwrap().len() as u64)
    }

    async fn count_by_status(&self, status: StoreStatus) -> AppResult<u64> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == status)
            .count() as u64)
    }
}

#[async_trait]
impl ProductRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        _page: PageRequest,
    ) -> AppResult<(Vec<Product>, u64)> {
        let products: Vec<_> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id && status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        let total = products.len() as u64;
        Ok((products, total))
    }

    async fn create_within_limit(
        &self,
        product: NewProduct,
        guard: LimitGuard,
    ) -> AppResult<Product> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let variants = product
            .variants
            .into_iter()
            .map(|v| ProductVariant {
                id: Uuid::new_v4(),
                product_id: id,
                sku: v.sku,
                name: v.name,
                attributes: v.attributes,
                price: v.price,
                compare_at_price: v.compare_at_price,
                stock: v.stock,
                is_available: v.is_available,
                images: v.images,
                created_at: now,
                updated_at: now,
            })
            .collect();
        let created = Product {
            id,
            store_id: product.store_id,
            title: product.title,
            description: product.description,
            category: product.category,
            images: product.images,
            status: ItemStatus::Draft,
            is_draft: true,
            variants,
            created_at: now,
            updated_at: now,
        };
        // count and insert under one lock, like the seller row lock
        let mut products = self.products.lock().unwrap();
        let current = products
            .iter()
            .filter(|p| p.store_id == created.store_id && p.status != ItemStatus::Archived)
            .count() as u64;
        if !guard.admits(current) {
            return Err(guard.exceeded(QuotaKind::Products).into());
        }
        products.push(created.clone());
        Ok(created)
    }

    async fn update(&self, _id: Uuid, _changes: ProductUpdate) -> AppResult<Product> {
        unimplemented!("product edits are covered by the service unit tests")
    }

    async fn archive(&self, id: Uuid) -> AppResult<Product> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        product.status = ItemStatus::Archived;
        product.is_draft = false;
        Ok(product.clone())
    }

    async fn find_variant(&self, variant_id: Uuid) -> AppResult<Option<VariantRecord>> {
        Ok(self.products.lock().unwrap().iter().find_map(|p| {
            p.variants
                .iter()
                .find(|v| v.id == variant_id)
                .map(|v| VariantRecord {
                    variant: v.clone(),
                    product_title: p.title.clone(),
                    product_status: p.status,
                    store_id: p.store_id,
                })
        }))
    }

    async fn find_variants(&self, variant_ids: Vec<Uuid>) -> AppResult<Vec<VariantRecord>> {
        let mut records = Vec::new();
        for id in variant_ids {
            if let Some(record) = self.find_variant(id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn update_variant(
        &self,
        _variant_id: Uuid,
        _changes: VariantUpdate,
    ) -> AppResult<ProductVariant> {
        unimplemented!("variant edits are covered by the service unit tests")
    }

    async fn existing_skus(&self, skus: Vec<String>) -> AppResult<Vec<String>> {
        let products = self.products.lock().unwrap();
        Ok(skus
            .into_iter()
            .filter(|sku| {
                products
                    .iter()
                    .flat_map(|p| p.variants.iter())
                    .any(|v| &v.sku == sku)
            })
            .collect())
    }

    async fn count_live_by_store(&self, store_id: Uuid) -> AppResult<u64> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id && p.status != ItemStatus::Archived)
            .count() as u64)
    }
}

#[async_trait]
impl ServiceRepository for InMemory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        _page: PageRequest,
    ) -> AppResult<(Vec<Service>, u64)> {
        let services: Vec<_> = self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.store_id == store_id && status.map_or(true, |st| s.status == st))
            .cloned()
            .collect();
        let total = services.len() as u64;
        Ok((services, total))
    }

    async fn create_within_limit(
        &self,
        service: NewService,
        guard: LimitGuard,
    ) -> AppResult<Service> {
        let now = Utc::now();
        let created = Service {
            id: Uuid::new_v4(),
            store_id: service.store_id,
            title: service.title,
            description: service.description,
            category: service.category,
            images: service.images,
            duration: service.duration,
            base_price: service.base_price,
            price_variants: service.price_variants,
            availability: service.availability,
            location_type: service.location_type,
            status: ItemStatus::Draft,
            is_draft: true,
            created_at: now,
            updated_at: now,
        };
        let mut services = self.services.lock().unwrap();
        let current = services
            .iter()
            .filter(|s| s.store_id == created.store_id && s.status != ItemStatus::Archived)
            .count() as u64;
        if !guard.admits(current) {
            return Err(guard.exceeded(QuotaKind::Services).into());
        }
        services.push(created.clone());
        Ok(created)
    }

    async fn update(&self, _id: Uuid, _changes: ServiceUpdate) -> AppResult<Service> {
        unimplemented!("service edits are covered by the service unit tests")
    }

    async fn archive(&self, id: Uuid) -> AppResult<Service> {
        let mut services = self.services.lock().unwrap();
        let service = services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound)?;
        service.status = ItemStatus::Archived;
        Ok(service.clone())
    }

    async fn count_live_by_store(&self, store_id: Uuid) -> AppResult<u64> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.store_id == store_id && s.status != ItemStatus::Archived)
            .count() as u64)
    }
}
