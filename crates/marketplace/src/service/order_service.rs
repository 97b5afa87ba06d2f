//! Order placement and fulfilment status.
//!
//! Line prices always come from the live catalog; the stored items are a
//! snapshot that later catalog edits never touch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    ItemStatus, NewOrder, Order, OrderItem, OrderLine, OrderRequest, OrderStatus, OrderType,
    PageRequest, Store,
};

use crate::repository::{OrderRepository, ProductRepository, ServiceRepository, StoreRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Resolve prices, check availability and persist a pending order.
    async fn create(&self, request: OrderRequest) -> AppResult<Order>;

    async fn get(&self, id: Uuid) -> AppResult<Order>;

    async fn list_for_customer(
        &self,
        customer_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)>;

    async fn list_for_store(
        &self,
        store_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Terminal orders cannot move
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;
}

pub struct OrderManager {
    orders: Arc<dyn OrderRepository>,
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    services: Arc<dyn ServiceRepository>,
}

impl OrderManager {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        services: Arc<dyn ServiceRepository>,
    ) -> Self {
        Self {
            orders,
            stores,
            products,
            services,
        }
    }

    async fn product_items(&self, store: &Store, lines: &[OrderLine]) -> AppResult<Vec<OrderItem>> {
        let ids: Vec<Uuid> = lines.iter().filter_map(|l| l.variant_id).collect();
        let records: HashMap<Uuid, _> = self
            .products
            .find_variants(ids)
            .await?
            .into_iter()
            .map(|r| (r.variant.id, r))
            .collect();

        // stock is checked against everything requested for a variant
        let mut requested: HashMap<Uuid, u64> = HashMap::new();
        for line in lines {
            if let Some(id) = line.variant_id {
                let total = requested.entry(id).or_default();
                *total = total
                    .checked_add(u64::from(line.quantity))
                    .ok_or_else(|| AppError::validation("Requested quantity is too large"))?;
            }
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let variant_id = line
                .variant_id
                .ok_or_else(|| AppError::validation("Product order items require a variantId"))?;

            let record = records
                .get(&variant_id)
                .filter(|r| r.store_id == store.id && r.product_status == ItemStatus::Active)
                .ok_or_else(|| {
                    AppError::validation(format!("Variant {} is not available", variant_id))
                })?;

            if matches!(line.product_id, Some(id) if id != record.variant.product_id) {
                return Err(AppError::validation(format!(
                    "Variant {} does not belong to product {}",
                    variant_id,
                    line.product_id.unwrap_or_default()
                )));
            }

            record
                .variant
                .check_fulfilment(
                    requested
                        .get(&variant_id)
                        .copied()
                        .unwrap_or_else(|| u64::from(line.quantity)),
                )?;

            items.push(OrderItem {
                product_id: Some(record.variant.product_id),
                variant_id: Some(variant_id),
                service_id: None,
                quantity: line.quantity,
                price: record.variant.price,
                name: format!("{} - {}", record.product_title, record.variant.name),
            });
        }
        Ok(items)
    }

    async fn service_items(&self, store: &Store, lines: &[OrderLine]) -> AppResult<Vec<OrderItem>> {
        let ids: Vec<Uuid> = lines.iter().filter_map(|l| l.service_id).collect();
        let services: HashMap<Uuid, _> = self
            .services
            .find_many(ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        lines
            .iter()
            .map(|line| {
                let service_id = line.service_id.ok_or_else(|| {
                    AppError::validation("Service order items require a serviceId")
                })?;
                let service = services
                    .get(&service_id)
                    .filter(|s| s.store_id == store.id && s.is_bookable())
                    .ok_or_else(|| {
                        AppError::validation(format!("Service {} is not available", service_id))
                    })?;

                Ok(OrderItem {
                    product_id: None,
                    variant_id: None,
                    service_id: Some(service.id),
                    quantity: line.quantity,
                    price: service.base_price,
                    name: service.title.clone(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderService for OrderManager {
    async fn create(&self, request: OrderRequest) -> AppResult<Order> {
        request.validate()?;

        let store = self
            .stores
            .find_by_id(request.store_id)
            .await?
            .ok_or_not_found()?;
        if !store.is_approved() {
            return Err(AppError::validation("Store is not accepting orders"));
        }

        let items = match request.order_type {
            OrderType::Product => self.product_items(&store, &request.lines).await?,
            OrderType::Service => self.service_items(&store, &request.lines).await?,
        };

        let order = self
            .orders
            .create(NewOrder::priced(request, items, Utc::now())?)
            .await?;

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            store_id = %order.store_id,
            total = order.total,
            "Order placed"
        );
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> AppResult<Order> {
        self.orders.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_for_customer(
        &self,
        customer_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)> {
        self.orders.list_by_customer(customer_id, status, page).await
    }

    async fn list_for_store(
        &self,
        store_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)> {
        self.orders.list_by_store(store_id, status, page).await
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let order = self.get(id).await?;
        let next = order.status.transition_to(status)?;

        let updated = self.orders.update_status(id, next).await?;
        info!(order_id = %id, from = %order.status, to = %next, "Order status changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MockOrderRepository, MockProductRepository, MockServiceRepository, MockStoreRepository,
        VariantRecord,
    };
    use crate::service::fixtures;
    use domain::{PaymentStatus, StoreStatus, MAX_LINE_QUANTITY};

    struct Setup {
        store: Store,
        orders: MockOrderRepository,
        stores: MockStoreRepository,
        products: MockProductRepository,
        services: MockServiceRepository,
    }

    impl Setup {
        fn new(status: StoreStatus) -> Self {
            let store = fixtures::store(Uuid::new_v4(), status);
            let mut stores = MockStoreRepository::new();
            let found = store.clone();
            stores
                .expect_find_by_id()
                .returning(move |_| Ok(Some(found.clone())));
            Self {
                store,
                orders: MockOrderRepository::new(),
                stores,
                products: MockProductRepository::new(),
                services: MockServiceRepository::new(),
            }
        }

        /// Echo the priced order back the way the repository would store it.
        fn accept_orders(&mut self) {
            self.orders.expect_create().returning(|new| {
                let now = Utc::now();
                Ok(Order {
                    id: Uuid::new_v4(),
                    order_number: new.order_number,
                    customer_id: new.customer_id,
                    store_id: new.store_id,
                    order_type: new.order_type,
                    status: OrderStatus::Pending,
                    items: new.items,
                    subtotal: new.totals.subtotal,
                    tax: new.totals.tax,
                    shipping: new.totals.shipping,
                    total: new.totals.total,
                    payment_status: PaymentStatus::Pending,
                    shipping_address: new.shipping_address,
                    billing_address: new.billing_address,
                    notes: new.notes,
                    created_at: now,
                    updated_at: now,
                })
            });
        }

        fn build(self) -> OrderManager {
            OrderManager::new(
                Arc::new(self.orders),
                Arc::new(self.stores),
                Arc::new(self.products),
                Arc::new(self.services),
            )
        }
    }

    fn record(store_id: Uuid, price: i64, stock: i32) -> VariantRecord {
        VariantRecord {
            variant: fixtures::variant(Uuid::new_v4(), price, stock),
            product_title: "Masala Chai".to_string(),
            product_status: ItemStatus::Active,
            store_id,
        }
    }

    fn request(store_id: Uuid, order_type: OrderType, lines: Vec<OrderLine>) -> OrderRequest {
        OrderRequest {
            customer_id: Uuid::new_v4(),
            store_id,
            order_type,
            lines,
            shipping_address: Some(fixtures::address()),
            billing_address: None,
            notes: None,
        }
    }

    fn variant_line(variant_id: Uuid, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: None,
            variant_id: Some(variant_id),
            service_id: None,
            quantity,
        }
    }

    #[tokio::test]
    async fn prices_three_units_at_one_hundred_rupees() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let rec = record(setup.store.id, 10_000, 10);
        let variant_id = rec.variant.id;
        setup
            .products
            .expect_find_variants()
            .returning(move |_| Ok(vec![rec.clone()]));
        setup.accept_orders();
        let store_id = setup.store.id;

        let order = setup
            .build()
            .create(request(store_id, OrderType::Product, vec![variant_line(variant_id, 3)]))
            .await
            .unwrap();

        assert_eq!(
            (order.subtotal, order.tax, order.shipping, order.total),
            (30_000, 5_400, 5_000, 40_400)
        );
        assert_eq!(order.items[0].price, 10_000);
        assert_eq!(order.items[0].name, "Masala Chai - 250g");
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_number.starts_with("ORD-"));
    }

    #[tokio::test]
    async fn insufficient_stock_is_rejected() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let rec = record(setup.store.id, 10_000, 2);
        let variant_id = rec.variant.id;
        setup
            .products
            .expect_find_variants()
            .returning(move |_| Ok(vec![rec.clone()]));
        setup.orders.expect_create().never();
        let store_id = setup.store.id;

        // two lines of the same variant add up past the stock
        let lines = vec![variant_line(variant_id, 2), variant_line(variant_id, 1)];
        let result = setup
            .build()
            .create(request(store_id, OrderType::Product, lines))
            .await;
        assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg.contains("Insufficient stock")));
    }

    #[tokio::test]
    async fn oversized_quantities_never_reach_stock_check() {
        let mut setup = Setup::new(StoreStatus::Approved);
        setup.products.expect_find_variants().never();
        setup.orders.expect_create().never();
        let store_id = setup.store.id;
        let variant_id = Uuid::new_v4();

        // would sum to zero in u32
        let lines = vec![variant_line(variant_id, 1 << 31), variant_line(variant_id, 1 << 31)];
        let result = setup
            .build()
            .create(request(store_id, OrderType::Product, lines))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn repeated_lines_are_summed_against_stock() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let rec = record(setup.store.id, 10_000, 5);
        let variant_id = rec.variant.id;
        setup
            .products
            .expect_find_variants()
            .returning(move |_| Ok(vec![rec.clone()]));
        setup.orders.expect_create().never();
        let store_id = setup.store.id;

        let lines = (0..500)
            .map(|_| variant_line(variant_id, MAX_LINE_QUANTITY))
            .collect();
        let result = setup
            .build()
            .create(request(store_id, OrderType::Product, lines))
            .await;
        assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg.contains("Insufficient stock")));
    }

    #[tokio::test]
    async fn overflowing_total_is_rejected() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let rec = record(setup.store.id, i64::MAX / 2, -1);
        let variant_id = rec.variant.id;
        setup
            .products
            .expect_find_variants()
            .returning(move |_| Ok(vec![rec.clone()]));
        setup.orders.expect_create().never();
        let store_id = setup.store.id;

        let result = setup
            .build()
            .create(request(store_id, OrderType::Product, vec![variant_line(variant_id, 3)]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg.contains("too large")));
    }

    #[tokio::test]
    async fn variant_from_another_store_is_rejected() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let rec = record(Uuid::new_v4(), 10_000, -1);
        let variant_id = rec.variant.id;
        setup
            .products
            .expect_find_variants()
            .returning(move |_| Ok(vec![rec.clone()]));
        let store_id = setup.store.id;

        let result = setup
            .build()
            .create(request(store_id, OrderType::Product, vec![variant_line(variant_id, 1)]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn inactive_service_is_rejected() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let service = fixtures::service(setup.store.id, ItemStatus::Inactive);
        let service_id = service.id;
        setup
            .services
            .expect_find_many()
            .returning(move |_| Ok(vec![service.clone()]));
        let store_id = setup.store.id;

        let line = OrderLine {
            product_id: None,
            variant_id: None,
            service_id: Some(service_id),
            quantity: 1,
        };
        let result = setup
            .build()
            .create(request(store_id, OrderType::Service, vec![line]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg.contains("not available")));
    }

    #[tokio::test]
    async fn service_order_uses_base_price() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let service = fixtures::service(setup.store.id, ItemStatus::Active);
        let service_id = service.id;
        setup
            .services
            .expect_find_many()
            .returning(move |_| Ok(vec![service.clone()]));
        setup.accept_orders();
        let store_id = setup.store.id;

        let line = OrderLine {
            product_id: None,
            variant_id: None,
            service_id: Some(service_id),
            quantity: 2,
        };
        let order = setup
            .build()
            .create(request(store_id, OrderType::Service, vec![line]))
            .await
            .unwrap();
        // 60000 is above the free-shipping threshold
        assert_eq!((order.subtotal, order.shipping), (60_000, 0));
        assert_eq!(order.items[0].name, "Haircut");
    }

    #[tokio::test]
    async fn unapproved_store_takes_no_orders() {
        let setup = Setup::new(StoreStatus::Pending);
        let store_id = setup.store.id;
        let result = setup
            .build()
            .create(request(store_id, OrderType::Product, vec![variant_line(Uuid::new_v4(), 1)]))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn delivered_order_cannot_move() {
        let mut setup = Setup::new(StoreStatus::Approved);
        let store_id = setup.store.id;
        setup.orders.expect_find_by_id().returning(move |id| {
            let now = Utc::now();
            Ok(Some(Order {
                id,
                order_number: "ORD-X-ABCDEF".to_string(),
                customer_id: Uuid::new_v4(),
                store_id,
                order_type: OrderType::Product,
                status: OrderStatus::Delivered,
                items: vec![],
                subtotal: 0,
                tax: 0,
                shipping: 5_000,
                total: 5_000,
                payment_status: PaymentStatus::Paid,
                shipping_address: None,
                billing_address: None,
                notes: None,
                created_at: now,
                updated_at: now,
            }))
        });
        setup.orders.expect_update_status().never();

        let result = setup
            .build()
            .update_status(Uuid::new_v4(), OrderStatus::Cancelled)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
