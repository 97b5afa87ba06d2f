//! Order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::conflict_on_unique;
use super::entities::order::{self, ActiveModel, Entity as OrderEntity};
use super::entities::to_json;
use common::{AppError, AppResult};
use domain::{NewOrder, Order, OrderStatus, PageRequest, PaymentStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: NewOrder) -> AppResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// Newest first
    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Newest first
    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)>;

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;

    async fn count(&self) -> AppResult<u64>;

    async fn count_for_store_since(&self, store_id: Uuid, since: DateTime<Utc>) -> AppResult<u64>;

    /// Sum of totals of paid orders, optionally scoped to a store and a start time
    async fn paid_revenue(
        &self,
        store_id: Option<Uuid>,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<i64>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn page(
        &self,
        query: Select<OrderEntity>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)> {
        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Order::from).collect(), total))
    }
}

fn with_status(query: Select<OrderEntity>, status: Option<OrderStatus>) -> Select<OrderEntity> {
    match status {
        Some(status) => query.filter(order::Column::Status.eq(status.as_str())),
        None => query,
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create(&self, new_order: NewOrder) -> AppResult<Order> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            order_number: Set(new_order.order_number),
            customer_id: Set(new_order.customer_id),
            store_id: Set(new_order.store_id),
            order_type: Set(new_order.order_type.to_string()),
            status: Set(OrderStatus::Pending.to_string()),
            items: Set(to_json(&new_order.items)),
            subtotal: Set(new_order.totals.subtotal),
            tax: Set(new_order.totals.tax),
            shipping: Set(new_order.totals.shipping),
            total: Set(new_order.totals.total),
            payment_status: Set(PaymentStatus::Pending.to_string()),
            shipping_address: Set(new_order.shipping_address.as_ref().map(to_json)),
            billing_address: Set(new_order.billing_address.as_ref().map(to_json)),
            notes: Set(new_order.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Order number"))?;
        Ok(Order::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let result = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Order::from))
    }

    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)> {
        let query = OrderEntity::find().filter(order::Column::CustomerId.eq(customer_id));
        self.page(with_status(query, status), page).await
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Order>, u64)> {
        let query = OrderEntity::find().filter(order::Column::StoreId.eq(store_id));
        self.page(with_status(query, status), page).await
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let existing = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Order::from(model))
    }

    async fn count(&self) -> AppResult<u64> {
        OrderEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_for_store_since(&self, store_id: Uuid, since: DateTime<Utc>) -> AppResult<u64> {
        OrderEntity::find()
            .filter(order::Column::StoreId.eq(store_id))
            .filter(order::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn paid_revenue(
        &self,
        store_id: Option<Uuid>,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<i64> {
        let mut query = OrderEntity::find()
            .select_only()
            .column_as(Expr::cust("CAST(COALESCE(SUM(total), 0) AS BIGINT)"), "revenue")
            .filter(order::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()));
        if let Some(store_id) = store_id {
            query = query.filter(order::Column::StoreId.eq(store_id));
        }
        if let Some(since) = since {
            query = query.filter(order::Column::CreatedAt.gte(since));
        }

        let revenue: Option<i64> = query
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(revenue.unwrap_or(0))
    }
}
