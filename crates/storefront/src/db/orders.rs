//! Order repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use clearsight_core::{OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{DashboardStats, NewOrder, Order, OrderLine};

const ORDER_COLUMNS: &str =
    "id, user_id, total_amount, status, shipping_address, phone, created_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total_amount: Decimal,
    status: OrderStatus,
    shipping_address: String,
    phone: String,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            total_amount: row.total_amount,
            status: row.status,
            shipping_address: row.shipping_address,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    price: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Repository for orders and their lines.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Write an order and all of its lines in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// written in that case.
    #[instrument(skip(self, order), fields(user_id = %order.user_id, lines = order.lines.len()))]
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO clearsight.order (user_id, total_amount, status, shipping_address, phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&order.user_id)
        .bind(order.total_amount)
        .bind(OrderStatus::Pending)
        .bind(&order.shipping_address)
        .bind(&order.phone)
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.lines {
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                RepositoryError::Conflict(format!("quantity {} out of range", line.quantity))
            })?;
            sqlx::query(
                r"
                INSERT INTO clearsight.order_item (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(&row.id)
            .bind(&line.product_id)
            .bind(quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM clearsight.order ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Lines of the given orders, grouped by order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for(
        &self,
        order_ids: &[OrderId],
    ) -> Result<HashMap<OrderId, Vec<OrderLine>>, RepositoryError> {
        let ids: Vec<&str> = order_ids.iter().map(OrderId::as_str).collect();
        let rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT order_id, product_id, quantity, price
            FROM clearsight.order_item
            WHERE order_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.order_id.clone())
                .or_default()
                .push(row.into());
        }
        Ok(grouped)
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this ID.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE clearsight.order SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .map(Order::from)
        .ok_or(RepositoryError::NotFound)
    }

    /// Order count, revenue and product count for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let (total_orders, total_revenue, total_products): (i64, Decimal, i64) = sqlx::query_as(
            r"
            SELECT
                (SELECT COUNT(*) FROM clearsight.order),
                (SELECT COALESCE(SUM(total_amount), 0) FROM clearsight.order),
                (SELECT COUNT(*) FROM clearsight.product)
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardStats {
            total_orders,
            total_revenue,
            total_products,
        })
    }
}
