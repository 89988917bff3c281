//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clearsight_core::cart::CartSnapshot;
use clearsight_core::{OrderId, OrderStatus, ProductId, UserId};

/// An order as stored.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// A line of a stored order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// An order about to be written by checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub phone: String,
    pub lines: Vec<NewOrderLine>,
}

/// Product, quantity and unit price captured from a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

impl NewOrder {
    /// Build an order from a cart snapshot and delivery details.
    #[must_use]
    pub fn from_cart(
        user_id: UserId,
        cart: &CartSnapshot,
        shipping_address: String,
        phone: String,
    ) -> Self {
        Self {
            user_id,
            total_amount: cart.total,
            shipping_address,
            phone,
            lines: cart
                .items
                .iter()
                .map(|line| NewOrderLine {
                    product_id: line.id.clone(),
                    quantity: line.quantity.get(),
                    price: line.price,
                })
                .collect(),
        }
    }
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub total_products: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use clearsight_core::cart::CartLineItem;

    use super::*;

    #[test]
    fn test_from_cart_copies_lines_and_total() {
        let items = vec![
            CartLineItem {
                id: ProductId::parse("p1").unwrap(),
                name: "Aviator".to_owned(),
                price: Decimal::new(1500, 0),
                image: "🕶️".to_owned(),
                quantity: NonZeroU32::new(3).unwrap(),
            },
            CartLineItem {
                id: ProductId::parse("p2").unwrap(),
                name: "Wayfarer".to_owned(),
                price: Decimal::new(2500, 0),
                image: "👓".to_owned(),
                quantity: NonZeroU32::MIN,
            },
        ];
        let snapshot = CartSnapshot::from_items(&items);

        let order = NewOrder::from_cart(
            UserId::parse("u1").unwrap(),
            &snapshot,
            "12 MG Road, Bengaluru 560001".to_owned(),
            "+91 9876543210".to_owned(),
        );

        assert_eq!(order.total_amount, Decimal::new(7000, 0));
        assert_eq!(order.lines.len(), 2);
        let first = order.lines.first().unwrap();
        assert_eq!(first.product_id.as_str(), "p1");
        assert_eq!(first.quantity, 3);
        assert_eq!(first.price, Decimal::new(1500, 0));
    }
}
