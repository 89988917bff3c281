//! Checkout: turn the cart into a placed order.
//!
//! The cart is cleared only after the order and all of its lines have been
//! written. Any failure leaves the cart exactly as it was.

use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use clearsight_core::cart::{CartSnapshot, CartStorage, CartStore};
use clearsight_core::{OrderId, ProductId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{CurrentUser, NewOrder, Order};

const MIN_PHONE_LENGTH: usize = 10;
const MIN_ADDRESS_LENGTH: usize = 10;

/// Largest quantity an order line can record (`INTEGER` column).
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Largest order total the order table can record (`NUMERIC(14, 2)`).
// Equals `Decimal::new(99_999_999_999_999, 2)`; `from_parts` is the `const` constructor.
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,

    #[error("phone number must be at least {min} digits", min = MIN_PHONE_LENGTH)]
    PhoneTooShort,

    #[error("please provide a complete shipping address")]
    AddressTooShort,

    #[error("quantity of {product_id} exceeds the limit of {max} per order", max = MAX_LINE_QUANTITY)]
    QuantityTooLarge { product_id: ProductId },

    #[error("order total exceeds the limit of {max}", max = MAX_ORDER_TOTAL)]
    TotalTooLarge,

    #[error("failed to place order: {0}")]
    Order(#[from] RepositoryError),
}

/// Delivery details submitted with checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    pub phone: String,
    pub address: String,
}

impl CheckoutForm {
    /// Trim both fields and check their length.
    ///
    /// # Errors
    ///
    /// Returns `PhoneTooShort` or `AddressTooShort`.
    pub fn validate(self) -> Result<Self, CheckoutError> {
        let phone = self.phone.trim().to_owned();
        let address = self.address.trim().to_owned();

        if phone.chars().count() < MIN_PHONE_LENGTH {
            return Err(CheckoutError::PhoneTooShort);
        }
        if address.chars().count() < MIN_ADDRESS_LENGTH {
            return Err(CheckoutError::AddressTooShort);
        }
        Ok(Self { phone, address })
    }
}

/// Receipt returned to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    /// Short reference shown to the shopper.
    pub reference: String,
}

/// Somewhere orders can be written.
pub trait OrderSink {
    /// Persist the order and its lines atomically.
    fn place_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;
}

impl OrderSink for OrderRepository<'_> {
    fn place_order(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send {
        self.create(order)
    }
}

/// Place an order for everything in `cart`, then clear it.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart, a validation error for
/// bad delivery details, or `CheckoutError::Order` if the order cannot be
/// written. The cart is untouched in every error case.
#[instrument(skip_all, fields(user_id = %user.id, items = cart.item_count()))]
pub async fn submit<S, O>(
    cart: &mut CartStore<S>,
    user: &CurrentUser,
    form: CheckoutForm,
    sink: &O,
) -> Result<PlacedOrder, CheckoutError>
where
    S: CartStorage,
    O: OrderSink + Sync,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let form = form.validate()?;
    let snapshot = cart.snapshot();
    check_limits(&snapshot)?;

    let new_order = NewOrder::from_cart(user.id.clone(), &snapshot, form.address, form.phone);
    let order = sink.place_order(&new_order).await?;

    cart.clear();

    let reference = order.id.short_ref().to_owned();
    info!(order_id = %order.id, total = %order.total_amount, "order placed");
    Ok(PlacedOrder {
        order_id: order.id,
        reference,
    })
}

/// Reject carts the order tables cannot hold.
fn check_limits(cart: &CartSnapshot) -> Result<(), CheckoutError> {
    if let Some(line) = cart
        .items
        .iter()
        .find(|line| line.quantity.get() > MAX_LINE_QUANTITY)
    {
        return Err(CheckoutError::QuantityTooLarge {
            product_id: line.id.clone(),
        });
    }
    if cart.total > MAX_ORDER_TOTAL {
        return Err(CheckoutError::TotalTooLarge);
    }
    Ok(())
}
