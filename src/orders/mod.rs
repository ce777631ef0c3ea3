//! Orders
//!
//! Orders placed from a cart snapshot, their lifecycle and the customer's order history.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::{
    cart::{CartItem, total_price},
    profile::Address,
    storage::{Storage, StorageError},
};

pub mod status;
pub mod timeline;

pub use status::{OrderStatus, PaymentMethod};
pub use timeline::TimelineStep;

/// Storage slot holding the order history.
pub const ORDERS_STORAGE_KEY: &str = "orders";

/// Flat delivery fee in minor units.
pub const DELIVERY_FEE: u64 = 4_99;

/// Errors related to placing or updating orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Orders need at least one item.
    #[error("cannot place an order with no items")]
    EmptyCart,

    /// The order cannot move from its current status to the requested one (from, to).
    #[error("order cannot move from {0} to {1}")]
    InvalidTransition(OrderStatus, OrderStatus),

    /// The order is delivered or cancelled and cannot progress further.
    #[error("order is already {0}")]
    FinalStatus(OrderStatus),

    /// Not a recognised status name.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The order history could not be serialized.
    #[error("order history is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Amount due at checkout: the cart total plus `delivery_fee`, or nothing for an empty cart.
pub fn checkout_total(items: &[CartItem], delivery_fee: u64) -> u64 {
    if items.is_empty() {
        0
    } else {
        total_price(items).saturating_add(delivery_fee)
    }
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: String,
    pub order_number: String,
    pub items: Vec<CartItem>,
    pub address: Address,
    pub payment_method: PaymentMethod,
    pub delivery_fee: u64,
    pub notes: Option<String>,
}

/// Order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: String,

    /// Customer-facing order number
    pub order_number: String,

    /// Current status
    pub status: OrderStatus,

    /// Items as they were in the cart at checkout
    pub items: Vec<CartItem>,

    /// Sum of item line totals
    pub subtotal: u64,

    /// Delivery charge
    pub delivery_fee: u64,

    /// Subtotal plus delivery
    pub total_price: u64,

    /// Delivery address
    pub address: Address,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// When the order was placed
    pub created_at: Timestamp,

    /// When the shop confirmed the order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<Timestamp>,

    /// When preparation started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparing_at: Option<Timestamp>,

    /// When the order was handed to the courier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<Timestamp>,

    /// When the order was delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<Timestamp>,

    /// When the order was cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<Timestamp>,

    /// Courier tracking code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,

    /// Customer notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Reason given when the order was cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl Order {
    /// Place a pending order for `order.items`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] if there are no items.
    pub fn place(order: NewOrder, now: Timestamp) -> Result<Self, OrderError> {
        if order.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let subtotal = total_price(&order.items);

        Ok(Self {
            id: order.id,
            order_number: order.order_number,
            status: OrderStatus::Pending,
            subtotal,
            delivery_fee: order.delivery_fee,
            total_price: subtotal.saturating_add(order.delivery_fee),
            items: order.items,
            address: order.address,
            payment_method: order.payment_method,
            created_at: now,
            confirmed_at: None,
            preparing_at: None,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            tracking_code: None,
            notes: order.notes,
            cancel_reason: None,
        })
    }

    /// Move to the next status in the lifecycle, stamping the time it was reached.
    ///
    /// Shipping assigns a tracking code derived from the order number unless one is set.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::FinalStatus`] for delivered or cancelled orders.
    pub fn advance(&mut self, now: Timestamp) -> Result<OrderStatus, OrderError> {
        let next = self
            .status
            .next()
            .ok_or(OrderError::FinalStatus(self.status))?;

        match next {
            OrderStatus::Confirmed => self.confirmed_at = Some(now),
            OrderStatus::Preparing => self.preparing_at = Some(now),
            OrderStatus::Shipped => {
                self.shipped_at = Some(now);

                if self.tracking_code.is_none() {
                    self.tracking_code = Some(tracking_code(&self.order_number));
                }
            }
            OrderStatus::Delivered => self.delivered_at = Some(now),
            OrderStatus::Pending | OrderStatus::Cancelled => {}
        }

        self.status = next;

        Ok(next)
    }

    /// Whether the customer may still cancel.
    pub fn can_cancel(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    /// Whether the customer may request a return.
    pub fn can_return(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    /// Cancel the order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidTransition`] once preparation has started.
    pub fn cancel(&mut self, now: Timestamp, reason: Option<String>) -> Result<(), OrderError> {
        if !self.can_cancel() {
            return Err(OrderError::InvalidTransition(
                self.status,
                OrderStatus::Cancelled,
            ));
        }

        self.status = OrderStatus::Cancelled;
        self.cancelled_at = Some(now);
        self.cancel_reason = reason.filter(|reason| !reason.trim().is_empty());

        Ok(())
    }

    /// When the order reached `status`, if it has.
    pub fn reached_at(&self, status: OrderStatus) -> Option<Timestamp> {
        match status {
            OrderStatus::Pending => Some(self.created_at),
            OrderStatus::Confirmed => self.confirmed_at,
            OrderStatus::Preparing => self.preparing_at,
            OrderStatus::Shipped => self.shipped_at,
            OrderStatus::Delivered => self.delivered_at,
            OrderStatus::Cancelled => self.cancelled_at,
        }
    }

    /// Progress steps for display.
    pub fn timeline(&self) -> SmallVec<[TimelineStep; 5]> {
        timeline::timeline(self)
    }

    /// Total number of units ordered.
    pub fn item_count(&self) -> u64 {
        crate::cart::total_item_count(&self.items)
    }
}

/// Courier tracking code for an order, e.g. `TRK-02024001` for `ORD-2024-001`.
fn tracking_code(order_number: &str) -> String {
    let digits: String = order_number.chars().filter(char::is_ascii_digit).collect();

    format!("TRK-{digits:0>8}")
}

/// The customer's order history, newest last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the history from `storage`, starting empty if nothing valid is stored.
    pub fn load<S: Storage>(storage: &S) -> Self {
        let raw = match storage.get(ORDERS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(error) => {
                warn!(%error, "failed to read order history");
                return Self::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|error| {
            warn!(%error, "discarding persisted order history");
            Self::new()
        })
    }

    /// Persist the history to `storage`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if serialization or the write fails.
    pub fn save<S: Storage>(&self, storage: &mut S) -> Result<(), OrderError> {
        storage.set(ORDERS_STORAGE_KEY, &serde_json::to_string(self)?)?;

        Ok(())
    }

    /// Id for the next order placed: one past the highest numeric id.
    pub fn next_id(&self) -> String {
        let highest = self
            .orders
            .iter()
            .filter_map(|order| order.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        highest.saturating_add(1).to_string()
    }

    /// Order number for the next order placed in `year`, e.g. `ORD-2024-003`.
    pub fn next_order_number(&self, year: i16) -> String {
        format!("ORD-{year}-{:03}", self.orders.len() + 1)
    }

    /// Append a placed order.
    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// All orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order by id.
    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Look up an order by id for updating.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|order| order.id == id)
    }

    /// Orders with `status`, or every order for `None`.
    pub fn filter(&self, status: Option<OrderStatus>) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| status.is_none_or(|status| order.status == status))
            .collect()
    }

    /// Number of orders in each status. Statuses with no orders map to zero.
    pub fn count_by_status(&self) -> FxHashMap<OrderStatus, usize> {
        let mut counts: FxHashMap<OrderStatus, usize> =
            OrderStatus::ALL.into_iter().map(|status| (status, 0)).collect();

        for order in &self.orders {
            *counts.entry(order.status).or_default() += 1;
        }

        counts
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
