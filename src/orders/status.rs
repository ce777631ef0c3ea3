//! Order Status

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::orders::OrderError;

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    Pending,

    /// Accepted by the shop
    Confirmed,

    /// Being picked and packed
    Preparing,

    /// Handed to the courier
    Shipped,

    /// Received by the customer
    Delivered,

    /// Cancelled before shipping
    Cancelled,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The statuses an order moves through when it is not cancelled.
    pub const PROGRESSION: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Shipped,
        Self::Delivered,
    ];

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Awaiting confirmation",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Position in [`PROGRESSION`](Self::PROGRESSION), or `None` for cancelled orders.
    pub fn progress_index(self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|status| *status == self)
    }

    /// The status that follows this one, if any.
    pub fn next(self) -> Option<Self> {
        self.progress_index()
            .and_then(|index| Self::PROGRESSION.get(index + 1))
            .copied()
    }

    /// Machine name, as used in persisted orders and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderError::UnknownStatus(s.to_string()))
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid online at checkout
    #[default]
    Online,

    /// Paid to the courier on delivery
    CashOnDelivery,
}

impl PaymentMethod {
    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online payment",
            Self::CashOnDelivery => "Cash on delivery",
        }
    }
}
