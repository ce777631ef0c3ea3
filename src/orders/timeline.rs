//! Order Timeline

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::orders::{Order, OrderStatus};

/// One step of an order's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineStep {
    /// Status this step represents
    pub status: OrderStatus,

    /// When the order reached this step, if recorded
    pub at: Option<Timestamp>,

    /// Whether the order has reached this step
    pub completed: bool,

    /// Whether this is the order's current step
    pub current: bool,
}

/// Progress steps for `order`. Cancelled orders have no timeline.
pub fn timeline(order: &Order) -> SmallVec<[TimelineStep; 5]> {
    let Some(current) = order.status.progress_index() else {
        return SmallVec::new();
    };

    OrderStatus::PROGRESSION
        .iter()
        .enumerate()
        .map(|(index, status)| TimelineStep {
            status: *status,
            at: order.reached_at(*status),
            completed: index <= current,
            current: index == current,
        })
        .collect()
}
