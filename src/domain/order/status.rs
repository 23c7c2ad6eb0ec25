use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::OrderError;
use super::value_objects::OrderType;

// ============================================================================
// Order Status State Machine
// ============================================================================
//
// The single source of truth for which status changes are legal. Everything
// else asks `OrderStatus::transition`.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Completed,
    Cancelled,
}

/// Which order types a table row applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applies {
    Any,
    Only(OrderType),
}

use OrderStatus::*;

/// `(from, to, applies)`. Anything not listed is rejected.
const TRANSITIONS: &[(OrderStatus, OrderStatus, Applies)] = &[
    (Pending, Confirmed, Applies::Any),
    (Pending, Preparing, Applies::Any),
    (Pending, Ready, Applies::Any),
    (Pending, Cancelled, Applies::Any),
    (Confirmed, Preparing, Applies::Any),
    (Confirmed, Ready, Applies::Any),
    (Confirmed, Cancelled, Applies::Any),
    (Preparing, Ready, Applies::Any),
    (Preparing, Cancelled, Applies::Any),
    (Ready, Delivered, Applies::Only(OrderType::Delivery)),
    (Ready, Completed, Applies::Only(OrderType::DineIn)),
    (Ready, Cancelled, Applies::Any),
];

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        Pending, Confirmed, Preparing, Ready, Delivered, Completed, Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pending => "pending",
            Confirmed => "confirmed",
            Preparing => "preparing",
            Ready => "ready",
            Delivered => "delivered",
            Completed => "completed",
            Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Delivered | Completed | Cancelled)
    }

    /// Validate a move to `to` for an order of `order_type`.
    pub fn transition(self, to: OrderStatus, order_type: OrderType) -> Result<OrderStatus, OrderError> {
        if self.is_terminal() {
            return Err(OrderError::Terminal(self));
        }

        let allowed = TRANSITIONS.iter().any(|(from, target, applies)| {
            *from == self
                && *target == to
                && match applies {
                    Applies::Any => true,
                    Applies::Only(t) => *t == order_type,
                }
        });

        if allowed {
            Ok(to)
        } else {
            Err(OrderError::InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status '{s}'"))
    }
}
