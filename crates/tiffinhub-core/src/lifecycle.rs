// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order status transition rules.
//!
//! The graph is `pending -> confirmed -> preparing -> ready -> delivered`
//! with `cancelled` reachable from any non-terminal state. Which edges a
//! caller may take depends on their role: consumers may only cancel,
//! providers drive fulfilment on their own orders, admins may set any
//! status from a non-terminal state. Ownership is checked by the caller;
//! this module only rules on (role, from, to).

use crate::error::HubError;
use crate::types::{OrderStatus, Role};

impl OrderStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// Whether `from -> to` is an edge of the status graph.
pub fn valid_edge(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    match (from, to) {
        (Pending, Confirmed)
        | (Confirmed, Preparing)
        | (Preparing, Ready)
        | (Ready, Delivered) => true,
        (_, Cancelled) => !from.is_terminal(),
        _ => false,
    }
}

/// Authorize a status transition for a caller already verified to be the
/// order's consumer, its provider, or an admin.
///
/// Terminal or off-graph moves are `Validation` (400); on-graph moves the
/// role may not take are `Forbidden` (403). Admins bypass the edge check
/// but cannot reopen terminal orders.
pub fn authorize_transition(
    role: Role,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), HubError> {
    if from.is_terminal() {
        return Err(HubError::Validation(format!(
            "order is already {from} and cannot change status"
        )));
    }
    if from == to {
        return Err(HubError::Validation(format!("order is already {to}")));
    }
    match role {
        Role::Admin => Ok(()),
        Role::Provider => {
            if !valid_edge(from, to) {
                return Err(HubError::Validation(format!(
                    "cannot move an order from {from} to {to}"
                )));
            }
            // Providers own every fulfilment edge, including cancellation.
            Ok(())
        }
        Role::Consumer => {
            if to == OrderStatus::Cancelled {
                Ok(())
            } else {
                Err(HubError::Forbidden(
                    "consumers may only cancel their orders".to_string(),
                ))
            }
        }
    }
}
