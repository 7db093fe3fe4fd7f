//! # Per-handler send outcomes.
//!
//! A fail-fast [`send`](crate::Registry::send) acknowledges each invoked
//! handler with a [`Receipt`]; an isolated
//! [`send_isolated`](crate::Registry::send_isolated) reports every matching
//! handler's outcome as a [`Delivery`] instead of short-circuiting.

use crate::error::HandlerError;

use super::registry::RegistrationId;

/// Acknowledgement for one handler invocation during a fail-fast send.
///
/// Receipts come back in invocation order, which equals registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Name of the invoked handler.
    pub handler: &'static str,
    /// Registration the invocation belongs to.
    pub registration: RegistrationId,
}

/// Outcome of one handler invocation during an isolated send.
#[derive(Debug)]
pub struct Delivery {
    /// Name of the invoked handler.
    pub handler: &'static str,
    /// Registration the invocation belongs to.
    pub registration: RegistrationId,
    /// The handler's result; `Err` did not stop later handlers.
    pub outcome: Result<(), HandlerError>,
}

impl Delivery {
    /// True if the handler completed without error.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
