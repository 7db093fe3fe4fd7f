//! # Event handlers.
//!
//! This module provides the [`Receive`] trait and built-in implementations
//! invoked synchronously by a [`Registry`](crate::Registry) during a send.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   caller ── send(uow, sender, payload) ──► Registry
//!                                               │ (same thread, same uow,
//!                                               │  registration order)
//!                                          ┌────┴─────┬──────────┐
//!                                          ▼          ▼          ▼
//!                                      LogWriter   Recorder   Custom
//! ```
//!
//! ## Handler types
//! - **Passive handlers** — observe and react (logging, recording, alerts)
//! - **Read-back handlers** — inspect the unit of work, including writes the
//!   sender staged but has not committed yet
//!
//! ## Implementing custom handlers
//! ```
//! use signalhub::{Event, EventKind, HandlerError, Receive, UnitOfWork};
//!
//! struct Counter;
//!
//! impl Receive for Counter {
//!     fn on_event(&self, _uow: &mut UnitOfWork, event: &Event) -> Result<(), HandlerError> {
//!         if event.kind() == EventKind::Deleted {
//!             // bump a metric
//!         }
//!         Ok(())
//!     }
//! }
//! ```

mod handler;
mod handler_fn;
mod recorder;

#[cfg(feature = "logging")]
mod log;

pub use handler::{Receive, ReceiveRef};
pub use handler_fn::ReceiveFn;
pub use recorder::{Observation, Recorder};

#[cfg(feature = "logging")]
pub use log::LogWriter;
