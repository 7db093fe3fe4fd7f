//! Synchronous dispatch: registry, registrations, and send outcomes.
//!
//! ## Contents
//! - [`Registry`], [`RegistryBuilder`], [`RegistrationId`] — ordered handler
//!   registrations keyed by event kind
//! - [`Receipt`], [`Delivery`] — per-handler outcomes of the two send modes
//!
//! ## Quick reference
//! - **Fail-fast**: [`Registry::send`] aborts on the first handler error and
//!   propagates it to the caller.
//! - **Isolated**: [`Registry::send_isolated`] runs every matching handler
//!   and collects outcomes instead of propagating.
//!
//! Both modes invoke handlers synchronously, in registration order, on the
//! calling thread, against the caller's own unit of work.

mod receipt;
mod registry;

pub use receipt::{Delivery, Receipt};
pub use registry::{RegistrationId, Registry, RegistryBuilder};
