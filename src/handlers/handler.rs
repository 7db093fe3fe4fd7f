//! # Event handler trait.
//!
//! Provides [`Receive`], the extension point for plugging handlers into a
//! [`Registry`](crate::Registry).
//!
//! Handlers run **inside** the send that triggers them:
//! - **Same thread** as the caller (no worker, no queue, no context switch)
//! - **Same unit of work** as the caller (uncommitted state is visible)
//! - **Fail-fast**: returning `Err` aborts the send and skips the handlers
//!   registered after this one
//!
//! ## Example
//! ```
//! use signalhub::{Event, EventKind, HandlerError, Receive, UnitOfWork};
//!
//! struct Audit;
//!
//! impl Receive for Audit {
//!     fn on_event(&self, uow: &mut UnitOfWork, event: &Event) -> Result<(), HandlerError> {
//!         if event.kind() == EventKind::Created {
//!             // read back the (possibly uncommitted) record that triggered us
//!             let _ = uow.get(event.key());
//!         }
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }   // prefer short, descriptive names
//! }
//! ```

use std::sync::Arc;

use crate::context::UnitOfWork;
use crate::error::HandlerError;
use crate::events::Event;

/// Shared handler handle used by the registry.
pub type ReceiveRef = Arc<dyn Receive>;

/// Event handler invoked synchronously during a send.
///
/// ### Implementation requirements
/// - Return promptly; the sender blocks until every handler finished.
/// - Return `Err` to abort the send; the error reaches the original caller
///   and the remaining handlers of this send never run.
/// - Side effects performed here are **not** transactional: if the caller's
///   unit of work later rolls back, the data change is undone but whatever
///   this handler already did (logged, counted, printed) stands.
pub trait Receive: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called on the sender's thread, in registration order, with the
    /// sender's own unit of work. Uncommitted writes staged before the send
    /// are visible through `uow`.
    fn on_event(&self, uow: &mut UnitOfWork, event: &Event) -> Result<(), HandlerError>;

    /// Returns the handler name used in receipts, errors, and logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose -
    /// override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
