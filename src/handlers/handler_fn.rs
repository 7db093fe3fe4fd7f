//! # Function-backed handler (`ReceiveFn`)
//!
//! [`ReceiveFn`] wraps a closure `F: Fn(&mut UnitOfWork, &Event) ->
//! Result<(), HandlerError>` so quick handlers don't need a named type.
//! Shared state goes into the closure explicitly (`Arc<...>`), not into
//! hidden mutation between invocations.
//!
//! ## Example
//! ```
//! use signalhub::{HandlerError, ReceiveFn, ReceiveRef};
//!
//! let h: ReceiveRef = ReceiveFn::arc("greeter", |_uow, event| {
//!     println!("hello from {}", event.sender);
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(h.name(), "greeter");
//! ```

use std::sync::Arc;

use crate::context::UnitOfWork;
use crate::error::HandlerError;
use crate::events::Event;
use crate::handlers::handler::Receive;

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct ReceiveFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ReceiveFn<F>
where
    F: Fn(&mut UnitOfWork, &Event) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`ReceiveFn::arc`] when you immediately need a
    /// [`ReceiveRef`](crate::ReceiveRef).
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Receive for ReceiveFn<F>
where
    F: Fn(&mut UnitOfWork, &Event) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    fn on_event(&self, uow: &mut UnitOfWork, event: &Event) -> Result<(), HandlerError> {
        (self.f)(uow, event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
