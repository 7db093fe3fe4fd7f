//! Error types used by the signalhub registry and handlers.
//!
//! This module defines three error enums:
//!
//! - [`HandlerError`] — errors raised by individual handler bodies.
//! - [`DispatchError`] — errors surfaced by [`Registry::send`](crate::Registry::send)
//!   to the original caller.
//! - [`ContextError`] — misuse of a [`UnitOfWork`](crate::UnitOfWork)
//!   transaction scope.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging.
//! There is no retry machinery anywhere: a handler error short-circuits the
//! remaining handlers of that send and propagates to the caller.

use thiserror::Error;

use crate::events::EventKind;

/// # Errors produced by handler execution.
///
/// A handler returns one of these to abort the send that invoked it.
/// The registry wraps it into [`DispatchError::Handler`] together with the
/// handler name and the event kind being dispatched.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler body failed with an application-level message.
    #[error("handler failed: {message}")]
    Failed {
        /// The underlying failure message.
        message: String,
    },

    /// Handler expected a record in the unit of work that was not there.
    #[error("record not found: {key}")]
    MissingRecord {
        /// The key the handler looked up.
        key: String,
    },
}

impl HandlerError {
    /// Creates a [`HandlerError::Failed`] from any message.
    #[inline]
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerError::Failed {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use signalhub::HandlerError;
    ///
    /// let err = HandlerError::failed("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::MissingRecord { .. } => "missing_record",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { message } => format!("error: {message}"),
            HandlerError::MissingRecord { key } => format!("missing record: {key}"),
        }
    }
}

/// # Errors surfaced by a send.
///
/// [`DispatchError::Handler`] is the failure of a single handler during a
/// fail-fast send: handlers registered after the failing one were not
/// invoked, and the caller observes the error synchronously.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler failed; remaining handlers for this send were skipped.
    #[error("handler '{handler}' failed dispatching '{kind}' event: {source}")]
    Handler {
        /// Name of the failing handler.
        handler: &'static str,
        /// Kind of the event being dispatched.
        kind: EventKind,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },

    /// The enclosing unit of work was misused (e.g. nested `begin`).
    #[error("unit of work misuse: {0}")]
    Context(#[from] ContextError),
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use signalhub::{ContextError, DispatchError};
    ///
    /// let err = DispatchError::from(ContextError::AlreadyOpen);
    /// assert_eq!(err.as_label(), "dispatch_context");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Handler { .. } => "dispatch_handler_failed",
            DispatchError::Context(_) => "dispatch_context",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Handler {
                handler,
                kind,
                source,
            } => {
                format!("handler={handler} kind={kind} {}", source.as_message())
            }
            DispatchError::Context(err) => err.to_string(),
        }
    }
}

/// # Errors produced by unit-of-work transaction scoping.
///
/// These are caller mistakes, not data failures: the store itself never
/// rejects a read or a write.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// `begin` was called while a transaction was already open.
    #[error("a transaction is already open")]
    AlreadyOpen,

    /// `commit` or `rollback` was called with no open transaction.
    #[error("no transaction is open")]
    NotOpen,
}

impl ContextError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use signalhub::ContextError;
    ///
    /// assert_eq!(ContextError::NotOpen.as_label(), "context_not_open");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContextError::AlreadyOpen => "context_already_open",
            ContextError::NotOpen => "context_not_open",
        }
    }
}
