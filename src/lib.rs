//! # signalhub
//!
//! **Signalhub** is a small synchronous event-dispatch library for Rust.
//!
//! It provides an explicitly owned handler registry, typed per-kind event
//! payloads, and an explicit unit-of-work context shared between the sender
//! and its handlers. Dispatch is a plain, non-yielding function call chain:
//! no channel, no worker, no deferral.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!          ┌─────────────────────┐
//!          │  caller             │
//!          │  - owns UnitOfWork  │
//!          │  - owns Registry    │
//!          └───────┬─────────────┘
//!                  │ send(&mut uow, sender, payload)
//!                  ▼
//! ┌───────────────────────────────────────────────┐
//! │  Registry (ordered registrations per kind)    │
//! │  - builds Event (seq, at, sender, payload)    │
//! │  - walks entries[kind] in registration order  │
//! │  - filter mismatch → skip                     │
//! └───────┬───────────────┬───────────────┬───────┘
//!         ▼               ▼               ▼
//!    handler #1      handler #2      handler #3
//!    on_event(&mut uow, &Event)   (same thread,
//!                                  same unit of work)
//! ```
//!
//! ### Dispatch lifecycle
//! ```text
//! send(&mut uow, sender, payload)
//!   ├─► Event::new           assigns seq + timestamp
//!   ├─► handler #1           Ok  → Receipt, continue
//!   ├─► handler #2           Err → DispatchError::Handler, rest skipped
//!   ├─► ...
//!   └─► Ok(receipts)         only after every handler returned
//! ```
//!
//! A send never returns before all matching handlers have run to completion,
//! never schedules work on another thread, and never isolates handlers from
//! each other: the first error aborts the send and surfaces to the caller.
//! Handlers read and write the **same uncommitted state** as the sender: a
//! handler can observe the very write that triggered it, and if the
//! enclosing transaction later rolls back, the handler's side effects stand
//! while the data change is undone.
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                      |
//! |-------------------|----------------------------------------------------------------------|-----------------------------------------|
//! | **Handler API**   | Hook into record state changes (auditing, logging, custom handlers). | [`Receive`], [`ReceiveFn`]              |
//! | **Dispatch**      | Ordered, synchronous, fail-fast or isolated fan-out.                 | [`Registry`], [`Receipt`], [`Delivery`] |
//! | **Events**        | Typed per-kind payloads with record instance data.                   | [`Event`], [`EventKind`], [`Payload`]   |
//! | **Context**       | Explicit unit of work shared by sender and handlers.                 | [`UnitOfWork`]                          |
//! | **Errors**        | Typed errors for handlers, dispatch, and context misuse.             | [`HandlerError`], [`DispatchError`]     |
//! | **Configuration** | Registration and dispatch diagnostics.                               | [`Config`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use signalhub::{
//!     Config, EventKind, HandlerError, Payload, ReceiveFn, Record, Recorder, Registry,
//!     UnitOfWork,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recorder = Recorder::new("probe");
//!
//!     let mut registry = Registry::new(Config::default());
//!     registry.register(EventKind::Created, None, Arc::new(recorder.clone()));
//!     registry.register(
//!         EventKind::Created,
//!         Some("users"),
//!         ReceiveFn::arc("greeter", |uow, event| {
//!             // The record staged just before the send is already visible.
//!             let record = uow.get(event.key()).ok_or_else(|| {
//!                 HandlerError::MissingRecord { key: event.key().to_string() }
//!             })?;
//!             println!("welcome, {}!", record.field("name").unwrap_or("?"));
//!             Ok(())
//!         }),
//!     );
//!
//!     let mut uow = UnitOfWork::new();
//!     uow.begin()?;
//!     let alice = Record::new().with_field("name", "alice");
//!     uow.put("user:1", alice.clone());
//!     let receipts = registry.send(&mut uow, "users", Payload::created("user:1", alice))?;
//!     uow.commit()?;
//!
//!     assert_eq!(receipts.len(), 2);
//!     assert_eq!(recorder.len(), 1);
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod dispatch;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use config::Config;
pub use context::UnitOfWork;
pub use dispatch::{Delivery, Receipt, RegistrationId, Registry, RegistryBuilder};
pub use error::{ContextError, DispatchError, HandlerError};
pub use events::{Event, EventKind, Payload, Record};
pub use handlers::{Observation, Receive, ReceiveFn, ReceiveRef, Recorder};

// Optional: expose a simple built-in logger handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogWriter;
