//! Event data model.
//!
//! This module groups the event **data model** used by the registry:
//! kinds, per-kind payloads, record instance data, and the dispatched
//! envelope with its global sequence.
//!
//! ## Contents
//! - [`EventKind`] event classification (the registration key)
//! - [`Payload`] tagged per-kind payload
//! - [`Record`] instance data carried by save payloads
//! - [`Event`] dispatched envelope (`seq`, `at`, `sender`, payload)
//!
//! There is no channel here: events are built inside
//! [`Registry::send`](crate::Registry::send) and handed to handlers as plain
//! borrowed arguments on the calling thread.

mod event;

pub use event::{Event, EventKind, Payload, Record};
