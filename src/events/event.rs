//! # Events dispatched through the registry.
//!
//! The [`EventKind`] enum classifies notifications of record state changes:
//! - [`EventKind::Created`] — a record was inserted.
//! - [`EventKind::Updated`] — an existing record was overwritten.
//! - [`EventKind::Deleted`] — a record was removed.
//!
//! The [`Payload`] enum is the tagged per-kind payload: each variant carries
//! exactly the data its kind defines, so a handler matching on the payload
//! gets the right shape at compile time instead of probing optional fields.
//!
//! The [`Event`] struct is the dispatched envelope: payload plus sender
//! identifier, wall-clock timestamp, and a global sequence number.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. The sequence is assigned when the event is built inside a
//! send, so observations recorded by handlers sort in dispatch order.
//!
//! ## Example
//! ```
//! use signalhub::{Event, EventKind, Payload, Record};
//!
//! let record = Record::new().with_field("name", "alice");
//! let ev = Event::new("users", Payload::created("user:1", record));
//!
//! assert_eq!(ev.kind(), EventKind::Created);
//! assert_eq!(ev.sender.as_ref(), "users");
//! assert_eq!(ev.key(), "user:1");
//! assert_eq!(ev.record().and_then(|r| r.field("name")), Some("alice"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of record state-change events.
///
/// Used as the registration key: handlers are registered for exactly one
/// kind and invoked only for events of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A record was inserted under a key that did not exist.
    Created,
    /// A record was overwritten under an existing key.
    Updated,
    /// A record was removed.
    Deleted,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Instance data carried by save payloads.
///
/// An ordered map of named string fields, built with `with_*` chaining.
///
/// # Example
/// ```
/// use signalhub::Record;
///
/// let rec = Record::new()
///     .with_field("name", "alice")
///     .with_field("value", "42");
///
/// assert_eq!(rec.field("value"), Some("42"));
/// assert_eq!(rec.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a named field.
    #[inline]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets a named field in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Tagged per-kind event payload.
///
/// Each variant carries exactly the data its [`EventKind`] defines;
/// [`Payload::kind`] maps the variant back to its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A record was inserted.
    Created {
        /// Key the record was inserted under.
        key: Arc<str>,
        /// The inserted record.
        record: Record,
    },
    /// An existing record was overwritten.
    Updated {
        /// Key of the overwritten record.
        key: Arc<str>,
        /// The new record value.
        record: Record,
    },
    /// A record was removed.
    Deleted {
        /// Key of the removed record.
        key: Arc<str>,
    },
}

impl Payload {
    /// Creates a [`Payload::Created`].
    #[inline]
    pub fn created(key: impl Into<Arc<str>>, record: Record) -> Self {
        Payload::Created {
            key: key.into(),
            record,
        }
    }

    /// Creates a [`Payload::Updated`].
    #[inline]
    pub fn updated(key: impl Into<Arc<str>>, record: Record) -> Self {
        Payload::Updated {
            key: key.into(),
            record,
        }
    }

    /// Creates a [`Payload::Deleted`].
    #[inline]
    pub fn deleted(key: impl Into<Arc<str>>) -> Self {
        Payload::Deleted { key: key.into() }
    }

    /// Returns the event kind this payload belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            Payload::Created { .. } => EventKind::Created,
            Payload::Updated { .. } => EventKind::Updated,
            Payload::Deleted { .. } => EventKind::Deleted,
        }
    }

    /// Returns the record key the payload refers to.
    pub fn key(&self) -> &str {
        match self {
            Payload::Created { key, .. }
            | Payload::Updated { key, .. }
            | Payload::Deleted { key } => key,
        }
    }

    /// Returns the carried record, if the kind has one.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Payload::Created { record, .. } | Payload::Updated { record, .. } => Some(record),
            Payload::Deleted { .. } => None,
        }
    }
}

/// Dispatched event envelope.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `sender`: identifier of the emitting component
/// - `payload`: the per-kind data
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Identifier of the emitting component.
    pub sender: Arc<str>,
    /// Per-kind payload.
    pub payload: Payload,
}

impl Event {
    /// Creates a new event with the current timestamp and next sequence number.
    pub fn new(sender: impl Into<Arc<str>>, payload: Payload) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            sender: sender.into(),
            payload,
        }
    }

    /// Returns the event kind (derived from the payload variant).
    #[inline]
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Returns the record key the event refers to.
    #[inline]
    pub fn key(&self) -> &str {
        self.payload.key()
    }

    /// Returns the carried record, if the kind has one.
    #[inline]
    pub fn record(&self) -> Option<&Record> {
        self.payload.record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new("s", Payload::deleted("k"));
        let b = Event::new("s", Payload::deleted("k"));
        let c = Event::new("s", Payload::deleted("k"));
        assert!(a.seq < b.seq, "seq must grow: {} vs {}", a.seq, b.seq);
        assert!(b.seq < c.seq, "seq must grow: {} vs {}", b.seq, c.seq);
    }

    #[test]
    fn test_payload_kind_mapping() {
        let rec = Record::new();
        assert_eq!(Payload::created("k", rec.clone()).kind(), EventKind::Created);
        assert_eq!(Payload::updated("k", rec).kind(), EventKind::Updated);
        assert_eq!(Payload::deleted("k").kind(), EventKind::Deleted);
    }

    #[test]
    fn test_deleted_payload_has_no_record() {
        let ev = Event::new("store", Payload::deleted("user:1"));
        assert_eq!(ev.key(), "user:1");
        assert!(ev.record().is_none());
    }

    #[test]
    fn test_record_fields_are_ordered() {
        let rec = Record::new()
            .with_field("b", "2")
            .with_field("a", "1");
        let names: Vec<&str> = rec.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
