//! # Recording handler (`Recorder`)
//!
//! [`Recorder`] appends one [`Observation`] per received event to a shared
//! list. It makes the dispatch contract observable from the outside:
//! invocation order (via `seq`), thread affinity (via `thread`), and the
//! fact that a handler's side effects survive a later rollback (the list
//! keeps its entries when the unit of work discards its data).
//!
//! Cloning a `Recorder` shares the underlying list, so the usual pattern is
//! to register a clone and keep the original for reading:
//!
//! ```
//! use std::sync::Arc;
//! use signalhub::{Config, EventKind, Payload, Record, Recorder, Registry, UnitOfWork};
//!
//! let recorder = Recorder::new("probe");
//! let mut registry = Registry::new(Config::default());
//! registry.register(EventKind::Created, None, Arc::new(recorder.clone()));
//!
//! let mut uow = UnitOfWork::new();
//! registry.send(&mut uow, "demo", Payload::created("k", Record::new())).unwrap();
//!
//! assert_eq!(recorder.len(), 1);
//! assert_eq!(recorder.entries()[0].handler, "probe");
//! ```

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use crate::context::UnitOfWork;
use crate::error::HandlerError;
use crate::events::Event;
use crate::handlers::handler::Receive;

/// One recorded handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Name of the recording handler.
    pub handler: &'static str,
    /// Sequence number of the observed event.
    pub seq: u64,
    /// Key the observed event referred to.
    pub key: String,
    /// Thread the handler ran on.
    pub thread: ThreadId,
}

/// Handler that records every received event into a shared list.
#[derive(Debug, Clone)]
pub struct Recorder {
    name: &'static str,
    entries: Arc<Mutex<Vec<Observation>>>,
}

impl Recorder {
    /// Creates a recorder with the given handler name and an empty list.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a snapshot of the recorded observations, oldest first.
    pub fn entries(&self) -> Vec<Observation> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded observations.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// True if nothing was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the recorded observations.
    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    fn push(&self, observation: Observation) {
        match self.entries.lock() {
            Ok(mut guard) => guard.push(observation),
            Err(poisoned) => poisoned.into_inner().push(observation),
        }
    }
}

impl Receive for Recorder {
    fn on_event(&self, _uow: &mut UnitOfWork, event: &Event) -> Result<(), HandlerError> {
        self.push(Observation {
            handler: self.name,
            seq: event.seq,
            key: event.key().to_string(),
            thread: thread::current().id(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Payload;

    #[test]
    fn test_clones_share_entries() {
        let recorder = Recorder::new("probe");
        let clone = recorder.clone();

        let mut uow = UnitOfWork::new();
        let ev = Event::new("s", Payload::deleted("k"));
        clone.on_event(&mut uow, &ev).unwrap();

        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.entries()[0].key, "k");
    }

    #[test]
    fn test_clear_resets_the_list() {
        let recorder = Recorder::new("probe");
        let mut uow = UnitOfWork::new();
        let ev = Event::new("s", Payload::deleted("k"));
        recorder.on_event(&mut uow, &ev).unwrap();
        recorder.clear();
        assert!(recorder.is_empty());
    }
}
