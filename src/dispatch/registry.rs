//! # Handler registry - ordered, synchronous fan-out.
//!
//! [`Registry`] holds the handler registrations and performs dispatch. It is
//! an explicitly owned object: registration call sites and senders receive
//! it by reference, there is no process-global state.
//!
//! ## Architecture
//! ```text
//! register(kind, filter, handler) ──► entries[kind].push(Registration)
//!
//! send(&mut uow, sender, payload)
//!     ├─► Event::new(sender, payload)          (assigns seq, at)
//!     ├─► for reg in entries[kind], in order:
//!     │       filter mismatch ─► skip
//!     │       reg.handler.on_event(uow, &ev)   (same thread, same uow)
//!     │           ├─ Ok  ─► push Receipt, continue
//!     │           └─ Err ─► return DispatchError::Handler (rest skipped)
//!     └─► Ok(receipts)
//! ```
//!
//! ## Rules
//! - Handlers run in strict registration order; no reordering, no
//!   parallelism, no deferral.
//! - `send` returns only after every matching handler completed (or one
//!   failed).
//! - Duplicate registration is legal and yields duplicate invocation.
//! - A send matching zero handlers succeeds with an empty receipt list.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::context::UnitOfWork;
use crate::error::DispatchError;
use crate::events::{Event, EventKind, Payload};
use crate::handlers::ReceiveRef;

use super::receipt::{Delivery, Receipt};

/// Identifier of one registration, returned by [`Registry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

/// One registered handler for one event kind.
struct Registration {
    id: RegistrationId,
    /// Only dispatch events whose sender equals this, when set.
    sender_filter: Option<Arc<str>>,
    handler: ReceiveRef,
}

impl Registration {
    fn matches(&self, sender: &str) -> bool {
        self.sender_filter
            .as_deref()
            .map_or(true, |filter| filter == sender)
    }
}

/// Ordered handler registry with synchronous dispatch.
///
/// ### Properties
/// - **In order**: per event kind, handlers run in registration order.
/// - **In thread**: dispatch is a plain call chain on the caller's thread.
/// - **In context**: every handler receives the caller's own unit of work;
///   uncommitted writes staged before the send are visible.
/// - **Fail-fast**: the first handler error aborts the send; no retries.
pub struct Registry {
    cfg: Config,
    entries: HashMap<EventKind, Vec<Registration>>,
    next_id: u64,
}

impl Registry {
    /// Creates an empty registry with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            entries: HashMap::new(),
            next_id: 0,
        }
    }

    /// Returns a builder for declarative registration.
    pub fn builder(cfg: Config) -> RegistryBuilder {
        RegistryBuilder::new(cfg)
    }

    /// Registers a handler for one event kind.
    ///
    /// The handler is appended to the kind's sequence; dispatch order is
    /// registration order. With `sender_filter` set, the handler only runs
    /// for events whose sender matches exactly.
    ///
    /// There is no uniqueness check: registering the same handler twice
    /// yields two invocations per send. When
    /// [`Config::warn_on_duplicate`] is set, a duplicate handler *name* for
    /// the same kind logs a warning.
    pub fn register(
        &mut self,
        kind: EventKind,
        sender_filter: Option<&str>,
        handler: ReceiveRef,
    ) -> RegistrationId {
        let id = RegistrationId(self.next_id);
        self.next_id += 1;

        let capacity = self.cfg.capacity_hint_clamped();
        let regs = self
            .entries
            .entry(kind)
            .or_insert_with(|| Vec::with_capacity(capacity));

        if self.cfg.warn_on_duplicate {
            let name = handler.name();
            if regs.iter().any(|r| r.handler.name() == name) {
                log::warn!(
                    "handler '{name}' registered twice for '{kind}'; it will run twice per send"
                );
            }
        }

        regs.push(Registration {
            id,
            sender_filter: sender_filter.map(Arc::from),
            handler,
        });
        id
    }

    /// Removes a registration by id.
    ///
    /// Returns `true` when the registration existed. The order of the
    /// remaining registrations is preserved.
    pub fn unregister(&mut self, id: RegistrationId) -> bool {
        for regs in self.entries.values_mut() {
            if let Some(pos) = regs.iter().position(|r| r.id == id) {
                regs.remove(pos);
                return true;
            }
        }
        false
    }

    /// Dispatches one event to every matching handler, fail-fast.
    ///
    /// Builds the [`Event`] (assigning its sequence number and timestamp),
    /// then invokes each matching handler synchronously, in registration
    /// order, on the calling thread, passing the caller's `uow`. Returns
    /// only after all handlers completed, with one [`Receipt`] per invoked
    /// handler.
    ///
    /// The first handler error aborts the send: handlers registered after
    /// the failing one are not invoked, and the error surfaces here as
    /// [`DispatchError::Handler`]. Whatever the failing and preceding
    /// handlers already did (writes staged into `uow`, console output) has
    /// happened; it is up to the caller's transaction scope to keep or
    /// discard the staged data.
    pub fn send(
        &self,
        uow: &mut UnitOfWork,
        sender: impl Into<Arc<str>>,
        payload: Payload,
    ) -> Result<Vec<Receipt>, DispatchError> {
        let event = Event::new(sender, payload);
        let kind = event.kind();
        let mut receipts = Vec::new();

        for reg in self.matching(kind, &event.sender) {
            self.trace(&event, reg);
            reg.handler
                .on_event(uow, &event)
                .map_err(|source| DispatchError::Handler {
                    handler: reg.handler.name(),
                    kind,
                    source,
                })?;
            receipts.push(Receipt {
                handler: reg.handler.name(),
                registration: reg.id,
            });
        }
        Ok(receipts)
    }

    /// Dispatches one event to every matching handler, collecting outcomes.
    ///
    /// Unlike [`send`](Registry::send), a handler error does not stop the
    /// remaining handlers: every matching handler runs, and each outcome is
    /// reported in its [`Delivery`]. Ordering, thread, and unit-of-work
    /// semantics are identical to `send`.
    pub fn send_isolated(
        &self,
        uow: &mut UnitOfWork,
        sender: impl Into<Arc<str>>,
        payload: Payload,
    ) -> Vec<Delivery> {
        let event = Event::new(sender, payload);
        let kind = event.kind();
        let mut deliveries = Vec::new();

        for reg in self.matching(kind, &event.sender) {
            self.trace(&event, reg);
            deliveries.push(Delivery {
                handler: reg.handler.name(),
                registration: reg.id,
                outcome: reg.handler.on_event(uow, &event),
            });
        }
        deliveries
    }

    /// Number of registrations for one event kind.
    #[must_use]
    pub fn handlers_for(&self, kind: EventKind) -> usize {
        self.entries.get(&kind).map_or(0, Vec::len)
    }

    /// Total number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matching<'a>(
        &'a self,
        kind: EventKind,
        sender: &'a str,
    ) -> impl Iterator<Item = &'a Registration> {
        self.entries
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(move |reg| reg.matches(sender))
    }

    fn trace(&self, event: &Event, reg: &Registration) {
        if self.cfg.trace_dispatch {
            log::trace!(
                "dispatch seq={} kind={} sender={} handler={}",
                event.seq,
                event.kind(),
                event.sender,
                reg.handler.name()
            );
        }
    }
}

/// Builder for constructing a [`Registry`] with handlers pre-registered.
///
/// ## Example
/// ```
/// use signalhub::{Config, EventKind, HandlerError, ReceiveFn, Registry};
///
/// let registry = Registry::builder(Config::default())
///     .with_handler(
///         EventKind::Created,
///         None,
///         ReceiveFn::arc("audit", |_uow, _ev| Ok::<_, HandlerError>(())),
///     )
///     .build();
///
/// assert_eq!(registry.handlers_for(EventKind::Created), 1);
/// ```
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            registry: Registry::new(cfg),
        }
    }

    /// Registers a handler; order of `with_handler` calls is dispatch order.
    pub fn with_handler(
        mut self,
        kind: EventKind,
        sender_filter: Option<&str>,
        handler: ReceiveRef,
    ) -> Self {
        self.registry.register(kind, sender_filter, handler);
        self
    }

    /// Returns the finished registry.
    pub fn build(self) -> Registry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::error::HandlerError;
    use crate::events::Record;
    use crate::handlers::{ReceiveFn, Recorder};

    fn saved(key: &str, value: &str) -> Payload {
        Payload::created(key, Record::new().with_field("value", value))
    }

    #[test]
    fn test_every_handler_runs_once_in_registration_order() {
        let first = Recorder::new("first");
        let second = Recorder::new("second");

        let mut registry = Registry::new(Config::default());
        registry.register(EventKind::Created, None, Arc::new(first.clone()));
        registry.register(EventKind::Created, None, Arc::new(second.clone()));

        let mut uow = UnitOfWork::new();
        let receipts = registry.send(&mut uow, "store", saved("k", "1")).unwrap();

        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts[0].handler, "first");
        assert_eq!(receipts[1].handler, "second");
        assert_eq!(first.len(), 1, "each handler must run exactly once");
        assert_eq!(second.len(), 1, "each handler must run exactly once");
    }

    #[test]
    fn test_send_returns_after_all_handlers_completed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = Registry::new(Config::default());
        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            registry.register(
                EventKind::Updated,
                None,
                ReceiveFn::arc("bump", move |_uow, _ev| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            );
        }

        let mut uow = UnitOfWork::new();
        registry
            .send(&mut uow, "store", Payload::updated("k", Record::new()))
            .unwrap();
        // Plain call chain: by the time send returned, every handler ran.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_duplicate_registration_yields_duplicate_invocation() {
        let recorder = Recorder::new("dup");
        let handler: ReceiveRef = Arc::new(recorder.clone());

        let mut registry = Registry::new(Config::default());
        registry.register(EventKind::Created, None, Arc::clone(&handler));
        registry.register(EventKind::Created, None, handler);

        let mut uow = UnitOfWork::new();
        let receipts = registry.send(&mut uow, "store", saved("k", "1")).unwrap();

        assert_eq!(receipts.len(), 2);
        assert_eq!(recorder.len(), 2, "duplicate registration means two calls");
    }

    #[test]
    fn test_sender_filter_matches_exactly() {
        let recorder = Recorder::new("filtered");
        let mut registry = Registry::new(Config::default());
        registry.register(EventKind::Created, Some("users"), Arc::new(recorder.clone()));

        let mut uow = UnitOfWork::new();
        registry.send(&mut uow, "orders", saved("o:1", "a")).unwrap();
        assert!(recorder.is_empty(), "non-matching sender must be skipped");

        registry.send(&mut uow, "users", saved("u:1", "b")).unwrap();
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.entries()[0].key, "u:1");
    }

    #[test]
    fn test_kind_routing_only_hits_registered_kind() {
        let recorder = Recorder::new("creates_only");
        let mut registry = Registry::new(Config::default());
        registry.register(EventKind::Created, None, Arc::new(recorder.clone()));

        let mut uow = UnitOfWork::new();
        registry
            .send(&mut uow, "store", Payload::deleted("k"))
            .unwrap();
        assert!(recorder.is_empty());

        let receipts = registry
            .send(&mut uow, "store", Payload::deleted("other"))
            .unwrap();
        assert!(receipts.is_empty(), "zero-handler send succeeds with no receipts");
    }

    #[test]
    fn test_handler_error_short_circuits_and_reaches_caller() {
        let before = Recorder::new("before");
        let after = Recorder::new("after");

        let mut registry = Registry::new(Config::default());
        registry.register(EventKind::Created, None, Arc::new(before.clone()));
        registry.register(
            EventKind::Created,
            None,
            ReceiveFn::arc("boom", |_uow, _ev| Err(HandlerError::failed("boom"))),
        );
        registry.register(EventKind::Created, None, Arc::new(after.clone()));

        let mut uow = UnitOfWork::new();
        let err = registry
            .send(&mut uow, "store", saved("k", "1"))
            .unwrap_err();

        match err {
            DispatchError::Handler { handler, kind, .. } => {
                assert_eq!(handler, "boom");
                assert_eq!(kind, EventKind::Created);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(before.len(), 1, "handlers before the failure must have run");
        assert!(after.len() == 0, "handlers after the failure must be skipped");
    }

    #[test]
    fn test_send_isolated_runs_every_handler() {
        let after = Recorder::new("after");
        let mut registry = Registry::new(Config::default());
        registry.register(
            EventKind::Created,
            None,
            ReceiveFn::arc("boom", |_uow, _ev| Err(HandlerError::failed("boom"))),
        );
        registry.register(EventKind::Created, None, Arc::new(after.clone()));

        let mut uow = UnitOfWork::new();
        let deliveries = registry.send_isolated(&mut uow, "store", saved("k", "1"));

        assert_eq!(deliveries.len(), 2);
        assert!(!deliveries[0].is_ok());
        assert!(deliveries[1].is_ok());
        assert_eq!(after.len(), 1, "isolated send must not short-circuit");
    }

    #[test]
    fn test_handlers_run_on_the_calling_thread() {
        let recorder = Recorder::new("affinity");
        let mut registry = Registry::new(Config::default());
        registry.register(EventKind::Created, None, Arc::new(recorder.clone()));

        let mut uow = UnitOfWork::new();
        registry.send(&mut uow, "store", saved("k", "1")).unwrap();

        assert_eq!(
            recorder.entries()[0].thread,
            thread::current().id(),
            "dispatch must not switch threads"
        );
    }

    #[test]
    fn test_handler_observes_uncommitted_write_despite_rollback() {
        // Register a handler that reads back the record written immediately
        // before the send; it must see it even though the transaction is
        // rolled back afterwards, and its observation must survive.
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_handler = Arc::clone(&seen);

        let mut registry = Registry::new(Config::default());
        registry.register(
            EventKind::Created,
            None,
            ReceiveFn::arc("readback", move |uow, ev| {
                let record = uow
                    .get(ev.key())
                    .ok_or_else(|| HandlerError::MissingRecord {
                        key: ev.key().to_string(),
                    })?;
                if record.field("name") == Some("alice") {
                    seen_in_handler.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }),
        );

        let mut uow = UnitOfWork::new();
        uow.begin().unwrap();
        let record = Record::new().with_field("name", "alice");
        uow.put("user:1", record.clone());
        registry
            .send(&mut uow, "users", Payload::created("user:1", record))
            .unwrap();
        uow.rollback().unwrap();

        assert!(uow.get("user:1").is_none(), "rollback must undo the write");
        assert_eq!(
            seen.load(Ordering::SeqCst),
            1,
            "the handler's observation of uncommitted state must survive rollback"
        );
    }

    #[test]
    fn test_failed_send_aborts_enclosing_transaction_scope() {
        let mut registry = Registry::new(Config::default());
        registry.register(
            EventKind::Created,
            None,
            ReceiveFn::arc("veto", |_uow, _ev| Err(HandlerError::failed("nope"))),
        );

        let mut uow = UnitOfWork::new();
        let res: Result<(), DispatchError> = uow.transaction(|uow| {
            uow.put("user:1", Record::new().with_field("name", "alice"));
            registry.send(uow, "users", saved("user:1", "alice"))?;
            Ok(())
        });

        assert!(res.is_err());
        assert!(
            uow.get("user:1").is_none(),
            "uncaught handler failure must roll the unit of work back"
        );
    }

    #[test]
    fn test_concrete_created_scenario() {
        // Register handler H for "created"; send with value=42: H is called
        // once with the sender and the payload, and send returns after H.
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_handler = Arc::clone(&calls);

        let mut registry = Registry::new(Config::default());
        registry.register(
            EventKind::Created,
            None,
            ReceiveFn::arc("h", move |_uow, ev| {
                assert_eq!(ev.sender.as_ref(), "s");
                assert_eq!(ev.record().and_then(|r| r.field("value")), Some("42"));
                calls_in_handler.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let mut uow = UnitOfWork::new();
        let receipts = registry.send(&mut uow, "s", saved("k", "42")).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].handler, "h");
    }

    #[test]
    fn test_unregister_preserves_remaining_order() {
        let first = Recorder::new("first");
        let second = Recorder::new("second");
        let third = Recorder::new("third");

        let mut registry = Registry::new(Config::default());
        registry.register(EventKind::Created, None, Arc::new(first.clone()));
        let id = registry.register(EventKind::Created, None, Arc::new(second.clone()));
        registry.register(EventKind::Created, None, Arc::new(third.clone()));

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id), "second removal must be a no-op");

        let mut uow = UnitOfWork::new();
        let receipts = registry.send(&mut uow, "store", saved("k", "1")).unwrap();

        let names: Vec<&str> = receipts.iter().map(|r| r.handler).collect();
        assert_eq!(names, vec!["first", "third"]);
        assert!(second.is_empty());
    }

    #[test]
    fn test_builder_registers_in_call_order() {
        let first = Recorder::new("first");
        let second = Recorder::new("second");

        let registry = Registry::builder(Config::default())
            .with_handler(EventKind::Deleted, None, Arc::new(first.clone()))
            .with_handler(EventKind::Deleted, None, Arc::new(second.clone()))
            .build();

        assert_eq!(registry.handlers_for(EventKind::Deleted), 2);
        assert_eq!(registry.len(), 2);

        let mut uow = UnitOfWork::new();
        let receipts = registry
            .send(&mut uow, "store", Payload::deleted("k"))
            .unwrap();
        assert_eq!(receipts[0].handler, "first");
        assert_eq!(receipts[1].handler, "second");
    }

    #[test]
    fn test_handler_may_write_into_the_shared_unit_of_work() {
        let mut registry = Registry::new(Config::default());
        registry.register(
            EventKind::Created,
            None,
            ReceiveFn::arc("annotate", |uow, ev| {
                uow.put(
                    format!("audit:{}", ev.key()),
                    Record::new().with_field("seq", ev.seq.to_string()),
                );
                Ok(())
            }),
        );

        let mut uow = UnitOfWork::new();
        uow.begin().unwrap();
        uow.put("user:1", Record::new());
        registry
            .send(&mut uow, "users", saved("user:1", "x"))
            .unwrap();
        assert!(
            uow.get("audit:user:1").is_some(),
            "handler writes land in the caller's unit of work"
        );
        uow.rollback().unwrap();
        assert!(
            uow.get("audit:user:1").is_none(),
            "handler writes share the caller's transaction fate"
        );
    }
}
