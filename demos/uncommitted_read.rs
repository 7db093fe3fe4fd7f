//! # Example: uncommitted_read
//!
//! Demonstrates the shared-transaction contract: a handler invoked during a
//! send observes the write that triggered it **before** that write is
//! committed, and its console output survives even when the transaction is
//! rolled back afterwards.
//!
//! Shows how to:
//! - Stage a write inside an open [`UnitOfWork`] transaction.
//! - Read it back from a handler during the send.
//! - Roll back and observe that only the data change is undone.
//!
//! ## Flow
//! ```text
//! uow.begin()
//!   ├─► uow.put("user:1", {name: alice})       (staged, not committed)
//!   ├─► send(Created) ─► readback.on_event()
//!   │        └─► uow.get("user:1") → visible   (prints the name)
//!   └─► uow.rollback()                         (record gone, print stays)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example uncommitted_read
//! ```

use signalhub::{Config, EventKind, HandlerError, Payload, ReceiveFn, Record, Registry, UnitOfWork};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut registry = Registry::new(Config::default());
    registry.register(
        EventKind::Created,
        None,
        ReceiveFn::arc("readback", |uow, event| {
            // Runs inside the caller's transaction: the staged record is here.
            let record = uow
                .get(event.key())
                .ok_or_else(|| HandlerError::MissingRecord {
                    key: event.key().to_string(),
                })?;
            println!(
                "handler sees uncommitted record: name={}",
                record.field("name").unwrap_or("?")
            );
            Ok(())
        }),
    );

    let mut uow = UnitOfWork::new();
    uow.begin()?;
    let alice = Record::new().with_field("name", "alice");
    uow.put("user:1", alice.clone());
    registry.send(&mut uow, "users", Payload::created("user:1", alice))?;
    uow.rollback()?;

    println!(
        "after rollback, record present: {}",
        uow.get("user:1").is_some()
    );
    println!("…but the handler's line above already happened.");
    Ok(())
}
