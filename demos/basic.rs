//! # Example: basic
//!
//! Demonstrates the minimal register-then-send flow.
//!
//! Shows how to:
//! - Build a [`Registry`] and register handlers for one event kind.
//! - Send a typed payload through a [`UnitOfWork`].
//! - Read the per-handler [`Receipt`]s a fail-fast send returns.
//!
//! ## Flow
//! ```text
//! Registry::register(Created, ...) ×2
//!     └─► send(&mut uow, "users", Payload::created(...))
//!           ├─► LogWriter.on_event()    (prints one line)
//!           ├─► greeter.on_event()      (prints one line)
//!           └─► Ok(vec![Receipt; 2])
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic --features logging
//! ```

use std::sync::Arc;

use signalhub::{
    Config, EventKind, HandlerError, LogWriter, Payload, ReceiveFn, Record, Registry, UnitOfWork,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut registry = Registry::new(Config::default());
    registry.register(EventKind::Created, None, Arc::new(LogWriter));
    registry.register(
        EventKind::Created,
        Some("users"),
        ReceiveFn::arc("greeter", |_uow, event| {
            let name = event
                .record()
                .and_then(|r| r.field("name"))
                .unwrap_or("someone");
            println!("welcome, {name}!");
            Ok::<_, HandlerError>(())
        }),
    );

    let mut uow = UnitOfWork::new();
    let alice = Record::new().with_field("name", "alice");
    let receipts = registry.send(&mut uow, "users", Payload::created("user:1", alice))?;

    for receipt in &receipts {
        println!("acknowledged by '{}'", receipt.handler);
    }
    println!("send returned after {} handler(s)", receipts.len());
    Ok(())
}
