//! # Example: failing_handler
//!
//! Demonstrates the two failure modes side by side:
//! - [`Registry::send`] is fail-fast: the first handler error aborts the
//!   send, later handlers never run, and the caller sees the error.
//! - [`Registry::send_isolated`] runs every matching handler and reports
//!   per-handler outcomes instead of propagating.
//!
//! ## Flow
//! ```text
//! handlers: [ok_1, boom, ok_2]
//!
//! send()           ─► ok_1 ─► boom ─► Err(DispatchError::Handler)   (ok_2 skipped)
//! send_isolated()  ─► ok_1 ─► boom ─► ok_2 ─► Vec<Delivery>         (all ran)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example failing_handler
//! ```

use signalhub::{
    Config, EventKind, HandlerError, Payload, ReceiveFn, Record, Registry, UnitOfWork,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut registry = Registry::new(Config::default());
    registry.register(
        EventKind::Updated,
        None,
        ReceiveFn::arc("ok_1", |_uow, _ev| {
            println!("ok_1 ran");
            Ok(())
        }),
    );
    registry.register(
        EventKind::Updated,
        None,
        ReceiveFn::arc("boom", |_uow, _ev| Err(HandlerError::failed("boom"))),
    );
    registry.register(
        EventKind::Updated,
        None,
        ReceiveFn::arc("ok_2", |_uow, _ev| {
            println!("ok_2 ran");
            Ok(())
        }),
    );

    let mut uow = UnitOfWork::new();
    let payload = Payload::updated("k", Record::new().with_field("value", "1"));

    println!("--- fail-fast send ---");
    match registry.send(&mut uow, "store", payload.clone()) {
        Ok(receipts) => println!("unexpected success: {} receipts", receipts.len()),
        Err(err) => println!("send failed as expected: {} ({})", err, err.as_label()),
    }

    println!("--- isolated send ---");
    for delivery in registry.send_isolated(&mut uow, "store", payload) {
        match &delivery.outcome {
            Ok(()) => println!("'{}' ok", delivery.handler),
            Err(err) => println!("'{}' failed: {err}", delivery.handler),
        }
    }
    Ok(())
}
