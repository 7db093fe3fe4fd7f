//! Explicit transactional context.
//!
//! The "same transaction" guarantee of synchronous dispatch is a visible
//! parameter here, not ambient framework state: [`UnitOfWork`] is owned by
//! the caller and passed by `&mut` into both the sender side
//! ([`Registry::send`](crate::Registry::send)) and every handler.

mod unit;

pub use unit::UnitOfWork;
