//! # Registry configuration.
//!
//! [`Config`] defines the registry's diagnostic behavior: per-kind capacity
//! hints, duplicate-registration warnings, and per-invocation trace logging.
//!
//! None of these knobs change dispatch semantics: fan-out stays synchronous,
//! in registration order, fail-fast on the first handler error.
//!
//! # Example
//! ```
//! use signalhub::Config;
//!
//! let mut cfg = Config::default();
//! cfg.trace_dispatch = true;
//! cfg.capacity_hint = 16;
//!
//! assert_eq!(cfg.capacity_hint, 16);
//! assert!(!cfg.warn_on_duplicate);
//! ```

/// Configuration for a [`Registry`](crate::Registry).
///
/// Controls registration-time diagnostics and dispatch tracing.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Pre-allocated registration capacity per event kind.
    pub capacity_hint: usize,
    /// Log a warning when a handler name is registered twice for one kind.
    ///
    /// Duplicate registration is legal and yields duplicate invocation; the
    /// warning only makes the duplication visible in logs.
    pub warn_on_duplicate: bool,
    /// Emit a `log::trace!` line for every handler invocation.
    pub trace_dispatch: bool,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `capacity_hint = 4`
    /// - `warn_on_duplicate = false`
    /// - `trace_dispatch = false`
    fn default() -> Self {
        Self {
            capacity_hint: 4,
            warn_on_duplicate: false,
            trace_dispatch: false,
        }
    }
}

impl Config {
    /// Returns the capacity hint clamped to a minimum of 1.
    pub(crate) fn capacity_hint_clamped(&self) -> usize {
        self.capacity_hint.max(1)
    }
}
