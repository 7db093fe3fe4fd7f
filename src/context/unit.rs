//! # Unit of work: the explicit transactional context.
//!
//! [`UnitOfWork`] is the shared read-write state that a sender and its
//! handlers operate on during a send. It replaces an ambient transaction
//! with a visible parameter: whoever triggers a send passes the unit of
//! work in, and every handler receives the same `&mut` borrow.
//!
//! ## Rules
//! - Reads go **through the overlay first**: a write staged inside an open
//!   transaction is visible to every subsequent read on this unit of work,
//!   including reads performed by handlers invoked mid-transaction.
//! - `rollback` discards staged data only. Anything a handler already did
//!   with the staged values (printed a line, recorded an observation) has
//!   happened and stays happened.
//! - Writes outside an open transaction apply directly (autocommit).
//! - No nesting: `begin` inside an open transaction is an error.
//! - One thread of control: there is no locking because sender and handlers
//!   share a single `&mut` borrow.
//!
//! ## Example
//! ```
//! use signalhub::{Record, UnitOfWork};
//!
//! let mut uow = UnitOfWork::new();
//! uow.begin().unwrap();
//! uow.put("user:1", Record::new().with_field("name", "alice"));
//!
//! // Staged write is visible before commit.
//! assert!(uow.get("user:1").is_some());
//!
//! uow.rollback().unwrap();
//! assert!(uow.get("user:1").is_none());
//! ```

use std::collections::BTreeMap;

use crate::error::ContextError;
use crate::events::Record;

/// Explicit unit-of-work store shared by sender and handlers.
///
/// Holds committed records plus, while a transaction is open, an overlay of
/// pending writes (with tombstones for deletes). Reads see the overlay
/// first, so uncommitted state is observable by design.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    committed: BTreeMap<String, Record>,
    /// Pending writes while a transaction is open; `None` marks a delete.
    overlay: Option<BTreeMap<String, Option<Record>>>,
}

impl UnitOfWork {
    /// Creates an empty unit of work with no open transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a transaction.
    ///
    /// Fails with [`ContextError::AlreadyOpen`] if one is open; transactions
    /// do not nest.
    pub fn begin(&mut self) -> Result<(), ContextError> {
        if self.overlay.is_some() {
            return Err(ContextError::AlreadyOpen);
        }
        self.overlay = Some(BTreeMap::new());
        Ok(())
    }

    /// True while a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.overlay.is_some()
    }

    /// Writes a record under `key`.
    ///
    /// Returns `true` when the key was not previously visible (the write is
    /// a create), `false` when it overwrites an existing record. Inside an
    /// open transaction the write is staged; otherwise it applies directly.
    pub fn put(&mut self, key: impl Into<String>, record: Record) -> bool {
        let key = key.into();
        let created = self.get(&key).is_none();
        match self.overlay.as_mut() {
            Some(overlay) => {
                overlay.insert(key, Some(record));
            }
            None => {
                self.committed.insert(key, record);
            }
        }
        created
    }

    /// Removes the record under `key`.
    ///
    /// Returns `true` when a record was visible under the key. Inside an
    /// open transaction the removal is staged as a tombstone; otherwise it
    /// applies directly.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.get(key).is_some();
        match self.overlay.as_mut() {
            Some(overlay) => {
                overlay.insert(key.to_string(), None);
            }
            None => {
                self.committed.remove(key);
            }
        }
        existed
    }

    /// Reads the record under `key`, overlay first.
    ///
    /// While a transaction is open, staged writes shadow committed records
    /// and staged deletes hide them.
    pub fn get(&self, key: &str) -> Option<&Record> {
        if let Some(overlay) = &self.overlay {
            if let Some(pending) = overlay.get(key) {
                return pending.as_ref();
            }
        }
        self.committed.get(key)
    }

    /// Applies all staged writes and closes the transaction.
    pub fn commit(&mut self) -> Result<(), ContextError> {
        let overlay = self.overlay.take().ok_or(ContextError::NotOpen)?;
        for (key, pending) in overlay {
            match pending {
                Some(record) => {
                    self.committed.insert(key, record);
                }
                None => {
                    self.committed.remove(&key);
                }
            }
        }
        Ok(())
    }

    /// Discards all staged writes and closes the transaction.
    pub fn rollback(&mut self) -> Result<(), ContextError> {
        self.overlay.take().ok_or(ContextError::NotOpen).map(|_| ())
    }

    /// Runs `f` inside a transaction scope.
    ///
    /// Opens a transaction, commits when `f` returns `Ok`, rolls back when
    /// it returns `Err`, and propagates the closure's result either way.
    /// A handler failure escaping a send inside `f` therefore aborts the
    /// whole unit of work as an ordinary consequence of error propagation;
    /// the registry itself has no transaction awareness.
    ///
    /// If `f` closed the transaction itself (committed or rolled back), the
    /// scope leaves it closed.
    ///
    /// # Example
    /// ```
    /// use signalhub::{ContextError, Record, UnitOfWork};
    ///
    /// let mut uow = UnitOfWork::new();
    /// let res: Result<(), ContextError> = uow.transaction(|uow| {
    ///     uow.put("k", Record::new());
    ///     Ok(())
    /// });
    /// assert!(res.is_ok());
    /// assert!(uow.get("k").is_some());
    /// ```
    pub fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<ContextError>,
    {
        self.begin()?;
        match f(self) {
            Ok(value) => {
                if self.in_transaction() {
                    self.commit()?;
                }
                Ok(value)
            }
            Err(err) => {
                if self.in_transaction() {
                    let _ = self.rollback();
                }
                Err(err)
            }
        }
    }

    /// Number of records currently visible (staged state included).
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.overlay {
            None => self.committed.len(),
            Some(overlay) => {
                let mut n = 0;
                for key in self.committed.keys() {
                    // Tombstoned or overwritten keys are counted via the overlay.
                    if !overlay.contains_key(key) {
                        n += 1;
                    }
                }
                n + overlay.values().filter(|p| p.is_some()).count()
            }
        }
    }

    /// True if no records are visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: &str) -> Record {
        Record::new().with_field("value", value)
    }

    #[test]
    fn test_autocommit_without_transaction() {
        let mut uow = UnitOfWork::new();
        assert!(uow.put("k", rec("1")), "first write must report create");
        assert!(!uow.put("k", rec("2")), "overwrite must not report create");
        assert_eq!(uow.get("k").and_then(|r| r.field("value")), Some("2"));
        assert!(uow.delete("k"));
        assert!(uow.get("k").is_none());
    }

    #[test]
    fn test_staged_write_is_visible_before_commit() {
        let mut uow = UnitOfWork::new();
        uow.begin().unwrap();
        uow.put("user:1", rec("alice"));
        assert_eq!(
            uow.get("user:1").and_then(|r| r.field("value")),
            Some("alice"),
            "uncommitted write must be readable through the same unit of work"
        );
        uow.commit().unwrap();
        assert!(uow.get("user:1").is_some());
    }

    #[test]
    fn test_rollback_discards_staged_writes() {
        let mut uow = UnitOfWork::new();
        uow.put("keep", rec("1"));
        uow.begin().unwrap();
        uow.put("gone", rec("2"));
        uow.delete("keep");
        assert!(uow.get("keep").is_none(), "staged delete must hide the record");
        uow.rollback().unwrap();
        assert!(uow.get("gone").is_none());
        assert!(uow.get("keep").is_some(), "rollback must restore visibility");
    }

    #[test]
    fn test_commit_applies_tombstones() {
        let mut uow = UnitOfWork::new();
        uow.put("k", rec("1"));
        uow.begin().unwrap();
        uow.delete("k");
        uow.commit().unwrap();
        assert!(uow.get("k").is_none());
    }

    #[test]
    fn test_no_nested_transactions() {
        let mut uow = UnitOfWork::new();
        uow.begin().unwrap();
        assert_eq!(uow.begin(), Err(ContextError::AlreadyOpen));
    }

    #[test]
    fn test_commit_without_transaction_fails() {
        let mut uow = UnitOfWork::new();
        assert_eq!(uow.commit(), Err(ContextError::NotOpen));
        assert_eq!(uow.rollback(), Err(ContextError::NotOpen));
    }

    #[test]
    fn test_transaction_scope_commits_on_ok() {
        let mut uow = UnitOfWork::new();
        let res: Result<u32, ContextError> = uow.transaction(|uow| {
            uow.put("k", rec("1"));
            Ok(7)
        });
        assert_eq!(res.unwrap(), 7);
        assert!(!uow.in_transaction());
        assert!(uow.get("k").is_some());
    }

    #[test]
    fn test_transaction_scope_rolls_back_on_err() {
        let mut uow = UnitOfWork::new();
        let res: Result<(), ContextError> = uow.transaction(|uow| {
            uow.put("k", rec("1"));
            Err(ContextError::NotOpen)
        });
        assert!(res.is_err());
        assert!(!uow.in_transaction());
        assert!(uow.get("k").is_none(), "failed scope must discard staged data");
    }

    #[test]
    fn test_len_counts_through_overlay() {
        let mut uow = UnitOfWork::new();
        uow.put("a", rec("1"));
        uow.put("b", rec("2"));
        uow.begin().unwrap();
        uow.delete("a");
        uow.put("c", rec("3"));
        uow.put("b", rec("2b"));
        assert_eq!(uow.len(), 2, "a tombstoned, b overwritten, c staged");
        uow.commit().unwrap();
        assert_eq!(uow.len(), 2);
    }
}
