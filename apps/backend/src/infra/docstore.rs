//! In-process document collection with per-document atomic updates.
//!
//! Each document sits behind its own mutex, so writers to different
//! documents never contend. Updates run on a scratch clone and replace the
//! stored copy only when the closure succeeds; the version then moves up by
//! one and the commit hook runs while the document lock is still held, which
//! keeps hook invocations in version order.

use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// A stored document together with its commit counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub doc: T,
}

type Slot<T> = Arc<Mutex<Versioned<T>>>;

pub struct DocumentCollection<K, T> {
    kind: NotFoundKind,
    docs: DashMap<K, Slot<T>>,
}

impl<K, T> DocumentCollection<K, T>
where
    K: Eq + Hash + Clone + Display,
    T: Clone,
{
    /// `kind` names the entity in not-found errors.
    pub fn new(kind: NotFoundKind) -> Self {
        Self {
            kind,
            docs: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Inserts a new document at version 1.
    pub fn insert(&self, key: K, doc: T) -> Result<Versioned<T>, DomainError> {
        match self.docs.entry(key) {
            Entry::Occupied(e) => Err(DomainError::conflict(
                ConflictKind::Other("document exists".into()),
                format!("Document {} already exists", e.key()),
            )),
            Entry::Vacant(e) => {
                let stored = Versioned { version: 1, doc };
                e.insert(Arc::new(Mutex::new(stored.clone())));
                Ok(stored)
            }
        }
    }

    pub fn get(&self, key: &K) -> Result<Versioned<T>, DomainError> {
        let slot = self.slot(key)?;
        let guard = slot.lock();
        Ok(guard.clone())
    }

    /// Read-modify-write of one document.
    ///
    /// `mutate` works on a clone; an `Err` discards the clone and leaves the
    /// stored document and its version untouched. On success `on_commit`
    /// sees the new committed state before the lock is released.
    pub fn update<R, E, F, C>(&self, key: &K, mutate: F, on_commit: C) -> Result<R, E>
    where
        E: From<DomainError>,
        F: FnOnce(&mut T) -> Result<R, E>,
        C: FnOnce(&Versioned<T>),
    {
        let slot = self.slot(key)?;
        let mut guard = slot.lock();

        let mut scratch = guard.doc.clone();
        let out = mutate(&mut scratch)?;

        guard.doc = scratch;
        guard.version += 1;
        on_commit(&guard);
        Ok(out)
    }

    /// Runs `f` against the committed state with the document lock held, so
    /// no commit can interleave with it.
    pub fn with_locked<R>(&self, key: &K, f: impl FnOnce(&Versioned<T>) -> R) -> Result<R, DomainError> {
        let slot = self.slot(key)?;
        let guard = slot.lock();
        Ok(f(&guard))
    }

    /// Committed copies of every document matching `pred`.
    pub fn scan(&self, mut pred: impl FnMut(&K, &T) -> bool) -> Vec<(K, Versioned<T>)> {
        let slots: Vec<(K, Slot<T>)> = self
            .docs
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();

        slots
            .into_iter()
            .filter_map(|(key, slot)| {
                let guard = slot.lock();
                if !pred(&key, &guard.doc) {
                    return None;
                }
                let committed = Versioned::clone(&guard);
                Some((key, committed))
            })
            .collect()
    }

    fn slot(&self, key: &K) -> Result<Slot<T>, DomainError> {
        self.docs
            .get(key)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| DomainError::not_found(self.kind.clone(), format!("{key} not found")))
    }
}
