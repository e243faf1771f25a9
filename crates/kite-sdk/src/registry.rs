//! Keyed reference registry over lifetime disciplines
//!
//! One insertion-ordered table of keyed references per discipline, plus an
//! optional structured slot (an array target whose element shape the caller
//! interrogates on retrieval). All operations take the owning context
//! explicitly; the registry holds no engine state of its own beyond pins.

use crate::error::{RefResult, ReferenceError};
use crate::reference::{RefKind, Reference};
use indexmap::IndexMap;
use kite_core::{EngineContext, PropKey, Value};
use rustc_hash::FxBuildHasher;

/// Marker string returned from structured reads whose weak target was
/// collected. Callers distinguish it from the live case by shape: a live
/// read is array-typed, a collected one is boxed-string-typed.
pub const COLLECTED_MARKER: &str = "no referenced value";

/// Snapshot mapping returned by [`ReferenceRegistry::get_all`]
pub type Snapshot = IndexMap<PropKey, Value, FxBuildHasher>;

#[derive(Debug, Default)]
struct DisciplineTable {
    entries: IndexMap<PropKey, Reference, FxBuildHasher>,
    /// Key of the most recent `set`; the target of discipline-level release
    last_key: Option<PropKey>,
    structured: Option<Reference>,
}

/// Registry of keyed references, one table per lifetime discipline
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    weak: DisciplineTable,
    persistent: DisciplineTable,
    counted: DisciplineTable,
}

impl ReferenceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: RefKind) -> &DisciplineTable {
        match kind {
            RefKind::Weak => &self.weak,
            RefKind::Persistent => &self.persistent,
            RefKind::Counted => &self.counted,
        }
    }

    fn table_mut(&mut self, kind: RefKind) -> &mut DisciplineTable {
        match kind {
            RefKind::Weak => &mut self.weak,
            RefKind::Persistent => &mut self.persistent,
            RefKind::Counted => &mut self.counted,
        }
    }

    /// Register `value` under `key` in the discipline's table.
    ///
    /// Overwrites any prior entry for the key; the displaced reference's pin
    /// is dropped, so its target may be reclaimed at the next collection.
    /// A released entry transitions back to live.
    pub fn set(
        &mut self,
        cx: &mut EngineContext,
        kind: RefKind,
        key: impl Into<PropKey>,
        value: Value,
    ) -> RefResult<()> {
        let key = key.into();
        let reference = Reference::new(cx, value, kind)?;
        let table = self.table_mut(kind);
        if let Some(mut old) = table.entries.insert(key.clone(), reference) {
            old.reset(cx);
        }
        table.last_key = Some(key);
        Ok(())
    }

    /// Snapshot of the discipline's currently-live key→value pairs.
    ///
    /// Weak entries whose targets were collected are pruned out of the table
    /// here; released entries are skipped but kept for release detection.
    pub fn get_all(&mut self, cx: &EngineContext, kind: RefKind) -> Snapshot {
        let table = self.table_mut(kind);
        if kind == RefKind::Weak {
            table.entries.retain(|_, r| r.get(cx).is_some());
        }
        table
            .entries
            .iter()
            .filter_map(|(k, r)| r.get(cx).map(|v| (k.clone(), v)))
            .collect()
    }

    /// Point lookup. `None` when the key was never set, was released, or —
    /// for the weak discipline — when its target has been collected.
    pub fn get_one(
        &self,
        cx: &EngineContext,
        kind: RefKind,
        key: impl Into<PropKey>,
    ) -> Option<Value> {
        let key = key.into();
        self.table(kind).entries.get(&key).and_then(|r| r.get(cx))
    }

    /// Release the discipline's most recent reference, returning the
    /// remaining strong count.
    ///
    /// Fails with `NotRegistered` when the discipline was never seeded and
    /// with `AlreadyReleased` once the count is at zero (which a weak
    /// reference always is).
    pub fn release(&mut self, cx: &mut EngineContext, kind: RefKind) -> RefResult<u32> {
        let table = self.table_mut(kind);
        let key = table
            .last_key
            .clone()
            .ok_or(ReferenceError::NotRegistered(kind))?;
        let reference = table
            .entries
            .get_mut(&key)
            .ok_or(ReferenceError::NotRegistered(kind))?;
        reference.unref(cx)
    }

    /// Seed the discipline's structured slot with an array of `items`,
    /// displacing any prior structure.
    pub fn set_structured(
        &mut self,
        cx: &mut EngineContext,
        kind: RefKind,
        items: &[Value],
    ) -> RefResult<()> {
        let array = cx.create_array(items)?;
        let reference = Reference::new(cx, array, kind)?;
        let table = self.table_mut(kind);
        if let Some(mut old) = table.structured.replace(reference) {
            old.reset(cx);
        }
        Ok(())
    }

    /// Retrieve the discipline's structure.
    ///
    /// Returns the stored array while it is live; once a weak structure has
    /// been collected, returns a boxed-string marker instead (the caller
    /// disambiguates by shape). `None` when the discipline was never seeded.
    pub fn get_structured(
        &self,
        cx: &mut EngineContext,
        kind: RefKind,
    ) -> RefResult<Option<Value>> {
        let reference = match &self.table(kind).structured {
            Some(r) => r,
            None => return Ok(None),
        };
        match reference.get(cx) {
            Some(v) => Ok(Some(v)),
            None => Ok(Some(cx.create_string(COLLECTED_MARKER)?)),
        }
    }

    /// Retrieve one element of the discipline's structure.
    ///
    /// Live structure: the element at `index` (`None` past the end).
    /// Collected weak structure: the boxed-string marker.
    /// Never seeded: `None`.
    pub fn get_structured_element(
        &self,
        cx: &mut EngineContext,
        kind: RefKind,
        index: usize,
    ) -> RefResult<Option<Value>> {
        let reference = match &self.table(kind).structured {
            Some(r) => r,
            None => return Ok(None),
        };
        match reference.get(cx) {
            Some(array) => Ok(cx.array_get(array, index)?),
            None => Ok(Some(cx.create_string(COLLECTED_MARKER)?)),
        }
    }
}
