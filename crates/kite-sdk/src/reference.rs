//! Reference — handle lifetime state machine
//!
//! A `Reference` associates native code with an engine value under one of
//! three lifetime disciplines. The discipline fixes the strong count the
//! reference starts with; `unref` walks it down and errors at the floor.
//! A reference holds exactly one heap pin while its count is nonzero.

use crate::error::{RefResult, ReferenceError};
use kite_core::{EngineContext, Value};
use std::fmt;

/// Lifetime discipline of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// No strong claim; the target may be collected at any collection point
    Weak,
    /// One strong claim; valid until released once
    Persistent,
    /// Counted strong claim, seeded at two
    Counted,
}

impl RefKind {
    /// Strong count a fresh reference of this discipline starts with
    pub fn initial_count(self) -> u32 {
        match self {
            RefKind::Weak => 0,
            RefKind::Persistent => 1,
            RefKind::Counted => 2,
        }
    }

    /// Discipline name
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Weak => "weak",
            RefKind::Persistent => "persistent",
            RefKind::Counted => "counted",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to an engine value under a lifetime discipline
#[derive(Debug)]
pub struct Reference {
    value: Value,
    kind: RefKind,
    count: u32,
}

impl Reference {
    /// Create a reference, pinning the target iff the seeded count is nonzero
    pub fn new(cx: &mut EngineContext, value: Value, kind: RefKind) -> RefResult<Self> {
        let count = kind.initial_count();
        if count > 0 {
            cx.pin(value)?;
        }
        Ok(Self { value, kind, count })
    }

    /// The reference's discipline
    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// Remaining strong count
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether the reference has been released down to zero.
    /// Weak references are never "released"; they are collected instead.
    pub fn is_released(&self) -> bool {
        self.kind != RefKind::Weak && self.count == 0
    }

    /// Get the target value while the reference is live.
    ///
    /// Returns `None` once released, or — for weak references — once the
    /// target has been collected.
    pub fn get(&self, cx: &EngineContext) -> Option<Value> {
        if self.is_released() {
            return None;
        }
        if cx.is_live(self.value) {
            Some(self.value)
        } else {
            None
        }
    }

    /// Drop one strong claim, returning the remaining count.
    ///
    /// Unpins the target exactly when the count reaches zero. Fails with
    /// `AlreadyReleased` when the count is already zero — which is the case
    /// for every weak reference from birth.
    pub fn unref(&mut self, cx: &mut EngineContext) -> RefResult<u32> {
        if self.count == 0 {
            return Err(ReferenceError::AlreadyReleased(self.kind));
        }
        self.count -= 1;
        if self.count == 0 {
            cx.unpin(self.value)?;
        }
        Ok(self.count)
    }

    /// Drop whatever strong claim remains (used when a registry slot is
    /// overwritten; the displaced target becomes collectible).
    pub(crate) fn reset(&mut self, cx: &mut EngineContext) {
        if self.count > 0 {
            // The target may already be gone if the context was torn down
            let _ = cx.unpin(self.value);
            self.count = 0;
        }
    }
}
