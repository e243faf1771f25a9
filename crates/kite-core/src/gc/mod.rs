//! Heap and collection system
//!
//! # Architecture
//!
//! - **Slot**: index-based handle to a heap entry (carried inside `Value`)
//! - **Heap**: slot-table allocator with pinning and entry limits
//! - **RootSet**: embedder-held values that survive collection
//! - **GarbageCollector**: deterministic mark-sweep over roots and pins
//!
//! Collection is explicit-only: nothing is ever reclaimed outside a
//! `GarbageCollector::collect` call, so weak-handle loss is observable at
//! well-defined points and tests are repeatable.

mod collector;
mod heap;
mod roots;

pub use collector::{GarbageCollector, GcStats, HeapStats};
pub use heap::{Heap, Slot};
pub use roots::RootSet;
