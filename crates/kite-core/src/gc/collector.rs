//! Deterministic mark-sweep collector
//!
//! Collection never happens spontaneously; it runs only when the embedder
//! calls `collect()`. That keeps weak-handle invalidation repeatable: a weak
//! target dies at a collection point iff no root or pin reaches it.

use super::heap::{Heap, Slot};
use super::roots::RootSet;
use crate::object::HeapObject;
use crate::value::Value;
use crate::EngineResult;
use std::time::{Duration, Instant};

/// Collector statistics
#[derive(Debug, Clone, Default)]
pub struct GcStats {
    /// Total number of collections
    pub collections: usize,

    /// Total objects freed
    pub objects_freed: usize,

    /// Objects freed by the most recent collection
    pub last_freed: usize,

    /// Total pause time
    pub total_pause_time: Duration,

    /// Last collection duration
    pub last_pause_time: Duration,
}

/// Heap statistics snapshot
#[derive(Debug, Clone)]
pub struct HeapStats {
    /// Number of live heap entries
    pub live_objects: usize,

    /// Externally allocated memory attributed to the heap
    pub external_bytes: i64,
}

/// Mark-sweep collector owning the heap and root set
#[derive(Debug, Default)]
pub struct GarbageCollector {
    heap: Heap,
    roots: RootSet,
    stats: GcStats,
}

impl GarbageCollector {
    /// Create a new collector with an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the heap
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Access the heap mutably
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Access the root set
    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Access the root set mutably
    pub fn roots_mut(&mut self) -> &mut RootSet {
        &mut self.roots
    }

    /// Allocate an object on the heap
    pub fn allocate(&mut self, object: HeapObject) -> EngineResult<Slot> {
        self.heap.allocate(object)
    }

    /// Run a collection: mark from roots and pins, sweep everything else
    pub fn collect(&mut self) {
        let start = Instant::now();

        self.mark();
        let freed = self.sweep();

        let duration = start.elapsed();
        self.stats.collections += 1;
        self.stats.objects_freed += freed;
        self.stats.last_freed = freed;
        self.stats.last_pause_time = duration;
        self.stats.total_pause_time += duration;
    }

    /// Mark phase: mark every slot reachable from a root or a pin
    fn mark(&mut self) {
        // Clear all mark bits first
        let all: Vec<Slot> = self.heap.iter_live().collect();
        for slot in &all {
            self.heap.set_marked(*slot, false);
        }

        // Seed the worklist with rooted handles and pinned slots
        let mut worklist: Vec<Slot> = self.roots.iter().filter_map(|v| v.as_handle()).collect();
        worklist.extend(self.heap.iter_pinned());

        while let Some(slot) = worklist.pop() {
            if !self.heap.contains(slot) || self.heap.is_marked(slot) {
                continue;
            }
            self.heap.set_marked(slot, true);

            let children: Vec<Value> = match self.heap.get(slot) {
                Some(object) => object.children(),
                None => continue,
            };
            worklist.extend(children.iter().filter_map(|v| v.as_handle()));
        }
    }

    /// Sweep phase: free unmarked slots, returning how many were freed
    fn sweep(&mut self) -> usize {
        let to_free: Vec<Slot> = self
            .heap
            .iter_live()
            .filter(|&slot| !self.heap.is_marked(slot))
            .collect();

        let freed = to_free.len();
        for slot in to_free {
            self.heap.free_slot(slot);
        }
        freed
    }

    /// Get collector statistics
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// Get a heap statistics snapshot
    pub fn heap_stats(&self) -> HeapStats {
        HeapStats {
            live_objects: self.heap.live_count(),
            external_bytes: self.heap.external_bytes(),
        }
    }
}
