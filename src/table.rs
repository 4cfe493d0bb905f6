//! Owning table facade: rows, slot array, live count, and dirty-range
//! bookkeeping in one place.
//!
//! The engine proper never allocates; storage is handed in by the caller.
//! This type plays that caller for in-process use: it owns a fixed-capacity
//! row buffer plus a slot array sized by the default policy, and it folds
//! every mutation into a dirty range so a persistence layer knows the
//! minimal span it has to write back.

use std::ops::Range;

use crate::config::TableOptions;
use crate::constants::DEFAULT_SLOT_FACTOR;
use crate::error::IndexError;
use crate::index::{PkeyEngine, UpsertReport, EMPTY_SLOT, NOT_FOUND};
use crate::record::KeySource;
use crate::schema::TableKind;
use crate::stats::IndexStats;

/// Slot array length for a record capacity under the default sizing policy.
///
/// Five slots per record keeps collisions rare at full occupancy; the
/// engine's probe modulus is this length minus one. Degenerate capacities
/// are clamped so the slot array always has the two entries the engine
/// requires.
pub fn slot_count_for_capacity(capacity: usize) -> usize {
    (capacity * DEFAULT_SLOT_FACTOR).max(2)
}

/// A fixed-capacity record table with its primary-key index.
///
/// Rows beyond [`len`](Self::len) are allocated but dead. The index is kept
/// consistent with the live prefix across [`insert`](Self::insert) and
/// [`upsert`](Self::upsert); [`dirty_range`](Self::dirty_range) tells a
/// persistence layer what changed since it last flushed.
#[derive(Debug, Clone)]
pub struct Table<R> {
    engine: PkeyEngine,
    records: Vec<R>,
    slots: Vec<i64>,
    count: usize,
    min_changed: usize,
}

impl<R> Table<R> {
    /// Table kind this table stores.
    #[inline]
    pub fn kind(&self) -> TableKind {
        self.engine.kind()
    }

    /// The engine indexing this table.
    #[inline]
    pub fn engine(&self) -> &PkeyEngine {
        &self.engine
    }

    /// Number of live rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the table holds no live rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total row capacity, live or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// The live rows, in append order.
    #[inline]
    pub fn rows(&self) -> &[R] {
        &self.records[..self.count]
    }

    /// The slot array, for callers that persist it alongside the rows.
    #[inline]
    pub fn slots(&self) -> &[i64] {
        &self.slots
    }

    /// Row range modified since the last [`mark_flushed`](Self::mark_flushed):
    /// the minimal span a downstream sync has to cover. Empty when nothing
    /// changed.
    #[inline]
    pub fn dirty_range(&self) -> Range<usize> {
        self.min_changed..self.count
    }

    /// Declare the current contents synchronized; the dirty range collapses
    /// to empty until the next mutation.
    pub fn mark_flushed(&mut self) {
        self.min_changed = self.count;
    }
}

impl<R: KeySource + Clone> Table<R> {
    /// An empty table with room for `capacity` rows, slots sized by
    /// [`slot_count_for_capacity`].
    pub fn with_capacity(kind: TableKind, capacity: usize) -> Self
    where
        R: Default,
    {
        Self {
            engine: PkeyEngine::new(kind),
            records: vec![R::default(); capacity],
            slots: vec![EMPTY_SLOT; slot_count_for_capacity(capacity)],
            count: 0,
            min_changed: 0,
        }
    }

    /// An empty table shaped by resolved configuration.
    pub fn with_options(options: &TableOptions) -> Self
    where
        R: Default,
    {
        Self {
            engine: PkeyEngine::new(options.kind),
            records: vec![R::default(); options.capacity],
            slots: vec![EMPTY_SLOT; options.slot_count()],
            count: 0,
            min_changed: 0,
        }
    }

    /// Adopt `records` whose first `count` rows are live and build the
    /// index over them. This is the open path: rows loaded by an external
    /// reader, index derived here. The buffer's full length becomes the
    /// table capacity.
    ///
    /// # Errors
    /// Any [`build`](PkeyEngine::build) error; the records are returned to
    /// the allocator, not kept in a half-open table.
    ///
    /// # Panics
    /// Panics if `count > records.len()`.
    pub fn open(kind: TableKind, records: Vec<R>, count: usize) -> Result<Self, IndexError>
    where
        R: Sync,
    {
        assert!(
            count <= records.len(),
            "count {count} exceeds record capacity {}",
            records.len()
        );
        let engine = PkeyEngine::new(kind);
        let mut slots = vec![EMPTY_SLOT; slot_count_for_capacity(records.len())];
        engine.build(&records, count, &mut slots, 0)?;
        Ok(Self {
            engine,
            records,
            slots,
            count,
            min_changed: count,
        })
    }

    /// Append rows that are expected to carry previously unseen keys,
    /// extending the index incrementally instead of rebuilding it.
    ///
    /// Rows beyond the remaining capacity are dropped up front and counted
    /// in the report, mirroring upsert's truncation. The report's
    /// `min_changed` is the first appended offset.
    ///
    /// # Errors
    /// [`IndexError::DuplicateKey`] when a batch row collides with a live
    /// key (or another batch row). The table is rolled back to its
    /// pre-insert count and its index rebuilt, so it stays usable; the
    /// batch is not partially applied. Callers that want overwrite
    /// semantics on collision use [`upsert`](Self::upsert) instead.
    pub fn insert(&mut self, batch: &[R]) -> Result<UpsertReport, IndexError>
    where
        R: Sync,
    {
        let start = self.count;
        let room = self.capacity() - start;
        let take = batch.len().min(room);
        let dropped = batch.len() - take;
        self.records[start..start + take].clone_from_slice(&batch[..take]);

        let count = start + take;
        match self.engine.build(&self.records, count, &mut self.slots, start) {
            Ok(()) => {
                self.count = count;
                self.min_changed = self.min_changed.min(start);
                if dropped > 0 && tracing::enabled!(tracing::Level::WARN) {
                    tracing::warn!(
                        kind = %self.kind(),
                        dropped,
                        count,
                        "capacity exhausted, insert batch truncated"
                    );
                }
                Ok(UpsertReport {
                    count,
                    min_changed: start,
                    dropped,
                })
            }
            Err(err) => {
                // The failed extension left slots half-written. The prefix
                // held a valid index before the append, so rebuilding it
                // cannot fail; surface the rebuild error if it somehow does.
                if let Err(rebuild) = self.engine.build(&self.records, start, &mut self.slots, 0) {
                    return Err(rebuild);
                }
                Err(err)
            }
        }
    }

    /// Merge a batch append-or-overwrite. Wraps [`PkeyEngine::upsert`] and
    /// folds the result into the table's count and dirty range.
    pub fn upsert(&mut self, batch: &[R]) -> UpsertReport {
        let report = self
            .engine
            .upsert(&mut self.records, self.count, batch, &mut self.slots);
        self.count = report.count;
        self.min_changed = self.min_changed.min(report.min_changed);
        report
    }

    /// Resolve each key to a row offset ([`NOT_FOUND`] for misses), in
    /// input order.
    pub fn lookup<K>(&self, keys: &[K]) -> Vec<i64>
    where
        R: Sync,
        K: KeySource + Sync,
    {
        self.engine.lookup(self.rows(), &self.slots, keys)
    }

    /// The row matching `key`, if one is live.
    pub fn get<K>(&self, key: &K) -> Option<&R>
    where
        K: KeySource + ?Sized,
    {
        let loc = self.engine.lookup_one(self.rows(), &self.slots, key);
        if loc == NOT_FOUND {
            None
        } else {
            Some(&self.records[loc as usize])
        }
    }

    /// Rebuild the whole index from the live rows, discarding the current
    /// slot contents. The recovery path after external row edits.
    pub fn rebuild_index(&mut self) -> Result<(), IndexError>
    where
        R: Sync,
    {
        self.engine
            .build(&self.records, self.count, &mut self.slots, 0)
    }

    /// Occupancy snapshot of the index.
    pub fn stats(&self) -> IndexStats {
        self.engine.stats(&self.records, &self.slots, self.count)
    }
}
