//! Append-or-overwrite record merging.

use crate::record::KeySource;

use super::{probe, PkeyEngine, ProbeOutcome};

/// Outcome of one [`upsert`](PkeyEngine::upsert) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertReport {
    /// Live record count after the merge.
    pub count: usize,
    /// Lowest record offset written by the merge. Equals the incoming count
    /// when nothing below the append point changed, so downstream
    /// synchronization only ever needs to cover `min_changed..count`.
    pub min_changed: usize,
    /// Batch records that were not applied because the record array (or its
    /// slot array) ran out of room. When non-zero the merge stopped at the
    /// first unplaceable record and skipped the whole remainder, updates to
    /// existing keys included.
    pub dropped: usize,
}

impl PkeyEngine {
    /// Merge `batch` into `records[..count]`: overwrite rows whose key is
    /// already indexed, append the rest at `count`.
    ///
    /// Strictly sequential, in batch order. A record later in the batch may
    /// overwrite a key appended earlier in the same batch, so per-record
    /// order is part of the contract and the merge is never parallelized.
    /// Slot entries for existing keys are not rewritten; an overwritten
    /// record keeps its offset, which is what keeps previously resolved
    /// offsets stable across updates.
    ///
    /// Capacity is `records.len()`. The first new key that finds the array
    /// full stops the whole batch; the skipped tail is counted in
    /// [`UpsertReport::dropped`], never raised as an error.
    ///
    /// # Panics
    /// Panics if `slots.len() < 2` or `count > records.len()`.
    pub fn upsert<R>(
        &self,
        records: &mut [R],
        count: usize,
        batch: &[R],
        slots: &mut [i64],
    ) -> UpsertReport
    where
        R: KeySource + Clone,
    {
        assert!(slots.len() >= 2, "slot array needs at least 2 entries");
        assert!(
            count <= records.len(),
            "count {count} exceeds record capacity {}",
            records.len()
        );

        let schema = self.schema();
        let capacity = records.len();
        let mut count = count;
        let mut min_changed = count;
        let mut applied = 0;

        for record in batch {
            let hash = schema.hash_key(record);
            match probe(schema, slots, records, hash, record) {
                ProbeOutcome::Match { loc } => {
                    records[loc] = record.clone();
                    if loc < min_changed {
                        min_changed = loc;
                    }
                }
                ProbeOutcome::Empty { slot } => {
                    if count == capacity {
                        break;
                    }
                    records[count] = record.clone();
                    slots[slot] = count as i64;
                    count += 1;
                }
                ProbeOutcome::Exhausted => break,
            }
            applied += 1;
        }

        let dropped = batch.len() - applied;
        if dropped > 0 && tracing::enabled!(tracing::Level::WARN) {
            tracing::warn!(
                kind = %schema.kind(),
                dropped,
                count,
                "capacity exhausted, upsert batch truncated"
            );
        }

        UpsertReport {
            count,
            min_changed,
            dropped,
        }
    }
}
