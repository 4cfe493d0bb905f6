//! Index construction: full rebuilds and incremental extension.

use rayon::prelude::*;

use crate::constants::MIN_PARALLEL_BATCH;
use crate::error::IndexError;
use crate::record::KeySource;

use super::{probe, PkeyEngine, ProbeOutcome, EMPTY_SLOT};

impl PkeyEngine {
    /// Index `records[start..count]` into `slots`.
    ///
    /// `start == 0` rebuilds from scratch, resetting every slot to empty
    /// first. `start > 0` extends an index previously built to exactly
    /// `start` records: the existing slot entries are trusted, not
    /// re-verified, and only the new suffix is placed. Either way the
    /// resulting slot state is identical to one full build over
    /// `[0, count)`.
    ///
    /// Key hashing runs over the whole pending range up front, in parallel
    /// for large ranges. Slot placement is strictly sequential; each record
    /// probes against everything placed before it, which is how duplicates
    /// are caught.
    ///
    /// # Errors
    ///
    /// [`IndexError::DuplicateKey`] when two offsets in `[0, count)` carry
    /// the same key. The build aborts mid-way and the slot contents are
    /// unspecified; the caller must deduplicate and rebuild before using
    /// the index.
    ///
    /// [`IndexError::SlotsExhausted`] when a record's probe walk finds no
    /// empty slot within the modulus bound.
    ///
    /// # Panics
    ///
    /// Panics if `slots.len() < 2`, `count > records.len()`, or
    /// `start > count`.
    pub fn build<R>(
        &self,
        records: &[R],
        count: usize,
        slots: &mut [i64],
        start: usize,
    ) -> Result<(), IndexError>
    where
        R: KeySource + Sync,
    {
        assert!(slots.len() >= 2, "slot array needs at least 2 entries");
        assert!(
            count <= records.len(),
            "count {count} exceeds record capacity {}",
            records.len()
        );
        assert!(start <= count, "start {start} exceeds count {count}");

        if start == 0 {
            slots.fill(EMPTY_SLOT);
        }

        let schema = self.schema();
        let pending = &records[start..count];
        let hashes: Vec<u64> = if pending.len() >= MIN_PARALLEL_BATCH {
            pending.par_iter().map(|r| schema.hash_key(r)).collect()
        } else {
            pending.iter().map(|r| schema.hash_key(r)).collect()
        };

        for (offset, hash) in hashes.into_iter().enumerate() {
            let incoming = start + offset;
            match probe(schema, slots, records, hash, &records[incoming]) {
                ProbeOutcome::Empty { slot } => slots[slot] = incoming as i64,
                ProbeOutcome::Match { loc } => {
                    return Err(IndexError::DuplicateKey {
                        kind: schema.kind(),
                        existing: loc,
                        incoming,
                    });
                }
                ProbeOutcome::Exhausted => {
                    return Err(IndexError::SlotsExhausted {
                        kind: schema.kind(),
                        incoming,
                    });
                }
            }
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                kind = %schema.kind(),
                start,
                count,
                indexed = count - start,
                "index build complete"
            );
        }
        Ok(())
    }
}
