//! Batch key resolution.

use rayon::prelude::*;

use crate::constants::MIN_PARALLEL_BATCH;
use crate::record::KeySource;

use super::{probe, PkeyEngine, ProbeOutcome, NOT_FOUND};

impl PkeyEngine {
    /// Resolve each key in `keys` to a record offset.
    ///
    /// Returns one entry per key, in input order: the offset of the record
    /// whose key matches, or [`NOT_FOUND`] when the walk reaches an empty
    /// slot or the probe bound first. Misses are an expected outcome, not
    /// an error.
    ///
    /// Keys are independent of each other, so batches at or above the
    /// parallel cutoff are resolved in parallel. The index is read-only
    /// here; `slots` must come from a completed [`build`](Self::build) (or
    /// upserts) over `records`.
    ///
    /// # Panics
    /// Panics if `slots.len() < 2`.
    pub fn lookup<R, K>(&self, records: &[R], slots: &[i64], keys: &[K]) -> Vec<i64>
    where
        R: KeySource + Sync,
        K: KeySource + Sync,
    {
        assert!(slots.len() >= 2, "slot array needs at least 2 entries");
        let schema = self.schema();
        let resolve = |key: &K| match probe(schema, slots, records, schema.hash_key(key), key) {
            ProbeOutcome::Match { loc } => loc as i64,
            ProbeOutcome::Empty { .. } | ProbeOutcome::Exhausted => NOT_FOUND,
        };
        if keys.len() >= MIN_PARALLEL_BATCH {
            keys.par_iter().map(resolve).collect()
        } else {
            keys.iter().map(resolve).collect()
        }
    }

    /// Resolve a single key without allocating a batch.
    ///
    /// Same contract as [`lookup`](Self::lookup) for a one-element batch.
    ///
    /// # Panics
    /// Panics if `slots.len() < 2`.
    pub fn lookup_one<R, K>(&self, records: &[R], slots: &[i64], key: &K) -> i64
    where
        R: KeySource,
        K: KeySource + ?Sized,
    {
        assert!(slots.len() >= 2, "slot array needs at least 2 entries");
        let schema = self.schema();
        match probe(schema, slots, records, schema.hash_key(key), key) {
            ProbeOutcome::Match { loc } => loc as i64,
            ProbeOutcome::Empty { .. } | ProbeOutcome::Exhausted => NOT_FOUND,
        }
    }
}
