//! Slot occupancy and probe-length statistics.

use crate::index::{PkeyEngine, ProbeSequence, EMPTY_SLOT};
use crate::record::KeySource;

/// Snapshot of one index's slot occupancy and probe behavior.
///
/// Probe lengths count slots visited, so a direct hit has length 1. Useful
/// for judging whether a slot array was sized generously enough for its
/// record count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexStats {
    /// Total entries in the slot array.
    pub slot_count: usize,
    /// Entries holding a record offset.
    pub used_slots: usize,
    /// `used_slots / slot_count`.
    pub load_factor: f64,
    /// Longest probe walk needed to reach a live record.
    pub max_probe_len: usize,
    /// Mean probe walk length over live records.
    pub avg_probe_len: f64,
}

impl PkeyEngine {
    /// Measure occupancy of `slots` and re-derive the probe walk of each of
    /// the first `count` records.
    ///
    /// Read-only; `slots` must be a completed index over `records`.
    ///
    /// # Panics
    /// Panics if `slots.len() < 2` or `count > records.len()`.
    pub fn stats<R>(&self, records: &[R], slots: &[i64], count: usize) -> IndexStats
    where
        R: KeySource,
    {
        assert!(slots.len() >= 2, "slot array needs at least 2 entries");
        assert!(
            count <= records.len(),
            "count {count} exceeds record capacity {}",
            records.len()
        );

        let schema = self.schema();
        let used_slots = slots.iter().filter(|&&entry| entry != EMPTY_SLOT).count();

        let mut max_probe_len = 0usize;
        let mut total_probe_len = 0usize;
        let mut reached = 0usize;
        for loc in 0..count {
            let mut walk = ProbeSequence::new(schema.hash_key(&records[loc]), slots.len());
            let mut len = 1usize;
            loop {
                let occupant = slots[walk.slot()];
                if occupant == EMPTY_SLOT {
                    break;
                }
                if occupant as usize == loc {
                    max_probe_len = max_probe_len.max(len);
                    total_probe_len += len;
                    reached += 1;
                    break;
                }
                if walk.exhausted() {
                    break;
                }
                walk.advance();
                len += 1;
            }
        }

        IndexStats {
            slot_count: slots.len(),
            used_slots,
            load_factor: used_slots as f64 / slots.len() as f64,
            max_probe_len,
            avg_probe_len: if reached == 0 {
                0.0
            } else {
                total_probe_len as f64 / reached as f64
            },
        }
    }
}
