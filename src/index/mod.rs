//! The primary-key index engine.
//!
//! Three operations over caller-owned storage: build the slot array from a
//! record prefix, resolve batches of lookup keys to record offsets, and
//! merge record batches append-or-overwrite. All three advance through the
//! same deterministic quadratic probe walk; build and lookup are two halves
//! of one contract and share it by construction.

mod build;
mod lookup;
mod upsert;

pub use upsert::UpsertReport;

use crate::record::KeySource;
use crate::schema::{KeySchema, TableKind};

/// Slot array entry marking an empty slot.
pub const EMPTY_SLOT: i64 = -1;

/// Lookup result marking a key that is not present.
pub const NOT_FOUND: i64 = -1;

/// The index engine for one table kind.
///
/// Stateless and cheap to copy: records, slot array, and live count are
/// owned by the caller (a shared-memory mapping in the original deployment,
/// or [`Table`](crate::table::Table) in-process). The engine only mutates
/// their contents, which is what lets one build loop serve every table kind
/// and lets the same storage be indexed from several processes.
#[derive(Debug, Clone, Copy)]
pub struct PkeyEngine {
    schema: &'static KeySchema,
}

impl PkeyEngine {
    /// Engine for `kind`'s key schema.
    pub fn new(kind: TableKind) -> Self {
        Self {
            schema: kind.key_schema(),
        }
    }

    /// The key schema driving hashing and equality.
    #[inline]
    pub fn schema(&self) -> &'static KeySchema {
        self.schema
    }

    /// Table kind served by this engine.
    #[inline]
    pub fn kind(&self) -> TableKind {
        self.schema.kind()
    }
}

/// Deterministic quadratic probe walk: slot `h`, then `h + 1*1`,
/// `h + 1*1 + 2*2`, and so on, all modulo `n`, where `n = slots.len() - 1`.
///
/// The modulus leaves the last slot unaddressable; existing slot arrays were
/// laid out that way and changing it would orphan every record they hold.
/// Build, lookup, and upsert all walk this one type, so the probe order can
/// never diverge between writing an entry and finding it again.
#[derive(Debug, Clone)]
pub(crate) struct ProbeSequence {
    slot: u64,
    step: u64,
    modulus: u64,
}

impl ProbeSequence {
    /// Start a walk for `hash` over a slot array of `slots_len` entries.
    ///
    /// # Panics
    /// Panics if `slots_len < 2` (the modulus is `slots_len - 1`).
    pub(crate) fn new(hash: u64, slots_len: usize) -> Self {
        assert!(slots_len >= 2, "slot array needs at least 2 entries");
        let modulus = (slots_len - 1) as u64;
        Self {
            slot: hash % modulus,
            step: 0,
            modulus,
        }
    }

    /// Current slot index.
    #[inline]
    pub(crate) fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Advance to the next slot in the walk.
    #[inline]
    pub(crate) fn advance(&mut self) {
        self.step += 1;
        self.slot = (self.slot + self.step * self.step) % self.modulus;
    }

    /// Whether the walk has visited as many slots as the modulus covers.
    ///
    /// Quadratic probing can cycle without touching every slot, so this is
    /// the hard stop that keeps a full table from walking forever.
    #[inline]
    pub(crate) fn exhausted(&self) -> bool {
        self.step >= self.modulus
    }
}

/// Where a probe walk for `key` ended.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ProbeOutcome {
    /// First empty slot on the walk.
    Empty { slot: usize },
    /// An occupant whose key equals `key`, at record offset `loc`.
    Match { loc: usize },
    /// Neither an empty slot nor a match within the probe bound.
    Exhausted,
}

/// Walk `key`'s probe sequence until an empty slot, a key match, or
/// exhaustion. Occupants are re-read at every step, so a match anywhere on
/// the chain is found even when earlier slots hold colliding keys.
pub(crate) fn probe<R, S>(
    schema: &KeySchema,
    slots: &[i64],
    records: &[R],
    hash: u64,
    key: &S,
) -> ProbeOutcome
where
    R: KeySource,
    S: KeySource + ?Sized,
{
    let mut walk = ProbeSequence::new(hash, slots.len());
    loop {
        let slot = walk.slot();
        let occupant = slots[slot];
        if occupant == EMPTY_SLOT {
            return ProbeOutcome::Empty { slot };
        }
        debug_assert!(occupant >= 0, "negative slot entry {occupant}");
        let loc = occupant as usize;
        if schema.keys_equal(&records[loc], key) {
            return ProbeOutcome::Match { loc };
        }
        if walk.exhausted() {
            return ProbeOutcome::Exhausted;
        }
        walk.advance();
    }
}
