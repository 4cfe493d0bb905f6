//! Error taxonomy for index operations.

use thiserror::Error;

use crate::schema::TableKind;

/// Errors surfaced by index construction and table setup.
///
/// Lookup misses and upsert capacity truncation are deliberately *not*
/// errors: the former returns the [`NOT_FOUND`](crate::index::NOT_FOUND)
/// sentinel, the latter a dropped-record count in
/// [`UpsertReport`](crate::index::UpsertReport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A table kind name did not resolve to a known key schema.
    #[error("unsupported table kind: {0}")]
    UnsupportedTableKind(String),

    /// Two live records carry the same primary key. The index cannot
    /// represent both; the build aborts and the slot array is left in an
    /// unspecified state, so the caller must treat the index as unusable
    /// until the records are deduplicated and rebuilt.
    #[error("duplicate primary key in {kind} records: offsets {existing} and {incoming}")]
    DuplicateKey {
        /// Table kind whose build detected the duplicate.
        kind: TableKind,
        /// Offset already reachable through the probe chain.
        existing: usize,
        /// Offset whose key collided while being indexed.
        incoming: usize,
    },

    /// A probe walk visited as many slots as the modulus covers without
    /// finding room. The slot array is too small for the record count.
    #[error("slot array exhausted while indexing {kind} record {incoming}")]
    SlotsExhausted {
        /// Table kind being indexed.
        kind: TableKind,
        /// Offset that could not be placed.
        incoming: usize,
    },
}
