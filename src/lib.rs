//! flatkey - primary-key hash indexing over flat, fixed-schema record arrays
//!
//! `flatkey` indexes pre-allocated record buffers through a caller-owned
//! slot array (open addressing with quadratic probing), keyed by composite
//! primary keys that differ per table kind:
//!
//! - **Build**: index a record prefix into the slot array, resumable as new
//!   records are appended
//! - **Lookup**: resolve batches of composite keys to record offsets
//! - **Upsert**: merge record batches append-or-overwrite, reporting the
//!   minimal changed range for downstream synchronization
//!
//! The engine owns no memory and performs no I/O: records, slot array, and
//! live count are handed in by the caller, typically a shared-memory
//! mapping read by several processes. [`Table`] is the in-process owner for
//! callers without external storage.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use flatkey::{Table, TableKind};
//!
//! // A table owning its rows and slot array
//! let mut table: Table<Quote> = Table::with_capacity(TableKind::MarketData, 100_000);
//!
//! // Merge a batch: overwrites existing keys, appends the rest
//! let report = table.upsert(&quotes);
//!
//! // Resolve keys to row offsets (-1 = not present)
//! let locs = table.lookup(&keys);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod index;
pub mod record;
pub mod schema;
pub mod stats;
pub mod table;

// Re-exports for convenience
pub use error::IndexError;
pub use index::{PkeyEngine, UpsertReport, EMPTY_SLOT, NOT_FOUND};
pub use record::{FieldValue, FixedStr, KeySource};
pub use schema::{KeyField, KeySchema, TableKind};
pub use stats::IndexStats;
pub use table::Table;

/// Constants used throughout the library
pub mod constants {
    /// Slots allocated per record of capacity by the default sizing policy
    pub const DEFAULT_SLOT_FACTOR: usize = 5;

    /// Batch size at which build hashing and lookup switch to parallel
    /// iteration
    pub const MIN_PARALLEL_BATCH: usize = 1024;
}

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{FlatkeyConfig, TableOptions};
    pub use crate::error::IndexError;
    pub use crate::index::{PkeyEngine, UpsertReport, EMPTY_SLOT, NOT_FOUND};
    pub use crate::record::{FieldValue, FixedStr, KeySource};
    pub use crate::schema::{KeyField, KeySchema, TableKind};
    pub use crate::table::Table;
}
