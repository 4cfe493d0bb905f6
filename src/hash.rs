//! Stable hashing for key fields.
//!
//! Slot placement must be deterministic across runs and processes: the same
//! key has to land on the same probe sequence whether it is being indexed
//! today or looked up from a mapping built last week. We therefore never go
//! through `DefaultHasher` and hash raw bytes with xxHash instead.

use crate::record::FieldValue;

#[cfg(not(any(feature = "hash-xxh3", feature = "hash-xxh64")))]
compile_error!("Enable a hash feature: `hash-xxh3` (default) or `hash-xxh64`.");

/// Hash a byte slice into a 64-bit value.
///
/// `hash-xxh3` wins when both hash features are enabled.
#[cfg(feature = "hash-xxh3")]
#[inline]
pub fn hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(bytes)
}

/// Hash a byte slice into a 64-bit value.
#[cfg(all(not(feature = "hash-xxh3"), feature = "hash-xxh64"))]
#[inline]
pub fn hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh64::xxh64(bytes, 0)
}

/// Hash a single key field value.
///
/// Dates hash their little-endian byte representation; text fields hash
/// exactly the bytes supplied. Identifier types hand over their NUL-trimmed
/// form (see [`FixedStr::as_bytes`](crate::record::FixedStr::as_bytes)), so
/// padded and unpadded spellings of the same identifier agree.
#[inline]
pub fn hash_field(value: FieldValue<'_>) -> u64 {
    match value {
        FieldValue::Date(date) => hash64(&date.to_le_bytes()),
        FieldValue::Text(text) => hash64(text),
    }
}
