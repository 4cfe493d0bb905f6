//! Record-side contracts: key field values, the key-extraction trait, and a
//! fixed-layout identifier type for flat record buffers.
//!
//! The index engine never sees a concrete record struct. Storage hands it
//! types implementing [`KeySource`], and the engine asks each one only for
//! the fields named by the active [`KeySchema`](crate::schema::KeySchema).

use std::fmt;
use std::mem;
use std::str;

use bytemuck::{Pod, Zeroable};

use crate::schema::KeyField;

/// A single key field value borrowed from a record or lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Date ordinal (days, seconds, or nanoseconds since an epoch; the
    /// engine only compares and hashes it, it never interprets the unit).
    Date(i64),
    /// Identifier bytes: symbol, portfolio, risk factor, order or trade id.
    Text(&'a [u8]),
}

/// Key-extraction contract between record storage and the index engine.
///
/// Record arrays and lookup key rows both implement this. A lookup key type
/// only has to produce the fields of the schema it is used with; requesting
/// a field the type does not carry is a schema/row mismatch on the caller's
/// side and implementations are expected to panic on it.
pub trait KeySource {
    /// Borrow the value stored in `field`.
    fn key_field(&self, field: KeyField) -> FieldValue<'_>;
}

/// Fixed-capacity, NUL-padded identifier for fixed-layout rows.
///
/// The flat-buffer analogue of a short string column: `N` bytes inline, the
/// unused tail filled with NUL. Equality, [`as_bytes`], and therefore key
/// hashing all see only the prefix before the first NUL, so a value read
/// back from a raw buffer with garbage after its terminator still compares
/// equal to a freshly built one.
///
/// [`as_bytes`]: FixedStr::as_bytes
///
/// ```
/// use flatkey::FixedStr;
///
/// let symbol = FixedStr::<8>::from("ES");
/// assert_eq!(symbol.as_bytes(), b"ES");
/// assert_eq!(symbol.as_str(), Some("ES"));
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct FixedStr<const N: usize>([u8; N]);

impl<const N: usize> FixedStr<N> {
    /// The empty (all-NUL) identifier.
    pub const EMPTY: Self = Self([0; N]);

    /// Build from raw bytes, truncating to the first `N` bytes.
    pub fn new(bytes: &[u8]) -> Self {
        let mut buf = [0u8; N];
        let len = bytes.len().min(N);
        buf[..len].copy_from_slice(&bytes[..len]);
        Self(buf)
    }

    /// The identifier bytes up to the first NUL.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(N);
        &self.0[..end]
    }

    /// The identifier as UTF-8, if it is valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(self.as_bytes()).ok()
    }

    /// Whether the identifier is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// The raw `N`-byte backing array, padding included.
    #[inline]
    pub fn raw(&self) -> &[u8; N] {
        &self.0
    }
}

// Safety: a transparent wrapper over a byte array has no padding and every
// bit pattern is a valid value.
unsafe impl<const N: usize> Zeroable for FixedStr<N> {}
unsafe impl<const N: usize> Pod for FixedStr<N> {}

const _: () = assert!(mem::size_of::<FixedStr<16>>() == 16);

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<const N: usize> PartialEq for FixedStr<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> Eq for FixedStr<N> {}

impl<const N: usize> From<&str> for FixedStr<N> {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl<const N: usize> From<&[u8]> for FixedStr<N> {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "{text:?}"),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_truncates_to_capacity() {
        let id = FixedStr::<4>::from("PETROBRAS");
        assert_eq!(id.as_bytes(), b"PETR");
    }

    #[test]
    fn test_trailing_bytes_after_nul_are_invisible() {
        let raw: [u8; 8] = *b"ES\0GARB!";
        let from_buffer: FixedStr<8> = bytemuck::cast(raw);
        assert_eq!(from_buffer.as_bytes(), b"ES");
        assert_eq!(from_buffer, FixedStr::<8>::from("ES"));
    }

    #[test]
    fn test_empty_identifier() {
        let id = FixedStr::<8>::default();
        assert!(id.is_empty());
        assert_eq!(id, FixedStr::EMPTY);
        assert_eq!(id.as_str(), Some(""));
    }

    #[test]
    fn test_debug_renders_the_text() {
        let id = FixedStr::<8>::from("AAPL");
        assert_eq!(format!("{id:?}"), "\"AAPL\"");
    }

    #[test]
    fn test_field_values_compare_by_variant_and_content() {
        assert_eq!(FieldValue::Date(1), FieldValue::Date(1));
        assert_ne!(FieldValue::Date(1), FieldValue::Date(2));
        assert_eq!(FieldValue::Text(b"A"), FieldValue::Text(b"A"));
        assert_ne!(FieldValue::Text(b"A"), FieldValue::Date(65));
    }
}
