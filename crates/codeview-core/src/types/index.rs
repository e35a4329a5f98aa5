//! Record index type.

use std::fmt;

/// Strongly typed record index
///
/// Records reference each other by numeric index rather than by offset. This
/// wrapper around `u32` keeps indices from being mixed up with lengths and
/// offsets read from the same byte stream.
///
/// ## Index Space
///
/// - `0` is the sentinel meaning "no reference" (see [`RecordIndex::NONE`])
/// - `1..0x1000` are built-in primitive types that never appear in the stream
/// - `0x1000..` are records in the type stream, numbered in on-disk order
///
/// ## Example
///
/// ```rust
/// use codeview_core::types::RecordIndex;
///
/// let index = RecordIndex::from(0x1003);
/// assert!(!index.is_none());
/// assert!(!index.is_primitive());
/// assert_eq!(index.to_string(), "0x1003");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordIndex(u32);

impl RecordIndex
{
    /// The "no reference" sentinel (0x0)
    pub const NONE: Self = RecordIndex(0);

    /// First index assigned to records of a type stream
    pub const FIRST_STREAM_INDEX: Self = RecordIndex(0x1000);

    /// Create a new index from a `u32` value
    pub const fn new(value: u32) -> Self
    {
        RecordIndex(value)
    }

    /// Get the raw `u32` value of this index
    pub const fn value(self) -> u32
    {
        self.0
    }

    /// Whether this is the "no reference" sentinel
    pub const fn is_none(self) -> bool
    {
        self.0 == 0
    }

    /// Whether this index names a built-in primitive type
    pub const fn is_primitive(self) -> bool
    {
        self.0 != 0 && self.0 < Self::FIRST_STREAM_INDEX.0
    }

    /// The index that follows this one, saturating at `u32::MAX`
    #[must_use]
    pub const fn next(self) -> Self
    {
        RecordIndex(self.0.saturating_add(1))
    }
}

impl From<u32> for RecordIndex
{
    fn from(value: u32) -> Self
    {
        RecordIndex(value)
    }
}

impl From<RecordIndex> for u32
{
    fn from(index: RecordIndex) -> Self
    {
        index.0
    }
}

impl fmt::Display for RecordIndex
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:04x}", self.0)
    }
}
