//! # Reader Options
//!
//! Configuration shared by the dispatcher, the record decoders and the
//! catalog.
//!
//! ```rust
//! use codeview_core::config::{NamePolicy, ReaderOptions};
//! use codeview_core::reader::OneByteCharset;
//!
//! let options = ReaderOptions::default()
//!     .with_charset(OneByteCharset::Utf8)
//!     .with_name_policy(NamePolicy::RequireTableName)
//!     .with_strict(true);
//! assert!(options.validate().is_ok());
//! ```

use crate::error::{CodeViewError, CodeViewResult};
use crate::reader::OneByteCharset;
use crate::types::RecordIndex;

/// Alignment of records in a CodeView type stream.
pub const DEFAULT_ALIGNMENT: usize = 4;

/// What to do when a name block holds no strings at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy
{
    /// Keep the record with an absent table name.
    #[default]
    AllowUnnamed,
    /// Fail with `EmptyNameBlock`.
    RequireTableName,
}

/// Options controlling how a type stream is decoded and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions
{
    /// Character set for null-terminated names.
    pub charset: OneByteCharset,
    /// Record alignment boundary in bytes; must be a power of two.
    pub alignment: usize,
    /// Handling of empty name blocks.
    pub name_policy: NamePolicy,
    /// Index assigned to the first record of the stream.
    pub first_index: RecordIndex,
    /// Abort the stream on the first record that fails to decode.
    pub strict: bool,
    /// Render unresolved references as placeholders instead of failing.
    pub placeholders: bool,
}

impl Default for ReaderOptions
{
    fn default() -> Self
    {
        Self {
            charset: OneByteCharset::default(),
            alignment: DEFAULT_ALIGNMENT,
            name_policy: NamePolicy::default(),
            first_index: RecordIndex::FIRST_STREAM_INDEX,
            strict: false,
            placeholders: false,
        }
    }
}

impl ReaderOptions
{
    #[must_use]
    pub fn with_charset(mut self, charset: OneByteCharset) -> Self
    {
        self.charset = charset;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: usize) -> Self
    {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_name_policy(mut self, name_policy: NamePolicy) -> Self
    {
        self.name_policy = name_policy;
        self
    }

    #[must_use]
    pub fn with_first_index(mut self, first_index: RecordIndex) -> Self
    {
        self.first_index = first_index;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self
    {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_placeholders(mut self, placeholders: bool) -> Self
    {
        self.placeholders = placeholders;
        self
    }

    /// Check the options for values the reader cannot work with.
    ///
    /// ## Errors
    ///
    /// `InvalidArgument` if the alignment is not a power of two or the first
    /// index is the "no reference" sentinel.
    pub fn validate(&self) -> CodeViewResult<()>
    {
        if !self.alignment.is_power_of_two() {
            return Err(CodeViewError::InvalidArgument(format!(
                "alignment must be a power of two, got {}",
                self.alignment
            )));
        }
        if self.first_index.is_none() {
            return Err(CodeViewError::InvalidArgument(
                "first record index cannot be the 0 sentinel".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_defaults()
    {
        let options = ReaderOptions::default();
        assert_eq!(options.alignment, 4);
        assert_eq!(options.charset, OneByteCharset::Latin1);
        assert_eq!(options.name_policy, NamePolicy::AllowUnnamed);
        assert_eq!(options.first_index, RecordIndex::new(0x1000));
        assert!(!options.strict);
        assert!(!options.placeholders);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_alignment()
    {
        assert!(ReaderOptions::default().with_alignment(0).validate().is_err());
        assert!(ReaderOptions::default().with_alignment(6).validate().is_err());
        assert!(ReaderOptions::default().with_alignment(8).validate().is_ok());
    }

    #[test]
    fn test_rejects_sentinel_first_index()
    {
        let options = ReaderOptions::default().with_first_index(RecordIndex::NONE);
        assert!(matches!(options.validate(), Err(CodeViewError::InvalidArgument(_))));
    }
}
