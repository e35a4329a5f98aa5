//! # Error Types
//!
//! General error handling for record decoding and rendering.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::types::RecordIndex;

/// Main error type for decode and render operations
///
/// Every variant is fatal to the operation that produced it. Decoders never
/// hand back a partially populated record; the dispatcher decides whether a
/// failed record is skipped or aborts the whole stream.
///
/// ## Error Categories
///
/// 1. **Decode errors**: TruncatedField, SubBlockOverrun, UnterminatedString, EmptyNameBlock
/// 2. **Render errors**: UnresolvedReference, ReferenceCycle, RenderDepthExceeded
/// 3. **Framing errors**: RecordLengthMismatch
/// 4. **Configuration errors**: InvalidArgument
/// 5. **I/O errors**: Io (reading stream files)
#[derive(Error, Debug)]
pub enum CodeViewError
{
    /// A fixed-width read ran past the end of the buffer
    #[error("Truncated {field} at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedField
    {
        /// Name of the field being read
        field: &'static str,
        /// Absolute offset of the read
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the cursor
        available: usize,
    },

    /// A length-prefixed sub-block claims more bytes than the record holds
    #[error("Sub-block of {declared} bytes exceeds the {available} bytes remaining")]
    SubBlockOverrun
    {
        /// Length declared by the record
        declared: usize,
        /// Bytes actually remaining in the outer cursor
        available: usize,
    },

    /// A string inside a bounded block has no null terminator before the bound
    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString
    {
        /// Absolute offset where the string started
        offset: usize,
    },

    /// A name block decoded to zero strings while a table name is required
    ///
    /// Only produced under [`NamePolicy::RequireTableName`](crate::config::NamePolicy).
    #[error("Name block is empty but a table name is required")]
    EmptyNameBlock,

    /// The catalog could not produce text for a referenced index
    #[error("Unresolved reference to record {0}")]
    UnresolvedReference(RecordIndex),

    /// Rendering re-entered a record that is already being rendered
    ///
    /// Well-formed streams are acyclic, but nothing upstream guarantees it.
    #[error("Reference cycle detected while rendering record {0}")]
    ReferenceCycle(RecordIndex),

    /// An acyclic chain of references nests deeper than the render limit
    #[error("Rendering record {index} exceeds the maximum nesting depth of {depth}")]
    RenderDepthExceeded
    {
        /// Record that would have been rendered past the limit
        index: RecordIndex,
        /// The limit that was hit
        depth: usize,
    },

    /// A decoder left bytes behind in a record frame
    #[error("Record {index} left {leftover} unconsumed bytes")]
    RecordLengthMismatch
    {
        /// Index of the offending record
        index: RecordIndex,
        /// Bytes still unread after decode and padding skip
        leftover: usize,
    },

    /// Invalid argument or configuration value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error (reading stream files, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, CodeViewError>`
///
/// ```rust
/// use codeview_core::error::CodeViewResult;
/// fn foo() -> CodeViewResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type CodeViewResult<T> = std::result::Result<T, CodeViewError>;
