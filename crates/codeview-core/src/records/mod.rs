//! # Type Records
//!
//! Decoded CodeView type records and the shared state decoders run with.
//!
//! Every decoder has the same shape: it receives a cursor positioned at the
//! record body (length and leaf kind already consumed by the dispatcher) plus
//! a [`DecodeContext`], and returns a fully populated record or an error.
//! Rendering goes through a [`CatalogView`] so that referenced records are
//! printed by name rather than by index.

pub mod names;
pub mod primitive;
pub mod vftable;
pub mod vtshape;

use std::fmt;

pub use names::NameList;
pub use vftable::VFTableRecord;
pub use vtshape::{VtShapeDescriptor, VtShapeRecord};

use crate::catalog::CatalogView;
use crate::config::ReaderOptions;
use crate::dependency::ReferenceSink;
use crate::error::CodeViewResult;
use crate::types::RecordIndex;

/// Leaf kind of a virtual function table shape.
pub const LF_VTSHAPE: u16 = 0x000a;
/// Leaf kind of a virtual function table descriptor.
pub const LF_VFTABLE: u16 = 0x151d;

/// State a decoder needs besides the bytes.
pub struct DecodeContext<'a>
{
    /// Index the record being decoded will be stored under.
    pub index: RecordIndex,
    /// Reader configuration.
    pub options: &'a ReaderOptions,
    sink: &'a mut dyn ReferenceSink,
}

impl<'a> DecodeContext<'a>
{
    pub fn new(index: RecordIndex, options: &'a ReaderOptions, sink: &'a mut dyn ReferenceSink) -> Self
    {
        Self { index, options, sink }
    }

    /// Report that the current record references `target`.
    pub fn note_reference(&mut self, target: RecordIndex)
    {
        self.sink.note_reference(self.index, target);
    }
}

impl fmt::Debug for DecodeContext<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("DecodeContext")
            .field("index", &self.index)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A record whose leaf kind has no registered decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecord
{
    /// Leaf kind read from the record header.
    pub kind: u16,
    /// Undecoded body bytes, padding included.
    pub bytes: Vec<u8>,
}

/// Any record the catalog can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRecord
{
    VFTable(VFTableRecord),
    VtShape(VtShapeRecord),
    Unknown(UnknownRecord),
}

impl TypeRecord
{
    /// Leaf kind this record was decoded from.
    pub fn kind(&self) -> u16
    {
        match self {
            TypeRecord::VFTable(_) => LF_VFTABLE,
            TypeRecord::VtShape(_) => LF_VTSHAPE,
            TypeRecord::Unknown(unknown) => unknown.kind,
        }
    }

    /// Render the record as one line of text.
    ///
    /// ## Errors
    ///
    /// Propagates failures from rendering referenced records.
    pub fn render(&self, catalog: &dyn CatalogView) -> CodeViewResult<String>
    {
        match self {
            TypeRecord::VFTable(vftable) => vftable.render(catalog),
            TypeRecord::VtShape(shape) => Ok(shape.to_string()),
            TypeRecord::Unknown(unknown) => Ok(format!("UnknownType(0x{:04x})", unknown.kind)),
        }
    }
}

impl From<VFTableRecord> for TypeRecord
{
    fn from(record: VFTableRecord) -> Self
    {
        TypeRecord::VFTable(record)
    }
}

impl From<VtShapeRecord> for TypeRecord
{
    fn from(record: VtShapeRecord) -> Self
    {
        TypeRecord::VtShape(record)
    }
}
