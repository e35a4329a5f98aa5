//! # Record Catalog
//!
//! Index-to-record storage for one decode session, and the rendering entry
//! point records use to print the records they reference.
//!
//! ## Usage
//!
//! ```rust
//! use codeview_core::catalog::{CatalogView, RecordCatalog};
//! use codeview_core::records::{TypeRecord, VFTableRecord};
//! use codeview_core::types::RecordIndex;
//!
//! let mut catalog = RecordCatalog::new();
//! let vftable = VFTableRecord::new(
//!     RecordIndex::new(0x0074),
//!     RecordIndex::NONE,
//!     0,
//!     Some("??_7Foo@@6B@".to_string()),
//!     vec!["run".to_string()],
//! );
//! catalog.store(RecordIndex::new(0x1000), TypeRecord::from(vftable));
//!
//! let text = catalog.render(RecordIndex::new(0x1000)).unwrap();
//! assert_eq!(text, "VFTable for [int<vfptr_offset=0>] ??_7Foo@@6B@: {run}");
//! ```
//!
//! ## Thread Safety
//!
//! The catalog is not thread-safe: rendering tracks in-progress records in a
//! `RefCell`. Use one catalog per thread.

use std::cell::RefCell;
use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::warn;

use crate::error::{CodeViewError, CodeViewResult};
use crate::records::primitive::primitive_name;
use crate::records::TypeRecord;
use crate::types::RecordIndex;

/// Deepest chain of nested renders before giving up.
pub const MAX_RENDER_DEPTH: usize = 64;

/// Read access needed to render referenced records.
pub trait CatalogView
{
    /// Render the record at `index` as text.
    ///
    /// ## Errors
    ///
    /// Implementations report indices they cannot turn into text.
    fn render(&self, index: RecordIndex) -> CodeViewResult<String>;
}

/// Decoded records of one session, keyed by index.
#[derive(Debug, Default)]
pub struct RecordCatalog
{
    records: BTreeMap<RecordIndex, TypeRecord>,
    placeholders: bool,
    rendering: RefCell<SmallVec<[RecordIndex; 16]>>,
}

impl RecordCatalog
{
    /// Create an empty catalog that fails on unresolved references.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Render unresolved references, cycles and over-deep chains as
    /// `<unresolved 0x....>`, `<cycle 0x....>` or `<too deep 0x....>` instead
    /// of failing.
    #[must_use]
    pub fn with_placeholders(mut self, placeholders: bool) -> Self
    {
        self.placeholders = placeholders;
        self
    }

    /// Store `record` under `index`, returning any record it replaced.
    pub fn store(&mut self, index: RecordIndex, record: TypeRecord) -> Option<TypeRecord>
    {
        let previous = self.records.insert(index, record);
        if previous.is_some() {
            warn!(record = %index, "replacing previously stored record");
        }
        previous
    }

    pub fn get(&self, index: RecordIndex) -> Option<&TypeRecord>
    {
        self.records.get(&index)
    }

    pub fn contains(&self, index: RecordIndex) -> bool
    {
        self.records.contains_key(&index)
    }

    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }

    /// Records in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordIndex, &TypeRecord)> + '_
    {
        self.records.iter().map(|(index, record)| (*index, record))
    }

    fn unresolved(&self, index: RecordIndex) -> CodeViewResult<String>
    {
        if self.placeholders {
            Ok(format!("<unresolved {index}>"))
        } else {
            Err(CodeViewError::UnresolvedReference(index))
        }
    }

    fn cycle(&self, index: RecordIndex) -> CodeViewResult<String>
    {
        if self.placeholders {
            Ok(format!("<cycle {index}>"))
        } else {
            Err(CodeViewError::ReferenceCycle(index))
        }
    }

    fn too_deep(&self, index: RecordIndex) -> CodeViewResult<String>
    {
        if self.placeholders {
            Ok(format!("<too deep {index}>"))
        } else {
            Err(CodeViewError::RenderDepthExceeded {
                index,
                depth: MAX_RENDER_DEPTH,
            })
        }
    }
}

impl CatalogView for RecordCatalog
{
    fn render(&self, index: RecordIndex) -> CodeViewResult<String>
    {
        // Stored records win over primitive names: a stream may start below 0x1000.
        let Some(record) = self.records.get(&index) else {
            return primitive_name(index).map_or_else(|| self.unresolved(index), Ok);
        };

        {
            let mut rendering = self.rendering.borrow_mut();
            if rendering.contains(&index) {
                drop(rendering);
                return self.cycle(index);
            }
            if rendering.len() >= MAX_RENDER_DEPTH {
                drop(rendering);
                return self.too_deep(index);
            }
            rendering.push(index);
        }
        let result = record.render(self);
        self.rendering.borrow_mut().pop();
        result
    }
}
