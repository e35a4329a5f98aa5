//! # Virtual Function Table Records
//!
//! `LF_VFTABLE` describes one virtual function table of a class: the owning
//! type, the table it extends (if any), where the vfptr sits inside the
//! owner's layout, the table's own symbol name and the names of its methods
//! in slot order.
//!
//! ## Layout
//!
//! ```text
//! u32   owner type index
//! u32   base vftable index (0 = none)
//! i32   vfptr offset within the owner
//! u32   names block length N
//! [N]   null-terminated strings: table name, then method names
//! ...   padding to the record alignment
//! ```

use tracing::debug;

use super::names::NameList;
use super::DecodeContext;
use crate::catalog::CatalogView;
use crate::error::CodeViewResult;
use crate::reader::ByteCursor;
use crate::types::RecordIndex;

/// Size of the fixed fields preceding the names block.
pub const VFTABLE_HEADER_SIZE: usize = 16;

/// Decoded virtual function table descriptor.
///
/// Immutable once decoded; the catalog owns it for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VFTableRecord
{
    owner_index: RecordIndex,
    base_table_index: RecordIndex,
    vfptr_offset: i32,
    table_name: Option<String>,
    method_names: Vec<String>,
}

impl VFTableRecord
{
    /// Build a record from already-decoded parts.
    pub fn new(
        owner_index: RecordIndex,
        base_table_index: RecordIndex,
        vfptr_offset: i32,
        table_name: Option<String>,
        method_names: Vec<String>,
    ) -> Self
    {
        Self {
            owner_index,
            base_table_index,
            vfptr_offset,
            table_name,
            method_names,
        }
    }

    /// Decode a record body.
    ///
    /// Both indices are reported to the context's reference sink as soon as
    /// they are read, the sentinel base index included. Padding after the
    /// names block is skipped on `cursor`, not on the block.
    ///
    /// ## Errors
    ///
    /// - `TruncatedField` if a fixed field is cut short
    /// - `SubBlockOverrun` if the names block is longer than the record
    /// - `UnterminatedString` if a name runs into the end of the block
    /// - `EmptyNameBlock` if the block is empty and the options require a name
    pub fn decode(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext<'_>) -> CodeViewResult<Self>
    {
        let owner_index = RecordIndex::new(cursor.read_u32()?);
        ctx.note_reference(owner_index);

        let base_table_index = RecordIndex::new(cursor.read_u32()?);
        ctx.note_reference(base_table_index);

        let vfptr_offset = cursor.read_i32()?;
        let block_length = cursor.read_u32()? as usize;

        let mut block = cursor.bounded_subcursor(block_length)?;
        let names = NameList::decode(&mut block, ctx.options.charset, ctx.options.name_policy)?;
        let padding = cursor.skip_to_alignment();

        debug!(
            record = %ctx.index,
            owner = %owner_index,
            base = %base_table_index,
            vfptr_offset,
            block_length,
            padding,
            methods = names.remainder.len(),
            "decoded vftable"
        );

        Ok(Self {
            owner_index,
            base_table_index,
            vfptr_offset,
            table_name: names.head,
            method_names: names.remainder,
        })
    }

    /// Type owning this table.
    pub fn owner_index(&self) -> RecordIndex
    {
        self.owner_index
    }

    /// Table this one extends; the sentinel when there is none.
    pub fn base_table_index(&self) -> RecordIndex
    {
        self.base_table_index
    }

    /// Whether a base table is referenced.
    pub fn has_base_table(&self) -> bool
    {
        !self.base_table_index.is_none()
    }

    /// Byte offset of the vfptr within the owner's layout.
    pub fn vfptr_offset(&self) -> i32
    {
        self.vfptr_offset
    }

    /// Symbol name of the table itself, if the names block had one.
    pub fn table_name(&self) -> Option<&str>
    {
        self.table_name.as_deref()
    }

    /// Method names in slot order.
    pub fn method_names(&self) -> &[String]
    {
        &self.method_names
    }

    /// Render as `VFTable for [<owner><vfptr_offset=N> : <base>] <name>: {m1,m2}`.
    ///
    /// Owner and base are rendered through `catalog`. The base segment is left
    /// out when there is no base table; an absent table name renders empty.
    ///
    /// ## Errors
    ///
    /// Whatever the catalog reports for the owner or base index.
    pub fn render(&self, catalog: &dyn CatalogView) -> CodeViewResult<String>
    {
        let owner = catalog.render(self.owner_index)?;
        let base = if self.has_base_table() {
            format!(" : {}", catalog.render(self.base_table_index)?)
        } else {
            String::new()
        };
        let text = format!(
            "VFTable for [{owner}<vfptr_offset={}>{base}] {}: {{{}}}",
            self.vfptr_offset,
            self.table_name().unwrap_or_default(),
            self.method_names.join(",")
        );
        Ok(text)
    }
}
