//! Name blocks: a length-bounded run of null-terminated strings.
//!
//! The first string of a block names the thing that owns it; every following
//! string is an entry of a list whose order carries meaning (vtable slots, for
//! example). The codec does not touch alignment padding, which belongs to the
//! enclosing record.

use crate::config::NamePolicy;
use crate::error::{CodeViewError, CodeViewResult};
use crate::reader::{ByteCursor, OneByteCharset};

/// A name block split into its head string and the ordered remainder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameList
{
    /// First string of the block, absent when the block was empty.
    pub head: Option<String>,
    /// Every later string, in block order.
    pub remainder: Vec<String>,
}

impl NameList
{
    /// Decode every string in `block` and split off the first one.
    ///
    /// Decoding stops when the block has no bytes left. A byte run that reaches
    /// the bound without a terminator is an error, never a truncated name.
    ///
    /// ## Errors
    ///
    /// - `UnterminatedString` if the last string lacks its terminator
    /// - `EmptyNameBlock` if the block holds no strings and `policy` requires a head
    pub fn decode(block: &mut ByteCursor<'_>, charset: OneByteCharset, policy: NamePolicy) -> CodeViewResult<Self>
    {
        let mut list = NameList::default();
        while block.has_more() {
            let name = block.read_cstring(charset)?;
            if list.head.is_none() {
                list.head = Some(name);
            } else {
                list.remainder.push(name);
            }
        }

        if list.head.is_none() && policy == NamePolicy::RequireTableName {
            return Err(CodeViewError::EmptyNameBlock);
        }
        Ok(list)
    }

    /// Number of strings in the block, head included.
    pub fn len(&self) -> usize
    {
        usize::from(self.head.is_some()) + self.remainder.len()
    }

    /// Whether the block held no strings at all.
    pub fn is_empty(&self) -> bool
    {
        self.head.is_none()
    }
}
