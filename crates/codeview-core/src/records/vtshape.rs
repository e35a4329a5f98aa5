//! Virtual function table shapes (`LF_VTSHAPE`).
//!
//! A shape lists one 4-bit descriptor per vtable slot, packed two per byte
//! with the low nibble first.

use std::fmt;

use tracing::debug;

use super::DecodeContext;
use crate::error::CodeViewResult;
use crate::reader::ByteCursor;

/// Kind of entry in one vtable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VtShapeDescriptor
{
    Near,
    Far,
    Thin,
    Outer,
    Meta,
    Near32,
    Far32,
    Unused,
    Unknown(u8),
}

impl From<u8> for VtShapeDescriptor
{
    fn from(value: u8) -> Self
    {
        match value {
            0 => VtShapeDescriptor::Near,
            1 => VtShapeDescriptor::Far,
            2 => VtShapeDescriptor::Thin,
            3 => VtShapeDescriptor::Outer,
            4 => VtShapeDescriptor::Meta,
            5 => VtShapeDescriptor::Near32,
            6 => VtShapeDescriptor::Far32,
            7 => VtShapeDescriptor::Unused,
            other => VtShapeDescriptor::Unknown(other),
        }
    }
}

impl fmt::Display for VtShapeDescriptor
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            VtShapeDescriptor::Near => "near",
            VtShapeDescriptor::Far => "far",
            VtShapeDescriptor::Thin => "thin",
            VtShapeDescriptor::Outer => "outer",
            VtShapeDescriptor::Meta => "meta",
            VtShapeDescriptor::Near32 => "near32",
            VtShapeDescriptor::Far32 => "far32",
            VtShapeDescriptor::Unused => "unused",
            VtShapeDescriptor::Unknown(value) => return write!(f, "unknown({value})"),
        };
        write!(f, "{label}")
    }
}

/// Decoded vtable shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtShapeRecord
{
    descriptors: Vec<VtShapeDescriptor>,
}

impl VtShapeRecord
{
    pub fn new(descriptors: Vec<VtShapeDescriptor>) -> Self
    {
        Self { descriptors }
    }

    /// Decode a record body.
    ///
    /// ## Errors
    ///
    /// `TruncatedField` if the count or the packed descriptors are cut short.
    pub fn decode(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext<'_>) -> CodeViewResult<Self>
    {
        let count = usize::from(cursor.read_u16()?);
        let packed = cursor.read_bytes("vtshape descriptors", count.div_ceil(2))?;
        let descriptors = (0..count)
            .map(|slot| {
                let byte = packed[slot / 2];
                let nibble = if slot % 2 == 0 { byte & 0x0f } else { byte >> 4 };
                VtShapeDescriptor::from(nibble)
            })
            .collect();
        cursor.skip_to_alignment();

        debug!(record = %ctx.index, count, "decoded vtshape");
        Ok(Self { descriptors })
    }

    /// Slot descriptors in table order.
    pub fn descriptors(&self) -> &[VtShapeDescriptor]
    {
        &self.descriptors
    }
}

impl fmt::Display for VtShapeRecord
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "VTShape: {{")?;
        for (slot, descriptor) in self.descriptors.iter().enumerate() {
            if slot > 0 {
                write!(f, ",")?;
            }
            write!(f, "{descriptor}")?;
        }
        write!(f, "}}")
    }
}
