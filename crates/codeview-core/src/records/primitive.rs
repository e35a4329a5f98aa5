//! Built-in primitive types.
//!
//! Indices below `0x1000` never appear as records. The low byte selects the
//! base type and bits 8..12 the pointer mode; only direct values and near
//! 32/64-bit pointers are named here.

use crate::types::RecordIndex;

const MODE_DIRECT: u32 = 0x0;
const MODE_NEAR32: u32 = 0x4;
const MODE_NEAR64: u32 = 0x6;

fn base_type_name(kind: u32) -> Option<&'static str>
{
    let name = match kind {
        0x03 => "void",
        0x08 => "HRESULT",
        0x10 => "signed char",
        0x11 => "short",
        0x12 => "long",
        0x13 => "__int64",
        0x20 => "unsigned char",
        0x21 => "unsigned short",
        0x22 => "unsigned long",
        0x23 => "unsigned __int64",
        0x30 => "bool",
        0x40 => "float",
        0x41 => "double",
        0x42 => "long double",
        0x68 => "__int8",
        0x69 => "unsigned __int8",
        0x70 => "char",
        0x71 => "wchar_t",
        0x72 => "short",
        0x73 => "unsigned short",
        0x74 => "int",
        0x75 => "unsigned int",
        0x76 => "__int64",
        0x77 => "unsigned __int64",
        0x7a => "char16_t",
        0x7b => "char32_t",
        _ => return None,
    };
    Some(name)
}

/// Render a primitive type index, e.g. `0x0074` as `int` or `0x0603` as `void *`.
///
/// Returns `None` for indices outside the primitive range.
pub fn primitive_name(index: RecordIndex) -> Option<String>
{
    if !index.is_primitive() {
        return None;
    }
    let value = index.value();
    let kind = value & 0xff;
    let mode = (value >> 8) & 0xf;

    let rendered = match (base_type_name(kind), mode) {
        (Some(name), MODE_DIRECT) => name.to_string(),
        (Some(name), MODE_NEAR32 | MODE_NEAR64) => format!("{name} *"),
        _ => format!("primitive(0x{value:04x})"),
    };
    Some(rendered)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_direct_types()
    {
        assert_eq!(primitive_name(RecordIndex::new(0x74)).as_deref(), Some("int"));
        assert_eq!(primitive_name(RecordIndex::new(0x03)).as_deref(), Some("void"));
    }

    #[test]
    fn test_pointer_modes()
    {
        assert_eq!(primitive_name(RecordIndex::new(0x0603)).as_deref(), Some("void *"));
        assert_eq!(primitive_name(RecordIndex::new(0x0470)).as_deref(), Some("char *"));
    }

    #[test]
    fn test_unnamed_and_out_of_range()
    {
        assert_eq!(primitive_name(RecordIndex::new(0x0203)).as_deref(), Some("primitive(0x0203)"));
        assert_eq!(primitive_name(RecordIndex::new(0x00ff)).as_deref(), Some("primitive(0x00ff)"));
        assert_eq!(primitive_name(RecordIndex::NONE), None);
        assert_eq!(primitive_name(RecordIndex::new(0x1000)), None);
    }
}
