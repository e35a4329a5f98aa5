//! One-byte character sets used for names inside type records.

use std::fmt;
use std::str::FromStr;

/// Character set applied to null-terminated names.
///
/// Names in type records are raw bytes; the producing toolchain decides what
/// they mean. Latin-1 is the default because it maps every byte to a code
/// point and therefore never loses information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OneByteCharset
{
    /// ISO-8859-1: byte `b` decodes to `U+00bb`.
    #[default]
    Latin1,
    /// 7-bit ASCII; bytes above 0x7f become `U+FFFD`.
    Ascii,
    /// UTF-8, with invalid sequences replaced by `U+FFFD`.
    Utf8,
}

impl OneByteCharset
{
    /// Decode `bytes` (terminator excluded) into a `String`.
    pub fn decode(self, bytes: &[u8]) -> String
    {
        match self {
            OneByteCharset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            OneByteCharset::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            OneByteCharset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl FromStr for OneByteCharset
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" => Ok(OneByteCharset::Latin1),
            "ascii" | "us-ascii" => Ok(OneByteCharset::Ascii),
            "utf8" | "utf-8" => Ok(OneByteCharset::Utf8),
            _ => Err(format!("Unknown charset: {s}. Use 'latin1', 'ascii', or 'utf8'")),
        }
    }
}

impl fmt::Display for OneByteCharset
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            OneByteCharset::Latin1 => "latin1",
            OneByteCharset::Ascii => "ascii",
            OneByteCharset::Utf8 => "utf8",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_latin1_maps_every_byte()
    {
        assert_eq!(OneByteCharset::Latin1.decode(b"caf\xe9"), "café");
    }

    #[test]
    fn test_ascii_replaces_high_bytes()
    {
        assert_eq!(OneByteCharset::Ascii.decode(b"a\xffb"), "a\u{fffd}b");
    }

    #[test]
    fn test_utf8_is_lossy()
    {
        assert_eq!(OneByteCharset::Utf8.decode("é".as_bytes()), "é");
        assert_eq!(OneByteCharset::Utf8.decode(b"\xc3"), "\u{fffd}");
    }

    #[test]
    fn test_charset_from_str()
    {
        assert_eq!(OneByteCharset::from_str("Latin1").unwrap(), OneByteCharset::Latin1);
        assert_eq!(OneByteCharset::from_str("utf-8").unwrap(), OneByteCharset::Utf8);
        assert_eq!(OneByteCharset::from_str("ascii").unwrap(), OneByteCharset::Ascii);
        assert!(OneByteCharset::from_str("ebcdic").is_err());
    }
}
