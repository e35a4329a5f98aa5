//! # Reader
//!
//! Low-level byte access for type-record streams: a bounded little-endian
//! cursor and the one-byte character sets used to decode names.

pub mod charset;
pub mod cursor;

pub use charset::OneByteCharset;
pub use cursor::ByteCursor;
