//! # Types
//!
//! Index types shared by the reader, the catalog and the record decoders.

pub mod index;

pub use index::RecordIndex;
