//! # codeview-core
//!
//! Decoding and rendering of CodeView type records.
//!
//! This crate provides:
//! - A bounded little-endian byte cursor with alignment handling
//! - Decoders for virtual function table records (`LF_VFTABLE`, `LF_VTSHAPE`)
//! - A dispatcher that walks a type-record stream and numbers its records
//! - A record catalog that renders records, resolving references recursively
//! - Reference-edge tracking for every index read during decode
//!
//! ## Example
//!
//! ```rust
//! use codeview_core::prelude::*;
//!
//! // LF_VFTABLE owned by `int` (0x74), no base, vfptr at 0, names "VFT", "f".
//! let stream = [
//!     0x1a, 0x00, 0x1d, 0x15, // length, leaf
//!     0x74, 0x00, 0x00, 0x00, // owner
//!     0x00, 0x00, 0x00, 0x00, // base
//!     0x00, 0x00, 0x00, 0x00, // vfptr offset
//!     0x06, 0x00, 0x00, 0x00, // names length
//!     b'V', b'F', b'T', 0x00, b'f', 0x00, // names
//!     0xf2, 0xf1, // padding
//! ];
//!
//! let mut tracker = DependencyTracker::new();
//! let decoded = RecordDispatcher::new().decode_stream(&stream, &ReaderOptions::default(), &mut tracker)?;
//! let text = decoded.catalog.render(RecordIndex::new(0x1000))?;
//! assert_eq!(text, "VFTable for [int<vfptr_offset=0>] VFT: {f}");
//! # Ok::<(), codeview_core::CodeViewError>(())
//! ```
//!
//! Everything here is single-threaded. Decoders report references through an
//! explicit [`dependency::ReferenceSink`] instead of shared state, so a host
//! decoding in parallel only needs one sink and one catalog per worker.

pub mod catalog;
pub mod config;
pub mod dependency;
pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod reader;
pub mod records;
pub mod types;

pub use catalog::{CatalogView, RecordCatalog};
pub use dispatch::RecordDispatcher;
pub use error::{CodeViewError, CodeViewResult};
pub use records::{TypeRecord, VFTableRecord};
pub use types::RecordIndex;
