//! Common module for library exports

pub use crate::catalog::{CatalogView, RecordCatalog};
pub use crate::config::{NamePolicy, ReaderOptions};
pub use crate::dependency::{DependencyTracker, ReferenceEdge, ReferenceSink};
pub use crate::dispatch::{DecodedStream, RecordDispatcher, StreamReport};
pub use crate::error::{CodeViewError, CodeViewResult};
pub use crate::reader::{ByteCursor, OneByteCharset};
pub use crate::records::{TypeRecord, VFTableRecord, VtShapeRecord};
pub use crate::types::RecordIndex;
