//! # Record Dispatch
//!
//! Splits a type-record stream into records and hands each body to the
//! decoder registered for its leaf kind.
//!
//! ## Record Framing
//!
//! ```text
//! u16   record length (bytes after this field, padding included)
//! u16   leaf kind
//! ...   body
//! ```
//!
//! Records are numbered sequentially from [`ReaderOptions::first_index`].
//! Leaf kinds without a decoder are kept as [`UnknownRecord`]s so that
//! references to them still resolve.
//!
//! ## Usage
//!
//! ```rust
//! use codeview_core::catalog::CatalogView;
//! use codeview_core::config::ReaderOptions;
//! use codeview_core::dependency::DependencyTracker;
//! use codeview_core::dispatch::RecordDispatcher;
//! use codeview_core::types::RecordIndex;
//!
//! // One LF_VTSHAPE record with a single near32 slot.
//! let stream = [0x06, 0x00, 0x0a, 0x00, 0x01, 0x00, 0x05, 0xf1];
//!
//! let mut tracker = DependencyTracker::new();
//! let decoded = RecordDispatcher::new()
//!     .decode_stream(&stream, &ReaderOptions::default(), &mut tracker)
//!     .unwrap();
//! assert_eq!(decoded.catalog.render(RecordIndex::new(0x1000)).unwrap(), "VTShape: {near32}");
//! ```

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::catalog::RecordCatalog;
use crate::config::ReaderOptions;
use crate::dependency::ReferenceSink;
use crate::error::{CodeViewError, CodeViewResult};
use crate::reader::ByteCursor;
use crate::records::{DecodeContext, TypeRecord, UnknownRecord, VFTableRecord, VtShapeRecord, LF_VFTABLE, LF_VTSHAPE};
use crate::types::RecordIndex;

/// Decoder entry point: body cursor in, record out.
pub type DecodeFn = fn(&mut ByteCursor<'_>, &mut DecodeContext<'_>) -> CodeViewResult<TypeRecord>;

fn decode_vftable(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext<'_>) -> CodeViewResult<TypeRecord>
{
    VFTableRecord::decode(cursor, ctx).map(TypeRecord::from)
}

fn decode_vtshape(cursor: &mut ByteCursor<'_>, ctx: &mut DecodeContext<'_>) -> CodeViewResult<TypeRecord>
{
    VtShapeRecord::decode(cursor, ctx).map(TypeRecord::from)
}

static DEFAULT_DECODERS: Lazy<HashMap<u16, DecodeFn>> = Lazy::new(|| {
    let mut decoders: HashMap<u16, DecodeFn> = HashMap::new();
    decoders.insert(LF_VFTABLE, decode_vftable);
    decoders.insert(LF_VTSHAPE, decode_vtshape);
    decoders
});

/// A record that failed to decode and was skipped.
#[derive(Debug)]
pub struct RecordFailure
{
    /// Index the record would have been stored under.
    pub index: RecordIndex,
    /// Leaf kind, if the header was readable.
    pub kind: Option<u16>,
    /// Stream offset of the record length field.
    pub offset: usize,
    /// Why decoding failed.
    pub error: CodeViewError,
}

impl fmt::Display for RecordFailure
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.kind {
            Some(kind) => write!(f, "{} (leaf 0x{kind:04x} at 0x{:x}): {}", self.index, self.offset, self.error),
            None => write!(f, "{} (at 0x{:x}): {}", self.index, self.offset, self.error),
        }
    }
}

/// Counters and failures collected while decoding a stream.
#[derive(Debug, Default)]
pub struct StreamReport
{
    /// Records decoded by a registered decoder.
    pub decoded: usize,
    /// Records kept as `UnknownRecord`.
    pub unknown: usize,
    /// Records skipped because they failed to decode.
    pub failures: Vec<RecordFailure>,
}

/// Result of decoding a whole stream.
#[derive(Debug)]
pub struct DecodedStream
{
    pub catalog: RecordCatalog,
    pub report: StreamReport,
}

/// Table of decoders keyed by leaf kind.
#[derive(Clone)]
pub struct RecordDispatcher
{
    decoders: HashMap<u16, DecodeFn>,
}

impl fmt::Debug for RecordDispatcher
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let mut kinds: Vec<_> = self.decoders.keys().copied().collect();
        kinds.sort_unstable();
        f.debug_struct("RecordDispatcher").field("kinds", &kinds).finish()
    }
}

impl Default for RecordDispatcher
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl RecordDispatcher
{
    /// Dispatcher with every built-in decoder registered.
    #[must_use]
    pub fn new() -> Self
    {
        Self {
            decoders: DEFAULT_DECODERS.clone(),
        }
    }

    /// Dispatcher with no decoders; every record decodes as unknown.
    #[must_use]
    pub fn empty() -> Self
    {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register `decoder` for `kind`, returning the decoder it replaced.
    pub fn register(&mut self, kind: u16, decoder: DecodeFn) -> Option<DecodeFn>
    {
        self.decoders.insert(kind, decoder)
    }

    /// Whether a decoder is registered for `kind`.
    pub fn supports(&self, kind: u16) -> bool
    {
        self.decoders.contains_key(&kind)
    }

    /// Decode one record body whose header has already been read.
    ///
    /// Unknown leaf kinds consume the rest of `body` and become
    /// [`TypeRecord::Unknown`].
    ///
    /// ## Errors
    ///
    /// Whatever the registered decoder reports.
    pub fn decode_record(&self, kind: u16, body: &mut ByteCursor<'_>, ctx: &mut DecodeContext<'_>) -> CodeViewResult<TypeRecord>
    {
        match self.decoders.get(&kind) {
            Some(decoder) => decoder(body, ctx),
            None => {
                let len = body.remaining();
                let bytes = body.read_bytes("record body", len)?.to_vec();
                Ok(TypeRecord::Unknown(UnknownRecord { kind, bytes }))
            }
        }
    }

    /// Decode every record of `stream` into a catalog.
    ///
    /// A record that fails to decode is logged and listed in the report; the
    /// next record is decoded as usual and the failed index stays empty. With
    /// `options.strict` the first failure is returned instead.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument` if the options do not validate
    /// - `TruncatedField` / `SubBlockOverrun` if a record frame runs past the end
    ///   of the stream (framing is lost, so this is always fatal)
    /// - any per-record error in strict mode
    pub fn decode_stream(
        &self,
        stream: &[u8],
        options: &ReaderOptions,
        sink: &mut dyn ReferenceSink,
    ) -> CodeViewResult<DecodedStream>
    {
        options.validate()?;

        let mut cursor = ByteCursor::new(stream, options.alignment);
        let mut catalog = RecordCatalog::new().with_placeholders(options.placeholders);
        let mut report = StreamReport::default();
        let mut index = options.first_index;

        while cursor.has_more() {
            let offset = cursor.offset();
            let length = usize::from(cursor.read_u16()?);
            let mut frame = cursor.bounded_subcursor(length)?;

            let mut kind = None;
            let outcome = self.decode_frame(&mut frame, index, options, sink, &mut kind);
            match outcome {
                Ok(record) => {
                    if matches!(record, TypeRecord::Unknown(_)) {
                        report.unknown += 1;
                    } else {
                        report.decoded += 1;
                    }
                    catalog.store(index, record);
                }
                Err(error) if options.strict => return Err(error),
                Err(error) => {
                    let failure = RecordFailure {
                        index,
                        kind,
                        offset,
                        error,
                    };
                    warn!(%failure, "skipping record");
                    report.failures.push(failure);
                }
            }
            index = index.next();
        }

        info!(
            records = catalog.len(),
            decoded = report.decoded,
            unknown = report.unknown,
            failed = report.failures.len(),
            "decoded type stream"
        );
        Ok(DecodedStream { catalog, report })
    }

    fn decode_frame(
        &self,
        frame: &mut ByteCursor<'_>,
        index: RecordIndex,
        options: &ReaderOptions,
        sink: &mut dyn ReferenceSink,
        kind: &mut Option<u16>,
    ) -> CodeViewResult<TypeRecord>
    {
        let leaf = frame.read_u16()?;
        *kind = Some(leaf);
        debug!(record = %index, leaf, offset = frame.offset(), "decoding record");

        let mut ctx = DecodeContext::new(index, options, sink);
        let record = self.decode_record(leaf, frame, &mut ctx)?;
        if frame.has_more() {
            return Err(CodeViewError::RecordLengthMismatch {
                index,
                leftover: frame.remaining(),
            });
        }
        Ok(record)
    }
}
