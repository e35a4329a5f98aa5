//! End-to-end tests for virtual function table records

mod common;

use codeview_core::prelude::*;
use codeview_core::records::vftable::VFTABLE_HEADER_SIZE;
use common::{raw_vftable_body, record, vftable_body, vtshape_body, LF_VFTABLE, LF_VTSHAPE};

fn decode(stream: &[u8]) -> (DecodedStream, DependencyTracker)
{
    let mut tracker = DependencyTracker::new();
    let decoded = RecordDispatcher::new()
        .decode_stream(stream, &ReaderOptions::default(), &mut tracker)
        .unwrap();
    (decoded, tracker)
}

fn vftable_at(decoded: &DecodedStream, index: u32) -> &VFTableRecord
{
    match decoded.catalog.get(RecordIndex::new(index)) {
        Some(TypeRecord::VFTable(vftable)) => vftable,
        other => panic!("Expected a VFTable record, got {other:?}"),
    }
}

#[test]
fn test_names_split_in_order()
{
    let stream = record(LF_VFTABLE, &vftable_body(0x74, 0, 8, &["VFT@Foo", "m1", "m2"]));
    let (decoded, _) = decode(&stream);
    let vftable = vftable_at(&decoded, 0x1000);

    assert_eq!(vftable.table_name(), Some("VFT@Foo"));
    assert_eq!(vftable.method_names(), ["m1", "m2"]);
    assert_eq!(vftable.vfptr_offset(), 8);
}

#[test]
fn test_consumed_bytes_match_header_block_and_padding()
{
    let cases: [&[&str]; 4] = [&["T"], &["T", "a"], &["VFT", "ab", "c"], &["VFT@Foo", "m1", "m2"]];
    for names in cases {
        let body = vftable_body(0x74, 0, 0, names);
        let block_length = body.len() - VFTABLE_HEADER_SIZE;
        // The body starts 4 bytes into the stream, after length and leaf.
        let padding = (4 - (4 + body.len()) % 4) % 4;

        let mut framed = body.clone();
        framed.extend(std::iter::repeat(0xf1).take(padding));
        let mut cursor = ByteCursor::with_origin(&framed, 4, 4);
        let options = ReaderOptions::default();
        let mut sink: Vec<ReferenceEdge> = Vec::new();
        let mut ctx = codeview_core::records::DecodeContext::new(RecordIndex::new(0x1000), &options, &mut sink);
        VFTableRecord::decode(&mut cursor, &mut ctx).unwrap();

        assert_eq!(cursor.consumed(), VFTABLE_HEADER_SIZE + block_length + padding);
        assert!(!cursor.has_more());
    }
}

#[test]
fn test_render_through_catalog()
{
    let mut stream = record(LF_VTSHAPE, &vtshape_body(&[5, 5]));
    stream.extend(record(LF_VFTABLE, &vftable_body(0x1000, 0, 8, &["VFT@Base", "b1"])));
    stream.extend(record(LF_VFTABLE, &vftable_body(0x1000, 0x1001, 8, &["VFT@Foo", "m1", "m2"])));
    let (decoded, _) = decode(&stream);

    assert_eq!(decoded.report.decoded, 3);
    assert_eq!(
        decoded.catalog.render(RecordIndex::new(0x1001)).unwrap(),
        "VFTable for [VTShape: {near32,near32}<vfptr_offset=8>] VFT@Base: {b1}"
    );
    assert_eq!(
        decoded.catalog.render(RecordIndex::new(0x1002)).unwrap(),
        "VFTable for [VTShape: {near32,near32}<vfptr_offset=8> : VFTable for [VTShape: {near32,near32}<vfptr_offset=8>] \
         VFT@Base: {b1}] VFT@Foo: {m1,m2}"
    );
}

#[test]
fn test_base_segment_present_only_for_nonzero_base()
{
    let mut stream = record(LF_VFTABLE, &vftable_body(0x74, 0, 0, &["A"]));
    stream.extend(record(LF_VFTABLE, &vftable_body(0x74, 0x1000, 0, &["B"])));
    let (decoded, _) = decode(&stream);

    let without = decoded.catalog.render(RecordIndex::new(0x1000)).unwrap();
    let with = decoded.catalog.render(RecordIndex::new(0x1001)).unwrap();
    assert!(!without.contains(" : "));
    assert!(with.contains(" : VFTable for [int"));
}

#[test]
fn test_edges_reported_in_stream_order()
{
    let mut stream = record(LF_VFTABLE, &vftable_body(0x1001, 0, 0, &["A"]));
    stream.extend(record(LF_VTSHAPE, &vtshape_body(&[5])));
    let (_, tracker) = decode(&stream);

    let targets: Vec<_> = tracker.edges().iter().map(|edge| edge.to.value()).collect();
    assert_eq!(targets, vec![0x1001, 0]);
    assert_eq!(tracker.forward_references().count(), 1);
    assert_eq!(tracker.depth(), 0);
}

#[test]
fn test_forward_reference_resolves_after_decode()
{
    // The owner shape comes after the table that references it.
    let mut stream = record(LF_VFTABLE, &vftable_body(0x1001, 0, 16, &["VFT"]));
    stream.extend(record(LF_VTSHAPE, &vtshape_body(&[1])));
    let (decoded, _) = decode(&stream);

    assert_eq!(
        decoded.catalog.render(RecordIndex::new(0x1000)).unwrap(),
        "VFTable for [VTShape: {far}<vfptr_offset=16>] VFT: {}"
    );
}

#[test]
fn test_empty_block_is_unnamed_by_default()
{
    let stream = record(LF_VFTABLE, &raw_vftable_body(0x74, 0, 0, b""));
    let (decoded, _) = decode(&stream);
    let vftable = vftable_at(&decoded, 0x1000);

    assert_eq!(vftable.table_name(), None);
    assert!(vftable.method_names().is_empty());
    assert_eq!(
        decoded.catalog.render(RecordIndex::new(0x1000)).unwrap(),
        "VFTable for [int<vfptr_offset=0>] : {}"
    );
}

#[test]
fn test_empty_block_fails_when_name_required()
{
    let stream = record(LF_VFTABLE, &raw_vftable_body(0x74, 0, 0, b""));
    let options = ReaderOptions::default()
        .with_name_policy(NamePolicy::RequireTableName)
        .with_strict(true);
    let result = RecordDispatcher::new().decode_stream(&stream, &options, &mut DependencyTracker::new());
    assert!(matches!(result, Err(CodeViewError::EmptyNameBlock)));
}

#[test]
fn test_unterminated_last_name_fails()
{
    let stream = record(LF_VFTABLE, &raw_vftable_body(0x74, 0, 0, b"VFT\0m1"));
    let options = ReaderOptions::default().with_strict(true);
    let result = RecordDispatcher::new().decode_stream(&stream, &options, &mut DependencyTracker::new());
    assert!(matches!(result, Err(CodeViewError::UnterminatedString { .. })));
}

#[test]
fn test_charset_applies_to_names()
{
    let stream = record(LF_VFTABLE, &raw_vftable_body(0x74, 0, 0, b"caf\xe9\0"));
    let latin1 = RecordDispatcher::new()
        .decode_stream(&stream, &ReaderOptions::default(), &mut DependencyTracker::new())
        .unwrap();
    let ascii = RecordDispatcher::new()
        .decode_stream(
            &stream,
            &ReaderOptions::default().with_charset(OneByteCharset::Ascii),
            &mut DependencyTracker::new(),
        )
        .unwrap();

    assert_eq!(vftable_at(&latin1, 0x1000).table_name(), Some("café"));
    assert_eq!(vftable_at(&ascii, 0x1000).table_name(), Some("caf\u{fffd}"));
}
