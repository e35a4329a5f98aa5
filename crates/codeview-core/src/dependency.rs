//! # Dependency Tracking
//!
//! Records "record A references record B" edges while a stream is decoded.
//!
//! Decoders never reach into shared state to report references. They receive
//! a `&mut dyn ReferenceSink` and call [`ReferenceSink::note_reference`] at the
//! point in the byte stream where the index was read. The caller owns the sink
//! and can inspect the collected edges afterwards, for example to find forward
//! references that must be resolved before rendering.
//!
//! [`DependencyTracker`] keeps the push/pop discipline of a dependency stack:
//! every reported edge is pushed and popped again before `note_reference`
//! returns, so the stack is balanced after every decode call even when the
//! decoder fails later on. A host that decodes records in parallel needs one
//! tracker per worker.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::types::RecordIndex;

/// Receiver for reference edges reported during decode.
pub trait ReferenceSink
{
    /// Report that record `from` references `to`.
    fn note_reference(&mut self, from: RecordIndex, to: RecordIndex);
}

/// A sink that discards every edge.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReferenceSink for NullSink
{
    fn note_reference(&mut self, _from: RecordIndex, _to: RecordIndex) {}
}

/// One directed reference between two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceEdge
{
    /// The record holding the index.
    pub from: RecordIndex,
    /// The referenced record.
    pub to: RecordIndex,
}

impl ReferenceEdge
{
    /// Edge to the "no reference" sentinel.
    pub fn is_sentinel(&self) -> bool
    {
        self.to.is_none()
    }

    /// Edge from a record to itself.
    pub fn is_self_reference(&self) -> bool
    {
        self.to == self.from
    }

    /// Edge to a record that appears later in the stream.
    pub fn is_forward(&self) -> bool
    {
        self.to > self.from
    }
}

impl ReferenceSink for Vec<ReferenceEdge>
{
    fn note_reference(&mut self, from: RecordIndex, to: RecordIndex)
    {
        self.push(ReferenceEdge { from, to });
    }
}

/// Dependency stack plus the log of every edge it has seen.
#[derive(Debug, Default)]
pub struct DependencyTracker
{
    stack: SmallVec<[ReferenceEdge; 8]>,
    edges: Vec<ReferenceEdge>,
}

impl DependencyTracker
{
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Push an edge onto the dependency stack and log it.
    pub fn push(&mut self, from: RecordIndex, to: RecordIndex)
    {
        let edge = ReferenceEdge { from, to };
        if edge.is_self_reference() {
            debug!(record = %from, "record references itself");
        }
        trace!(record = %from, target = %to, depth = self.stack.len(), "push dependency");
        self.stack.push(edge);
        self.edges.push(edge);
    }

    /// Pop the most recent edge.
    pub fn pop(&mut self) -> Option<ReferenceEdge>
    {
        self.stack.pop()
    }

    /// Number of edges currently pushed and not yet popped.
    pub fn depth(&self) -> usize
    {
        self.stack.len()
    }

    /// Every edge reported so far, in reporting order.
    pub fn edges(&self) -> &[ReferenceEdge]
    {
        &self.edges
    }

    /// Edges reported by one record.
    pub fn references_from(&self, from: RecordIndex) -> impl Iterator<Item = &ReferenceEdge> + '_
    {
        self.edges.iter().filter(move |edge| edge.from == from)
    }

    /// Non-sentinel edges pointing at records that come later in the stream.
    pub fn forward_references(&self) -> impl Iterator<Item = &ReferenceEdge> + '_
    {
        self.edges.iter().filter(|edge| !edge.is_sentinel() && edge.is_forward())
    }

    /// Edges from a record to itself.
    pub fn self_references(&self) -> impl Iterator<Item = &ReferenceEdge> + '_
    {
        self.edges.iter().filter(|edge| edge.is_self_reference())
    }
}

impl ReferenceSink for DependencyTracker
{
    fn note_reference(&mut self, from: RecordIndex, to: RecordIndex)
    {
        self.push(from, to);
        self.pop();
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn data(index: u32) -> RecordIndex
    {
        RecordIndex::new(index)
    }

    #[test]
    fn test_note_reference_is_balanced()
    {
        let mut tracker = DependencyTracker::new();
        tracker.note_reference(RecordIndex::new(0x1001), data(0x1000));
        tracker.note_reference(RecordIndex::new(0x1001), data(0));
        assert_eq!(tracker.depth(), 0);
        assert_eq!(tracker.edges().len(), 2);
        assert!(tracker.edges()[1].is_sentinel());
    }

    #[test]
    fn test_classifies_edges()
    {
        let mut tracker = DependencyTracker::new();
        tracker.note_reference(RecordIndex::new(0x1001), data(0x1000));
        tracker.note_reference(RecordIndex::new(0x1001), data(0x1005));
        tracker.note_reference(RecordIndex::new(0x1002), data(0x1002));
        tracker.note_reference(RecordIndex::new(0x1002), data(0));

        let forward: Vec<_> = tracker.forward_references().collect();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].to, RecordIndex::new(0x1005));

        assert_eq!(tracker.self_references().count(), 1);
        assert_eq!(tracker.references_from(RecordIndex::new(0x1001)).count(), 2);
    }

    #[test]
    fn test_explicit_push_pop()
    {
        let mut tracker = DependencyTracker::new();
        tracker.push(RecordIndex::new(0x1000), data(0x1001));
        tracker.push(RecordIndex::new(0x1001), data(0x1000));
        assert_eq!(tracker.depth(), 2);
        assert_eq!(tracker.pop().map(|edge| edge.from), Some(RecordIndex::new(0x1001)));
        assert_eq!(tracker.pop().map(|edge| edge.from), Some(RecordIndex::new(0x1000)));
        assert!(tracker.pop().is_none());
    }

    #[test]
    fn test_vec_sink_collects()
    {
        let mut edges: Vec<ReferenceEdge> = Vec::new();
        edges.note_reference(RecordIndex::new(0x1000), data(0x74));
        assert_eq!(edges, vec![ReferenceEdge {
            from: RecordIndex::new(0x1000),
            to: data(0x74),
        }]);
    }
}
