use std::collections::HashMap;

use crate::planner::point::PointId;

/// A reservation spanning `[start, start + duration)` for `resource_count`
/// units of the planner's resource.
///
/// Grounded on `scheduled_point_t`'s `span_t` companion in
/// `planner_internal_tree.hpp` (`span_start`/`span_end`/`planned`). `span_id`
/// is the caller-visible identifier handed back by `add_span`; it is the
/// monotonic counter itself, not an arena key, because callers persist it
/// across calls (e.g. to `remove_span`) the way `span_t::span_id` was
/// persisted across the original C API.
#[derive(Debug, Clone)]
pub struct Span {
    pub span_id: i64,
    pub start: i64,
    pub duration: i64,
    pub resource_count: i64,
    /// The two boundary points this span touches: `start` and `start +
    /// duration`. Every other point the span overlaps is referenced only
    /// through its own `ref_count`, not stored here — see `facade.rs`'s
    /// `overlap_points`.
    pub(crate) start_point: PointId,
    pub(crate) end_point: PointId,
}

impl Span {
    pub fn end(&self) -> i64 {
        self.start + self.duration
    }
}

/// Maps `span_id -> Span`, with a side list preserving insertion order so
/// `spans()` iterates in the same order the original `span_first`/
/// `span_next` walk would have: oldest reservation first.
#[derive(Debug, Default)]
pub(crate) struct SpanTable {
    by_id: HashMap<i64, Span>,
    order: Vec<i64>,
    next_id: i64,
}

impl SpanTable {
    pub fn new() -> Self {
        SpanTable { by_id: HashMap::new(), order: Vec::new(), next_id: 1 }
    }

    /// Allocates the next span id without inserting anything; `insert`
    /// takes the id that was allocated here.
    pub fn reserve_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, span: Span) {
        self.order.push(span.span_id);
        self.by_id.insert(span.span_id, span);
    }

    pub fn get(&self, span_id: i64) -> Option<&Span> {
        self.by_id.get(&span_id)
    }

    pub fn remove(&mut self, span_id: i64) -> Option<Span> {
        let span = self.by_id.remove(&span_id)?;
        self.order.retain(|id| *id != span_id);
        Some(span)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn contains(&self, span_id: i64) -> bool {
        self.by_id.contains_key(&span_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.order.iter().filter_map(move |id| self.by_id.get(id))
    }
}
