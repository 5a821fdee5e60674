use crate::error::{PlannerError, Result};
use crate::planner::capacity_tree::CapacityTree;
use crate::planner::point::{PointArena, PointId, ScheduledPoint};
use crate::planner::span::{Span, SpanTable};
use crate::planner::time_tree::TimeTree;

/// The public reservation planner.
///
/// Grounded on `planner.cpp`'s `planner_t` and the public `planner_*`
/// functions built around it. Owns every `ScheduledPoint` in a single
/// [`slotmap::SlotMap`] arena; the time tree and capacity tree index that
/// arena by `PointId` rather than by pointer (see `point.rs`).
#[derive(Debug)]
pub struct Planner {
    plan_start: i64,
    plan_end: i64,
    total: i64,
    resource_type: String,

    arena: PointArena,
    time_tree: TimeTree,
    capacity_tree: CapacityTree,
    spans: SpanTable,

    /// `P0`, the permanent sentinel at `plan_start`. Never destroyed short
    /// of the whole planner being reset/dropped.
    p0: PointId,

    /// Points detached from the capacity tree during an in-flight
    /// earliest-fit search (`avail_at`), pending restoration.
    saved_points: Vec<PointId>,

    /// The active `(on_or_after, dur, request)` query, if any.
    current_request: Option<IterRequest>,
}

#[derive(Debug, Clone, Copy)]
struct IterRequest {
    on_or_after: i64,
    dur: i64,
    request: i64,
}

impl Planner {
    /// Creates a planner over `[base, base + dur)` with `total` units of
    /// `resource_type`. Mirrors `planner_new`.
    pub fn new(base: i64, dur: i64, total: i64, resource_type: impl Into<String>) -> Result<Self> {
        if dur < 1 {
            return Err(PlannerError::InvalidArgument(format!("duration must be >= 1, got {dur}")));
        }
        if total < 1 {
            return Err(PlannerError::InvalidArgument(format!("total must be >= 1, got {total}")));
        }

        let mut arena = PointArena::default();
        let p0 = arena.insert(ScheduledPoint::new(base, 0, total, 1));

        let mut time_tree = TimeTree::new();
        time_tree.insert(base, p0)?;

        let mut capacity_tree = CapacityTree::new();
        capacity_tree.insert(&mut arena, p0);

        Ok(Planner {
            plan_start: base,
            plan_end: base + dur,
            total,
            resource_type: resource_type.into(),
            arena,
            time_tree,
            capacity_tree,
            spans: SpanTable::new(),
            p0,
            saved_points: Vec::new(),
            current_request: None,
        })
    }

    /// Tears down and rebuilds the plan window in place. Observably
    /// equivalent to `destroy` followed by `new(base, dur, total, type)`
    /// (the original `total`/`resource_type` are carried over).
    pub fn reset(&mut self, base: i64, dur: i64) -> Result<()> {
        let rebuilt = Planner::new(base, dur, self.total, self.resource_type.clone())?;
        *self = rebuilt;
        Ok(())
    }

    /// Explicit teardown. After this call the planner is empty; further use
    /// requires `reset`. Provided alongside `Drop` because the original API
    /// exposes `destroy` as a distinct, callable operation.
    pub fn destroy(&mut self) {
        self.arena.clear();
        self.time_tree = TimeTree::new();
        self.capacity_tree = CapacityTree::new();
        self.spans = SpanTable::new();
        self.saved_points.clear();
        self.current_request = None;
    }

    pub fn base_time(&self) -> i64 {
        self.plan_start
    }

    pub fn duration(&self) -> i64 {
        self.plan_end - self.plan_start
    }

    pub fn resource_total(&self) -> i64 {
        self.total
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn check_window(&self, t: i64) -> Result<()> {
        if t < self.plan_start || t > self.plan_end {
            return Err(PlannerError::OutOfRange(format!(
                "time {t} outside plan window [{}, {}]",
                self.plan_start, self.plan_end
            )));
        }
        Ok(())
    }

    fn check_request(&self, request: i64) -> Result<()> {
        if request < 0 {
            return Err(PlannerError::InvalidArgument(format!("request must be >= 0, got {request}")));
        }
        if request > self.total {
            return Err(PlannerError::OutOfRange(format!("request {request} exceeds total {}", self.total)));
        }
        Ok(())
    }

    fn check_duration(&self, dur: i64) -> Result<()> {
        if dur < 1 {
            return Err(PlannerError::InvalidArgument(format!("duration must be >= 1, got {dur}")));
        }
        Ok(())
    }

    // ---- Queries (spec.md §4.3) -------------------------------------

    pub fn resources_at(&self, t: i64) -> Result<i64> {
        self.check_window(t)?;
        let p = self.time_tree.state_at(t).expect("P0 guarantees state_at is never empty within the window");
        Ok(self.arena[p].remaining)
    }

    pub fn resources_during(&self, at: i64, dur: i64) -> Result<i64> {
        self.check_duration(dur)?;
        self.check_window(at)?;
        self.check_window(at + dur)?;

        let mut p = self.time_tree.state_at(at).expect("P0 guarantees state_at is never empty within the window");
        let mut min_remaining = self.arena[p].remaining;
        while let Some(next) = self.time_tree.next_at(self.arena[p].at) {
            if self.arena[next].at >= at + dur {
                break;
            }
            min_remaining = min_remaining.min(self.arena[next].remaining);
            p = next;
        }
        Ok(min_remaining)
    }

    pub fn available_during(&self, at: i64, dur: i64, request: i64) -> Result<bool> {
        self.check_duration(dur)?;
        self.check_window(at)?;
        self.check_window(at + dur)?;
        self.check_request(request)?;

        Ok(self.is_available_during(at, dur, request))
    }

    /// Core of `available_during`, without the `plan_end` bound check:
    /// `avail_at` needs to test fit against candidate windows that may
    /// extend past `plan_end` (that case is rejected separately, by the
    /// caller, only once a window is otherwise known to fit) — see
    /// spec.md §4.4's `avail_at` pseudocode, where the fit test and the
    /// `plan_end` check are two distinct steps.
    fn is_available_during(&self, at: i64, dur: i64, request: i64) -> bool {
        let mut p = self.time_tree.state_at(at).expect("P0 guarantees state_at is never empty within the window");
        if self.arena[p].remaining < request {
            return false;
        }
        while let Some(next) = self.time_tree.next_at(self.arena[p].at) {
            if self.arena[next].at >= at + dur {
                break;
            }
            if self.arena[next].remaining < request {
                return false;
            }
            p = next;
        }
        true
    }

    // ---- Earliest-fit iteration (spec.md §4.4) -----------------------

    /// Restores every stashed candidate back into the capacity tree.
    fn restore_saved_points(&mut self) {
        for p in self.saved_points.drain(..) {
            if self.arena[p].ref_count > 0 || p == self.p0 {
                self.capacity_tree.insert(&mut self.arena, p);
            }
        }
    }

    /// Detaches `p` from the capacity tree and stashes it for later
    /// restoration, without destroying it — `p` may still be referenced by
    /// live spans.
    fn detach_candidate(&mut self, p: PointId) {
        self.capacity_tree.remove(&mut self.arena, p);
        self.saved_points.push(p);
    }

    /// The `avail_at` loop from spec.md §4.4, run against the active
    /// `current_request`.
    fn avail_at(&mut self) -> Result<i64> {
        let req = self.current_request.expect("avail_at requires an active query");
        loop {
            let Some(p) = self.capacity_tree.mintime(&self.arena, req.request) else {
                return Err(PlannerError::NotFound);
            };
            let at = self.arena[p].at;

            if at < req.on_or_after {
                self.detach_candidate(p);
                continue;
            }

            if self.is_available_during(at, req.dur, req.request) {
                self.detach_candidate(p);
                if at + req.dur > self.plan_end {
                    return Err(PlannerError::NotFound);
                }
                return Ok(at);
            }

            self.detach_candidate(p);
        }
    }

    /// Mirrors `avail_time_first`.
    pub fn avail_time_first(&mut self, on_or_after: i64, dur: i64, request: i64) -> Result<i64> {
        self.check_duration(dur)?;
        self.check_window(on_or_after)?;
        self.check_request(request)?;

        self.restore_saved_points();
        self.current_request = Some(IterRequest { on_or_after, dur, request });
        self.avail_at()
    }

    /// Mirrors `avail_time_next`. Fails if no `avail_time_first` call is
    /// currently active (spec.md §9 resolves the source's ambiguity here).
    pub fn avail_time_next(&mut self) -> Result<i64> {
        if self.current_request.is_none() {
            return Err(PlannerError::InvalidArgument("avail_time_next called with no active query".into()));
        }
        self.avail_at()
    }

    // ---- Span mutation (spec.md §4.5) --------------------------------

    /// Returns the point at `t`, creating it (inheriting state from
    /// `state_at(t)`) if none exists yet.
    fn get_or_create_point(&mut self, t: i64) -> Result<PointId> {
        if let Some(p) = self.time_tree.search(t) {
            return Ok(p);
        }
        let prior = self.time_tree.state_at(t).expect("P0 guarantees state_at is never empty within the window");
        let scheduled = self.arena[prior].scheduled;
        let remaining = self.arena[prior].remaining;

        let id = self.arena.insert(ScheduledPoint::new(t, scheduled, remaining, 0));
        self.time_tree.insert(t, id)?;
        self.capacity_tree.insert(&mut self.arena, id);
        Ok(id)
    }

    /// All points `p` with `start <= p.at < start + dur`, in ascending
    /// time order. Used by both `add_span` and `remove_span` to find the
    /// set of points whose accounting needs updating.
    fn overlap_points(&self, start: i64, dur: i64) -> Vec<PointId> {
        let mut out = Vec::new();
        let mut cur = self.time_tree.search(start);
        if cur.is_none() {
            cur = self.time_tree.state_at(start);
        }
        let mut cur = cur;
        while let Some(p) = cur {
            let at = self.arena[p].at;
            if at < start {
                cur = self.time_tree.next_at(at);
                continue;
            }
            if at >= start + dur {
                break;
            }
            out.push(p);
            cur = self.time_tree.next_at(at);
        }
        out
    }

    pub fn add_span(&mut self, start: i64, dur: i64, request: i64) -> Result<i64> {
        self.check_duration(dur)?;
        self.check_window(start)?;
        self.check_window(start + dur)?;
        self.check_request(request)?;
        if request == 0 {
            return Err(PlannerError::InvalidArgument("span resource count must be positive".into()));
        }

        if !self.available_during(start, dur, request)? {
            return Err(PlannerError::InvalidArgument(format!(
                "request {request} does not fit in [{start}, {})",
                start + dur
            )));
        }

        self.restore_saved_points();
        self.current_request = None;

        let span_id = self.spans.reserve_id();
        let start_p = self.get_or_create_point(start)?;
        let end_p = self.get_or_create_point(start + dur)?;
        self.arena[start_p].ref_count += 1;
        self.arena[end_p].ref_count += 1;

        let touched = self.overlap_points(start, dur);

        // Validate every touched point's post-update invariant before
        // mutating or detaching any of them: every point in `touched` takes
        // the same `+= request` delta, so the whole batch can be checked up
        // front and the update applied only if it is valid everywhere. This
        // keeps the capacity tree and point fields untouched on failure,
        // rather than unwinding a partially-applied update.
        for p in &touched {
            let point = &self.arena[*p];
            let new_scheduled = point.scheduled + request;
            let new_remaining = point.remaining - request;
            if new_scheduled < 0 || new_scheduled > self.total || new_remaining != self.total - new_scheduled {
                return Err(PlannerError::InternalInvariantViolated(format!(
                    "point at {} would violate scheduled/remaining invariant after add_span",
                    point.at
                )));
            }
        }

        for p in &touched {
            self.capacity_tree.remove(&mut self.arena, *p);
        }
        for p in &touched {
            let point = &mut self.arena[*p];
            point.scheduled += request;
            point.remaining -= request;
        }
        for p in &touched {
            self.capacity_tree.insert(&mut self.arena, *p);
        }

        self.spans.insert(Span { span_id, start, duration: dur, resource_count: request, start_point: start_p, end_point: end_p });

        Ok(span_id)
    }

    pub fn remove_span(&mut self, span_id: i64) -> Result<()> {
        let span = self.spans.get(span_id).cloned().ok_or_else(|| PlannerError::InvalidArgument(format!("unknown span id {span_id}")))?;

        self.restore_saved_points();
        self.current_request = None;

        let touched = self.overlap_points(span.start, span.duration);

        // Same discipline as `add_span`: validate the whole batch (every
        // point in `touched` takes the same `-= span.resource_count` delta)
        // before detaching or mutating any of them.
        for p in &touched {
            let point = &self.arena[*p];
            let new_scheduled = point.scheduled - span.resource_count;
            let new_remaining = point.remaining + span.resource_count;
            if new_scheduled < 0 || new_scheduled > self.total || new_remaining != self.total - new_scheduled {
                return Err(PlannerError::InternalInvariantViolated(format!(
                    "point at {} would violate scheduled/remaining invariant after remove_span",
                    point.at
                )));
            }
        }

        for p in &touched {
            self.capacity_tree.remove(&mut self.arena, *p);
        }
        for p in &touched {
            let point = &mut self.arena[*p];
            point.scheduled -= span.resource_count;
            point.remaining += span.resource_count;
        }
        for p in &touched {
            self.capacity_tree.insert(&mut self.arena, *p);
        }

        self.arena[span.start_point].ref_count -= 1;
        self.arena[span.end_point].ref_count -= 1;
        self.release_point_ref(span.start_point)?;
        self.release_point_ref(span.end_point)?;

        self.spans.remove(span_id);
        Ok(())
    }

    /// If `p` (not `P0`) now has zero refs, remove it from both trees and
    /// drop it from the arena.
    fn release_point_ref(&mut self, p: PointId) -> Result<()> {
        if p == self.p0 {
            return Ok(());
        }
        if self.arena[p].ref_count == 0 {
            self.time_tree.remove(self.arena[p].at);
            if self.arena[p].in_capacity_tree {
                self.capacity_tree.remove(&mut self.arena, p);
            }
            self.saved_points.retain(|id| *id != p);
            self.arena.remove(p);
        }
        Ok(())
    }

    // ---- Span table accessors (spec.md §4.6) -------------------------

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    pub fn spans(&self) -> impl Iterator<Item = i64> + '_ {
        self.spans.iter().map(|s| s.span_id)
    }

    pub fn is_active_span(&self, span_id: i64) -> bool {
        self.spans.contains(span_id)
    }

    pub fn span_start_time(&self, span_id: i64) -> Result<i64> {
        self.spans.get(span_id).map(|s| s.start).ok_or_else(|| PlannerError::InvalidArgument(format!("unknown span id {span_id}")))
    }

    pub fn span_duration(&self, span_id: i64) -> Result<i64> {
        self.spans.get(span_id).map(|s| s.duration).ok_or_else(|| PlannerError::InvalidArgument(format!("unknown span id {span_id}")))
    }

    pub fn span_resource_count(&self, span_id: i64) -> Result<i64> {
        self.spans.get(span_id).map(|s| s.resource_count).ok_or_else(|| PlannerError::InvalidArgument(format!("unknown span id {span_id}")))
    }

    /// Checks the capacity tree's `subtree_min` augmentation invariant
    /// (spec.md §8: `subtree_min == min(n.at, subtree_min(children))` for
    /// every node) across the whole tree. A validation helper for tests,
    /// not part of the collaborator-facing API surface proper.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        self.capacity_tree.check_invariants(&self.arena)
    }
}
