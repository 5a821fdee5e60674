use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Opaque handle into the planner's point arena.
    ///
    /// Stands in for the source's raw `scheduled_point_t *`: the planner is
    /// the sole owner of every point, and every tree only ever stores a
    /// `PointId`, never a reference. Teardown is a single arena clear.
    pub struct PointId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Intrusive linkage for the capacity-keyed augmented tree, embedded in
/// each point the way `mt_resource_rb_node_t` was embedded in
/// `scheduled_point_t` in the source — except every link is an index into
/// the arena rather than a pointer.
#[derive(Debug, Clone)]
pub(crate) struct CapNode {
    pub parent: Option<PointId>,
    pub left: Option<PointId>,
    pub right: Option<PointId>,
    pub color: Color,
    /// Minimum `at` over the subtree rooted at this node.
    pub subtree_min: i64,
}

/// A time at which the resource accounting state changes.
///
/// Invariants (checked by the planner facade, not enforced by the type
/// itself): `0 <= scheduled <= total`, `remaining == total - scheduled`.
#[derive(Debug, Clone)]
pub struct ScheduledPoint {
    pub at: i64,
    pub scheduled: i64,
    pub remaining: i64,
    pub ref_count: u32,
    pub in_capacity_tree: bool,
    pub(crate) cap_node: CapNode,
}

impl ScheduledPoint {
    pub(crate) fn new(at: i64, scheduled: i64, remaining: i64, ref_count: u32) -> Self {
        ScheduledPoint {
            at,
            scheduled,
            remaining,
            ref_count,
            in_capacity_tree: false,
            cap_node: CapNode { parent: None, left: None, right: None, color: Color::Red, subtree_min: at },
        }
    }
}

pub(crate) type PointArena = SlotMap<PointId, ScheduledPoint>;
