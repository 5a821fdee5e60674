use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::{PlannerError, Result};
use crate::planner::point::PointId;

/// Ordered index of points by their unique `at` timestamp.
///
/// Grounded on `scheduled_point_tree.c`'s red-black tree
/// (`scheduled_point_search`/`scheduled_point_state`/`next`/`prev`): here a
/// `BTreeMap` plays the role of the balanced search tree, since `at` needs
/// no augmentation beyond ordering — only the capacity tree needs a bespoke
/// structure.
#[derive(Debug, Default)]
pub(crate) struct TimeTree {
    by_at: BTreeMap<i64, PointId>,
}

impl TimeTree {
    pub fn new() -> Self {
        TimeTree { by_at: BTreeMap::new() }
    }

    /// Exact match.
    pub fn search(&self, at: i64) -> Option<PointId> {
        self.by_at.get(&at).copied()
    }

    /// Predecessor search: the point with the greatest `at <= t`.
    pub fn state_at(&self, at: i64) -> Option<PointId> {
        self.by_at.range(..=at).next_back().map(|(_, id)| *id)
    }

    /// The point with the smallest `at > at`.
    pub fn next_at(&self, at: i64) -> Option<PointId> {
        self.by_at.range((Bound::Excluded(at), Bound::Unbounded)).next().map(|(_, id)| *id)
    }

    /// The point with the greatest `at < at`.
    pub fn prev_at(&self, at: i64) -> Option<PointId> {
        self.by_at.range(..at).next_back().map(|(_, id)| *id)
    }

    /// Fails if a point at `at` already exists.
    pub fn insert(&mut self, at: i64, id: PointId) -> Result<()> {
        if self.by_at.contains_key(&at) {
            return Err(PlannerError::InternalInvariantViolated(format!("duplicate scheduled point at {at}")));
        }
        self.by_at.insert(at, id);
        Ok(())
    }

    /// Detaches the node at `at`. Does not free the point; ownership stays
    /// with the arena.
    pub fn remove(&mut self, at: i64) -> Option<PointId> {
        self.by_at.remove(&at)
    }

    pub fn len(&self) -> usize {
        self.by_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_at.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.by_at.values().copied()
    }
}
