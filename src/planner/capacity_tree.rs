use crate::planner::point::{Color, PointArena, PointId};

/// Capacity-keyed augmented red-black tree.
///
/// Nodes order primarily by `remaining`, tie-broken by `at` so that the
/// order is total and the tree shape is deterministic (Open Question in
/// `spec.md` §9, resolved in SPEC_FULL §9). Every node additionally carries
/// `subtree_min`, the minimum `at` over its subtree, which is what makes
/// `mintime` an O(log n) query instead of a linear scan.
///
/// Grounded on `mintime_resource_tree.cpp`: the rotation/insertion/deletion
/// hooks there (`leaf_inserted`, `rotated_left`, `rotated_right`,
/// `deleted_below`) exist to keep `subtree_min` correct after every
/// structural change. Rather than mirror each hook individually, this
/// implementation performs the structural change first (pure BST/red-black
/// mechanics, no augmentation) and then repairs `subtree_min` in a single
/// bottom-up pass from the node where the change originated up to the root
/// — every node touched by a rotation during that pass is, by construction
/// of red-black fixup, an ancestor of that starting node, so the single
/// pass is sufficient and stays O(log n).
#[derive(Debug, Default)]
pub(crate) struct CapacityTree {
    root: Option<PointId>,
}

fn key(arena: &PointArena, id: PointId) -> (i64, i64) {
    (arena[id].remaining, arena[id].at)
}

fn less(arena: &PointArena, a: PointId, b: PointId) -> bool {
    key(arena, a) < key(arena, b)
}

fn parent(arena: &PointArena, id: PointId) -> Option<PointId> {
    arena[id].cap_node.parent
}

fn left(arena: &PointArena, id: PointId) -> Option<PointId> {
    arena[id].cap_node.left
}

fn right(arena: &PointArena, id: PointId) -> Option<PointId> {
    arena[id].cap_node.right
}

fn color_of(arena: &PointArena, id: Option<PointId>) -> Color {
    match id {
        Some(id) => arena[id].cap_node.color,
        None => Color::Black,
    }
}

fn set_parent(arena: &mut PointArena, id: PointId, p: Option<PointId>) {
    arena[id].cap_node.parent = p;
}

fn set_left(arena: &mut PointArena, id: PointId, l: Option<PointId>) {
    arena[id].cap_node.left = l;
}

fn set_right(arena: &mut PointArena, id: PointId, r: Option<PointId>) {
    arena[id].cap_node.right = r;
}

fn set_color(arena: &mut PointArena, id: PointId, c: Color) {
    arena[id].cap_node.color = c;
}

fn subtree_min_of(arena: &PointArena, id: Option<PointId>) -> i64 {
    match id {
        Some(id) => arena[id].cap_node.subtree_min,
        None => i64::MAX,
    }
}

/// Recompute `id`'s `subtree_min` from its own `at` and its children's.
fn fix(arena: &mut PointArena, id: PointId) {
    let at = arena[id].at;
    let l = subtree_min_of(arena, left(arena, id));
    let r = subtree_min_of(arena, right(arena, id));
    arena[id].cap_node.subtree_min = at.min(l).min(r);
}

/// Walk from `start` to the root, recomputing `subtree_min` along the way.
/// Called once after the structural part of insert/delete (including any
/// rotations) has completed.
fn refresh_from(arena: &mut PointArena, start: Option<PointId>) {
    let mut cur = start;
    while let Some(id) = cur {
        fix(arena, id);
        cur = parent(arena, id);
    }
}

impl CapacityTree {
    pub fn new() -> Self {
        CapacityTree { root: None }
    }

    fn left_rotate(&mut self, arena: &mut PointArena, x: PointId) {
        let y = right(arena, x).expect("left_rotate requires a right child");
        set_right(arena, x, left(arena, y));
        if let Some(yl) = left(arena, y) {
            set_parent(arena, yl, Some(x));
        }
        set_parent(arena, y, parent(arena, x));
        match parent(arena, x) {
            None => self.root = Some(y),
            Some(px) => {
                if left(arena, px) == Some(x) {
                    set_left(arena, px, Some(y));
                } else {
                    set_right(arena, px, Some(y));
                }
            }
        }
        set_left(arena, y, Some(x));
        set_parent(arena, x, Some(y));
    }

    fn right_rotate(&mut self, arena: &mut PointArena, x: PointId) {
        let y = left(arena, x).expect("right_rotate requires a left child");
        set_left(arena, x, right(arena, y));
        if let Some(yr) = right(arena, y) {
            set_parent(arena, yr, Some(x));
        }
        set_parent(arena, y, parent(arena, x));
        match parent(arena, x) {
            None => self.root = Some(y),
            Some(px) => {
                if left(arena, px) == Some(x) {
                    set_left(arena, px, Some(y));
                } else {
                    set_right(arena, px, Some(y));
                }
            }
        }
        set_right(arena, y, Some(x));
        set_parent(arena, x, Some(y));
    }

    /// Sets `p.subtree_min = p.at`, attaches, and repairs augmentation. Sets
    /// `p.in_capacity_tree = true`.
    pub fn insert(&mut self, arena: &mut PointArena, z: PointId) {
        let mut y = None;
        let mut x = self.root;
        while let Some(xi) = x {
            y = Some(xi);
            x = if less(arena, z, xi) { left(arena, xi) } else { right(arena, xi) };
        }
        set_parent(arena, z, y);
        match y {
            None => self.root = Some(z),
            Some(yi) => {
                if less(arena, z, yi) {
                    set_left(arena, yi, Some(z));
                } else {
                    set_right(arena, yi, Some(z));
                }
            }
        }
        set_left(arena, z, None);
        set_right(arena, z, None);
        set_color(arena, z, Color::Red);
        arena[z].cap_node.subtree_min = arena[z].at;

        self.insert_fixup(arena, z);
        refresh_from(arena, Some(z));
        arena[z].in_capacity_tree = true;
    }

    fn insert_fixup(&mut self, arena: &mut PointArena, mut z: PointId) {
        while color_of(arena, parent(arena, z)) == Color::Red {
            let zp = parent(arena, z).expect("red node always has a parent");
            let zgp = parent(arena, zp).expect("red parent implies a grandparent (root is black)");
            if Some(zp) == left(arena, zgp) {
                let y = right(arena, zgp);
                if color_of(arena, y) == Color::Red {
                    set_color(arena, zp, Color::Black);
                    set_color(arena, y.unwrap(), Color::Black);
                    set_color(arena, zgp, Color::Red);
                    z = zgp;
                } else {
                    if Some(z) == right(arena, zp) {
                        z = zp;
                        self.left_rotate(arena, z);
                    }
                    let zp2 = parent(arena, z).unwrap();
                    let zgp2 = parent(arena, zp2).unwrap();
                    set_color(arena, zp2, Color::Black);
                    set_color(arena, zgp2, Color::Red);
                    self.right_rotate(arena, zgp2);
                }
            } else {
                let y = left(arena, zgp);
                if color_of(arena, y) == Color::Red {
                    set_color(arena, zp, Color::Black);
                    set_color(arena, y.unwrap(), Color::Black);
                    set_color(arena, zgp, Color::Red);
                    z = zgp;
                } else {
                    if Some(z) == left(arena, zp) {
                        z = zp;
                        self.right_rotate(arena, z);
                    }
                    let zp2 = parent(arena, z).unwrap();
                    let zgp2 = parent(arena, zp2).unwrap();
                    set_color(arena, zp2, Color::Black);
                    set_color(arena, zgp2, Color::Red);
                    self.left_rotate(arena, zgp2);
                }
            }
        }
        if let Some(r) = self.root {
            set_color(arena, r, Color::Black);
        }
    }

    fn transplant(&mut self, arena: &mut PointArena, u: PointId, v: Option<PointId>) {
        match parent(arena, u) {
            None => self.root = v,
            Some(pu) => {
                if left(arena, pu) == Some(u) {
                    set_left(arena, pu, v);
                } else {
                    set_right(arena, pu, v);
                }
            }
        }
        if let Some(vi) = v {
            set_parent(arena, vi, parent(arena, u));
        }
    }

    fn minimum(arena: &PointArena, mut x: PointId) -> PointId {
        while let Some(l) = left(arena, x) {
            x = l;
        }
        x
    }

    /// Detaches `z`; augmentation is repaired for the affected neighborhood.
    /// Clears `in_capacity_tree`.
    pub fn remove(&mut self, arena: &mut PointArena, z: PointId) {
        let mut y = z;
        let mut y_original_color = color_of(arena, Some(y));
        let x: Option<PointId>;
        let x_parent: Option<PointId>;

        if left(arena, z).is_none() {
            x = right(arena, z);
            x_parent = parent(arena, z);
            self.transplant(arena, z, x);
        } else if right(arena, z).is_none() {
            x = left(arena, z);
            x_parent = parent(arena, z);
            self.transplant(arena, z, x);
        } else {
            y = Self::minimum(arena, right(arena, z).unwrap());
            y_original_color = color_of(arena, Some(y));
            let x_of_y = right(arena, y);
            if parent(arena, y) == Some(z) {
                x_parent = Some(y);
                if let Some(xi) = x_of_y {
                    set_parent(arena, xi, Some(y));
                }
            } else {
                x_parent = parent(arena, y);
                self.transplant(arena, y, right(arena, y));
                set_right(arena, y, right(arena, z));
                if let Some(ry) = right(arena, y) {
                    set_parent(arena, ry, Some(y));
                }
            }
            self.transplant(arena, z, Some(y));
            set_left(arena, y, left(arena, z));
            if let Some(ly) = left(arena, y) {
                set_parent(arena, ly, Some(y));
            }
            set_color(arena, y, color_of(arena, Some(z)));
            x = x_of_y;
        }

        if y_original_color == Color::Black {
            self.delete_fixup(arena, x, x_parent);
        }

        refresh_from(arena, x.or(x_parent));

        arena[z].in_capacity_tree = false;
        arena[z].cap_node.parent = None;
        arena[z].cap_node.left = None;
        arena[z].cap_node.right = None;
    }

    fn delete_fixup(&mut self, arena: &mut PointArena, mut x: Option<PointId>, mut x_parent: Option<PointId>) {
        while x != self.root && color_of(arena, x) == Color::Black {
            let xp = match x_parent {
                Some(p) => p,
                None => break,
            };
            if x == left(arena, xp) {
                let mut w = right(arena, xp).expect("sibling must exist: black-height invariant");
                if color_of(arena, Some(w)) == Color::Red {
                    set_color(arena, w, Color::Black);
                    set_color(arena, xp, Color::Red);
                    self.left_rotate(arena, xp);
                    w = right(arena, xp).unwrap();
                }
                if color_of(arena, left(arena, w)) == Color::Black && color_of(arena, right(arena, w)) == Color::Black {
                    set_color(arena, w, Color::Red);
                    x = Some(xp);
                    x_parent = parent(arena, xp);
                } else {
                    if color_of(arena, right(arena, w)) == Color::Black {
                        if let Some(wl) = left(arena, w) {
                            set_color(arena, wl, Color::Black);
                        }
                        set_color(arena, w, Color::Red);
                        self.right_rotate(arena, w);
                        w = right(arena, xp).unwrap();
                    }
                    set_color(arena, w, color_of(arena, Some(xp)));
                    set_color(arena, xp, Color::Black);
                    if let Some(wr) = right(arena, w) {
                        set_color(arena, wr, Color::Black);
                    }
                    self.left_rotate(arena, xp);
                    x = self.root;
                    x_parent = None;
                }
            } else {
                let mut w = left(arena, xp).expect("sibling must exist: black-height invariant");
                if color_of(arena, Some(w)) == Color::Red {
                    set_color(arena, w, Color::Black);
                    set_color(arena, xp, Color::Red);
                    self.right_rotate(arena, xp);
                    w = left(arena, xp).unwrap();
                }
                if color_of(arena, right(arena, w)) == Color::Black && color_of(arena, left(arena, w)) == Color::Black {
                    set_color(arena, w, Color::Red);
                    x = Some(xp);
                    x_parent = parent(arena, xp);
                } else {
                    if color_of(arena, left(arena, w)) == Color::Black {
                        if let Some(wr) = right(arena, w) {
                            set_color(arena, wr, Color::Black);
                        }
                        set_color(arena, w, Color::Red);
                        self.left_rotate(arena, w);
                        w = left(arena, xp).unwrap();
                    }
                    set_color(arena, w, color_of(arena, Some(xp)));
                    set_color(arena, xp, Color::Black);
                    if let Some(wl) = left(arena, w) {
                        set_color(arena, wl, Color::Black);
                    }
                    self.right_rotate(arena, xp);
                    x = self.root;
                    x_parent = None;
                }
            }
        }
        if let Some(xi) = x {
            set_color(arena, xi, Color::Black);
        }
    }

    fn right_branch_mintime(arena: &PointArena, n: PointId) -> i64 {
        let rm = subtree_min_of(arena, right(arena, n));
        arena[n].at.min(rm)
    }

    /// Two-pass search for the point with the smallest `at` among those
    /// with `remaining >= request`. See `spec.md` §4.2 for the derivation;
    /// this is a direct translation of `find_mintime_anchor` +
    /// `find_mintime_point` in `mintime_resource_tree.cpp`.
    pub fn mintime(&self, arena: &PointArena, request: i64) -> Option<PointId> {
        let mut node = self.root;
        let mut anchor: Option<PointId> = None;
        let mut min_time = i64::MAX;

        while let Some(n) = node {
            if request <= arena[n].remaining {
                let candidate = Self::right_branch_mintime(arena, n);
                if candidate < min_time {
                    min_time = candidate;
                    anchor = Some(n);
                }
                node = left(arena, n);
            } else {
                node = right(arena, n);
            }
        }

        let anchor = anchor?;
        Self::find_mintime_point(arena, anchor, min_time)
    }

    fn find_mintime_point(arena: &PointArena, anchor: PointId, min_time: i64) -> Option<PointId> {
        if arena[anchor].at == min_time {
            return Some(anchor);
        }
        let mut node = right(arena, anchor);
        while let Some(n) = node {
            if arena[n].at == min_time {
                return Some(n);
            }
            match left(arena, n) {
                Some(l) if arena[l].cap_node.subtree_min == min_time => node = Some(l),
                _ => node = right(arena, n),
            }
        }
        None
    }

    /// Walks the whole tree checking that every node's `subtree_min` equals
    /// the minimum `at` over its own key and both children (spec.md §8's
    /// universal augmentation property), and that no red node has a red
    /// child. Exposed crate-wide (via `Planner::check_invariants`) so tests
    /// outside this module can assert it after a mutation, not just tests
    /// compiled into this file.
    pub(crate) fn check_invariants(&self, arena: &PointArena) -> Result<(), String> {
        fn walk(arena: &PointArena, id: Option<PointId>) -> Result<i64, String> {
            let Some(id) = id else { return Ok(i64::MAX) };
            let l = walk(arena, left(arena, id))?;
            let r = walk(arena, right(arena, id))?;
            let expected = arena[id].at.min(l).min(r);
            if arena[id].cap_node.subtree_min != expected {
                return Err(format!(
                    "node at {} has subtree_min {} but expected {}",
                    arena[id].at, arena[id].cap_node.subtree_min, expected
                ));
            }
            if color_of(arena, Some(id)) == Color::Red {
                if color_of(arena, left(arena, id)) == Color::Red || color_of(arena, right(arena, id)) == Color::Red {
                    return Err(format!("red node at {} has a red child", arena[id].at));
                }
            }
            Ok(arena[id].cap_node.subtree_min)
        }
        walk(arena, self.root).map(|_| ())
    }
}
