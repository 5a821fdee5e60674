use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use queue_planner::planner::Planner;

/// Adds and then removes a batch of randomly placed, non-overlapping-by-luck
/// spans, and checks the universal round-trip property from spec.md §8:
/// remove_span after add_span restores every point's accounting exactly.
#[test]
fn random_add_remove_sequences_restore_prior_state() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let total = 20;
    let mut planner = Planner::new(0, 1000, total, "core").unwrap();

    let baseline: Vec<i64> = (0..1000).step_by(50).map(|t| planner.resources_at(t).unwrap()).collect();

    let mut committed = Vec::new();
    for _ in 0..30 {
        let start = rng.random_range(0..900);
        let dur = rng.random_range(1..100);
        let request = rng.random_range(1..=total);
        if planner.available_during(start, dur, request).unwrap_or(false) {
            let id = planner.add_span(start, dur, request).unwrap();
            committed.push(id);
            planner.check_invariants().unwrap();
        }
    }

    for id in committed.into_iter().rev() {
        planner.remove_span(id).unwrap();
        planner.check_invariants().unwrap();
    }

    let restored: Vec<i64> = (0..1000).step_by(50).map(|t| planner.resources_at(t).unwrap()).collect();
    assert_eq!(baseline, restored);
    assert_eq!(planner.span_count(), 0);
}

#[test]
fn resources_at_never_exceeds_total_or_drops_below_zero() {
    let mut rng = StdRng::seed_from_u64(42);
    let total = 8;
    let mut planner = Planner::new(0, 200, total, "core").unwrap();

    for _ in 0..50 {
        let start = rng.random_range(0..190);
        let dur = rng.random_range(1..20);
        let request = rng.random_range(1..=total);
        if planner.add_span(start, dur, request).is_ok() {
            planner.check_invariants().unwrap();
        }
    }

    for t in (0..200).step_by(5) {
        let r = planner.resources_at(t).unwrap();
        assert!((0..=total).contains(&r), "resources_at({t}) == {r} out of bounds");
    }
}
