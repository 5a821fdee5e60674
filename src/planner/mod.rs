//! The reservation planner: an augmented balanced-tree data structure that
//! answers capacity and earliest-fit queries over a shared resource pool in
//! O(log n), and supports add/remove of time-bounded reservations.

mod capacity_tree;
mod facade;
mod point;
mod span;
mod time_tree;

pub use facade::Planner;
pub use point::PointId;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    #[test]
    fn scenario_1_empty_capacity() {
        let mut p = Planner::new(0, 1000, 10, "core").unwrap();
        assert_eq!(p.resources_at(0).unwrap(), 10);
        assert!(p.available_during(0, 1000, 10).unwrap());
        assert_eq!(p.avail_time_first(0, 500, 10).unwrap(), 0);
    }

    #[test]
    fn scenario_2_single_span() {
        let mut p = Planner::new(0, 1000, 10, "core").unwrap();
        let _id1 = p.add_span(100, 200, 6).unwrap();

        assert_eq!(p.resources_at(50).unwrap(), 10);
        assert_eq!(p.resources_at(100).unwrap(), 4);
        assert_eq!(p.resources_at(299).unwrap(), 4);
        assert_eq!(p.resources_at(300).unwrap(), 10);
        assert!(!p.available_during(100, 200, 5).unwrap());
        assert_eq!(p.avail_time_first(0, 200, 7).unwrap(), 300);
    }

    #[test]
    fn scenario_3_overlap_arithmetic() {
        let mut p = Planner::new(0, 1000, 10, "core").unwrap();
        let _id1 = p.add_span(100, 200, 6).unwrap();
        let _id2 = p.add_span(200, 200, 3).unwrap();

        assert_eq!(p.resources_at(200).unwrap(), 1);
        assert_eq!(p.resources_at(299).unwrap(), 1);
        assert_eq!(p.resources_at(300).unwrap(), 7);
        assert_eq!(p.resources_at(399).unwrap(), 7);
        assert_eq!(p.resources_at(400).unwrap(), 10);
        p.check_invariants().unwrap();
    }

    #[test]
    fn scenario_4_remove_restores() {
        let mut p = Planner::new(0, 1000, 10, "core").unwrap();
        let _id1 = p.add_span(100, 200, 6).unwrap();
        let id2 = p.add_span(200, 200, 3).unwrap();

        p.remove_span(id2).unwrap();

        assert_eq!(p.resources_at(200).unwrap(), 4);
        assert_eq!(p.resources_at(50).unwrap(), 10);
        assert_eq!(p.resources_at(100).unwrap(), 4);
        assert_eq!(p.resources_at(299).unwrap(), 4);
        assert_eq!(p.resources_at(300).unwrap(), 10);
        p.check_invariants().unwrap();
    }

    #[test]
    fn scenario_5_earliest_fit_iteration() {
        let mut p = Planner::new(0, 40, 4, "core").unwrap();
        p.add_span(0, 4, 1).unwrap();
        p.add_span(4, 4, 1).unwrap();
        p.add_span(8, 4, 1).unwrap();

        let first = p.avail_time_first(0, 3, 4).unwrap();
        assert_eq!(first, 12);

        let second = p.avail_time_next().unwrap();
        assert!(second > first);
    }

    #[test]
    fn scenario_6_capacity_overflow_rejected() {
        let mut p = Planner::new(0, 100, 5, "core").unwrap();
        let before = p.resources_at(0).unwrap();
        let err = p.add_span(0, 10, 6).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidArgument(_)));
        assert_eq!(p.resources_at(0).unwrap(), before);
        assert_eq!(p.span_count(), 0);
    }

    #[test]
    fn add_span_rejects_zero_request() {
        let mut p = Planner::new(0, 100, 5, "core").unwrap();
        assert!(matches!(p.add_span(0, 10, 0), Err(PlannerError::InvalidArgument(_))));
        assert_eq!(p.span_count(), 0);
    }

    #[test]
    fn duration_zero_is_invalid() {
        let mut p = Planner::new(0, 100, 5, "core").unwrap();
        assert!(matches!(p.add_span(0, 0, 1), Err(PlannerError::InvalidArgument(_))));
    }

    #[test]
    fn request_zero_is_trivially_available() {
        let mut p = Planner::new(0, 100, 5, "core").unwrap();
        assert!(p.available_during(0, 100, 0).unwrap());
        assert_eq!(p.avail_time_first(0, 10, 0).unwrap(), 0);
    }

    #[test]
    fn request_equals_total_on_empty_planner() {
        let mut p = Planner::new(0, 100, 5, "core").unwrap();
        assert_eq!(p.avail_time_first(0, 10, 5).unwrap(), 0);
    }

    #[test]
    fn whole_window_span_consumes_everything() {
        let mut p = Planner::new(0, 100, 5, "core").unwrap();
        p.add_span(0, 100, 5).unwrap();
        assert_eq!(p.resources_at(0).unwrap(), 0);
        assert_eq!(p.resources_at(99).unwrap(), 0);
        assert!(matches!(p.add_span(0, 1, 1), Err(PlannerError::InvalidArgument(_))));
    }

    #[test]
    fn add_then_remove_is_a_round_trip() {
        let mut p = Planner::new(0, 1000, 10, "core").unwrap();
        let before_at_150 = p.resources_at(150).unwrap();

        let id = p.add_span(100, 200, 6).unwrap();
        p.remove_span(id).unwrap();

        assert_eq!(p.resources_at(150).unwrap(), before_at_150);
        assert_eq!(p.span_count(), 0);
        assert!(!p.is_active_span(id));
    }

    #[test]
    fn next_without_first_is_invalid_argument() {
        let mut p = Planner::new(0, 100, 5, "core").unwrap();
        assert!(matches!(p.avail_time_next(), Err(PlannerError::InvalidArgument(_))));
    }

    #[test]
    fn reset_matches_destroy_then_new() {
        let mut p = Planner::new(0, 1000, 10, "core").unwrap();
        p.add_span(100, 200, 6).unwrap();

        p.reset(0, 500).unwrap();

        assert_eq!(p.base_time(), 0);
        assert_eq!(p.duration(), 500);
        assert_eq!(p.resource_total(), 10);
        assert_eq!(p.span_count(), 0);
        assert_eq!(p.resources_at(0).unwrap(), 10);
    }

    #[test]
    fn request_over_total_is_out_of_range() {
        let p = Planner::new(0, 100, 5, "core").unwrap();
        assert!(matches!(p.available_during(0, 10, 6), Err(PlannerError::OutOfRange(_))));
    }

    #[test]
    fn time_beyond_plan_end_is_out_of_range() {
        let p = Planner::new(0, 100, 5, "core").unwrap();
        assert!(matches!(p.resources_at(101), Err(PlannerError::OutOfRange(_))));
    }

    #[test]
    fn resources_during_takes_the_minimum_over_the_interval() {
        let mut p = Planner::new(0, 1000, 10, "core").unwrap();
        p.add_span(100, 200, 6).unwrap();
        p.add_span(200, 50, 3).unwrap();

        assert_eq!(p.resources_during(50, 300).unwrap(), 1);
    }
}
