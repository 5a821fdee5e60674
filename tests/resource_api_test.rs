use queue_planner::planner::Planner;
use queue_planner::resource_api::{InProcessResourceApi, MatchAllocateRequest, ResourceApiClient};

#[test]
fn match_allocate_commits_a_span_at_the_earliest_feasible_time() {
    let mut planner = Planner::new(0, 100, 4, "core").unwrap();
    planner.add_span(0, 10, 4).unwrap();

    let mut api = InProcessResourceApi::new(&mut planner);
    let allocation = api
        .match_allocate(MatchAllocateRequest { job_id: 1, at: 0, duration: 5, resource_count: 4 })
        .unwrap();

    assert_eq!(allocation.at, 10);
    assert!(allocation.reserved);
}

#[test]
fn cancel_of_unknown_span_errors() {
    let mut planner = Planner::new(0, 100, 4, "core").unwrap();
    let mut api = InProcessResourceApi::new(&mut planner);
    assert!(api.cancel(999).is_err());
}

#[test]
fn cancel_frees_the_allocation() {
    let mut planner = Planner::new(0, 100, 4, "core").unwrap();
    let span_id = planner.add_span(0, 10, 4).unwrap();

    {
        let mut api = InProcessResourceApi::new(&mut planner);
        api.cancel(span_id).unwrap();
    }

    assert_eq!(planner.span_count(), 0);
    assert_eq!(planner.resources_at(5).unwrap(), 4);
}
