use queue_planner::planner::Planner;
use queue_planner::queue_policy::{BackfillHybridQueuePolicy, FcfsQueuePolicy, Job, JobState, QueuePolicy};
use queue_planner::service::Broker;

#[test]
fn fcfs_admits_jobs_in_arrival_order() {
    let mut planner = Planner::new(0, 100, 4, "core").unwrap();
    let mut broker = Broker::new(FcfsQueuePolicy::new());

    let j1 = broker.submit(0, 10, 4);
    let j2 = broker.submit(0, 10, 4);

    let admitted = broker.run_sched_loop(&mut planner);
    assert_eq!(admitted, vec![j1]);
    assert_eq!(broker.policy().job(j1).unwrap().state, JobState::Running);

    // j2 cannot start at 0 (planner is full); FCFS halts rather than
    // skipping ahead of the blocked head job.
    assert_eq!(broker.policy().job(j2).unwrap().state, JobState::Pending);
}

#[test]
fn fcfs_rejects_unsatisfiable_head_job_and_continues() {
    let mut planner = Planner::new(0, 100, 4, "core").unwrap();
    let mut broker = Broker::new(FcfsQueuePolicy::new());

    // First job asks for more than the planner will ever have: always
    // rejected outright, not just blocked.
    let doomed = broker.submit(0, 10, 100);
    let fits = broker.submit(0, 10, 4);

    let admitted = broker.run_sched_loop(&mut planner);

    assert_eq!(broker.policy().job(doomed).unwrap().state, JobState::Rejected);
    assert_eq!(admitted, vec![fits]);
}

#[test]
fn backfill_admits_a_later_smaller_job_around_a_blocked_head() {
    let mut planner = Planner::new(0, 100, 10, "core").unwrap();
    let mut broker = Broker::new(BackfillHybridQueuePolicy::new());

    // Leaves 4 units free in [0, 10); the resource goes back to 10 at t=10.
    planner.add_span(0, 10, 6).unwrap();

    let head = broker.submit(0, 10, 8); // needs 8, only 4 free until t=10
    let filler = broker.submit(2, 3, 3); // fits in the 4 free units, finishes at t=5, well before the head's earliest retry at t=10

    let admitted = broker.run_sched_loop(&mut planner);

    assert!(admitted.contains(&filler));
    assert_eq!(broker.policy().job(head).unwrap().state, JobState::Pending);
}

#[test]
fn broker_complete_frees_the_planner_span() {
    let mut planner = Planner::new(0, 100, 4, "core").unwrap();
    let mut broker = Broker::new(FcfsQueuePolicy::new());

    let job = broker.submit(0, 10, 4);
    broker.run_sched_loop(&mut planner);
    assert_eq!(planner.span_count(), 1);

    broker.complete(job, &mut planner).unwrap();
    assert_eq!(planner.span_count(), 0);
    assert_eq!(planner.resources_at(5).unwrap(), 4);
}

#[test]
fn broker_complete_on_unknown_job_errors() {
    let mut planner = Planner::new(0, 100, 4, "core").unwrap();
    let mut broker = Broker::new(FcfsQueuePolicy::new());
    assert!(broker.complete(999, &mut planner).is_err());
}

#[test]
fn insert_is_idempotent_with_respect_to_queue_membership() {
    let mut base = queue_planner::queue_policy::base::QueuePolicyBase::new();
    base.insert(Job::new(1, 0, 10, 1));
    assert_eq!(base.pending_len(), 1);
    base.to_running(1);
    assert_eq!(base.pending_len(), 0);
    base.to_complete(1);
    let completed = base.complete_pop();
    assert_eq!(completed.unwrap().id, 1);
}
