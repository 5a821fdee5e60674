use crate::planner::Planner;
use crate::queue_policy::base::{QueuePolicy, QueuePolicyBase, Schedule};

/// FCFS augmented with conservative backfill: once the head-of-line job is
/// found infeasible to start immediately, later (smaller or shorter) jobs
/// may still run out of arrival order, provided doing so does not delay the
/// head job's own earliest feasible start.
///
/// Grounded on `queue_policy_hybrid_impl.hpp`'s `queue_policy_hybrid_t`,
/// layered over the base FCFS discipline in `queue_policy_fcfs_impl.hpp`
/// (whose `m_reservation_depth` parameter becomes `reservation_depth`
/// below). The reservation-depth concept bounds how many jobs the backfill
/// pass is willing to look past the head; this crate defaults it small,
/// matching `HYBRID_RESERVATION_DEPTH` in the source.
#[derive(Debug)]
pub struct BackfillHybridQueuePolicy {
    base: QueuePolicyBase,
    reservation_depth: usize,
}

impl Default for BackfillHybridQueuePolicy {
    fn default() -> Self {
        BackfillHybridQueuePolicy::new()
    }
}

impl BackfillHybridQueuePolicy {
    pub fn new() -> Self {
        BackfillHybridQueuePolicy { base: QueuePolicyBase::new(), reservation_depth: 4 }
    }

    pub fn with_reservation_depth(reservation_depth: usize) -> Self {
        BackfillHybridQueuePolicy { base: QueuePolicyBase::new(), reservation_depth }
    }
}

impl QueuePolicy for BackfillHybridQueuePolicy {
    fn base(&self) -> &QueuePolicyBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QueuePolicyBase {
        &mut self.base
    }

    fn schedule_one_pass(&mut self, planner: &mut Planner) -> Vec<i64> {
        let mut admitted = Vec::new();
        let pending_ids: Vec<i64> = self.base.pending_iter().map(|j| j.id).collect();
        if pending_ids.is_empty() {
            return admitted;
        }

        let head_id = pending_ids[0];
        let head = self.base.job(head_id).expect("head_id came from pending_iter").clone();

        match planner.available_during(head.requested_start, head.duration, head.resource_count) {
            Ok(true) => {
                if let Ok(span_id) = planner.add_span(head.requested_start, head.duration, head.resource_count) {
                    if let Some(j) = self.base.job_mut(head_id) {
                        j.schedule = Schedule { span_id: Some(span_id), reserved: false, at: head.requested_start };
                    }
                    self.base.to_running(head_id);
                    admitted.push(head_id);
                    return admitted;
                }
            }
            Ok(false) => {
                // Head doesn't fit now. Find its earliest feasible start so
                // backfill candidates can be checked against it, then try
                // later jobs out of order provided they fit strictly before
                // that time.
                let head_earliest = planner.avail_time_first(head.requested_start, head.duration, head.resource_count).ok();

                for &id in pending_ids.iter().skip(1).take(self.reservation_depth) {
                    let job = self.base.job(id).expect("id came from pending_iter").clone();

                    let fits_now = planner.available_during(job.requested_start, job.duration, job.resource_count).unwrap_or(false);
                    if !fits_now {
                        continue;
                    }

                    let backfill_safe = match head_earliest {
                        None => true,
                        Some(head_time) => job.requested_start + job.duration <= head_time,
                    };
                    if !backfill_safe {
                        continue;
                    }

                    if let Ok(span_id) = planner.add_span(job.requested_start, job.duration, job.resource_count) {
                        if let Some(j) = self.base.job_mut(id) {
                            j.schedule = Schedule { span_id: Some(span_id), reserved: false, at: job.requested_start };
                        }
                        self.base.to_running(id);
                        admitted.push(id);
                    }
                }
            }
            Err(_) => {
                self.base.to_rejected(head_id);
            }
        }

        admitted
    }
}
