use crate::error::PlannerError;
use crate::planner::Planner;
use crate::queue_policy::base::{JobState, QueuePolicy, QueuePolicyBase, Schedule};

/// First-come-first-served queue policy: pending jobs are offered to the
/// planner strictly in arrival order, and a rejection (for any reason other
/// than "simply doesn't fit yet") halts the pass at the head of line.
///
/// Grounded on `queue_policy_fcfs_impl.hpp`'s `allocate_jobs`: the source
/// walks `m_pending` in order, calls `match_allocate`, moves a success to
/// the running queue via `to_running`, and on failure either rejects the
/// job (`errno != EBUSY`) and continues, or halts the pass outright
/// (`errno == EBUSY`). Here, `OutOfRange`/`InvalidArgument` (job genuinely
/// cannot ever fit) map to the "reject and continue" branch, while
/// `NotFound` (no feasible time exists *right now*, but might later) maps
/// to the "halt this pass" branch — the FCFS head-of-line block.
#[derive(Debug, Default)]
pub struct FcfsQueuePolicy {
    base: QueuePolicyBase,
}

impl FcfsQueuePolicy {
    pub fn new() -> Self {
        FcfsQueuePolicy { base: QueuePolicyBase::new() }
    }
}

impl QueuePolicy for FcfsQueuePolicy {
    fn base(&self) -> &QueuePolicyBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QueuePolicyBase {
        &mut self.base
    }

    fn schedule_one_pass(&mut self, planner: &mut Planner) -> Vec<i64> {
        let mut admitted = Vec::new();
        let pending_ids: Vec<i64> = self.base.pending_iter().map(|j| j.id).collect();

        for id in pending_ids {
            let job = self.base.job(id).expect("id came from pending_iter").clone();

            match planner.available_during(job.requested_start, job.duration, job.resource_count) {
                Ok(true) => match planner.add_span(job.requested_start, job.duration, job.resource_count) {
                    Ok(span_id) => {
                        if let Some(j) = self.base.job_mut(id) {
                            j.schedule = Schedule { span_id: Some(span_id), reserved: false, at: job.requested_start };
                        }
                        self.base.to_running(id);
                        admitted.push(id);
                    }
                    Err(_) => {
                        self.base.to_rejected(id);
                    }
                },
                Ok(false) => {
                    // Doesn't fit at its requested time; a later time might
                    // work, but FCFS does not look ahead past the head job.
                    break;
                }
                Err(PlannerError::OutOfRange(_)) | Err(PlannerError::InvalidArgument(_)) => {
                    self.base.to_rejected(id);
                }
                Err(_) => break,
            }
        }

        admitted
    }
}
