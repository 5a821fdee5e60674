use thiserror::Error;

use crate::error::PlannerError;
use crate::planner::Planner;
use crate::queue_policy::{Job, QueuePolicy};

/// Errors surfaced by the broker to its caller.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("unknown job id {0}")]
    UnknownJob(i64),

    #[error("failed to free span: {0}")]
    PlannerError(#[from] PlannerError),
}

/// In-process stand-in for the message-bus glue in `qmanager.cpp`
/// (`jobmanager_alloc_cb`/`jobmanager_free_cb`), which receive alloc/free
/// requests from job-manager over Flux RPCs, hand them to a queue policy,
/// and relay results back. This crate has no message bus (`spec.md` §1's
/// Non-goals exclude the service-module glue as algorithmically
/// uninteresting); `Broker::submit`/`complete` are the in-process
/// equivalent of those two callbacks, and `run_sched_loop` is the
/// equivalent of `enforce_queue_policy`'s scheduling loop invocation.
pub struct Broker<P: QueuePolicy> {
    policy: P,
    next_job_id: i64,
}

impl<P: QueuePolicy> Broker<P> {
    pub fn new(policy: P) -> Self {
        Broker { policy, next_job_id: 1 }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Mirrors `jobmanager_alloc_cb`: enqueues a job for later scheduling
    /// and returns the id the caller should use to track it. Does not
    /// itself run the scheduling loop — callers drive that via
    /// `run_sched_loop`, mirroring the decoupling between job submission
    /// and `enforce_queue_policy`'s loop invocation in the source.
    pub fn submit(&mut self, requested_start: i64, duration: i64, resource_count: i64) -> i64 {
        let id = self.next_job_id;
        self.next_job_id += 1;
        self.policy.insert(Job::new(id, requested_start, duration, resource_count));
        id
    }

    /// Mirrors `jobmanager_free_cb`: a job has finished running and its
    /// resources should be released back to the planner.
    pub fn complete(&mut self, job_id: i64, planner: &mut Planner) -> Result<(), BrokerError> {
        let job = self.policy.remove(job_id).ok_or(BrokerError::UnknownJob(job_id))?;
        if let Some(span_id) = job.schedule.span_id {
            planner.remove_span(span_id)?;
        }
        Ok(())
    }

    /// Mirrors `enforce_queue_policy`'s invocation of `run_sched_loop`:
    /// drives one scheduling pass over the pending queue. Returns the ids
    /// of jobs admitted this pass.
    pub fn run_sched_loop(&mut self, planner: &mut Planner) -> Vec<i64> {
        self.policy.schedule_one_pass(planner)
    }
}
