use std::collections::BTreeMap;

/// Lifecycle state of a job as it moves through a queue policy.
///
/// Grounded on `queue_policy_base.hpp`'s `job_state_kind_t`; `AllocRunning`
/// is dropped because it exists in the source only to distinguish
/// module-level "already replied to job-manager" bookkeeping that this
/// crate's service layer (`service::broker`) tracks separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Init,
    Pending,
    Running,
    Canceled,
    Complete,
    /// Rejected outright (unsatisfiable, or a parse/validation error). Not
    /// present in the source's enum, which instead pops rejected jobs
    /// straight out of the pending map; kept here as a terminal state so
    /// collaborators can observe *why* a job never ran.
    Rejected,
}

/// Where and when a job landed, once a policy has committed it to the
/// planner. Mirrors `schedule_t` (`R`, `reserved`, `at`, `ov`) with `R` (the
/// allocated resource set, opaque JSON in the source) replaced by the
/// planner's own `span_id` handle, since this crate's planner *is* the
/// resource-match backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Schedule {
    pub span_id: Option<i64>,
    pub reserved: bool,
    pub at: i64,
}

/// A unit of work submitted to a queue policy.
///
/// Grounded on `queue_policy_base.hpp`'s `job_t`. `msg`/`userid` have no
/// counterpart here (no Flux message bus); `jobspec` is reduced to the
/// three numbers the planner actually consumes.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: i64,
    pub state: JobState,
    pub priority: i32,
    pub submit_seq: u64,
    /// Earliest time the job may start; the planner is searched on or
    /// after this time.
    pub requested_start: i64,
    pub duration: i64,
    pub resource_count: i64,
    pub schedule: Schedule,
}

impl Job {
    pub fn new(id: i64, requested_start: i64, duration: i64, resource_count: i64) -> Self {
        Job { id, state: JobState::Init, priority: 0, submit_seq: 0, requested_start, duration, resource_count, schedule: Schedule::default() }
    }
}

/// Shared bookkeeping behind every queue policy: pending/running/complete
/// queues ordered by submission sequence, plus the job table itself.
///
/// Grounded on `detail::queue_policy_base_impl_t` (`m_pending`, `m_running`,
/// `m_complete`, `m_jobs`). The three `std::map<uint64_t, flux_jobid_t>`
/// queues become `BTreeMap<u64, i64>` here, preserving the same
/// submission-order iteration the source relies on for FCFS.
#[derive(Debug, Default)]
pub struct QueuePolicyBase {
    pending: BTreeMap<u64, i64>,
    running: BTreeMap<u64, i64>,
    complete: BTreeMap<u64, i64>,
    jobs: std::collections::HashMap<i64, Job>,
    next_seq: u64,
}

impl QueuePolicyBase {
    pub fn new() -> Self {
        QueuePolicyBase::default()
    }

    /// Appends `job` to the pending queue. Mirrors
    /// `queue_policy_base_impl_t::insert`.
    pub fn insert(&mut self, mut job: Job) {
        let seq = self.next_seq;
        self.next_seq += 1;
        job.submit_seq = seq;
        job.state = JobState::Pending;
        self.pending.insert(seq, job.id);
        self.jobs.insert(job.id, job);
    }

    /// Removes `id` from whichever queue currently holds it. Mirrors
    /// `queue_policy_base_impl_t::remove`.
    pub fn remove(&mut self, id: i64) -> Option<Job> {
        let job = self.jobs.remove(&id)?;
        self.pending.remove(&job.submit_seq);
        self.running.remove(&job.submit_seq);
        self.complete.remove(&job.submit_seq);
        Some(job)
    }

    pub fn job(&self, id: i64) -> Option<&Job> {
        self.jobs.get(&id)
    }

    pub fn job_mut(&mut self, id: i64) -> Option<&mut Job> {
        self.jobs.get_mut(&id)
    }

    /// Jobs in the pending queue, oldest submission first.
    pub fn pending_iter(&self) -> impl Iterator<Item = &Job> + '_ {
        self.pending.values().filter_map(move |id| self.jobs.get(id))
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Mirrors `to_running`: moves a pending job into the running queue.
    pub fn to_running(&mut self, id: i64) {
        if let Some(job) = self.jobs.get_mut(&id) {
            self.pending.remove(&job.submit_seq);
            self.running.insert(job.submit_seq, id);
            job.state = JobState::Running;
        }
    }

    /// Moves a pending job to the rejected terminal state, dropping it from
    /// every queue.
    pub fn to_rejected(&mut self, id: i64) {
        if let Some(job) = self.jobs.get_mut(&id) {
            self.pending.remove(&job.submit_seq);
            job.state = JobState::Rejected;
        }
    }

    /// Mirrors `to_complete`: moves a running job into the complete queue.
    pub fn to_complete(&mut self, id: i64) {
        if let Some(job) = self.jobs.get_mut(&id) {
            self.running.remove(&job.submit_seq);
            self.complete.insert(job.submit_seq, id);
            job.state = JobState::Complete;
        }
    }

    /// Pops the oldest completed job, the way `complete_pop` drains
    /// finished jobs for cancellation against the resource infrastructure.
    pub fn complete_pop(&mut self) -> Option<Job> {
        let (&seq, _) = self.complete.iter().next()?;
        let id = self.complete.remove(&seq)?;
        self.jobs.remove(&id)
    }
}

/// Behavior every queue policy must provide on top of [`QueuePolicyBase`].
///
/// Grounded on `queue_policy_base_t`'s pure-virtual `run_sched_loop`.
pub trait QueuePolicy {
    fn base(&self) -> &QueuePolicyBase;
    fn base_mut(&mut self) -> &mut QueuePolicyBase;

    /// Appends a job to the pending queue.
    fn insert(&mut self, job: Job) {
        self.base_mut().insert(job);
    }

    /// Removes a job from any queue it currently occupies.
    fn remove(&mut self, id: i64) -> Option<Job> {
        self.base_mut().remove(id)
    }

    /// Runs one scheduling pass: attempts to allocate as many pending jobs
    /// against `planner` as the policy's discipline allows. Returns the ids
    /// of jobs that transitioned to `Running` this pass.
    fn schedule_one_pass(&mut self, planner: &mut crate::planner::Planner) -> Vec<i64>;
}
