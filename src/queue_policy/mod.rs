//! Queue-policy layer: thin collaborators that decide *which* pending job
//! to offer the planner next and in what order, leaving all capacity
//! reasoning to [`crate::planner::Planner`].

pub mod backfill;
pub mod base;
pub mod fcfs;

pub use backfill::BackfillHybridQueuePolicy;
pub use base::{Job, JobState, QueuePolicy, Schedule};
pub use fcfs::FcfsQueuePolicy;
