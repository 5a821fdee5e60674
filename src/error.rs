use thiserror::Error;

/// Error taxonomy for the reservation planner.
///
/// Mirrors the kinds behind the original `errno` contract (`EINVAL`,
/// `ERANGE`, `ENOENT`, `ENOTSUP`) without resorting to sentinel return
/// values: every fallible planner operation returns a `Result`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// Malformed input or window: inverted times, zero duration, unknown span id.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Capacity violation: request exceeds total, or time falls outside the plan window.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// No feasible time exists for an earliest-fit query.
    #[error("no feasible time found")]
    NotFound,

    /// A tree invariant failed post-repair. Indicates a logic bug; callers
    /// should destroy and recreate the planner rather than continue.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Crate-level error, used by the ambient config/CLI surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse run configuration: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("planner error: {0}")]
    Planner(#[from] PlannerError),
}

/// Result alias for the ambient config/CLI surface, distinct from the
/// planner-core `Result<T>` above (which fixes its error type to
/// `PlannerError`).
pub type AppResult<T> = std::result::Result<T, Error>;
