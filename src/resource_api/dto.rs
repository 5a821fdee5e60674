use serde::{Deserialize, Serialize};

/// A request to match and allocate resources for a job.
///
/// Grounded on the `jobspec` string plus out-parameters (`reserved`, `R`,
/// `at`, `ov`) of `reapi_module_impl.hpp`'s `match_allocate`; flattened
/// here into the three numbers the planner actually needs, the way the
/// teacher's `*_dto` structs flatten a wire payload into plain fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAllocateRequest {
    pub job_id: i64,
    pub at: i64,
    pub duration: i64,
    pub resource_count: i64,
}

/// The result of a successful match, standing in for `reapi_module_impl.hpp`'s
/// out-parameters (`R`, `at`, `reserved`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub span_id: i64,
    pub at: i64,
    pub reserved: bool,
}
