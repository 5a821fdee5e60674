use thiserror::Error;

use crate::error::PlannerError;
use crate::planner::Planner;
use crate::resource_api::dto::{Allocation, MatchAllocateRequest};

/// Errors surfaced across the resource-API seam.
///
/// Grounded on `reapi_module_t`'s RPC-call error paths (`match_allocate`,
/// `cancel`), which the original reports via `errno` over a Flux RPC
/// future; this crate has no RPC, so every variant here wraps a
/// [`PlannerError`] directly.
#[derive(Debug, Error)]
pub enum ResourceApiError {
    #[error("match_allocate failed: {0}")]
    MatchFailed(#[from] PlannerError),

    #[error("cancel failed: unknown span id {0}")]
    UnknownSpan(i64),
}

/// The seam the original code calls out to an external resource-match RPC
/// through (`reapi_module_t` in `reapi_module_impl.hpp`). A real
/// implementation would speak to a remote matcher; this crate has no wire
/// protocol (`spec.md` §6), so [`InProcessResourceApi`] is the only
/// implementation, wrapping a [`Planner`] directly.
pub trait ResourceApiClient {
    fn match_allocate(&mut self, req: MatchAllocateRequest) -> Result<Allocation, ResourceApiError>;
    fn cancel(&mut self, span_id: i64) -> Result<(), ResourceApiError>;
}

/// Resource-API client backed directly by an in-process [`Planner`], with
/// no RPC round-trip. Mirrors `reapi_module_t::match_allocate` /
/// `reapi_module_t::cancel` but calls straight into the planner instead of
/// issuing a `flux_rpc_pack`.
pub struct InProcessResourceApi<'p> {
    planner: &'p mut Planner,
}

impl<'p> InProcessResourceApi<'p> {
    pub fn new(planner: &'p mut Planner) -> Self {
        InProcessResourceApi { planner }
    }
}

impl<'p> ResourceApiClient for InProcessResourceApi<'p> {
    fn match_allocate(&mut self, req: MatchAllocateRequest) -> Result<Allocation, ResourceApiError> {
        let at = self.planner.avail_time_first(req.at, req.duration, req.resource_count)?;
        let span_id = self.planner.add_span(at, req.duration, req.resource_count)?;
        Ok(Allocation { span_id, at, reserved: at != req.at })
    }

    fn cancel(&mut self, span_id: i64) -> Result<(), ResourceApiError> {
        if !self.planner.is_active_span(span_id) {
            return Err(ResourceApiError::UnknownSpan(span_id));
        }
        self.planner.remove_span(span_id)?;
        Ok(())
    }
}
