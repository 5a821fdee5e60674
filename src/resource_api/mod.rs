//! The resource-matching seam: in the original system a client bound to an
//! RPC against a separate resource-matcher service. Here it wraps the
//! planner directly, in-process, with no wire protocol.

pub mod client;
pub mod dto;

pub use client::{InProcessResourceApi, ResourceApiClient, ResourceApiError};
pub use dto::{Allocation, MatchAllocateRequest};
