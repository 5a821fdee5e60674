pub mod config;
pub mod error;
pub mod logger;
pub mod planner;
pub mod queue_policy;
pub mod resource_api;
pub mod service;

use crate::config::RunConfig;
use crate::error::Result;
use crate::planner::Planner;

/// Builds a [`Planner`] from a parsed [`RunConfig`].
pub fn planner_from_config(config: &RunConfig) -> Result<Planner> {
    let p = &config.planner;
    Ok(Planner::new(p.base_time, p.duration, p.resource_total, p.resource_type.clone())?)
}
