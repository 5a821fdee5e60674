//! Service glue: the in-process equivalent of the message-bus module that
//! dispatches job-manager alloc/free requests to a queue policy.

pub mod broker;

pub use broker::{Broker, BrokerError};
