//! Target Group Registration Library
//!
//! Reconciles the set of targets registered with a load balancer target group
//! against desired state, and exposes the registration's create, read,
//! update, delete and import lifecycle.
//!
//! - `resource`: desired state, persisted state and the membership model
//! - `provider`: registry interfaces and their ELBv2 and in-memory implementations
//! - `controller`: set reconciliation, planning and the lifecycle
//! - `observability`: logging and Prometheus metrics
//! - `config`: environment-driven settings

pub mod config;
pub mod constants;
pub mod controller;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod resource;
