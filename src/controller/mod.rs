//! # Controller
//!
//! Core modules of the registration reconciler.
//!
//! - `backoff`: Fibonacci backoff mechanism for retries
//! - `reconciler`: Set reconciliation and the registration lifecycle

pub mod backoff;
pub mod reconciler;
