//! # Configuration
//!
//! Reconciler settings loaded from environment variables.

mod reconciler;

pub use reconciler::ReconcilerConfig;
