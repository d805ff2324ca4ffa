//! Validation processing logic.
//!
//! This module contains the algorithmic core of the validator:
//! - [`fingerprint`] - deep content fingerprinting of query/data models
//! - [`validator`] - the allocation validation rule chain
//! - [`batch`] - concurrent per-environment orchestration

mod batch;
pub mod fingerprint;
mod validator;

// Re-export public types
pub use batch::{group_by_environment, BatchOrchestrator, BatchOutcome, DiscoveredIp};
pub use fingerprint::Fingerprint;
pub use validator::{AllocationValidator, RunState};
