//! Domain models for IPAM allocation validation.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`Prefix`] - IP prefix with CIDR notation support
//! - [`AllocationModel`] and [`TagModel`] - IPAM records
//! - [`ValidationRecord`] and [`ValidationStatus`] - validation verdicts

mod allocation;
mod prefix;
mod record;

// Re-export public types
pub use allocation::{
    AddressSpace, AllocationModel, TagModel, TAG_DATACENTER, TAG_PHYSICAL_NETWORK,
    TAG_PROPERTY_GROUP, TAG_REGION, TAG_TITLE,
};
pub use prefix::{Prefix, LARGE_BLOCK_MASK_V4, LARGE_BLOCK_MASK_V6, MAX_LENGTH_V4, MAX_LENGTH_V6};
pub use record::{ValidationRecord, ValidationStatus, NO_MATCH, SUCCESS};
