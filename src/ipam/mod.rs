//! IPAM service interaction.
//!
//! This module holds everything that talks to the IPAM service of record:
//! - [`IpamService`] - the service contract
//! - [`snapshot`] - file-backed backend answering queries from a JSON export
//! - [`mock`] - fingerprint-keyed backend for test fixtures

mod mock;
mod snapshot;

// Re-export public types
pub use mock::MockIpam;
pub use snapshot::{read_snapshot, Snapshot, SnapshotIpam};

use crate::models::{AddressSpace, AllocationModel, TagModel};
use crate::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Containment/lookup query parameters.
///
/// Kept as one model so repeated identical queries can be deduplicated by
/// fingerprint (see `processing::fingerprint`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AllocationQuery {
    /// Address space to query.
    pub address_space: AddressSpace,
    /// IP string, with or without an explicit mask.
    pub ip_query: String,
    /// When the query string carries no exact match, return the nearest
    /// enclosing parent allocation instead of nothing.
    pub return_parent_when_not_found: bool,
    /// Upper bound on returned allocations.
    pub max_results: u32,
}

impl AllocationQuery {
    /// Build the standard validator query for one IP string.
    ///
    /// A bare IP (no `/`) asks for the nearest enclosing parent.
    pub fn for_ip(address_space: AddressSpace, ip_query: &str) -> AllocationQuery {
        AllocationQuery {
            address_space,
            ip_query: ip_query.to_string(),
            return_parent_when_not_found: !ip_query.contains('/'),
            max_results: 10,
        }
    }
}

/// The IPAM service of record.
///
/// The validator only reads through `query_allocations` and `get_tag`; the
/// mutation operations exist for the fixer tools and must always be awaited
/// so a failed update cannot silently corrupt fixer bookkeeping.
#[async_trait]
pub trait IpamService: Send + Sync {
    /// Containment/lookup query for allocations matching an IP string.
    async fn query_allocations(
        &self,
        query: &AllocationQuery,
    ) -> Result<Vec<AllocationModel>, AppError>;

    /// Fetch a tag definition (known values and implied tags).
    async fn get_tag(&self, space: AddressSpace, tag_name: &str) -> Result<TagModel, AppError>;

    /// Replace the tag set of an allocation.
    async fn update_allocation_tags(&self, allocation: &AllocationModel) -> Result<(), AppError>;

    /// Merge the given tags into an allocation, leaving other tags alone.
    async fn patch_allocation_tags(&self, allocation: &AllocationModel) -> Result<(), AppError>;

    /// Create a new allocation.
    async fn create_allocation(&self, allocation: &AllocationModel) -> Result<(), AppError>;

    /// Delete an allocation by id.
    async fn delete_allocation(&self, space: AddressSpace, id: &str) -> Result<(), AppError>;
}
