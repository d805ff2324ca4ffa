//! File-backed IPAM service.
//!
//! Answers allocation queries from a JSON export of the address spaces,
//! so validation runs and tests do not need a live service connection.

use super::{AllocationQuery, IpamService};
use crate::models::{AddressSpace, AllocationModel, Prefix, TagModel};
use crate::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

/// On-disk snapshot format: allocations plus tag definitions per space.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Snapshot {
    /// Every exported allocation, all address spaces mixed.
    pub allocations: Vec<AllocationModel>,
    /// Tag definitions keyed by address-space name, then tag name.
    #[serde(default)]
    pub tags: HashMap<String, HashMap<String, TagModel>>,
}

/// Read a snapshot export from disk.
///
/// # Arguments
/// * `path` - Path to the snapshot JSON file
///
/// # Returns
/// * `Ok(Snapshot)` - The parsed snapshot
/// * `Err` - If the file is missing or malformed (fatal at startup)
pub fn read_snapshot(path: &str) -> Result<Snapshot, AppError> {
    if !Path::new(path).exists() {
        return Err(format!("Snapshot file does not exist: {path}").into());
    }
    log::info!("Reading IPAM snapshot from {path}");
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading snapshot file {path}: {e}"))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let snapshot: Snapshot = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing snapshot {path}: path={} error={e}", e.path()))?;
    log::info!("Snapshot holds {} allocations", snapshot.allocations.len());
    Ok(snapshot)
}

/// IPAM backend over an in-memory snapshot.
///
/// The allocation list sits behind a mutex so the fixer mutations stay
/// usable from concurrent tasks.
pub struct SnapshotIpam {
    allocations: Mutex<Vec<AllocationModel>>,
    tags: HashMap<String, HashMap<String, TagModel>>,
}

impl SnapshotIpam {
    pub fn new(snapshot: Snapshot) -> SnapshotIpam {
        SnapshotIpam {
            allocations: Mutex::new(snapshot.allocations),
            tags: snapshot.tags,
        }
    }

    /// Load a snapshot file and wrap it as a service backend.
    pub fn from_file(path: &str) -> Result<SnapshotIpam, AppError> {
        Ok(Self::new(read_snapshot(path)?))
    }

    fn tag_definition(&self, space: AddressSpace, tag_name: &str) -> TagModel {
        self.tags
            .get(space.name())
            .and_then(|by_name| {
                by_name
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(tag_name))
                    .map(|(_, tag)| tag.clone())
            })
            .unwrap_or_default()
    }
}

/// Keep only the narrowest (longest-mask) containing allocations.
fn narrowest(mut candidates: Vec<AllocationModel>) -> Vec<AllocationModel> {
    let Some(max_mask) = candidates.iter().map(|a| a.prefix.mask).max() else {
        return candidates;
    };
    candidates.retain(|a| a.prefix.mask == max_mask);
    candidates
}

#[async_trait]
impl IpamService for SnapshotIpam {
    async fn query_allocations(
        &self,
        query: &AllocationQuery,
    ) -> Result<Vec<AllocationModel>, AppError> {
        let allocations = self
            .allocations
            .lock()
            .map_err(|_| "Snapshot allocation lock poisoned")?;
        let in_space: Vec<&AllocationModel> = allocations
            .iter()
            .filter(|a| a.address_space == query.address_space)
            .collect();

        let mut matched: Vec<AllocationModel> = if query.ip_query.contains('/') {
            let prefix = Prefix::new(&query.ip_query)?;
            let exact: Vec<AllocationModel> = in_space
                .iter()
                .filter(|a| a.prefix == prefix)
                .map(|a| (*a).clone())
                .collect();
            if exact.is_empty() && query.return_parent_when_not_found {
                narrowest(
                    in_space
                        .iter()
                        .filter(|a| a.prefix.contains_prefix(&prefix))
                        .map(|a| (*a).clone())
                        .collect(),
                )
            } else {
                exact
            }
        } else {
            let ip = IpAddr::from_str(&query.ip_query)
                .map_err(|_| format!("Invalid IP query string: {}", query.ip_query))?;
            narrowest(
                in_space
                    .iter()
                    .filter(|a| a.prefix.contains(&ip))
                    .map(|a| (*a).clone())
                    .collect(),
            )
        };

        matched.truncate(query.max_results as usize);
        log::debug!(
            "query_allocations space={} ip={} -> {} match(es)",
            query.address_space,
            query.ip_query,
            matched.len()
        );
        Ok(matched)
    }

    async fn get_tag(&self, space: AddressSpace, tag_name: &str) -> Result<TagModel, AppError> {
        Ok(self.tag_definition(space, tag_name))
    }

    async fn update_allocation_tags(&self, allocation: &AllocationModel) -> Result<(), AppError> {
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| "Snapshot allocation lock poisoned")?;
        let existing = allocations
            .iter_mut()
            .find(|a| a.address_space == allocation.address_space && a.id == allocation.id)
            .ok_or_else(|| format!("No allocation with id {} to update", allocation.id))?;
        existing.tags = allocation.tags.clone();
        Ok(())
    }

    async fn patch_allocation_tags(&self, allocation: &AllocationModel) -> Result<(), AppError> {
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| "Snapshot allocation lock poisoned")?;
        let existing = allocations
            .iter_mut()
            .find(|a| a.address_space == allocation.address_space && a.id == allocation.id)
            .ok_or_else(|| format!("No allocation with id {} to patch", allocation.id))?;
        for (name, value) in &allocation.tags {
            existing.set_tag(name, value);
        }
        Ok(())
    }

    async fn create_allocation(&self, allocation: &AllocationModel) -> Result<(), AppError> {
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| "Snapshot allocation lock poisoned")?;
        if allocations
            .iter()
            .any(|a| a.address_space == allocation.address_space && a.id == allocation.id)
        {
            return Err(format!("Allocation id {} already exists", allocation.id).into());
        }
        allocations.push(allocation.clone());
        Ok(())
    }

    async fn delete_allocation(&self, space: AddressSpace, id: &str) -> Result<(), AppError> {
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| "Snapshot allocation lock poisoned")?;
        let before = allocations.len();
        allocations.retain(|a| !(a.address_space == space && a.id == id));
        if allocations.len() == before {
            return Err(format!("No allocation with id {id} to delete").into());
        }
        Ok(())
    }
}
