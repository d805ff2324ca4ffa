//! Fingerprint-keyed mock IPAM backend.
//!
//! Test fixtures register canned responses against a query model; the
//! lookup recomputes the query's deep fingerprint, so any deeply equal
//! query object hits the same canned answer regardless of identity.

use super::{AllocationQuery, IpamService};
use crate::models::{AddressSpace, AllocationModel, TagModel};
use crate::processing::fingerprint;
use crate::AppError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Mock IPAM service for tests and fixture-driven runs.
#[derive(Default)]
pub struct MockIpam {
    responses: Mutex<HashMap<String, Vec<AllocationModel>>>,
    tags: Mutex<HashMap<(AddressSpace, String), TagModel>>,
    failing: Mutex<HashSet<String>>,
    mutation_log: Mutex<Vec<String>>,
}

impl MockIpam {
    pub fn new() -> MockIpam {
        MockIpam::default()
    }

    /// Register the allocations returned for a deeply equal query.
    pub fn stub_query(&self, query: &AllocationQuery, allocations: Vec<AllocationModel>) {
        let key = fingerprint::digest(query);
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .insert(key, allocations);
    }

    /// Register a tag definition.
    pub fn stub_tag(&self, space: AddressSpace, tag_name: &str, tag: TagModel) {
        self.tags
            .lock()
            .expect("mock lock poisoned")
            .insert((space, tag_name.to_string()), tag);
    }

    /// Make a specific query fail, for exercising per-unit error handling.
    pub fn fail_query(&self, query: &AllocationQuery) {
        self.failing
            .lock()
            .expect("mock lock poisoned")
            .insert(fingerprint::digest(query));
    }

    /// Mutation calls observed so far, in call order.
    pub fn mutations(&self) -> Vec<String> {
        self.mutation_log.lock().expect("mock lock poisoned").clone()
    }

    fn log_mutation(&self, entry: String) {
        self.mutation_log
            .lock()
            .expect("mock lock poisoned")
            .push(entry);
    }
}

#[async_trait]
impl IpamService for MockIpam {
    async fn query_allocations(
        &self,
        query: &AllocationQuery,
    ) -> Result<Vec<AllocationModel>, AppError> {
        let key = fingerprint::digest(query);
        if self.failing.lock().expect("mock lock poisoned").contains(&key) {
            return Err(format!("Injected IPAM failure for query {}", query.ip_query).into());
        }
        Ok(self
            .responses
            .lock()
            .expect("mock lock poisoned")
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_tag(&self, space: AddressSpace, tag_name: &str) -> Result<TagModel, AppError> {
        Ok(self
            .tags
            .lock()
            .expect("mock lock poisoned")
            .get(&(space, tag_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn update_allocation_tags(&self, allocation: &AllocationModel) -> Result<(), AppError> {
        self.log_mutation(format!("update {}", allocation.id));
        Ok(())
    }

    async fn patch_allocation_tags(&self, allocation: &AllocationModel) -> Result<(), AppError> {
        self.log_mutation(format!("patch {}", allocation.id));
        Ok(())
    }

    async fn create_allocation(&self, allocation: &AllocationModel) -> Result<(), AppError> {
        self.log_mutation(format!("create {}", allocation.id));
        Ok(())
    }

    async fn delete_allocation(&self, space: AddressSpace, id: &str) -> Result<(), AppError> {
        self.log_mutation(format!("delete {space} {id}"));
        Ok(())
    }
}
