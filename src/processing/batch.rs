//! Batch orchestration of validation runs.
//!
//! Drives validation across every discovered IP string for every source
//! environment concurrently: one task per environment, joined as a single
//! barrier, with run-wide IP deduplication and per-unit failure isolation.

use super::validator::{AllocationValidator, RunState};
use crate::ipam::IpamService;
use crate::models::{AddressSpace, ValidationRecord, ValidationStatus};
use crate::names::{NameTables, RegionMaps};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One (environment, tag-name, IP string) triple from the config scrapers,
/// plus the EOP datacenter name the scraper read off the config filename.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DiscoveredIp {
    /// Source environment name, e.g. "eurprd03".
    pub environment: String,
    /// EOP datacenter name from the config filename.
    pub eop_dc: String,
    /// XML attribute/tag the IP string was found under.
    pub tag_name: String,
    /// The IP string as scraped, with or without a mask.
    pub ip_string: String,
}

/// Group discovered IPs by environment, keeping first-seen environment
/// order and source-document order within each group.
pub fn group_by_environment(items: Vec<DiscoveredIp>) -> Vec<(String, Vec<DiscoveredIp>)> {
    let mut order: Vec<String> = Vec::new();
    let mut by_env: HashMap<String, Vec<DiscoveredIp>> = HashMap::new();
    for item in items {
        if !by_env.contains_key(&item.environment) {
            order.push(item.environment.clone());
        }
        by_env.entry(item.environment.clone()).or_default().push(item);
    }
    order
        .into_iter()
        .map(|env| {
            let items = by_env.remove(&env).unwrap_or_default();
            (env, items)
        })
        .collect()
}

/// Result of one validation run: the collected non-Success records plus
/// the number of (environment, IP, space) units that produced no verdict.
/// A non-zero failure count must surface as a non-zero process exit.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Non-Success records, in per-environment source order.
    pub records: Vec<ValidationRecord>,
    /// Units whose validation failed outright (IPAM error, bad data).
    pub failed_units: usize,
}

/// Drives one validation run. Reference tables and region maps are loaded
/// before construction and shared read-only across every task.
pub struct BatchOrchestrator {
    ipam: Arc<dyn IpamService>,
    names: Arc<NameTables>,
    regions: Arc<RegionMaps>,
    spaces: Vec<AddressSpace>,
}

impl BatchOrchestrator {
    pub fn new(
        ipam: Arc<dyn IpamService>,
        names: Arc<NameTables>,
        regions: Arc<RegionMaps>,
    ) -> BatchOrchestrator {
        Self::with_spaces(ipam, names, regions, AddressSpace::ALL.to_vec())
    }

    /// Restrict the run to specific address spaces.
    pub fn with_spaces(
        ipam: Arc<dyn IpamService>,
        names: Arc<NameTables>,
        regions: Arc<RegionMaps>,
        spaces: Vec<AddressSpace>,
    ) -> BatchOrchestrator {
        BatchOrchestrator {
            ipam,
            names,
            regions,
            spaces,
        }
    }

    /// Validate every discovered IP and collect the non-Success records.
    ///
    /// The batch completes only when every environment task finishes; no
    /// partial results are returned early. Output ordering across
    /// environments follows task completion and must not be relied on.
    pub async fn run(&self, discovered: Vec<DiscoveredIp>) -> BatchOutcome {
        let state = Arc::new(RunState::new());
        let validator = Arc::new(AllocationValidator::new(
            self.ipam.clone(),
            self.names.clone(),
            self.regions.clone(),
            state.clone(),
        ));

        let groups = group_by_environment(discovered);
        log::info!("Starting validation run over {} environment(s)", groups.len());

        let mut handles = Vec::new();
        for (environment, items) in groups {
            let validator = validator.clone();
            let names = self.names.clone();
            let state = state.clone();
            let spaces = self.spaces.clone();
            handles.push(tokio::spawn(async move {
                validate_environment(environment, items, validator, names, state, spaces).await
            }));
        }

        let mut outcome = BatchOutcome::default();
        for joined in join_all(handles).await {
            match joined {
                Ok((mut environment_records, failed_units)) => {
                    outcome.records.append(&mut environment_records);
                    outcome.failed_units += failed_units;
                }
                Err(e) => {
                    log::error!("Environment validation task failed: {e}");
                    outcome.failed_units += 1;
                }
            }
        }
        log::info!(
            "Validation run produced {} record(s), {} failed unit(s)",
            outcome.records.len(),
            outcome.failed_units
        );
        outcome
    }
}

/// Validate one environment's IP strings sequentially against each address
/// space. A failure on one (IP, space) unit is logged and counted, and
/// does not abort its siblings.
async fn validate_environment(
    environment: String,
    items: Vec<DiscoveredIp>,
    validator: Arc<AllocationValidator>,
    names: Arc<NameTables>,
    state: Arc<RunState>,
    spaces: Vec<AddressSpace>,
) -> (Vec<ValidationRecord>, usize) {
    let Some(forest) = names.forest_canonical_name(&environment).map(str::to_string) else {
        log::warn!("Skipping environment {environment}: no forest mapping registered");
        return (Vec::new(), 0);
    };

    let mut records = Vec::new();
    let mut failed_units = 0;
    for item in items {
        if names.is_excluded_ip(&item.ip_string) {
            log::debug!(
                "Skipping excluded IP {} (tag {}) in {environment}",
                item.ip_string,
                item.tag_name
            );
            continue;
        }
        // Run-wide hot-list: the same IP string discovered again, in any
        // environment, is not validated twice.
        if !state.first_sighting(&item.ip_string) {
            continue;
        }

        let mut matched = false;
        let mut no_match: Option<ValidationRecord> = None;
        for space in &spaces {
            match validator
                .validate(*space, &environment, &forest, &item.eop_dc, &item.ip_string)
                .await
            {
                Ok(record) => match record.status {
                    ValidationStatus::NoMatch => {
                        if no_match.is_none() {
                            no_match = Some(record);
                        }
                    }
                    ValidationStatus::Success => {
                        matched = true;
                        log::debug!("{} in {space}: {}", item.ip_string, record.summary);
                    }
                    _ => {
                        matched = true;
                        records.push(record);
                    }
                },
                Err(e) => {
                    failed_units += 1;
                    log::error!(
                        "Validation failed environment={environment} ip={} space={space}: {e}",
                        item.ip_string
                    );
                }
            }
        }
        // No address space had any allocation for this IP: report once.
        if !matched {
            if let Some(record) = no_match {
                records.push(record);
            }
        }
    }
    (records, failed_units)
}
