// cargo watch -x 'fmt' -x 'test'

pub mod ipam;
pub mod models;
pub mod names;
pub mod output;
pub mod processing;

use std::path::Path;
use std::sync::Arc;

use ipam::IpamService;
use models::AddressSpace;
use names::{NameTables, RegionMaps};
use processing::{BatchOrchestrator, BatchOutcome, DiscoveredIp};

/// Error type used throughout the crate. `Send + Sync` so failures can
/// cross task boundaries in the batch run.
pub type AppError = Box<dyn std::error::Error + Send + Sync>;

/// Read the discovered-IP triples produced by the config scrapers.
///
/// # Arguments
/// * `path` - JSON file containing a list of `DiscoveredIp` entries
///
/// # Returns
/// * `Ok(Vec<DiscoveredIp>)` - in source-document order
/// * `Err` - if the file is missing or malformed
pub fn read_discovered_ips(path: &str) -> Result<Vec<DiscoveredIp>, AppError> {
    if !Path::new(path).exists() {
        return Err(format!("Discovered-IP file does not exist: {path}").into());
    }
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading discovered-IP file {path}: {e}"))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let discovered: Vec<DiscoveredIp> = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| format!("Error parsing {path}: path={} error={e}", e.path()))?;
    log::info!("Read {} discovered IP entries from {path}", discovered.len());
    Ok(discovered)
}

/// Run the full validation batch: load region maps, then validate every
/// discovered IP against every configured address space.
///
/// Region maps are loaded before any concurrent work starts and stay
/// read-only for the rest of the run. The outcome carries the count of
/// units that failed validation outright; callers must treat a non-zero
/// count as a failed run.
pub async fn run_validation(
    ipam: Arc<dyn IpamService>,
    names: Arc<NameTables>,
    discovered: Vec<DiscoveredIp>,
) -> Result<BatchOutcome, AppError> {
    let regions = Arc::new(RegionMaps::load(ipam.as_ref(), &AddressSpace::ALL).await?);
    let orchestrator = BatchOrchestrator::new(ipam, names, regions);
    Ok(orchestrator.run(discovered).await)
}
