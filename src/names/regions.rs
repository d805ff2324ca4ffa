//! Region maps implied by datacenter tags.
//!
//! IPAM models "Datacenter implies Region" as an implied-tag relationship
//! on the Datacenter tag definition. The maps are loaded once per run,
//! before any concurrent work starts, and are read-only afterwards.

use crate::ipam::IpamService;
use crate::models::{AddressSpace, TAG_DATACENTER, TAG_REGION};
use crate::AppError;
use std::collections::HashMap;

/// Per-address-space mapping of datacenter name -> expected region.
#[derive(Debug, Default)]
pub struct RegionMaps {
    maps: HashMap<AddressSpace, HashMap<String, String>>,
}

impl RegionMaps {
    /// Load the implied-region maps for every listed address space.
    ///
    /// A space whose Datacenter tag carries no implied Region relation gets
    /// an empty map; region validation then cannot flag InvalidRegion for
    /// it, only EmptyRegion.
    pub async fn load(
        ipam: &dyn IpamService,
        spaces: &[AddressSpace],
    ) -> Result<RegionMaps, AppError> {
        let mut maps = HashMap::new();
        for space in spaces {
            let tag = ipam.get_tag(*space, TAG_DATACENTER).await?;
            let implied = tag
                .implied_tags
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(TAG_REGION))
                .map(|(_, values)| {
                    values
                        .iter()
                        .map(|(dc, region)| (dc.to_lowercase(), region.clone()))
                        .collect::<HashMap<String, String>>()
                })
                .unwrap_or_default();
            log::info!(
                "Loaded {} implied region entries for address space {space}",
                implied.len()
            );
            maps.insert(*space, implied);
        }
        Ok(RegionMaps { maps })
    }

    /// Region implied by a datacenter name, case-insensitively.
    pub fn expected_region(&self, space: AddressSpace, dc_name: &str) -> Option<&str> {
        self.maps
            .get(&space)?
            .get(&dc_name.to_lowercase())
            .map(String::as_str)
    }
}
