//! IPAM allocation data model.

use super::Prefix;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known tag names on an IPAM allocation.
pub const TAG_TITLE: &str = "Title";
pub const TAG_DATACENTER: &str = "Datacenter";
pub const TAG_REGION: &str = "Region";
pub const TAG_PROPERTY_GROUP: &str = "PropertyGroup";
pub const TAG_PHYSICAL_NETWORK: &str = "PhysicalNetwork";

/// Logical IPAM address space.
///
/// The service itself keys spaces by opaque GUIDs; tooling and config files
/// use the short names. Unknown names fall back to [`AddressSpace::Default`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    Default,
    GalaCake,
    Ex,
    Rx,
}

impl AddressSpace {
    /// Every configured address space, in query order.
    pub const ALL: [AddressSpace; 4] = [
        AddressSpace::Default,
        AddressSpace::GalaCake,
        AddressSpace::Ex,
        AddressSpace::Rx,
    ];

    /// Short name used in config files and CSV output.
    pub fn name(&self) -> &'static str {
        match self {
            AddressSpace::Default => "Default",
            AddressSpace::GalaCake => "GalaCake",
            AddressSpace::Ex => "EX",
            AddressSpace::Rx => "RX",
        }
    }

    /// Opaque address-space identifier used by the IPAM service.
    pub fn space_id(&self) -> &'static str {
        match self {
            AddressSpace::Default => "2a2b6b19-0000-4b37-9d30-6b77b93f27a3",
            AddressSpace::GalaCake => "5f5f7481-0001-45ed-9d21-7e2e35a1b90c",
            AddressSpace::Ex => "9c0d2f64-0002-4fa0-8f11-14c5f9a4d2be",
            AddressSpace::Rx => "d41c8a3e-0003-49c2-b9f0-3a9d5c7e81f4",
        }
    }

    /// Resolve a short name, case-insensitively. Unknown names map to
    /// [`AddressSpace::Default`].
    pub fn from_name(name: &str) -> AddressSpace {
        match name.trim().to_lowercase().as_str() {
            "galacake" => AddressSpace::GalaCake,
            "ex" => AddressSpace::Ex,
            "rx" => AddressSpace::Rx,
            _ => AddressSpace::Default,
        }
    }
}

impl std::fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One IPAM-managed IP prefix record.
///
/// The core only reads these; tag mutations are proposed through the IPAM
/// service by the fixer tools.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AllocationModel {
    /// Opaque identifier, unique per address space.
    pub id: String,
    /// The address space this allocation lives in.
    pub address_space: AddressSpace,
    /// CIDR prefix; always carries an explicit mask.
    pub prefix: Prefix,
    /// Tag-name to value map. Keys are unique but case varies per author.
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl AllocationModel {
    /// Case-insensitive tag lookup.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive tag lookup, blank when absent.
    pub fn tag_or_empty(&self, name: &str) -> &str {
        self.tag(name).unwrap_or("")
    }

    /// Set a tag value, replacing any existing key regardless of case.
    pub fn set_tag(&mut self, name: &str, value: &str) {
        let existing = self
            .tags
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned();
        let key = existing.unwrap_or_else(|| name.to_string());
        self.tags.insert(key, value.to_string());
    }
}

/// IPAM tag definition, as returned by the service's get-tag operation.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TagModel {
    /// Values the service accepts for this tag.
    #[serde(default)]
    pub known_values: Vec<String>,
    /// Implied-tag relationships: implied tag name -> (this tag's value ->
    /// implied value). Datacenter implies Region through this.
    #[serde(default)]
    pub implied_tags: HashMap<String, HashMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation() -> AllocationModel {
        let mut tags = HashMap::new();
        tags.insert("Title".to_string(), "EOP: EUR-AM101".to_string());
        tags.insert("datacenter".to_string(), "AM1".to_string());
        AllocationModel {
            id: "alloc-1".to_string(),
            address_space: AddressSpace::Default,
            prefix: Prefix::new("40.95.58.0/23").unwrap(),
            tags,
        }
    }

    #[test]
    fn test_tag_lookup_case_insensitive() {
        let a = allocation();
        assert_eq!(a.tag("TITLE"), Some("EOP: EUR-AM101"));
        assert_eq!(a.tag("Datacenter"), Some("AM1"));
        assert_eq!(a.tag("Region"), None);
        assert_eq!(a.tag_or_empty("Region"), "");
    }

    #[test]
    fn test_set_tag_replaces_existing_key() {
        let mut a = allocation();
        a.set_tag("DATACENTER", "AMS01");
        assert_eq!(a.tag("Datacenter"), Some("AMS01"));
        // No duplicate key with different casing appears.
        assert_eq!(a.tags.len(), 2);
    }

    #[test]
    fn test_address_space_from_name() {
        assert_eq!(AddressSpace::from_name("galacake"), AddressSpace::GalaCake);
        assert_eq!(AddressSpace::from_name("EX"), AddressSpace::Ex);
        assert_eq!(AddressSpace::from_name("rx"), AddressSpace::Rx);
        assert_eq!(AddressSpace::from_name("Default"), AddressSpace::Default);
        assert_eq!(AddressSpace::from_name("unknown"), AddressSpace::Default);
    }

    #[test]
    fn test_space_ids_are_distinct() {
        let mut ids: Vec<&str> = AddressSpace::ALL.iter().map(|s| s.space_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), AddressSpace::ALL.len());
    }
}
