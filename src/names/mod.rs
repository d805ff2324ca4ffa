//! Naming reference tables and lookups.
//!
//! This module holds everything the validator knows about naming
//! conventions:
//! - [`tables`] - the static name maps and dubious-title patterns
//! - [`regions`] - per-address-space Datacenter -> Region maps, loaded
//!   from the IPAM service's implied-tag relationship

mod regions;
mod tables;

// Re-export public types
pub use regions::RegionMaps;
pub use tables::NameTables;
