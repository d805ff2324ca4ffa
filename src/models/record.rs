//! Validation verdict model.

use super::AddressSpace;
use lazy_static::lazy_static;
use serde::Serialize;

/// Outcome of validating one (address space, IP string) pair.
///
/// The validator evaluates these in strict priority order; the first
/// matching condition wins.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// The IPAM query returned zero allocations.
    NoMatch,
    /// The query returned more than one allocation for a single IP.
    MultipleMatches,
    /// Nothing to report (large block, dedup hit, or all checks passed).
    Success,
    /// Datacenter tag is blank.
    EmptyDatacenter,
    /// Blank title on a single-host IPv4 allocation; delete, don't fix.
    Obsolete,
    /// Title tag is blank.
    EmptyTitle,
    /// Datacenter tag matches no accepted name variant.
    MismatchedDcName,
    /// Region tag is blank.
    EmptyRegion,
    /// Region tag contradicts the region implied by the Datacenter tag.
    InvalidRegion,
    /// Title mentions neither the datacenter nor the forest.
    InvalidTitle,
    /// Title matches a configured dubious word or pattern.
    DubiousTitle,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            ValidationStatus::NoMatch => "NoMatch",
            ValidationStatus::MultipleMatches => "MultipleMatches",
            ValidationStatus::Success => "Success",
            ValidationStatus::EmptyDatacenter => "EmptyDatacenter",
            ValidationStatus::Obsolete => "Obsolete",
            ValidationStatus::EmptyTitle => "EmptyTitle",
            ValidationStatus::MismatchedDcName => "MismatchedDcName",
            ValidationStatus::EmptyRegion => "EmptyRegion",
            ValidationStatus::InvalidRegion => "InvalidRegion",
            ValidationStatus::InvalidTitle => "InvalidTitle",
            ValidationStatus::DubiousTitle => "DubiousTitle",
        };
        write!(f, "{s}")
    }
}

/// The verdict for one (address space, IP string) pair.
///
/// Built fresh by the validator for every evaluated query and never mutated
/// after being handed to the output sink.
#[derive(Serialize, Debug, Clone)]
pub struct ValidationRecord {
    /// Matched allocation id, blank when nothing matched.
    pub id: String,
    /// Address space the query ran against.
    pub address_space: AddressSpace,
    /// The IP string as queried.
    pub ip_query: String,
    /// Matched prefix in CIDR form, blank when nothing matched.
    pub prefix: String,
    /// Environment rendered as `forest-dc`.
    pub environment: String,
    /// Forest name.
    pub forest: String,
    /// EOP datacenter name from the config filename.
    pub eop_dc: String,
    /// Datacenter tag value from IPAM.
    pub ipam_dc: String,
    /// Region tag value from IPAM.
    pub region: String,
    /// Title tag value from IPAM.
    pub title: String,
    /// The verdict.
    pub status: ValidationStatus,
    /// Free-text explanation of the verdict.
    pub summary: String,
    /// Independently computed: the environment expects a different address
    /// space than the one this match came from. Reported alongside the
    /// status, never instead of it.
    pub wrong_address_space: bool,
}

impl ValidationRecord {
    fn bare(status: ValidationStatus, summary: &str) -> ValidationRecord {
        ValidationRecord {
            id: String::new(),
            address_space: AddressSpace::Default,
            ip_query: String::new(),
            prefix: String::new(),
            environment: String::new(),
            forest: String::new(),
            eop_dc: String::new(),
            ipam_dc: String::new(),
            region: String::new(),
            title: String::new(),
            status,
            summary: summary.to_string(),
            wrong_address_space: false,
        }
    }

    /// CSV comment column: carries the wrong-address-space note.
    pub fn comment(&self) -> &'static str {
        if self.wrong_address_space {
            "WrongAddressSpace"
        } else {
            ""
        }
    }
}

lazy_static! {
    /// Shared detail-free success record, used where no per-record context
    /// is needed (dedup-guard short circuits).
    pub static ref SUCCESS: ValidationRecord =
        ValidationRecord::bare(ValidationStatus::Success, "Already validated");
    /// Shared detail-free no-match record.
    pub static ref NO_MATCH: ValidationRecord =
        ValidationRecord::bare(ValidationStatus::NoMatch, "No matching allocation");
}
