//! Allocation validation rule chain.
//!
//! Given one (address space, IP string) query plus its naming context,
//! decide whether the matching IPAM allocation's metadata is internally
//! consistent. The rules run in strict priority order; the first matching
//! condition wins and everything after it is short-circuited.

use crate::ipam::{AllocationQuery, IpamService};
use crate::models::{
    AddressSpace, AllocationModel, ValidationRecord, ValidationStatus, TAG_DATACENTER,
    TAG_PHYSICAL_NETWORK, TAG_PROPERTY_GROUP, TAG_REGION, TAG_TITLE, SUCCESS,
};
use crate::names::{NameTables, RegionMaps};
use crate::AppError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Shared per-run bookkeeping. Constructed once per batch run, never as
/// process-wide static state, so repeated runs start clean.
#[derive(Default)]
pub struct RunState {
    seen_ips: Mutex<HashSet<String>>,
    validated_ids: Mutex<HashSet<String>>,
}

impl RunState {
    pub fn new() -> RunState {
        RunState::default()
    }

    /// Atomic check-and-add on the run-wide IP hot-list. Case-sensitive.
    pub fn first_sighting(&self, ip_string: &str) -> bool {
        self.seen_ips
            .lock()
            .expect("hot-list lock poisoned")
            .insert(ip_string.to_string())
    }

    /// Atomic check-and-add on the validated-allocation-id set. An
    /// allocation evaluated once is trusted for the rest of the run.
    pub fn first_evaluation(&self, allocation_id: &str) -> bool {
        self.validated_ids
            .lock()
            .expect("validated-id lock poisoned")
            .insert(allocation_id.to_string())
    }
}

struct QueryContext<'a> {
    space: AddressSpace,
    forest: &'a str,
    eop_dc: &'a str,
    ip_string: &'a str,
    wrong_address_space: bool,
}

/// The rule engine. Holds the read-only reference tables and the per-run
/// shared state; all decisions are deterministic given the allocation's
/// tags and the tables.
pub struct AllocationValidator {
    ipam: Arc<dyn IpamService>,
    names: Arc<NameTables>,
    regions: Arc<RegionMaps>,
    state: Arc<RunState>,
}

impl AllocationValidator {
    pub fn new(
        ipam: Arc<dyn IpamService>,
        names: Arc<NameTables>,
        regions: Arc<RegionMaps>,
        state: Arc<RunState>,
    ) -> AllocationValidator {
        AllocationValidator {
            ipam,
            names,
            regions,
            state,
        }
    }

    /// Produce exactly one [`ValidationRecord`] for the query.
    ///
    /// The wrong-address-space condition is computed independently of the
    /// main rule chain and reported alongside it, never instead of it.
    pub async fn validate(
        &self,
        space: AddressSpace,
        environment: &str,
        forest: &str,
        eop_dc: &str,
        ip_string: &str,
    ) -> Result<ValidationRecord, AppError> {
        let query = AllocationQuery::for_ip(space, ip_string);
        let allocations = self.ipam.query_allocations(&query).await?;

        let ctx = QueryContext {
            space,
            forest,
            eop_dc,
            ip_string,
            wrong_address_space: self.names.env_space(environment) != space,
        };

        // Rule 1: nothing matched.
        if allocations.is_empty() {
            return Ok(self.record(
                &ctx,
                None,
                ValidationStatus::NoMatch,
                format!("No allocation matches {ip_string} in {space}"),
            ));
        }

        // Rule 2: ambiguous containment.
        if allocations.len() > 1 {
            let candidates: Vec<String> = allocations
                .iter()
                .map(|a| {
                    format!(
                        "prefix={} region={} network={} propertyGroup={}",
                        a.prefix,
                        a.tag_or_empty(TAG_REGION),
                        a.tag_or_empty(TAG_PHYSICAL_NETWORK),
                        a.tag_or_empty(TAG_PROPERTY_GROUP),
                    )
                })
                .collect();
            return Ok(self.record(
                &ctx,
                None,
                ValidationStatus::MultipleMatches,
                format!(
                    "{} allocations match: {}",
                    allocations.len(),
                    candidates.join("; ")
                ),
            ));
        }

        let allocation = &allocations[0];

        // Dedup guard: an allocation already evaluated this run is trusted.
        if !self.state.first_evaluation(&allocation.id) {
            log::debug!(
                "Allocation {} already validated this run, skipping",
                allocation.id
            );
            return Ok(SUCCESS.clone());
        }

        // Rule 3: broad ranges are exempt from metadata validation.
        if allocation.prefix.is_large_block() {
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::Success,
                "Large block".to_string(),
            ));
        }

        let ipam_dc = allocation.tag_or_empty(TAG_DATACENTER);
        let title = allocation.tag_or_empty(TAG_TITLE);
        let region = allocation.tag_or_empty(TAG_REGION);

        // Rule 4: blank datacenter outranks every title defect.
        if ipam_dc.trim().is_empty() {
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::EmptyDatacenter,
                "Datacenter tag is blank".to_string(),
            ));
        }

        // Rules 5 and 6: blank title. Single-host v4 allocations with no
        // title are deletion candidates rather than title-fix candidates.
        if title.trim().is_empty() {
            if allocation.prefix.is_single_host_v4() {
                return Ok(self.record(
                    &ctx,
                    Some(allocation),
                    ValidationStatus::Obsolete,
                    "Blank title on single-host allocation, candidate for deletion".to_string(),
                ));
            }
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::EmptyTitle,
                "Title tag is blank".to_string(),
            ));
        }

        // Rule 7: datacenter tag must equal one of the accepted names.
        let azure_dc = self.names.azure_dc_name(eop_dc);
        if !self.dc_name_matches(environment, forest, eop_dc, azure_dc, ipam_dc) {
            // Mirror dc_name_matches exactly: suffix-stripping the tag is
            // equivalent to accepting each base name with the suffix on.
            let mut accepted: Vec<String> = vec![eop_dc.to_string()];
            if let Some(azure) = azure_dc {
                accepted.push(azure.to_string());
            }
            if let Some(suffix) = self.names.dc_suffix(forest) {
                accepted.push(format!("{eop_dc}{suffix}"));
                if let Some(azure) = azure_dc {
                    accepted.push(format!("{azure}{suffix}"));
                }
            }
            if let Some(exception) = self.names.dc_name_exception(environment) {
                accepted.push(exception.to_string());
            }
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::MismatchedDcName,
                format!(
                    "Datacenter tag '{ipam_dc}' matches none of: {}",
                    accepted.join(", ")
                ),
            ));
        }

        // Rule 8: blank region.
        if region.trim().is_empty() {
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::EmptyRegion,
                "Region tag is blank".to_string(),
            ));
        }

        // Rule 9: region must agree with the one the datacenter implies.
        if let Some(expected) = self.regions.expected_region(space, ipam_dc) {
            if !region.eq_ignore_ascii_case(expected) {
                return Ok(self.record(
                    &ctx,
                    Some(allocation),
                    ValidationStatus::InvalidRegion,
                    format!("Region '{region}' but datacenter '{ipam_dc}' implies '{expected}'"),
                ));
            }
        }

        // Rule 10: title must mention the datacenter under some name.
        let dc_variants = self.dc_name_variants(forest, eop_dc, azure_dc, ipam_dc);
        if !contains_any(title, &dc_variants) {
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::InvalidTitle,
                format!(
                    "Title does not mention the datacenter; checked: {}",
                    dc_variants.join(", ")
                ),
            ));
        }

        // Rule 11: title must mention the forest or a registered alias.
        let aliases = self.names.forest_aliases(forest);
        let forest_in_title = title_contains(title, forest)
            || aliases
                .map(|list| list.iter().any(|a| title_contains(title, a)))
                .unwrap_or(false);
        if !forest_in_title {
            let summary = match aliases {
                Some(list) => format!(
                    "Title does not mention forest '{forest}' or aliases: {}",
                    list.join(", ")
                ),
                None => format!("Title does not mention forest '{forest}'"),
            };
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::InvalidTitle,
                summary,
            ));
        }

        // Rule 12: known bad wording.
        if let Some(matched) = self.names.dubious_title_match(title) {
            return Ok(self.record(
                &ctx,
                Some(allocation),
                ValidationStatus::DubiousTitle,
                format!("Title matches dubious pattern '{matched}'"),
            ));
        }

        // Rule 13: all good.
        Ok(self.record(
            &ctx,
            Some(allocation),
            ValidationStatus::Success,
            "Validated".to_string(),
        ))
    }

    /// Rule 7 acceptance: EOP name, Azure name, either with the forest's
    /// suffix convention stripped from the tag, or the environment's
    /// registered exception.
    fn dc_name_matches(
        &self,
        environment: &str,
        forest: &str,
        eop_dc: &str,
        azure_dc: Option<&str>,
        ipam_dc: &str,
    ) -> bool {
        let eq_accepted = |name: &str| {
            name.eq_ignore_ascii_case(eop_dc)
                || azure_dc.is_some_and(|azure| name.eq_ignore_ascii_case(azure))
        };
        if eq_accepted(ipam_dc) {
            return true;
        }
        if let Some(stripped) = self
            .names
            .dc_suffix(forest)
            .and_then(|suffix| strip_suffix_ci(ipam_dc, suffix))
        {
            if eq_accepted(stripped) {
                return true;
            }
        }
        self.names
            .dc_name_exception(environment)
            .is_some_and(|exception| ipam_dc.eq_ignore_ascii_case(exception))
    }

    /// Every datacenter name variant the title check accepts, in check
    /// order, deduplicated case-insensitively.
    fn dc_name_variants(
        &self,
        forest: &str,
        eop_dc: &str,
        azure_dc: Option<&str>,
        ipam_dc: &str,
    ) -> Vec<String> {
        let mut variants: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !name.is_empty()
                && !variants.iter().any(|v| v.eq_ignore_ascii_case(name))
            {
                variants.push(name.to_string());
            }
        };
        push(ipam_dc);
        push(eop_dc);
        if let Some(azure) = azure_dc {
            push(azure);
        }
        if let Some(stripped) = self
            .names
            .dc_suffix(forest)
            .and_then(|suffix| strip_suffix_ci(ipam_dc, suffix))
        {
            push(stripped);
        }
        if let Some(eop_names) = self.names.eop_names_for_azure_name(ipam_dc) {
            for name in eop_names {
                push(name);
            }
        }
        variants
    }

    fn record(
        &self,
        ctx: &QueryContext,
        allocation: Option<&AllocationModel>,
        status: ValidationStatus,
        summary: String,
    ) -> ValidationRecord {
        ValidationRecord {
            id: allocation.map(|a| a.id.clone()).unwrap_or_default(),
            address_space: ctx.space,
            ip_query: ctx.ip_string.to_string(),
            prefix: allocation.map(|a| a.prefix.to_string()).unwrap_or_default(),
            environment: format!("{}-{}", ctx.forest, ctx.eop_dc),
            forest: ctx.forest.to_string(),
            eop_dc: ctx.eop_dc.to_string(),
            ipam_dc: allocation
                .map(|a| a.tag_or_empty(TAG_DATACENTER).to_string())
                .unwrap_or_default(),
            region: allocation
                .map(|a| a.tag_or_empty(TAG_REGION).to_string())
                .unwrap_or_default(),
            title: allocation
                .map(|a| a.tag_or_empty(TAG_TITLE).to_string())
                .unwrap_or_default(),
            status,
            summary,
            wrong_address_space: ctx.wrong_address_space,
        }
    }
}

fn title_contains(title: &str, name: &str) -> bool {
    !name.is_empty() && title.to_lowercase().contains(&name.to_lowercase())
}

fn contains_any(title: &str, names: &[String]) -> bool {
    names.iter().any(|n| title_contains(title, n))
}

/// Case-insensitive suffix strip. Names are ASCII; a non-boundary split
/// just means no match.
fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || s.len() <= suffix.len() {
        return None;
    }
    let split = s.len() - suffix.len();
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipam::MockIpam;
    use crate::models::{Prefix, TagModel};
    use std::collections::HashMap;

    fn allocation(id: &str, prefix: &str, tags: &[(&str, &str)]) -> AllocationModel {
        AllocationModel {
            id: id.to_string(),
            address_space: AddressSpace::Default,
            prefix: Prefix::new(prefix).unwrap(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn region_tag() -> TagModel {
        let mut by_dc = HashMap::new();
        by_dc.insert("AM1".to_string(), "West Europe".to_string());
        by_dc.insert("AMS01".to_string(), "West Europe".to_string());
        by_dc.insert("HK2".to_string(), "East Asia".to_string());
        let mut implied = HashMap::new();
        implied.insert("Region".to_string(), by_dc);
        TagModel {
            known_values: vec![],
            implied_tags: implied,
        }
    }

    async fn validator(mock: Arc<MockIpam>) -> AllocationValidator {
        mock.stub_tag(AddressSpace::Default, TAG_DATACENTER, region_tag());
        let regions = RegionMaps::load(mock.as_ref(), &AddressSpace::ALL)
            .await
            .unwrap();
        AllocationValidator::new(
            mock,
            Arc::new(NameTables::builtin()),
            Arc::new(regions),
            Arc::new(RunState::new()),
        )
    }

    async fn validate_one(
        mock: Arc<MockIpam>,
        ip: &str,
        result: Vec<AllocationModel>,
    ) -> ValidationRecord {
        mock.stub_query(&AllocationQuery::for_ip(AddressSpace::Default, ip), result);
        let v = validator(mock).await;
        v.validate(AddressSpace::Default, "eurprd03", "EUR", "AM1", ip)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_match() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(mock, "10.9.9.9", vec![]).await;
        assert_eq!(rec.status, ValidationStatus::NoMatch);
        assert_eq!(rec.environment, "EUR-AM1");
    }

    #[tokio::test]
    async fn test_multiple_matches_lists_candidates() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![
                allocation("a", "10.0.1.0/24", &[("Region", "West Europe")]),
                allocation("b", "10.0.1.0/24", &[("PropertyGroup", "EOP")]),
            ],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::MultipleMatches);
        assert!(rec.summary.contains("2 allocations match"));
        assert!(rec.summary.contains("region=West Europe"));
        assert!(rec.summary.contains("propertyGroup=EOP"));
    }

    #[tokio::test]
    async fn test_large_block_bypasses_tag_defects() {
        let mock = Arc::new(MockIpam::new());
        // Empty title and datacenter would otherwise fail rules 4-6.
        let rec = validate_one(mock, "10.0.0.1", vec![allocation("a", "10.0.0.0/22", &[])]).await;
        assert_eq!(rec.status, ValidationStatus::Success);
        assert_eq!(rec.summary, "Large block");
    }

    #[tokio::test]
    async fn test_empty_datacenter_precedes_empty_title() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(mock, "10.0.1.1", vec![allocation("a", "10.0.1.0/24", &[])]).await;
        assert_eq!(rec.status, ValidationStatus::EmptyDatacenter);
    }

    #[tokio::test]
    async fn test_obsolete_vs_empty_title() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock.clone(),
            "10.0.0.5/32",
            vec![allocation("a", "10.0.0.5/32", &[("Datacenter", "AM1")])],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::Obsolete);

        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.0.0/24",
            vec![allocation("a", "10.0.0.0/24", &[("Datacenter", "AM1")])],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::EmptyTitle);
    }

    #[tokio::test]
    async fn test_dc_name_match_is_case_insensitive() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "am1"),
                    ("Region", "West Europe"),
                    ("Title", "EOP: EUR-AM101 - IPv4_Data"),
                ],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::Success);
    }

    #[tokio::test]
    async fn test_mismatched_dc_name() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[("Datacenter", "HKG01"), ("Title", "whatever")],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::MismatchedDcName);
        assert!(rec.summary.contains("AM1"));
        assert!(rec.summary.contains("AMS01"));
        // The suffixed forms are accepted by the rule, so the summary has
        // to list them as well.
        assert!(rec.summary.contains("AM1FSPROD"));
        assert!(rec.summary.contains("AMS01FSPROD"));
    }

    #[tokio::test]
    async fn test_suffix_stripped_dc_name_accepted() {
        let mock = Arc::new(MockIpam::new());
        // EUR's suffix convention is FSPROD: AMS01FSPROD normalizes to AMS01.
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "AMS01FSPROD"),
                    ("Region", "East Asia"),
                    ("Title", "EOP: EUR AMS01 range"),
                ],
            )],
        )
        .await;
        // Suffix-stripped tag matched the Azure name; region map has no
        // entry for AMS01FSPROD so InvalidRegion cannot fire.
        assert_eq!(rec.status, ValidationStatus::Success);
    }

    #[tokio::test]
    async fn test_dc_name_exception() {
        let mock = Arc::new(MockIpam::new());
        mock.stub_query(
            &AllocationQuery::for_ip(AddressSpace::Default, "10.0.1.1"),
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "Undersea"),
                    ("Region", "West US"),
                    ("Title", "NAM SN2 Undersea range"),
                ],
            )],
        );
        let v = validator(mock).await;
        // namprd05 registers "Undersea" as an accepted override.
        let rec = v
            .validate(AddressSpace::Default, "namprd05", "NAM", "SN2", "10.0.1.1")
            .await
            .unwrap();
        assert_eq!(rec.status, ValidationStatus::Success);
    }

    #[tokio::test]
    async fn test_empty_and_invalid_region() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[("Datacenter", "AM1"), ("Title", "EUR AM1")],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::EmptyRegion);

        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "AM1"),
                    ("Region", "East Asia"),
                    ("Title", "EUR AM1"),
                ],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::InvalidRegion);
        assert!(rec.summary.contains("West Europe"));
    }

    #[tokio::test]
    async fn test_title_alias_fan_in() {
        // Tag AMS01 reverse-maps to AM1 and AM2; a title mentioning AM2
        // satisfies the datacenter-in-title check.
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "AMS01"),
                    ("Region", "West Europe"),
                    ("Title", "EOP: EUR-AM201 range"),
                ],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::Success);
    }

    #[tokio::test]
    async fn test_invalid_title_enumerates_variants() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "AM1"),
                    ("Region", "West Europe"),
                    ("Title", "EUR range with no datacenter"),
                ],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::InvalidTitle);
        assert!(rec.summary.contains("AM1"));
        assert!(rec.summary.contains("AMS01"));
    }

    #[tokio::test]
    async fn test_invalid_title_missing_forest() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "AM1"),
                    ("Region", "West Europe"),
                    ("Title", "AM1 range, no forest named"),
                ],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::InvalidTitle);
        assert!(rec.summary.contains("EURPRD"));
    }

    #[tokio::test]
    async fn test_dubious_title() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "10.0.1.1",
            vec![allocation(
                "a",
                "10.0.1.0/24",
                &[
                    ("Datacenter", "AM1"),
                    ("Region", "West Europe"),
                    ("Title", "EUR AM1 - do not use"),
                ],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::DubiousTitle);
        assert!(rec.summary.contains("do not use"));
    }

    #[tokio::test]
    async fn test_dedup_guard_trusts_revalidated_allocation() {
        let mock = Arc::new(MockIpam::new());
        // Tags that would fail the rule chain (blank datacenter).
        let bad = allocation("shared-id", "10.0.1.0/24", &[]);
        mock.stub_query(
            &AllocationQuery::for_ip(AddressSpace::Default, "10.0.1.1"),
            vec![bad.clone()],
        );
        mock.stub_query(
            &AllocationQuery::for_ip(AddressSpace::Default, "10.0.1.2"),
            vec![bad],
        );
        let v = validator(mock).await;

        let first = v
            .validate(AddressSpace::Default, "eurprd03", "EUR", "AM1", "10.0.1.1")
            .await
            .unwrap();
        assert_eq!(first.status, ValidationStatus::EmptyDatacenter);

        // Different IP string, same allocation id: trusted, not re-checked.
        let second = v
            .validate(AddressSpace::Default, "eurprd03", "EUR", "AM1", "10.0.1.2")
            .await
            .unwrap();
        assert_eq!(second.status, ValidationStatus::Success);
        assert_eq!(second.summary, "Already validated");
    }

    #[tokio::test]
    async fn test_wrong_address_space_reported_alongside() {
        let mock = Arc::new(MockIpam::new());
        mock.stub_query(
            &AllocationQuery::for_ip(AddressSpace::GalaCake, "10.0.1.1"),
            vec![AllocationModel {
                address_space: AddressSpace::GalaCake,
                ..allocation("a", "10.0.1.0/24", &[])
            }],
        );
        let v = validator(mock).await;
        // eurprd03 expects Default, the match came from GalaCake.
        let rec = v
            .validate(AddressSpace::GalaCake, "eurprd03", "EUR", "AM1", "10.0.1.1")
            .await
            .unwrap();
        assert_eq!(rec.status, ValidationStatus::EmptyDatacenter);
        assert!(rec.wrong_address_space);
    }

    #[tokio::test]
    async fn test_end_to_end_success_scenario() {
        let mock = Arc::new(MockIpam::new());
        let rec = validate_one(
            mock,
            "40.95.58.0/23",
            vec![allocation(
                "a",
                "40.95.58.0/23",
                &[
                    ("Title", "EOP: EUR-AM101 - IPv4_Data"),
                    ("Datacenter", "AM1"),
                    ("Region", "West Europe"),
                ],
            )],
        )
        .await;
        assert_eq!(rec.status, ValidationStatus::Success);
        assert_eq!(rec.summary, "Validated");
        assert!(!rec.wrong_address_space);
    }

    #[test]
    fn test_strip_suffix_ci() {
        assert_eq!(strip_suffix_ci("AMS01FSPROD", "fsprod"), Some("AMS01"));
        assert_eq!(strip_suffix_ci("AMS01", "FSPROD"), None);
        assert_eq!(strip_suffix_ci("FSPROD", "FSPROD"), None);
        assert_eq!(strip_suffix_ci("AMS01", ""), None);
    }
}
