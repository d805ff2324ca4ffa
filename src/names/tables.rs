//! Static name reference tables.
//!
//! All lookups are case-insensitive; an unknown key yields `None` (or the
//! documented default), never a panic. The tables are loaded once before
//! any concurrent work starts and are read-only for the process lifetime.

use crate::models::AddressSpace;
use crate::AppError;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// EOP datacenter name -> Azure datacenter name. Many-to-one allowed.
fn default_datacenter_name_map() -> Vec<(&'static str, &'static str)> {
    vec![
        ("AM1", "AMS01"),
        ("AM2", "AMS01"),
        ("AM3", "AMS02"),
        ("DB3", "DUB01"),
        ("DB4", "DUB01"),
        ("HK2", "HKG01"),
        ("SN2", "SJC01"),
        ("BY2", "BAY01"),
        ("BL2", "BLU01"),
        ("SG2", "SIN01"),
        ("TY1", "TYO01"),
        ("CP1", "CPQ01"),
        ("MW1", "MWH01"),
    ]
}

/// Environment name -> canonical forest name.
fn default_forest_name_map() -> Vec<(&'static str, &'static str)> {
    vec![
        ("eurprd03", "EUR"),
        ("eurprd04", "EUR"),
        ("namprd02", "NAM"),
        ("namprd05", "NAM"),
        ("apcprd01", "APC"),
        ("apcprd03", "APC"),
        ("galaprd01", "GAL"),
        ("exsec01", "EXF"),
        ("rxsec01", "RXF"),
    ]
}

/// Forest name -> acceptable alias strings appearing in titles.
fn default_forest_alias_map() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("EUR", vec!["EURPRD", "Europe"]),
        ("NAM", vec!["NAMPRD", "North America"]),
        ("APC", vec!["APCPRD", "Asia Pacific"]),
        ("GAL", vec!["GALA", "GalaCake"]),
    ]
}

/// Forest name -> datacenter-name suffix convention.
fn default_suffix_name_map() -> Vec<(&'static str, &'static str)> {
    vec![
        ("EUR", "FSPROD"),
        ("NAM", "FSPROD"),
        ("APC", "FSPROD"),
        ("GAL", "GALAPROD"),
    ]
}

/// Environment name -> expected logical address space.
fn default_environment_space_map() -> Vec<(&'static str, &'static str)> {
    vec![
        ("galaprd01", "GalaCake"),
        ("exsec01", "EX"),
        ("rxsec01", "RX"),
    ]
}

/// Environment name -> accepted datacenter name override.
fn default_dc_name_exception_map() -> Vec<(&'static str, &'static str)> {
    vec![("namprd05", "Undersea"), ("eurprd04", "AMS-Edge")]
}

/// IP string prefixes to skip entirely (known noise in config exports).
fn default_ip_string_exclusions() -> Vec<&'static str> {
    vec!["0.", "127.", "169.254.", "255.", "fe80:"]
}

/// Literal substrings that flag a title as dubious. Checked before the
/// regex patterns; first match wins.
fn default_dubious_title_words() -> Vec<&'static str> {
    vec!["do not use", "donotuse", "decommission", "to be deleted", "free up"]
}

/// Regex patterns that flag a title as dubious.
fn default_dubious_title_patterns() -> Vec<&'static str> {
    vec![r"(?i)\btest\b", r"(?i)\btemp(orary)?\b", r"(?i)\breclaim(ed)?\b"]
}

/// Optional JSON override file: any table present replaces the built-in
/// one wholesale.
#[derive(Deserialize, Debug, Default)]
struct NameTablesFile {
    #[serde(default)]
    datacenter_name_map: Option<HashMap<String, String>>,
    #[serde(default)]
    forest_name_map: Option<HashMap<String, String>>,
    #[serde(default)]
    forest_alias_map: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    suffix_name_map: Option<HashMap<String, String>>,
    #[serde(default)]
    environment_space_map: Option<HashMap<String, String>>,
    #[serde(default)]
    dc_name_exception_map: Option<HashMap<String, String>>,
    #[serde(default)]
    ip_string_exclusions: Option<Vec<String>>,
    #[serde(default)]
    dubious_title_words: Option<Vec<String>>,
    #[serde(default)]
    dubious_title_patterns: Option<Vec<String>>,
}

/// The loaded name tables. Keys of every map are lowercased once at load
/// time so lookups stay allocation-light and case-insensitive.
#[derive(Debug)]
pub struct NameTables {
    datacenter_name_map: HashMap<String, String>,
    azure_name_map: HashMap<String, Vec<String>>,
    forest_name_map: HashMap<String, String>,
    forest_alias_map: HashMap<String, Vec<String>>,
    suffix_name_map: HashMap<String, String>,
    environment_space_map: HashMap<String, AddressSpace>,
    dc_name_exception_map: HashMap<String, String>,
    ip_string_exclusions: Vec<String>,
    dubious_title_words: Vec<String>,
    dubious_title_patterns: Vec<Regex>,
}

impl NameTables {
    /// Build the tables from the built-in defaults.
    pub fn builtin() -> NameTables {
        let file = NameTablesFile::default();
        Self::build(file).expect("built-in dubious patterns must compile")
    }

    /// Load tables, applying overrides from a JSON file.
    ///
    /// A missing or malformed file is fatal: the process cannot proceed
    /// meaningfully without correct name tables.
    pub fn from_file(path: &str) -> Result<NameTables, AppError> {
        if !Path::new(path).exists() {
            return Err(format!("Name-table file does not exist: {path}").into());
        }
        log::info!("Loading name-table overrides from {path}");
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading name-table file {path}: {e}"))?;
        let mut deserializer = serde_json::Deserializer::from_str(&json);
        let file: NameTablesFile = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| format!("Error parsing {path}: path={} error={e}", e.path()))?;
        Self::build(file)
    }

    fn build(file: NameTablesFile) -> Result<NameTables, AppError> {
        let datacenter_name_map: HashMap<String, String> = match file.datacenter_name_map {
            Some(m) => m
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            None => default_datacenter_name_map()
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
        };

        // Derive the Azure -> EOP reverse map by inverting the forward map.
        // Several EOP names may fan in to one Azure name.
        let mut azure_name_map: HashMap<String, Vec<String>> = HashMap::new();
        for (eop_lower, azure) in &datacenter_name_map {
            azure_name_map
                .entry(azure.to_lowercase())
                .or_default()
                .push(eop_lower.to_uppercase());
        }
        for eop_names in azure_name_map.values_mut() {
            eop_names.sort();
        }

        let forest_name_map = match file.forest_name_map {
            Some(m) => lower_keys(m),
            None => default_forest_name_map()
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
        };
        let forest_alias_map = match file.forest_alias_map {
            Some(m) => m
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            None => default_forest_alias_map()
                .into_iter()
                .map(|(k, v)| {
                    (
                        k.to_lowercase(),
                        v.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        };
        let suffix_name_map = match file.suffix_name_map {
            Some(m) => lower_keys(m),
            None => default_suffix_name_map()
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
        };
        let environment_space_map: HashMap<String, AddressSpace> =
            match file.environment_space_map {
                Some(m) => m
                    .into_iter()
                    .map(|(k, v)| (k.to_lowercase(), AddressSpace::from_name(&v)))
                    .collect(),
                None => default_environment_space_map()
                    .into_iter()
                    .map(|(k, v)| (k.to_lowercase(), AddressSpace::from_name(v)))
                    .collect(),
            };
        let dc_name_exception_map = match file.dc_name_exception_map {
            Some(m) => lower_keys(m),
            None => default_dc_name_exception_map()
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
        };
        let ip_string_exclusions = file
            .ip_string_exclusions
            .unwrap_or_else(|| {
                default_ip_string_exclusions()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            });
        let dubious_title_words = file
            .dubious_title_words
            .unwrap_or_else(|| {
                default_dubious_title_words()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect();
        let pattern_sources = file.dubious_title_patterns.unwrap_or_else(|| {
            default_dubious_title_patterns()
                .into_iter()
                .map(str::to_string)
                .collect()
        });
        let mut dubious_title_patterns = Vec::with_capacity(pattern_sources.len());
        for source in &pattern_sources {
            let re = Regex::new(source)
                .map_err(|e| format!("Invalid dubious-title pattern '{source}': {e}"))?;
            dubious_title_patterns.push(re);
        }

        Ok(NameTables {
            datacenter_name_map,
            azure_name_map,
            forest_name_map,
            forest_alias_map,
            suffix_name_map,
            environment_space_map,
            dc_name_exception_map,
            ip_string_exclusions,
            dubious_title_words,
            dubious_title_patterns,
        })
    }

    /// Azure datacenter name for an EOP name.
    pub fn azure_dc_name(&self, eop_name: &str) -> Option<&str> {
        self.datacenter_name_map
            .get(&eop_name.to_lowercase())
            .map(String::as_str)
    }

    /// EOP names that map to an Azure datacenter name (fan-in).
    pub fn eop_names_for_azure_name(&self, azure_name: &str) -> Option<&[String]> {
        self.azure_name_map
            .get(&azure_name.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Datacenter-name suffix convention for a forest.
    pub fn dc_suffix(&self, forest_name: &str) -> Option<&str> {
        self.suffix_name_map
            .get(&forest_name.to_lowercase())
            .map(String::as_str)
    }

    /// Canonical forest name for an environment.
    pub fn forest_canonical_name(&self, env_name: &str) -> Option<&str> {
        self.forest_name_map
            .get(&env_name.to_lowercase())
            .map(String::as_str)
    }

    /// Expected address space for an environment; Default when unregistered.
    pub fn env_space(&self, env_name: &str) -> AddressSpace {
        self.environment_space_map
            .get(&env_name.to_lowercase())
            .copied()
            .unwrap_or(AddressSpace::Default)
    }

    /// Accepted datacenter-name override for an environment.
    pub fn dc_name_exception(&self, env_name: &str) -> Option<&str> {
        self.dc_name_exception_map
            .get(&env_name.to_lowercase())
            .map(String::as_str)
    }

    /// Title aliases registered for a forest.
    pub fn forest_aliases(&self, forest_name: &str) -> Option<&[String]> {
        self.forest_alias_map
            .get(&forest_name.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Whether an IP string is on the exclusion list (prefix match,
    /// case-sensitive like the rest of the IP handling).
    pub fn is_excluded_ip(&self, ip_string: &str) -> bool {
        self.ip_string_exclusions
            .iter()
            .any(|prefix| ip_string.starts_with(prefix.as_str()))
    }

    /// First dubious word or pattern matching the title, if any.
    /// Literal substrings are evaluated before regex patterns.
    pub fn dubious_title_match(&self, title: &str) -> Option<String> {
        let lower = title.to_lowercase();
        for word in &self.dubious_title_words {
            if lower.contains(word.as_str()) {
                return Some(word.clone());
            }
        }
        for pattern in &self.dubious_title_patterns {
            if pattern.is_match(title) {
                return Some(pattern.as_str().to_string());
            }
        }
        None
    }
}

fn lower_keys(map: HashMap<String, String>) -> HashMap<String, String> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}
