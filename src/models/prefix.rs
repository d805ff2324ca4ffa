//! IP prefix (CIDR) utilities.
//!
//! Provides [`Prefix`] for representing IPv4/IPv6 prefixes as stored in IPAM,
//! along with the mask-length classification rules used by the validator.

use crate::AppError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;
use std::str::FromStr;

/// Maximum mask length for an IPv4 prefix.
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum mask length for an IPv6 prefix.
pub const MAX_LENGTH_V6: u8 = 128;

/// An IPv4 allocation whose mask is below this is a large block.
pub const LARGE_BLOCK_MASK_V4: u8 = 23;
/// An IPv6 allocation whose mask is below this is a large block.
pub const LARGE_BLOCK_MASK_V6: u8 = 64;

/// IP prefix in CIDR notation, IPv4 or IPv6.
#[derive(Eq, Debug, Copy, Clone, Hash)]
pub struct Prefix {
    /// The network address.
    pub addr: IpAddr,
    /// The mask length.
    pub mask: u8,
}

impl Prefix {
    /// Create a new [`Prefix`] from a CIDR string (e.g., "10.0.0.0/24").
    ///
    /// The mask is parsed from the text following the last `/`. IPAM data
    /// always carries an explicit mask; a missing or unparsable mask is a
    /// hard input-format error, not a validation verdict.
    pub fn new(cidr: &str) -> Result<Prefix, AppError> {
        let cidr = cidr.trim();
        let (addr_part, mask_part) = cidr
            .rsplit_once('/')
            .ok_or_else(|| format!("Prefix has no mask: {cidr}"))?;
        let addr = IpAddr::from_str(addr_part)
            .map_err(|_| format!("Invalid prefix address {addr_part}"))?;
        let mask: u8 = mask_part
            .parse()
            .map_err(|_| format!("Invalid prefix mask {mask_part}"))?;
        let max = if addr.is_ipv6() {
            MAX_LENGTH_V6
        } else {
            MAX_LENGTH_V4
        };
        if mask > max {
            return Err(format!("Mask length /{mask} is too long for {addr_part}").into());
        }
        Ok(Prefix { addr, mask })
    }

    /// Whether this prefix is too broad for detailed metadata validation.
    pub fn is_large_block(&self) -> bool {
        match self.addr {
            IpAddr::V4(_) => self.mask < LARGE_BLOCK_MASK_V4,
            IpAddr::V6(_) => self.mask < LARGE_BLOCK_MASK_V6,
        }
    }

    /// Whether this is a single-host IPv4 allocation (/32).
    pub fn is_single_host_v4(&self) -> bool {
        matches!(self.addr, IpAddr::V4(_)) && self.mask == MAX_LENGTH_V4
    }

    /// Whether `ip` falls inside this prefix. Mixed address families never
    /// contain each other.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let shift = u32::from(MAX_LENGTH_V4 - self.mask);
                if shift >= 32 {
                    return true;
                }
                (u32::from(net) >> shift) == (u32::from(*ip) >> shift)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let shift = u32::from(MAX_LENGTH_V6 - self.mask);
                if shift >= 128 {
                    return true;
                }
                (u128::from(net) >> shift) == (u128::from(*ip) >> shift)
            }
            _ => false,
        }
    }

    /// Whether `other` is equal to or nested inside this prefix.
    pub fn contains_prefix(&self, other: &Prefix) -> bool {
        self.mask <= other.mask && self.contains(&other.addr)
    }
}

impl Serialize for Prefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let cidr = format!("{}/{}", self.addr, self.mask);
        serializer.serialize_str(&cidr)
    }
}

impl<'de> Deserialize<'de> for Prefix {
    fn deserialize<D>(deserializer: D) -> Result<Prefix, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Prefix::new(&s).map_err(|e| de::Error::custom(format!("invalid prefix {s}: {e}")))
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl PartialEq for Prefix {
    fn eq(&self, other: &Prefix) -> bool {
        self.addr == other.addr && self.mask == other.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parses_cidr() {
        let p = Prefix::new("10.0.0.0/24").unwrap();
        assert_eq!(p.mask, 24);
        assert_eq!(p.to_string(), "10.0.0.0/24");

        let p6 = Prefix::new("2a01:111:f400::/48").unwrap();
        assert_eq!(p6.mask, 48);
        assert!(p6.addr.is_ipv6());
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(Prefix::new("10.0.0.0").is_err());
        assert!(Prefix::new("10.0.0.0/").is_err());
        assert!(Prefix::new("10.0.0.0/ab").is_err());
        assert!(Prefix::new("10.0.0.0/33").is_err());
        assert!(Prefix::new("2a01::/129").is_err());
        assert!(Prefix::new("not-an-ip/24").is_err());
    }

    #[test]
    fn test_large_block_thresholds() {
        assert!(Prefix::new("10.0.0.0/22").unwrap().is_large_block());
        assert!(!Prefix::new("10.0.0.0/23").unwrap().is_large_block());
        assert!(!Prefix::new("10.0.0.0/24").unwrap().is_large_block());
        assert!(Prefix::new("2a01:111::/63").unwrap().is_large_block());
        assert!(!Prefix::new("2a01:111::/64").unwrap().is_large_block());
    }

    #[test]
    fn test_single_host_v4() {
        assert!(Prefix::new("10.0.0.5/32").unwrap().is_single_host_v4());
        assert!(!Prefix::new("10.0.0.0/24").unwrap().is_single_host_v4());
        // An IPv6 /128 is a single host but not the v4 obsolete case.
        assert!(!Prefix::new("2a01::1/128").unwrap().is_single_host_v4());
    }

    #[test]
    fn test_contains() {
        let p = Prefix::new("40.95.58.0/23").unwrap();
        assert!(p.contains(&"40.95.58.1".parse().unwrap()));
        assert!(p.contains(&"40.95.59.255".parse().unwrap()));
        assert!(!p.contains(&"40.95.60.0".parse().unwrap()));
        assert!(!p.contains(&"2a01::1".parse().unwrap()));

        let zero = Prefix::new("0.0.0.0/0").unwrap();
        assert!(zero.contains(&"255.255.255.255".parse().unwrap()));
    }

    #[test]
    fn test_contains_prefix() {
        let outer = Prefix::new("10.0.0.0/16").unwrap();
        let inner = Prefix::new("10.0.4.0/24").unwrap();
        assert!(outer.contains_prefix(&inner));
        assert!(!inner.contains_prefix(&outer));
        assert!(outer.contains_prefix(&outer));
    }

    #[test]
    fn test_serde_round_trip() {
        let p: Prefix = serde_json::from_str("\"10.18.0.0/16\"").unwrap();
        assert_eq!(p, Prefix::new("10.18.0.0/16").unwrap());
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"10.18.0.0/16\"");
        assert!(serde_json::from_str::<Prefix>("\"10.18.0.0\"").is_err());
    }
}
