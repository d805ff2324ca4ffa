//! Deep content fingerprinting for query and data models.
//!
//! Produces a stable SHA-256 digest over a line-oriented rendering of a
//! value tree: fully-qualified type name lines (via [`std::any::type_name`]),
//! `field=` markers, canonical text for
//! scalars. Deeply equal values digest equal regardless of object
//! identity, which is what the query cache and the mock IPAM backend key
//! on. Each model type implements the visitor explicitly, so the value
//! graph is acyclic by construction.

use crate::ipam::AllocationQuery;
use crate::models::{AddressSpace, AllocationModel, Prefix, TagModel};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Emit the line-oriented rendering of a value into `out`.
pub trait Fingerprint {
    fn emit(&self, out: &mut Vec<String>);
}

/// Digest a value: join the emitted lines with `\n`, UTF-8 encode, SHA-256,
/// render lowercase hex.
pub fn digest<T: Fingerprint>(value: &T) -> String {
    let mut lines = Vec::new();
    value.emit(&mut lines);
    digest_lines(&lines)
}

/// Digest an optional root value. An absent root contributes no lines.
pub fn digest_opt<T: Fingerprint>(value: Option<&T>) -> String {
    let mut lines = Vec::new();
    if let Some(v) = value {
        v.emit(&mut lines);
    }
    digest_lines(&lines)
}

fn digest_lines(lines: &[String]) -> String {
    let blob = lines.join("\n");
    format!("{:x}", Sha256::digest(blob.as_bytes()))
}

macro_rules! scalar_fingerprint {
    ($ty:ty) => {
        impl Fingerprint for $ty {
            fn emit(&self, out: &mut Vec<String>) {
                out.push(std::any::type_name::<$ty>().to_string());
                out.push(self.to_string());
            }
        }
    };
}

scalar_fingerprint!(bool);
scalar_fingerprint!(u8);
scalar_fingerprint!(u16);
scalar_fingerprint!(u32);
scalar_fingerprint!(u64);
scalar_fingerprint!(usize);
scalar_fingerprint!(i32);
scalar_fingerprint!(i64);
scalar_fingerprint!(String);

// Borrowed strings render as their owned form so the same text digests
// equal whichever way the field is held.
impl Fingerprint for &str {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<String>().to_string());
        out.push(self.to_string());
    }
}

impl<T: Fingerprint> Fingerprint for Option<T> {
    fn emit(&self, out: &mut Vec<String>) {
        match self {
            // Absent value at a non-root position: one blank-line marker.
            None => out.push(String::new()),
            Some(v) => v.emit(out),
        }
    }
}

impl<T: Fingerprint> Fingerprint for Vec<T> {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<Self>().to_string());
        for item in self {
            item.emit(out);
        }
    }
}

/// String-keyed maps are unordered; enumerate in sorted key order so the
/// digest does not depend on hash-table iteration order.
impl<V: Fingerprint> Fingerprint for HashMap<String, V> {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<Self>().to_string());
        let mut keys: Vec<&String> = self.keys().collect();
        keys.sort();
        for key in keys {
            out.push(format!("{key}="));
            self[key].emit(out);
        }
    }
}

impl Fingerprint for AddressSpace {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<Self>().to_string());
        out.push(self.name().to_string());
    }
}

impl Fingerprint for Prefix {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<Self>().to_string());
        out.push(self.to_string());
    }
}

impl Fingerprint for AllocationQuery {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<Self>().to_string());
        out.push("address_space=".to_string());
        self.address_space.emit(out);
        out.push("ip_query=".to_string());
        self.ip_query.emit(out);
        out.push("return_parent_when_not_found=".to_string());
        self.return_parent_when_not_found.emit(out);
        out.push("max_results=".to_string());
        self.max_results.emit(out);
    }
}

impl Fingerprint for AllocationModel {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<Self>().to_string());
        out.push("id=".to_string());
        self.id.emit(out);
        out.push("address_space=".to_string());
        self.address_space.emit(out);
        out.push("prefix=".to_string());
        self.prefix.emit(out);
        out.push("tags=".to_string());
        self.tags.emit(out);
    }
}

impl Fingerprint for TagModel {
    fn emit(&self, out: &mut Vec<String>) {
        out.push(std::any::type_name::<Self>().to_string());
        out.push("known_values=".to_string());
        self.known_values.emit(out);
        out.push("implied_tags=".to_string());
        self.implied_tags.emit(out);
    }
}
