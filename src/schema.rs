// Copyright (c) 2026 The entitlement-x509 Authors
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Schema views over the vendor extension namespace.
//!
//! Red Hat entitlement data lives under the vendor arc
//! `1.3.6.1.4.1.2312`. Relative to that root, a product occupies the
//! `2.7` subtree and each entitlement an indexed `3.<n>` subtree, with
//! single-component field OIDs inside:
//!
//! ```text
//! 2.7.1            product name
//! 2.7.2            product description
//! ...
//! 3.<n>.1          entitlement name
//! 3.<n>.2          entitlement label
//! ...
//! ```
//!
//! [`Product`] and [`Entitlement`] are read-only projections over a
//! branched [`Extensions`] subtree. They hold no storage of their own:
//! every accessor is a direct lookup, and an absent field is `None`,
//! never an error. Discovery is by free function over any
//! vendor-trimmed extension set rather than by certificate subtypes.

use core::fmt;

use log::debug;

use crate::extensions::Extensions;

/// The Red Hat vendor base OID.
pub const REDHAT: &str = "1.3.6.1.4.1.2312";

/// Relative OID of the product name field. A certificate carries at
/// most one product, so this doubles as the product marker.
const PRODUCT_NAME: &str = "2.7.1";

/// Wildcard pattern for entitlement name fields. The middle component
/// is the per-entitlement index, so exactly that position floats while
/// the arc (`3`) and the name leaf (`1`) stay anchored.
const ENTITLEMENT_NAME: &str = "3.*.1";

/// Find the product defined in a vendor-trimmed extension set.
pub fn find_product(trimmed: &Extensions) -> Option<Product> {
    let hits = trimmed.find(PRODUCT_NAME, 1);
    let (oid, _) = hits.first()?;
    let root = oid.rtrim(1);
    debug!("product found under {}", root);
    Some(Product::new(trimmed.branch(&root)))
}

/// Find all entitlements defined in a vendor-trimmed extension set.
pub fn find_entitlements(trimmed: &Extensions) -> Vec<Entitlement> {
    trimmed
        .find(ENTITLEMENT_NAME, 0)
        .into_iter()
        .map(|(oid, _)| {
            let root = oid.rtrim(1);
            Entitlement::new(trimmed.branch(&root))
        })
        .collect()
}

// ============================================================================
// Product
// ============================================================================

/// A product record projected from a branched extension subtree.
///
/// Equality compares the name field only.
#[derive(Debug, Clone)]
pub struct Product {
    ext: Extensions,
}

impl Product {
    /// Wrap a branched subtree whose keys are field OIDs.
    pub fn new(ext: Extensions) -> Self {
        Self { ext }
    }

    pub fn name(&self) -> Option<&str> {
        self.ext.get("1")
    }

    pub fn description(&self) -> Option<&str> {
        self.ext.get("2")
    }

    pub fn arch(&self) -> Option<&str> {
        self.ext.get("3")
    }

    pub fn version(&self) -> Option<&str> {
        self.ext.get("4")
    }

    pub fn quantity(&self) -> Option<&str> {
        self.ext.get("5")
    }

    pub fn subtype(&self) -> Option<&str> {
        self.ext.get("6")
    }

    pub fn virt_limit(&self) -> Option<&str> {
        self.ext.get("7")
    }

    pub fn socket_limit(&self) -> Option<&str> {
        self.ext.get("8")
    }

    pub fn product_option_code(&self) -> Option<&str> {
        self.ext.get("9")
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Product {{")?;
        writeln!(f, "\tName ......... = {}", field(self.name()))?;
        writeln!(f, "\tDescription .. = {}", field(self.description()))?;
        writeln!(f, "\tArchitecture . = {}", field(self.arch()))?;
        writeln!(f, "\tVersion ...... = {}", field(self.version()))?;
        writeln!(f, "\tQuantity ..... = {}", field(self.quantity()))?;
        writeln!(f, "\tSubtype ...... = {}", field(self.subtype()))?;
        writeln!(f, "\tVirt Limit ... = {}", field(self.virt_limit()))?;
        writeln!(f, "\tSocket Limit . = {}", field(self.socket_limit()))?;
        writeln!(f, "\tProduct Code . = {}", field(self.product_option_code()))?;
        write!(f, "}}")
    }
}

// ============================================================================
// Entitlement
// ============================================================================

/// An entitlement record projected from a branched extension subtree.
///
/// Equality compares the name field only.
#[derive(Debug, Clone)]
pub struct Entitlement {
    ext: Extensions,
}

impl Entitlement {
    /// Wrap a branched subtree whose keys are field OIDs.
    pub fn new(ext: Extensions) -> Self {
        Self { ext }
    }

    pub fn name(&self) -> Option<&str> {
        self.ext.get("1")
    }

    pub fn label(&self) -> Option<&str> {
        self.ext.get("2")
    }

    pub fn quantity(&self) -> Option<&str> {
        self.ext.get("3")
    }

    pub fn flex_quantity(&self) -> Option<&str> {
        self.ext.get("4")
    }

    pub fn vendor(&self) -> Option<&str> {
        self.ext.get("5")
    }

    pub fn url(&self) -> Option<&str> {
        self.ext.get("6")
    }

    pub fn gpg(&self) -> Option<&str> {
        self.ext.get("7")
    }
}

impl PartialEq for Entitlement {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl fmt::Display for Entitlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Entitlement {{")?;
        writeln!(f, "\tName ........ = {}", field(self.name()))?;
        writeln!(f, "\tLabel ....... = {}", field(self.label()))?;
        writeln!(f, "\tQuantity .... = {}", field(self.quantity()))?;
        writeln!(f, "\tFlex Quantity = {}", field(self.flex_quantity()))?;
        writeln!(f, "\tVendor ...... = {}", field(self.vendor()))?;
        writeln!(f, "\tURL ......... = {}", field(self.url()))?;
        writeln!(f, "\tGPG URL ..... = {}", field(self.gpg()))?;
        write!(f, "}}")
    }
}

fn field(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid::Oid;

    fn trimmed() -> Extensions {
        [
            ("2.7.1", "Awesome OS"),
            ("2.7.2", "Awesome OS for x86_64"),
            ("2.7.3", "x86_64"),
            ("2.7.4", "6.1"),
            ("3.1.1", "never-web"),
            ("3.1.2", "never-web-label"),
            ("3.1.3", "10"),
            ("3.2.1", "always-db"),
            ("3.2.6", "https://cdn.example.com/db"),
        ]
        .into_iter()
        .map(|(k, v)| (Oid::new(k), v.to_string()))
        .collect()
    }

    #[test]
    fn test_find_product() {
        let product = find_product(&trimmed()).unwrap();
        assert_eq!(product.name(), Some("Awesome OS"));
        assert_eq!(product.description(), Some("Awesome OS for x86_64"));
        assert_eq!(product.arch(), Some("x86_64"));
        assert_eq!(product.version(), Some("6.1"));
        assert_eq!(product.quantity(), None);
        assert_eq!(product.socket_limit(), None);
    }

    #[test]
    fn test_find_product_absent() {
        let ext: Extensions = [(Oid::new("3.1.1"), "ent".to_string())]
            .into_iter()
            .collect();
        assert!(find_product(&ext).is_none());
    }

    #[test]
    fn test_find_entitlements() {
        let entitlements = find_entitlements(&trimmed());
        assert_eq!(entitlements.len(), 2);

        // sorted key order puts 3.1 before 3.2
        assert_eq!(entitlements[0].name(), Some("never-web"));
        assert_eq!(entitlements[0].label(), Some("never-web-label"));
        assert_eq!(entitlements[0].quantity(), Some("10"));
        assert_eq!(entitlements[0].url(), None);

        assert_eq!(entitlements[1].name(), Some("always-db"));
        assert_eq!(entitlements[1].url(), Some("https://cdn.example.com/db"));
    }

    #[test]
    fn test_entitlement_wildcard_anchors_arc() {
        // a 2.x.1 key must not be picked up by the entitlement pattern
        let ext: Extensions = [
            (Oid::new("2.7.1"), "product".to_string()),
            (Oid::new("3.9.1"), "ent".to_string()),
        ]
        .into_iter()
        .collect();
        let entitlements = find_entitlements(&ext);
        assert_eq!(entitlements.len(), 1);
        assert_eq!(entitlements[0].name(), Some("ent"));
    }

    #[test]
    fn test_shallow_equality() {
        let a = find_product(&trimmed()).unwrap();
        let mut other = trimmed();
        other = other.branch("2.7");
        let b = Product::new(other);
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_shows_absent_fields() {
        let product = find_product(&trimmed()).unwrap();
        let text = product.to_string();
        assert!(text.contains("Name ......... = Awesome OS"));
        assert!(text.contains("Socket Limit . = None"));
    }
}
