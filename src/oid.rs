// Copyright (c) 2026 The entitlement-x509 Authors
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Object Identifier value type with wildcard-aware matching.
//!
//! [`Oid`] models a dotted identifier (e.g. `1.3.6.1.4.1.2312`) as an
//! immutable sequence of string components. Unlike the strict DER OID
//! types, construction is deliberately permissive: the string is split
//! naively on `.`, so empty components are accepted. An empty leading
//! or trailing component acts as a matching sentinel (see [`Oid::matches`]),
//! which is how query patterns express suffix- and prefix-anchored
//! searches without a separate query language.
//!
//! All transformations (`ltrim`, `rtrim`, `append`, `parent`) return a
//! new value; the type has no mutable state.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use std::cmp::Ordering;

/// The per-component wildcard marker accepted in match patterns.
pub const WILDCARD: &str = "*";

/// A dotted object identifier.
///
/// Equality, ordering and hashing are all defined over the dotted
/// string form, so `Oid::new("1.3.6") == Oid::from_parts(...)` holds
/// whenever the rendered forms agree. Ordering is the lexicographic
/// order of the dotted string, which fixes the iteration order of
/// [`crate::Extensions`] and thereby the winner of limited searches.
#[derive(Debug, Clone, Eq)]
pub struct Oid {
    parts: Vec<String>,
}

impl Oid {
    /// Parse a dotted string into an OID.
    ///
    /// No validation is performed beyond splitting on `.`: `"1..2"`
    /// yields an empty interior component, and a leading/trailing dot
    /// yields the matching sentinel. This permissiveness is inherited
    /// from the certificate dump format; callers probing with patterns
    /// should be aware an accidental empty component behaves as a
    /// match-mode marker.
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self {
            parts: s.as_ref().split('.').map(str::to_string).collect(),
        }
    }

    /// Build an OID from explicit components.
    pub fn from_parts(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True if the OID has no components (only reachable through
    /// over-trimming; string construction always yields at least one).
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The component at `index`, if present.
    pub fn part(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(String::as_str)
    }

    /// All components.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Drop the first `n` components.
    pub fn ltrim(&self, n: usize) -> Oid {
        Oid {
            parts: self.parts.iter().skip(n).cloned().collect(),
        }
    }

    /// Drop the last `n` components.
    pub fn rtrim(&self, n: usize) -> Oid {
        let keep = self.parts.len().saturating_sub(n);
        Oid {
            parts: self.parts[..keep].to_vec(),
        }
    }

    /// Concatenate another OID's components onto this one.
    pub fn append(&self, other: &Oid) -> Oid {
        let mut parts = self.parts.clone();
        parts.extend(other.parts.iter().cloned());
        Oid { parts }
    }

    /// The OID with the last component dropped, or `None` at the root.
    pub fn parent(&self) -> Option<Oid> {
        if self.parts.len() > 1 {
            Some(self.rtrim(1))
        } else {
            None
        }
    }

    /// Match this (concrete) OID against a possibly-wildcarded pattern.
    ///
    /// Three modes, selected by the pattern's sentinel components:
    ///
    /// - leading empty component: suffix match — only the last
    ///   `pattern.len()` components of `self` are compared;
    /// - trailing empty component: prefix match — only the first
    ///   `pattern.len()` components of `self` are compared;
    /// - otherwise: the whole sequences are compared positionally.
    ///
    /// Positional comparison accepts the literal component or the `*`
    /// wildcard in the pattern. Any length shortfall or literal
    /// mismatch fails the whole match.
    ///
    /// ```
    /// use entitlement_x509::Oid;
    ///
    /// assert!(Oid::new("1.3.6").matches(&Oid::new("1.*.6")));
    /// assert!(Oid::new("9.1.3.6").matches(&Oid::new(".3.6")));
    /// assert!(Oid::new("9.1.3.6").matches(&Oid::new("9.1.")));
    /// assert!(!Oid::new("1.3.6").matches(&Oid::new("1.4.6")));
    /// ```
    pub fn matches(&self, pattern: &Oid) -> bool {
        if pattern.is_empty() {
            return false;
        }

        let (pattern_parts, window): (&[String], &[String]) =
            if pattern.parts.first().map(String::is_empty) == Some(true) {
                // suffix match: compare against the tail of self
                let pat = &pattern.parts[1..];
                if pat.is_empty() {
                    return self.parts.is_empty();
                }
                if self.parts.len() < pat.len() {
                    return false;
                }
                (pat, &self.parts[self.parts.len() - pat.len()..])
            } else if pattern.parts.last().map(String::is_empty) == Some(true) {
                // prefix match: compare against the head of self
                let pat = &pattern.parts[..pattern.parts.len() - 1];
                if pat.is_empty() {
                    return self.parts.is_empty();
                }
                if self.parts.len() < pat.len() {
                    return false;
                }
                (pat, &self.parts[..pat.len()])
            } else {
                if self.parts.len() != pattern.parts.len() {
                    return false;
                }
                (&pattern.parts[..], &self.parts[..])
            };

        window
            .iter()
            .zip(pattern_parts)
            .all(|(component, pat)| component == pat || pat == WILDCARD)
    }

    fn dotted(&self) -> String {
        self.parts.join(".")
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

impl PartialEq for Oid {
    fn eq(&self, other: &Self) -> bool {
        self.dotted() == other.dotted()
    }
}

impl Hash for Oid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dotted().hash(state);
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dotted().cmp(&other.dotted())
    }
}

impl From<&str> for Oid {
    fn from(s: &str) -> Self {
        Oid::new(s)
    }
}

impl From<String> for Oid {
    fn from(s: String) -> Self {
        Oid::new(s)
    }
}

impl From<&Oid> for Oid {
    fn from(oid: &Oid) -> Self {
        oid.clone()
    }
}

impl FromStr for Oid {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(Oid::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for s in ["1", "1.3.6.1.4.1.2312", "1..2", ".3.6", "9.1."] {
            assert_eq!(Oid::new(s).to_string(), s);
        }
    }

    #[test]
    fn test_accessors() {
        let oid = Oid::new("1.3.6.1");
        assert_eq!(oid.len(), 4);
        assert_eq!(oid.part(0), Some("1"));
        assert_eq!(oid.part(3), Some("1"));
        assert_eq!(oid.part(4), None);
        assert!(!oid.is_empty());
    }

    #[test]
    fn test_trim_and_append() {
        let oid = Oid::new("1.3.6.1.4.1");
        assert_eq!(oid.ltrim(2).to_string(), "6.1.4.1");
        assert_eq!(oid.rtrim(2).to_string(), "1.3.6.1");
        assert_eq!(oid.ltrim(10).len(), 0);
        assert_eq!(oid.rtrim(10).len(), 0);

        let joined = Oid::new("1.3").append(&Oid::new("6.1"));
        assert_eq!(joined.to_string(), "1.3.6.1");
    }

    #[test]
    fn test_parent() {
        let oid = Oid::new("1.3.6");
        assert_eq!(oid.parent().unwrap().to_string(), "1.3");
        assert_eq!(Oid::new("1").parent(), None);
    }

    #[test]
    fn test_exact_match() {
        assert!(Oid::new("1.3.6").matches(&Oid::new("1.3.6")));
        assert!(!Oid::new("1.3.6").matches(&Oid::new("1.4.6")));
        // length mismatch fails in both directions
        assert!(!Oid::new("1.3").matches(&Oid::new("1.3.6")));
        assert!(!Oid::new("1.3.6.1").matches(&Oid::new("1.3.6")));
    }

    #[test]
    fn test_wildcard_match() {
        assert!(Oid::new("1.3.6").matches(&Oid::new("1.*.6")));
        assert!(Oid::new("3.2.1").matches(&Oid::new("3.*.1")));
        assert!(!Oid::new("3.2.2").matches(&Oid::new("3.*.1")));
        assert!(Oid::new("1.4.5.6.74").matches(&Oid::new("1.4.*.6.*")));
    }

    #[test]
    fn test_suffix_match() {
        // leading sentinel: match only the last len(pattern) components
        assert!(Oid::new("9.1.3.6").matches(&Oid::new(".3.6")));
        assert!(Oid::new("9.1.3.6").matches(&Oid::new(".6")));
        assert!(!Oid::new("9.1.3.6").matches(&Oid::new(".3")));
        // pattern longer than the identifier cannot match
        assert!(!Oid::new("6").matches(&Oid::new(".3.6")));
    }

    #[test]
    fn test_prefix_match() {
        // trailing sentinel: match only the first len(pattern) components
        assert!(Oid::new("9.1.3.6").matches(&Oid::new("9.1.")));
        assert!(Oid::new("9.1.3.6").matches(&Oid::new("9.")));
        assert!(!Oid::new("9.1.3.6").matches(&Oid::new("1.")));
        assert!(!Oid::new("9").matches(&Oid::new("9.1.")));
    }

    #[test]
    fn test_empty_interior_component_is_wildcard_position() {
        // "1..2" carries an empty interior component; positional
        // comparison treats it as a literal that only matches another
        // empty component, preserving the source format's ambiguity.
        let pattern = Oid::new("1..2");
        assert!(!Oid::new("1.5.2").matches(&pattern));
        assert!(Oid::new("1..2").matches(&pattern));
    }

    #[test]
    fn test_equality_is_string_form() {
        let a = Oid::new("1.3.6");
        let b = Oid::from_parts(vec!["1".into(), "3".into(), "6".into()]);
        assert_eq!(a, b);

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn test_ordering_is_dotted_string_order() {
        let mut oids = vec![Oid::new("1.10"), Oid::new("1.2"), Oid::new("1.1")];
        oids.sort();
        let rendered: Vec<String> = oids.iter().map(Oid::to_string).collect();
        assert_eq!(rendered, vec!["1.1", "1.10", "1.2"]);
    }
}
