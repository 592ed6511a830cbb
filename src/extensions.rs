// Copyright (c) 2026 The entitlement-x509 Authors
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Query engine over a certificate's custom v3 extensions.
//!
//! [`Extensions`] maps [`Oid`] keys to raw string values. Keys are kept
//! in the lexicographic order of their dotted form, which makes limited
//! wildcard searches reproducible: when several keys match, the
//! smallest dotted key wins a `limit = 1` search.
//!
//! Two invariants hold throughout:
//!
//! - stored keys are fully specified (wildcards and sentinels appear
//!   only in query patterns, never in keys);
//! - transforms ([`Extensions::ltrim`], [`Extensions::branch`]) return
//!   new, independent instances — a published instance is never
//!   mutated, so sharing one across threads needs no locking.

use core::fmt;
use std::collections::BTreeMap;

use crate::dump;
use crate::error::Result;
use crate::oid::Oid;

/// An ordered mapping of extension OIDs to raw string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    map: BTreeMap<Oid, String>,
}

impl Extensions {
    /// Create an empty extension map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an openssl-style textual certificate dump.
    ///
    /// See [`crate::dump`] for the recognized window and line grammar.
    pub fn from_text(text: &str) -> Result<Self> {
        dump::parse(text)
    }

    /// Number of stored extensions.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no extensions are stored.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate entries in dotted-string key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Oid, &str)> {
        self.map.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Get the value of the first extension matching `pattern`.
    ///
    /// The pattern may contain `*` wildcards and suffix/prefix
    /// sentinels; an absent or non-matching OID yields `None`, never an
    /// error.
    pub fn get<Q: Into<Oid>>(&self, pattern: Q) -> Option<&str> {
        self.find(pattern, 1).first().map(|(_, v)| *v)
    }

    /// Find all extensions matching `pattern`, in dotted-string key
    /// order, stopping after `limit` hits (0 means unlimited).
    pub fn find<Q: Into<Oid>>(&self, pattern: Q, limit: usize) -> Vec<(&Oid, &str)> {
        let pattern = pattern.into();
        let mut hits = Vec::new();
        for (key, value) in &self.map {
            if key.matches(&pattern) {
                hits.push((key, value.as_str()));
                if limit != 0 && hits.len() == limit {
                    break;
                }
            }
        }
        hits
    }

    /// Return a new map with the first `n` components dropped from
    /// every key. When trimming collides two keys, the later key in
    /// this map's iteration order overwrites the earlier one.
    pub fn ltrim(&self, n: usize) -> Extensions {
        self.map
            .iter()
            .map(|(oid, value)| (oid.ltrim(n), value.clone()))
            .collect()
    }

    /// Extract the subtree under `root`, re-rooted so the descendants'
    /// trailing components become directly addressable.
    ///
    /// `root` is normalized to a prefix pattern (a trailing sentinel is
    /// appended unless already present), then every match is
    /// left-trimmed by `root.len() - 1` components. Branching at
    /// `1.2.3` turns a stored key `1.2.3.4.1` into `4.1`.
    pub fn branch<Q: Into<Oid>>(&self, root: Q) -> Extensions {
        let mut root = root.into();
        if root.part(root.len().wrapping_sub(1)).map(str::is_empty) != Some(true) {
            root = root.append(&Oid::from_parts(vec![String::new()]));
        }
        let trim = root.len() - 1;
        self.find(&root, 0)
            .into_iter()
            .map(|(oid, value)| (oid.ltrim(trim), value.to_string()))
            .collect()
    }
}

impl FromIterator<(Oid, String)> for Extensions {
    /// Later duplicates of a key overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = (Oid, String)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (oid, value) in &self.map {
            writeln!(f, "{} = \"{}\"", oid, value)?;
        }
        Ok(())
    }
}
