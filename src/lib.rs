// Copyright (c) 2026 The entitlement-x509 Authors
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Reader for custom v3 extensions in entitlement certificates.
//!
//! Vendors embed product and entitlement records in X.509 v3
//! certificates as custom extensions keyed by OIDs under a vendor
//! arc. This crate decodes such certificates and turns the extension
//! namespace into a queryable map:
//!
//! - [`oid::Oid`] — a dotted-identifier value with wildcard matching
//!   (`*` per component, empty leading/trailing components for
//!   suffix/prefix anchoring).
//! - [`extensions::Extensions`] — a sorted OID-keyed map with wildcard
//!   search, subtree re-rooting (`branch`) and bulk key trimming
//!   (`ltrim`).
//! - [`dump::parse`] — recovers an extension map from the
//!   human-readable text rendering of a certificate.
//! - [`certificate::Certificate`] — a narrow DER reader yielding the
//!   serial, subject, validity window and custom extension map.
//! - [`schema`] — [`schema::Product`] and [`schema::Entitlement`]
//!   field projections over vendor-relative extension subtrees.
//! - [`bundle::Bundle`] — split/join for combined key+certificate PEM
//!   files.
//!
//! ```
//! use entitlement_x509::extensions::Extensions;
//!
//! let text = "extensions:\n\
//!             1.3.6.1.4.1.2312.2.7.1:\n\
//!             ..Awesome OS\n\
//!             Signature Algorithm: sha256WithRSAEncryption\n";
//! let ext = Extensions::from_text(text)?;
//! assert_eq!(ext.get("1.3.6.1.4.1.2312.2.7.1"), Some("Awesome OS"));
//! # Ok::<(), entitlement_x509::error::Error>(())
//! ```
//!
//! All query operations return new instances; no published map is
//! ever mutated. Signature and trust-chain validation are out of
//! scope.

#![forbid(unsafe_code)]

pub mod bundle;
pub mod certificate;
pub mod dump;
pub mod error;
pub mod extensions;
pub mod oid;
pub mod schema;

pub use bundle::{Bundle, Key};
pub use certificate::{Certificate, DateRange};
pub use error::{Error, Result};
pub use extensions::Extensions;
pub use oid::Oid;
pub use schema::{find_entitlements, find_product, Entitlement, Product};

/// Convenience re-exports for callers that want the whole surface.
pub mod prelude {
    pub use crate::bundle::{Bundle, Key};
    pub use crate::certificate::{Certificate, DateRange};
    pub use crate::error::{Error, Result};
    pub use crate::extensions::Extensions;
    pub use crate::oid::Oid;
    pub use crate::schema::{find_entitlements, find_product, Entitlement, Product};
}
