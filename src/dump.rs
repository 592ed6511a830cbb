// Copyright (c) 2026 The entitlement-x509 Authors
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Parser for the human-readable certificate dump.
//!
//! Generic X.509 tooling prints custom v3 extensions it cannot name as
//! a dotted OID line followed by an indented value line:
//!
//! ```text
//!         X509v3 extensions:
//!             1.3.6.1.4.1.2312.9.1.1.1:
//!                 ..Awesome OS
//! ```
//!
//! This module scrapes that rendering back into an [`Extensions`] map.
//! The scanned window starts at the first `extensions:` marker and ends
//! at the last `Signature Algorithm:` marker. Within the window each
//! line is stripped of surrounding whitespace and run through a
//! two-line grammar: a line of dot-separated digit groups ending in a
//! colon introduces an OID, and the following line — minus a fixed
//! two-character prefix — is its value. Everything else (banner and
//! formatting lines, named standard extensions) is ignored.
//!
//! The text rendering is treated as a wire format here; this module is
//! the single adapter boundary, so a structured extension source (see
//! [`crate::certificate`]) can coexist or replace it without touching
//! the query layer.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::{Error, ParseError, Result};
use crate::extensions::Extensions;
use crate::oid::Oid;

const SECTION_START: &str = "extensions:";
const SECTION_END: &str = "Signature Algorithm:";

/// One or more dot-terminated digit groups, a final digit group, and a
/// trailing colon — the shape of an unnamed-extension introducer line.
static OID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+\.)+[0-9]+:$").expect("invalid introducer pattern"));

/// Parse a full certificate text dump into an extension map.
///
/// Missing or out-of-order section markers yield an empty map, unless
/// an introducer line appears after an unterminated `extensions:`
/// marker — that dump is structurally truncated and rejected. An
/// introducer with no following value line is likewise fatal.
pub fn parse(text: &str) -> Result<Extensions> {
    let Some(start) = text.find(SECTION_START) else {
        return Ok(Extensions::new());
    };

    let window = match text.rfind(SECTION_END) {
        Some(end) if end >= start => &text[start..end],
        _ => {
            // no terminator: acceptable only if the remainder carries
            // no extension entries at all
            if text[start..].lines().any(|line| is_introducer(line.trim())) {
                return Err(Error::Parse(ParseError::UnterminatedSection));
            }
            return Ok(Extensions::new());
        }
    };

    let mut map = BTreeMap::new();
    let mut pending: Option<Oid> = None;

    for line in window.lines().map(str::trim) {
        if let Some(oid) = pending.take() {
            map.insert(oid, value_of(line).to_string());
            continue;
        }
        if is_introducer(line) {
            pending = Some(Oid::new(&line[..line.len() - 1]));
        }
    }

    if let Some(oid) = pending {
        return Err(Error::dangling_oid(oid.to_string()));
    }

    debug!("recovered {} custom extensions from dump", map.len());
    Ok(map.into_iter().collect())
}

fn is_introducer(line: &str) -> bool {
    OID_LINE.is_match(line)
}

/// A value line carries a fixed two-character prefix (the printed DER
/// tag and length of the inner string); drop it.
fn value_of(line: &str) -> &str {
    line.char_indices()
        .nth(2)
        .map(|(i, _)| &line[i..])
        .unwrap_or("")
}
