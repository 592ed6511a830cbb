// Copyright (c) 2026 The entitlement-x509 Authors
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 certificate reading.
//!
//! A deliberately narrow reader over the `der` stack: it recovers only
//! the fields the entitlement model consumes — serial number, subject
//! distinguished name, validity window and the custom v3 extensions.
//! There is no encode path and no signature or chain validation.
//!
//! Custom extensions are lifted directly from the decoded structure
//! into an [`Extensions`] map. For each unnamed extension the value is
//! the extension OCTET STRING content with its inner DER tag and
//! length header skipped — the same bytes a text rendering hides
//! behind the two-character indent that [`crate::dump`] strips.

use core::fmt;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use const_oid::ObjectIdentifier;
use der::asn1::{BitString, GeneralizedTime, OctetString, UintRef, UtcTime};
use der::{DateTime, Decode, DecodeValue, FixedTag, Header, Reader, Tag, TagMode, TagNumber, Tagged};
use log::debug;

use crate::error::{Error, Result};
use crate::extensions::Extensions;
use crate::oid::Oid;
use crate::schema::{self, Entitlement, Product};

// ============================================================================
// DN attribute OIDs - RFC 5280 Appendix A.1
// ============================================================================

/// Common Name (CN) - 2.5.4.3
const CN: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// Serial Number - 2.5.4.5
const SERIAL_NUMBER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.5");

/// Country (C) - 2.5.4.6
const COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");

/// Locality (L) - 2.5.4.7
const LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");

/// State or Province (ST) - 2.5.4.8
const STATE_OR_PROVINCE_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");

/// Organization (O) - 2.5.4.10
const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// Organizational Unit (OU) - 2.5.4.11
const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Domain Component (DC) - 0.9.2342.19200300.100.1.25
const DOMAIN_COMPONENT: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.25");

/// Email Address - 1.2.840.113549.1.9.1
const EMAIL_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.1");

/// Prefix of the standard extension arc (2.5.29). Extensions under it
/// are named by generic tooling and are not part of the custom set.
const STANDARD_EXTENSION_ARC: &str = "2.5.29.";

// ============================================================================
// DateRange
// ============================================================================

/// A certificate's validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    begin: DateTime,
    end: DateTime,
}

impl DateRange {
    /// Create a new range.
    pub fn new(begin: DateTime, end: DateTime) -> Self {
        Self { begin, end }
    }

    /// Start of the window (notBefore).
    pub fn begin(&self) -> DateTime {
        self.begin
    }

    /// End of the window (notAfter).
    pub fn end(&self) -> DateTime {
        self.end
    }

    /// True if `t` falls within the window (inclusive on both ends).
    pub fn contains(&self, t: &DateTime) -> bool {
        self.begin.unix_duration() <= t.unix_duration()
            && t.unix_duration() <= self.end.unix_duration()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Begin: {}", self.begin)?;
        write!(f, "End: {}", self.end)
    }
}

// ============================================================================
// Certificate
// ============================================================================

/// A decoded certificate with its custom extension map.
///
/// Equality and ordering compare the expiry date only — certificates
/// sort by how soon they lapse, matching how entitlement stores pick
/// the freshest certificate for a product.
#[derive(Debug, Clone)]
pub struct Certificate {
    serial: String,
    subject: BTreeMap<String, String>,
    range: DateRange,
    extensions: Extensions,
}

impl Certificate {
    /// Parse a certificate from a PEM-encoded string.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let (label, der_bytes) = pem_rfc7468::decode_vec(pem.as_bytes())?;
        if label != "CERTIFICATE" {
            return Err(Error::invalid_pem(format!(
                "expected CERTIFICATE, found {}",
                label
            )));
        }
        Self::from_der(&der_bytes)
    }

    /// Parse a certificate from DER-encoded bytes.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self> {
        let mut reader = der::SliceReader::new(der_bytes)?;
        let header = Header::decode(&mut reader)?;
        header.tag.assert_eq(Tag::Sequence)?;

        let tbs = reader.read_nested(header.length, |r| {
            let tbs = decode_tbs(r)?;
            let _signature_algorithm = der::Any::decode(r)?;
            let _signature = der::Any::decode(r)?;
            Ok(tbs)
        })?;

        let extensions = custom_extensions(&tbs.extensions);
        debug!(
            "decoded certificate serial={} with {} custom extensions",
            decimal(&tbs.serial),
            extensions.len()
        );

        Ok(Self {
            serial: decimal(&tbs.serial),
            subject: tbs.subject,
            range: DateRange::new(tbs.not_before, tbs.not_after),
            extensions,
        })
    }

    /// The serial number, rendered in decimal.
    pub fn serial_number(&self) -> &str {
        &self.serial
    }

    /// Subject DN fields, keyed by short attribute name (CN, O, ...).
    pub fn subject(&self) -> &BTreeMap<String, String> {
        &self.subject
    }

    /// The validity window.
    pub fn valid_range(&self) -> &DateRange {
        &self.range
    }

    /// True if the certificate is currently within its validity window.
    pub fn valid_now(&self) -> Result<bool> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::malformed(format!("system clock: {}", e)))?;
        let now = DateTime::from_unix_duration(now)?;
        Ok(self.range.contains(&now))
    }

    /// The custom extension map.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// The extension map with the vendor base OID trimmed away, so
    /// schema-relative OIDs become directly addressable.
    pub fn trimmed_extensions(&self) -> Extensions {
        self.extensions.ltrim(Oid::new(schema::REDHAT).len())
    }

    /// The product defined in this certificate, if any.
    pub fn product(&self) -> Option<Product> {
        schema::find_product(&self.trimmed_extensions())
    }

    /// The entitlements defined in this certificate.
    pub fn entitlements(&self) -> Vec<Entitlement> {
        schema::find_entitlements(&self.trimmed_extensions())
    }
}

impl PartialEq for Certificate {
    /// Certificates compare by expiry date; see the type docs.
    fn eq(&self, other: &Self) -> bool {
        self.range.end().unix_duration() == other.range.end().unix_duration()
    }
}

impl Eq for Certificate {}

impl PartialOrd for Certificate {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Certificate {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.range
            .end()
            .unix_duration()
            .cmp(&other.range.end().unix_duration())
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Serial#: {}", self.serial)?;
        for (name, value) in &self.subject {
            writeln!(f, "{}: {}", name, value)?;
        }
        writeln!(f, "{}", self.range)?;
        write!(f, "{}", self.extensions)
    }
}

// ============================================================================
// TBSCertificate reading
// ============================================================================

struct TbsFields {
    serial: Vec<u8>,
    subject: BTreeMap<String, String>,
    not_before: DateTime,
    not_after: DateTime,
    extensions: Vec<RawExtension>,
}

fn decode_tbs<'a, R: Reader<'a>>(r: &mut R) -> der::Result<TbsFields> {
    let header = Header::decode(r)?;
    header.tag.assert_eq(Tag::Sequence)?;
    r.read_nested(header.length, |r| {
        let _version = r.context_specific::<UintRef<'a>>(TagNumber::N0, TagMode::Explicit)?;
        let serial = UintRef::decode(r)?.as_bytes().to_vec();
        let _signature_algorithm = der::Any::decode(r)?;
        let _issuer = der::Any::decode(r)?;
        let (not_before, not_after) = decode_validity(r)?;
        let subject = decode_name(r)?;
        let _spki = der::Any::decode(r)?;
        let _issuer_unique_id = r.context_specific::<BitString>(TagNumber::N1, TagMode::Implicit)?;
        let _subject_unique_id =
            r.context_specific::<BitString>(TagNumber::N2, TagMode::Implicit)?;
        let extensions = r
            .context_specific::<RawExtensions>(TagNumber::N3, TagMode::Explicit)?
            .unwrap_or_default();

        Ok(TbsFields {
            serial,
            subject,
            not_before,
            not_after,
            extensions: extensions.0,
        })
    })
}

fn decode_validity<'a, R: Reader<'a>>(r: &mut R) -> der::Result<(DateTime, DateTime)> {
    let header = Header::decode(r)?;
    header.tag.assert_eq(Tag::Sequence)?;
    r.read_nested(header.length, |r| {
        let not_before = decode_time(r)?;
        let not_after = decode_time(r)?;
        Ok((not_before, not_after))
    })
}

fn decode_time<'a, R: Reader<'a>>(r: &mut R) -> der::Result<DateTime> {
    let header = Header::decode(r)?;
    match header.tag {
        Tag::UtcTime => Ok(UtcTime::decode_value(r, header)?.to_date_time()),
        Tag::GeneralizedTime => Ok(GeneralizedTime::decode_value(r, header)?.to_date_time()),
        tag => Err(der::Error::from(der::ErrorKind::TagUnexpected {
            expected: Some(Tag::UtcTime),
            actual: tag,
        })),
    }
}

/// Flatten a Name (RDNSequence) into short-name keyed attributes.
/// The first occurrence of an attribute wins.
fn decode_name<'a, R: Reader<'a>>(r: &mut R) -> der::Result<BTreeMap<String, String>> {
    let header = Header::decode(r)?;
    header.tag.assert_eq(Tag::Sequence)?;

    let mut attrs = BTreeMap::new();
    r.read_nested(header.length, |seq| {
        while !seq.is_finished() {
            let set_header = Header::decode(seq)?;
            set_header.tag.assert_eq(Tag::Set)?;
            seq.read_nested(set_header.length, |set| {
                while !set.is_finished() {
                    let atv_header = Header::decode(set)?;
                    atv_header.tag.assert_eq(Tag::Sequence)?;
                    set.read_nested(atv_header.length, |atv| {
                        let oid = ObjectIdentifier::decode(atv)?;
                        let value = der::Any::decode(atv)?;
                        if let Some(s) = string_value(&value) {
                            attrs.entry(attr_name(&oid)).or_insert(s);
                        }
                        Ok(())
                    })?;
                }
                Ok(())
            })?;
        }
        Ok(())
    })?;
    Ok(attrs)
}

fn string_value(value: &der::Any) -> Option<String> {
    match value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String | Tag::TeletexString => {
            Some(String::from_utf8_lossy(value.value()).into_owned())
        }
        _ => None,
    }
}

const ATTR_NAMES: &[(ObjectIdentifier, &str)] = &[
    (CN, "CN"),
    (SERIAL_NUMBER, "SERIALNUMBER"),
    (COUNTRY_NAME, "C"),
    (LOCALITY_NAME, "L"),
    (STATE_OR_PROVINCE_NAME, "ST"),
    (ORGANIZATION_NAME, "O"),
    (ORGANIZATIONAL_UNIT_NAME, "OU"),
    (DOMAIN_COMPONENT, "DC"),
    (EMAIL_ADDRESS, "emailAddress"),
];

fn attr_name(oid: &ObjectIdentifier) -> String {
    ATTR_NAMES
        .iter()
        .find(|(known, _)| known == oid)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| oid.to_string())
}

// ============================================================================
// Raw v3 extensions
// ============================================================================

struct RawExtension {
    oid: ObjectIdentifier,
    value: Vec<u8>,
}

impl<'a> DecodeValue<'a> for RawExtension {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |r| {
            let oid = ObjectIdentifier::decode(r)?;
            if r.peek_tag()? == Tag::Boolean {
                let _critical = bool::decode(r)?;
            }
            let value = OctetString::decode(r)?.into_bytes();
            Ok(Self { oid, value })
        })
    }
}

impl FixedTag for RawExtension {
    const TAG: Tag = Tag::Sequence;
}

#[derive(Default)]
struct RawExtensions(Vec<RawExtension>);

impl<'a> DecodeValue<'a> for RawExtensions {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |r| {
            let mut extensions = Vec::new();
            while !r.is_finished() {
                extensions.push(RawExtension::decode(r)?);
            }
            Ok(Self(extensions))
        })
    }
}

impl FixedTag for RawExtensions {
    const TAG: Tag = Tag::Sequence;
}

/// Build the custom extension map, skipping the standard 2.5.29 arc
/// that generic tooling names instead of dumping.
fn custom_extensions(raw: &[RawExtension]) -> Extensions {
    raw.iter()
        .filter(|ext| !ext.oid.to_string().starts_with(STANDARD_EXTENSION_ARC))
        .map(|ext| {
            let value = String::from_utf8_lossy(inner_content(&ext.value)).into_owned();
            (Oid::new(ext.oid.to_string()), value)
        })
        .collect()
}

/// Content bytes of a DER TLV, with the tag and length header skipped.
/// Handles short- and long-form lengths; anything shorter than a
/// header yields an empty slice.
fn inner_content(tlv: &[u8]) -> &[u8] {
    if tlv.len() < 2 {
        return &[];
    }
    let len_byte = tlv[1];
    if len_byte & 0x80 == 0 {
        tlv.get(2..).unwrap_or(&[])
    } else {
        let n = (len_byte & 0x7F) as usize;
        tlv.get(2 + n..).unwrap_or(&[])
    }
}

/// Render a big-endian unsigned integer in decimal.
fn decimal(bytes: &[u8]) -> String {
    let mut num: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    if num.is_empty() {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while !num.is_empty() {
        let mut rem = 0u32;
        let mut quotient = Vec::with_capacity(num.len());
        for &b in &num {
            let cur = rem * 256 + b as u32;
            let q = (cur / 10) as u8;
            rem = cur % 10;
            if !quotient.is_empty() || q != 0 {
                quotient.push(q);
            }
        }
        digits.push(b'0' + rem as u8);
        num = quotient;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a DER TLV with runtime length bookkeeping.
    fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
        let mut out = vec![tag];
        let len = content.len();
        if len < 0x80 {
            out.push(len as u8);
        } else {
            let len_bytes: Vec<u8> = len
                .to_be_bytes()
                .iter()
                .copied()
                .skip_while(|&b| b == 0)
                .collect();
            out.push(0x80 | len_bytes.len() as u8);
            out.extend_from_slice(&len_bytes);
        }
        out.extend_from_slice(content);
        out
    }

    fn der_oid(s: &str) -> Vec<u8> {
        tlv(0x06, ObjectIdentifier::new_unwrap(s).as_bytes())
    }

    fn atv(oid: &str, tag: u8, value: &[u8]) -> Vec<u8> {
        let mut inner = der_oid(oid);
        inner.extend(tlv(tag, value));
        tlv(0x31, &tlv(0x30, &inner))
    }

    fn extension(oid: &str, critical: bool, octet_content: &[u8]) -> Vec<u8> {
        let mut inner = der_oid(oid);
        if critical {
            inner.extend(tlv(0x01, &[0xFF]));
        }
        inner.extend(tlv(0x04, octet_content));
        tlv(0x30, &inner)
    }

    /// A minimal v3 certificate carrying one custom and one standard
    /// extension.
    fn sample_cert_der() -> Vec<u8> {
        let version = tlv(0xA0, &tlv(0x02, &[0x02]));
        let serial = tlv(0x02, &[0x01, 0x00]);
        let alg = tlv(0x30, &der_oid("1.2.840.10045.4.3.2"));

        let mut issuer_inner = atv("2.5.4.3", 0x0C, b"Test CA");
        issuer_inner.extend(atv("2.5.4.10", 0x0C, b"Candlepin"));
        let issuer = tlv(0x30, &issuer_inner);

        let mut validity_inner = tlv(0x17, b"260101000000Z");
        validity_inner.extend(tlv(0x17, b"360101000000Z"));
        let validity = tlv(0x30, &validity_inner);

        let mut subject_inner = atv("2.5.4.3", 0x0C, b"consumer-uuid");
        subject_inner.extend(atv("2.5.4.6", 0x13, b"US"));
        let subject = tlv(0x30, &subject_inner);

        let spki = tlv(0x30, &der_oid("1.2.840.10045.2.1"));

        let mut exts_inner = extension("2.5.29.19", true, &tlv(0x30, &[]));
        exts_inner.extend(extension(
            "1.3.6.1.4.1.2312.2.7.1",
            false,
            &tlv(0x0C, b"Awesome OS"),
        ));
        let exts = tlv(0xA3, &tlv(0x30, &exts_inner));

        let mut tbs_inner = Vec::new();
        for piece in [version, serial, alg.clone(), issuer, validity, subject, spki, exts] {
            tbs_inner.extend(piece);
        }
        let tbs = tlv(0x30, &tbs_inner);

        let mut cert_inner = tbs;
        cert_inner.extend(alg);
        cert_inner.extend(tlv(0x03, &[0x00, 0x01]));
        tlv(0x30, &cert_inner)
    }

    #[test]
    fn test_decode_certificate_fields() {
        let cert = Certificate::from_der(&sample_cert_der()).unwrap();

        assert_eq!(cert.serial_number(), "256");
        assert_eq!(cert.subject().get("CN").map(String::as_str), Some("consumer-uuid"));
        assert_eq!(cert.subject().get("C").map(String::as_str), Some("US"));
        assert_eq!(cert.extensions().len(), 1);
        assert_eq!(
            cert.extensions().get("1.3.6.1.4.1.2312.2.7.1"),
            Some("Awesome OS")
        );
        // 2.5.29.19 is a standard extension and must not appear
        assert_eq!(cert.extensions().get("2.5.29.19"), None);
    }

    #[test]
    fn test_validity_window() {
        let cert = Certificate::from_der(&sample_cert_der()).unwrap();
        let range = cert.valid_range();
        assert!(range.begin().unix_duration() < range.end().unix_duration());
        assert!(range.contains(&range.begin()));
        assert!(range.contains(&range.end()));
        assert!(cert.valid_now().unwrap());
    }

    #[test]
    fn test_product_lookup_through_branch() {
        let cert = Certificate::from_der(&sample_cert_der()).unwrap();
        let trimmed = cert.trimmed_extensions();
        assert_eq!(trimmed.get("2.7.1"), Some("Awesome OS"));

        let product = cert.product().unwrap();
        assert_eq!(product.name(), Some("Awesome OS"));
    }

    #[test]
    fn test_from_pem_rejects_wrong_label() {
        let pem = pem_rfc7468::encode_string("PUBLIC KEY", pem_rfc7468::LineEnding::LF, &[0x30, 0x00])
            .unwrap();
        assert!(matches!(
            Certificate::from_pem(&pem),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_from_pem_round_trip() {
        let der_bytes = sample_cert_der();
        let pem =
            pem_rfc7468::encode_string("CERTIFICATE", pem_rfc7468::LineEnding::LF, &der_bytes)
                .unwrap();
        let cert = Certificate::from_pem(&pem).unwrap();
        assert_eq!(cert.serial_number(), "256");
    }

    #[test]
    fn test_ordering_by_expiry() {
        let near = Certificate::from_der(&sample_cert_der()).unwrap();
        let mut far = near.clone();
        far.range = DateRange::new(
            near.range.begin(),
            DateTime::from_unix_duration(
                near.range.end().unix_duration() + core::time::Duration::from_secs(86400),
            )
            .unwrap(),
        );
        assert!(near < far);
        assert_ne!(near, far);
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal(&[]), "0");
        assert_eq!(decimal(&[0x00]), "0");
        assert_eq!(decimal(&[0x0A]), "10");
        assert_eq!(decimal(&[0x01, 0x00]), "256");
        assert_eq!(decimal(&[0x01, 0x00, 0x00]), "65536");
        assert_eq!(decimal(&[0xFF, 0xFF, 0xFF, 0xFF]), "4294967295");
    }

    #[test]
    fn test_inner_content() {
        assert_eq!(inner_content(&[]), &[] as &[u8]);
        assert_eq!(inner_content(&[0x0C]), &[] as &[u8]);
        assert_eq!(inner_content(&[0x0C, 0x02, 0x68, 0x69]), b"hi");

        // long form: 0x81 means one length byte follows
        let mut long = vec![0x0C, 0x81, 0x03];
        long.extend_from_slice(b"abc");
        assert_eq!(inner_content(&long), b"abc");
    }
}
