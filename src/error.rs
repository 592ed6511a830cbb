// Copyright (c) 2026 The entitlement-x509 Authors
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Error types for certificate and extension processing.
//!
//! Structural problems (a truncated extension dump, a malformed
//! certificate) are reported through [`Error`]; lookup misses on the
//! extension map are not errors and surface as `Option`/empty results.

use core::fmt;

/// Result type alias for certificate and extension operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type covering dump parsing, certificate decoding and PEM framing
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Structural errors in the textual extension dump
    Parse(ParseError),

    /// Errors during DER/ASN.1 decoding (from the der crate)
    Asn1(der::Error),

    /// PEM framing errors (certificate/key bundles)
    Encoding(EncodingError),

    /// Filesystem errors while reading or writing bundles
    Io(std::io::Error),
}

/// Structural errors in the textual certificate dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An extension section was opened but the closing
    /// `Signature Algorithm:` marker never appeared
    UnterminatedSection,

    /// An OID introducer line was not followed by a value line
    DanglingOid(String),

    /// The certificate structure itself could not be interpreted
    MalformedCertificate(String),
}

/// Errors related to PEM framing of keys and certificates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Invalid PEM encoding
    InvalidPem(String),

    /// A bundle was expected to carry a private key block
    MissingKey,

    /// A bundle was expected to carry a certificate block
    MissingCertificate,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Asn1(e) => write!(f, "ASN.1 error: {}", e),
            Error::Encoding(e) => write!(f, "Encoding error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnterminatedSection => {
                write!(f, "extension section has no 'Signature Algorithm:' terminator")
            }
            ParseError::DanglingOid(oid) => {
                write!(f, "extension {} has no value line", oid)
            }
            ParseError::MalformedCertificate(msg) => {
                write!(f, "malformed certificate: {}", msg)
            }
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::InvalidPem(msg) => write!(f, "Invalid PEM: {}", msg),
            EncodingError::MissingKey => write!(f, "no private key block in bundle"),
            EncodingError::MissingCertificate => write!(f, "no certificate block in bundle"),
        }
    }
}

impl std::error::Error for Error {}

impl From<der::Error> for Error {
    fn from(err: der::Error) -> Self {
        Error::Asn1(err)
    }
}

impl From<pem_rfc7468::Error> for Error {
    fn from(err: pem_rfc7468::Error) -> Self {
        Error::Encoding(EncodingError::InvalidPem(err.to_string()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    /// Create a dangling-OID parse error
    pub fn dangling_oid<S: Into<String>>(oid: S) -> Self {
        Error::Parse(ParseError::DanglingOid(oid.into()))
    }

    /// Create a malformed-certificate parse error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Error::Parse(ParseError::MalformedCertificate(msg.into()))
    }

    /// Create an invalid-PEM encoding error
    pub fn invalid_pem<S: Into<String>>(msg: S) -> Self {
        Error::Encoding(EncodingError::InvalidPem(msg.into()))
    }

    /// Create a missing-key encoding error
    pub fn missing_key() -> Self {
        Error::Encoding(EncodingError::MissingKey)
    }

    /// Create a missing-certificate encoding error
    pub fn missing_certificate() -> Self {
        Error::Encoding(EncodingError::MissingCertificate)
    }
}
