//! Webhook signatures
//!
//! Webhook deliveries carry a `Do-Signature` header holding a signature
//! package: a timestamp and one or more signatures, e.g.
//!
//! ```text
//! t=946720800,v1=b70100cf...,v1=817555f4...
//! ```
//!
//! A package verifies when its timestamp is within the tolerance and at
//! least one signature from a trusted scheme matches the payload.

use chrono::{DateTime, TimeZone, Utc};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use reqwest::header::HeaderMap;
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const HEADER_SIGNATURE: &str = "Do-Signature";
pub const HEADER_EVENT_NAME: &str = "Do-Event-Name";

/// Maximum signature age unless [`VerifyOptions::tolerance`] says otherwise.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(3 * 60);

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("signature has expired")]
    Expired,

    #[error("no verified signature")]
    NoVerifiedSignature,

    #[error("payload not signed")]
    NotSigned,

    /// The package or one of its signatures could not be parsed.
    #[error("{0}")]
    Invalid(String),

    #[error("parsing signature header: {0}")]
    Header(String),
}

fn invalid(msg: impl Into<String>) -> WebhookError {
    WebhookError::Invalid(msg.into())
}

/// Supported signature schemes, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    /// Hex HMAC-SHA256 of `{unix timestamp}.{payload}`
    V1,
}

impl SignatureScheme {
    pub const ALL: [SignatureScheme; 1] = [SignatureScheme::V1];
    pub const CURRENT: SignatureScheme = SignatureScheme::V1;

    pub fn version(self) -> u32 {
        match self {
            SignatureScheme::V1 => 1,
        }
    }

    pub fn from_version(version: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.version() == version)
    }

    pub fn sign(self, at: DateTime<Utc>, payload: &[u8], secret: &str) -> String {
        match self {
            SignatureScheme::V1 => hex::encode(v1_mac(at, payload, secret).finalize().into_bytes()),
        }
    }

    /// Check `value` in constant time.
    fn verify(self, value: &str, at: DateTime<Utc>, payload: &[u8], secret: &str) -> bool {
        match self {
            SignatureScheme::V1 => match hex::decode(value) {
                Ok(expected) => v1_mac(at, payload, secret).verify_slice(&expected).is_ok(),
                Err(_) => false,
            },
        }
    }
}

fn v1_mac(at: DateTime<Utc>, payload: &[u8], secret: &str) -> HmacSha256 {
    let mut mac = <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(at.timestamp().to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// One `v<N>=<value>` entry of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub scheme: SignatureScheme,
    pub value: String,
}

impl Signature {
    pub fn new(scheme: SignatureScheme, at: DateTime<Utc>, payload: &[u8], secret: &str) -> Self {
        Self {
            scheme,
            value: scheme.sign(at, payload, secret),
        }
    }

    /// Verify against the timestamp the signature was produced with.
    pub fn verify(&self, payload: &[u8], secret: &str, at: DateTime<Utc>) -> Result<(), WebhookError> {
        if self.scheme.verify(&self.value, at, payload, secret) {
            Ok(())
        } else {
            Err(WebhookError::NoVerifiedSignature)
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}={}", self.scheme.version(), self.value)
    }
}

impl FromStr for Signature {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (version, value) = s
            .split_once('=')
            .ok_or_else(|| invalid("invalid signature format"))?;
        let version = version
            .strip_prefix('v')
            .ok_or_else(|| invalid("invalid signature format"))?;
        let version: u32 = version
            .parse()
            .map_err(|_| invalid("signature scheme version must be an integer"))?;
        let scheme = SignatureScheme::from_version(version)
            .ok_or_else(|| invalid(format!("invalid signature scheme version {}", version)))?;

        Ok(Self {
            scheme,
            value: value.to_string(),
        })
    }
}

/// A timestamp plus the signatures made over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePackage {
    pub timestamp: DateTime<Utc>,
    pub signatures: Vec<Signature>,
}

/// Options for [`SignaturePackage::verify`].
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Maximum signature age. [`DEFAULT_TOLERANCE`] when unset or zero.
    pub tolerance: Option<Duration>,
    pub ignore_tolerance: bool,
    /// Override of the current time
    pub now: Option<DateTime<Utc>>,
    pub untrusted_schemes: Vec<SignatureScheme>,
}

impl SignaturePackage {
    /// Sign `payload` with every scheme and every secret.
    pub fn new(at: DateTime<Utc>, payload: &[u8], secrets: &[&str]) -> Self {
        let signatures = SignatureScheme::ALL
            .into_iter()
            .flat_map(|scheme| {
                secrets
                    .iter()
                    .map(move |secret| Signature::new(scheme, at, payload, secret))
            })
            .collect();

        Self {
            timestamp: truncate_to_seconds(at),
            signatures,
        }
    }

    pub fn verify(&self, payload: &[u8], secret: &str, opts: &VerifyOptions) -> Result<(), WebhookError> {
        if !opts.ignore_tolerance {
            let now = opts.now.unwrap_or_else(Utc::now);
            let tolerance = opts
                .tolerance
                .filter(|t| !t.is_zero())
                .unwrap_or(DEFAULT_TOLERANCE);
            let age = now.signed_duration_since(self.timestamp);
            if age.to_std().is_ok_and(|age| age > tolerance) {
                return Err(WebhookError::Expired);
            }
        }

        if self.signatures.is_empty() {
            return Err(WebhookError::NotSigned);
        }

        let verified = self
            .signatures
            .iter()
            .filter(|s| !opts.untrusted_schemes.contains(&s.scheme))
            .any(|s| s.verify(payload, secret, self.timestamp).is_ok());

        if verified {
            Ok(())
        } else {
            Err(WebhookError::NoVerifiedSignature)
        }
    }
}

impl fmt::Display for SignaturePackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.timestamp.timestamp())?;
        for sig in &self.signatures {
            write!(f, ",{}", sig)?;
        }
        Ok(())
    }
}

impl FromStr for SignaturePackage {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for pair in s.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid("invalid signature package"))?;

            if key == "t" {
                if timestamp.is_some() {
                    return Err(invalid("timestamp cannot be specified multiple times"));
                }
                let secs: i64 = value
                    .parse()
                    .map_err(|_| invalid("timestamp must be an integer"))?;
                let at = Utc
                    .timestamp_opt(secs, 0)
                    .single()
                    .ok_or_else(|| invalid("timestamp must be an integer"))?;
                timestamp = Some(at);
            } else {
                signatures.push(pair.parse()?);
            }
        }

        let timestamp = timestamp.ok_or_else(|| invalid("missing timestamp"))?;
        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

fn truncate_to_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(at.timestamp(), 0).single().unwrap_or(at)
}

/// `Do-Signature` value for `payload` signed with one secret.
pub fn sign(secret: &str, payload: &[u8], at: DateTime<Utc>) -> String {
    SignaturePackage::new(at, payload, &[secret]).to_string()
}

/// Verify a raw `Do-Signature` header value.
pub fn verify(secret: &str, payload: &[u8], header: &str, opts: &VerifyOptions) -> Result<(), WebhookError> {
    let package: SignaturePackage = header.parse()?;
    package.verify(payload, secret, opts)
}

/// Verify a delivery from its headers and body.
pub fn verify_request(
    secret: &str,
    headers: &HeaderMap,
    body: &[u8],
    opts: &VerifyOptions,
) -> Result<(), WebhookError> {
    let header = match headers.get(HEADER_SIGNATURE) {
        Some(value) => value
            .to_str()
            .map_err(|_| WebhookError::Header("invalid signature package".to_string()))?,
        None => return Err(WebhookError::NotSigned),
    };
    if header.is_empty() {
        return Err(WebhookError::NotSigned);
    }

    let package: SignaturePackage = header
        .parse()
        .map_err(|e: WebhookError| WebhookError::Header(e.to_string()))?;
    package.verify(body, secret, opts)
}

/// Namespaced event name, e.g. `droplet.create`.
pub fn event_name(namespace: &str, name: &str) -> String {
    format!("{}.{}", namespace, name)
}
