mod client;
pub mod model;
pub mod transport;

#[cfg(test)]
pub mod testing;

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::client::{PorkbunClient, RecordSpec, UpsertOutcome};
pub use self::model::{DNSRecord, Domain, ForwardKind, RecordKind, UrlForward};

pub const BASE_URL: &str = "https://api.porkbun.com/api/json/v3";

/// Everything that can go wrong while talking to Porkbun.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials are missing or empty; no request was sent.
    #[error("API key and secret key are required. Run 'porkbun configure' first.")]
    Config,

    /// The request could not be completed at the transport level.
    #[error("Network error: {0}")]
    Network(String),

    /// Porkbun answered with `"status": "ERROR"`. Holds the server's message verbatim.
    #[error("Porkbun API error: {0}")]
    Api(String),

    /// Porkbun answered successfully, but not in the shape we expected.
    #[error("Unexpected response from Porkbun: {0}")]
    InvalidResponse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The DNS record types Porkbun supports.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    ALIAS,
    MX,
    TXT,
    NS,
    SRV,
    TLSA,
    CAA,
    HTTPS,
    SVCB,
    SSHFP,
}

impl RecordType {
    #[rustfmt::skip]
    pub const ALL: [RecordType; 13] = [
        Self::A, Self::AAAA, Self::CNAME, Self::ALIAS, Self::MX, Self::TXT, Self::NS,
        Self::SRV, Self::TLSA, Self::CAA, Self::HTTPS, Self::SVCB, Self::SSHFP,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CNAME => "CNAME",
            Self::ALIAS => "ALIAS",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::NS => "NS",
            Self::SRV => "SRV",
            Self::TLSA => "TLSA",
            Self::CAA => "CAA",
            Self::HTTPS => "HTTPS",
            Self::SVCB => "SVCB",
            Self::SSHFP => "SSHFP",
        }
    }

    /// Whether records of this type carry a priority.
    pub const fn uses_priority(self) -> bool {
        matches!(self, Self::MX | Self::SRV)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported DNS record type '{0}'")]
pub struct UnknownRecordType(pub String);

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    /// Parses a record type case-insensitively, so `mx` and `MX` are the same thing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|typ| typ.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRecordType(s.to_string()))
    }
}

impl TryFrom<String> for RecordType {
    type Error = UnknownRecordType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

/// Joins an optional subdomain onto its apex domain, the way Porkbun reports record names.
pub fn fully_qualified(subdomain: Option<&str>, domain: &str) -> String {
    match subdomain {
        Some(sub) if !sub.is_empty() => format!("{sub}.{domain}"),
        _ => domain.to_string(),
    }
}
