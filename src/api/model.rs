use std::collections::BTreeMap;
use std::fmt::Display;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::RecordType;

/// Response returned by Porkbun's `/ping` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    pub your_ip: IpAddr,
}

/// Response returned by `/domain/listAll`.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainListResponse {
    #[serde(default)]
    pub domains: Vec<Domain>,
}

/// A domain registered to the account. Porkbun reports dates as `YYYY-MM-DD HH:MM:SS` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    #[serde(rename = "domain")]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tld: String,
    #[serde(default, with = "primitive_as_string::option")]
    pub create_date: Option<String>,
    #[serde(default, with = "primitive_as_string::option")]
    pub expire_date: Option<String>,
    #[serde(default, with = "flexible_bool")]
    pub auto_renew: bool,
}

/// Response returned by `/pricing/get`: one price sheet per TLD.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingResponse {
    #[serde(default)]
    pub pricing: BTreeMap<String, Pricing>,
}

impl PricingResponse {
    /// Finds the price sheet for the given domain's TLD, preferring the longest matching suffix (so that `co.uk` wins
    /// over `uk` for `example.co.uk`).
    pub fn for_domain(&self, domain: &str) -> Option<&Pricing> {
        let domain = domain.trim_end_matches('.').to_ascii_lowercase();
        let mut rest = domain.as_str();
        while let Some((_, suffix)) = rest.split_once('.') {
            if let Some(pricing) = self.pricing.get(suffix) {
                return Some(pricing);
            }
            rest = suffix;
        }
        None
    }
}

/// Prices (in USD) for a single TLD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default, with = "primitive_as_string::option")]
    pub registration: Option<String>,
    #[serde(default, with = "primitive_as_string::option")]
    pub renewal: Option<String>,
    #[serde(default, with = "primitive_as_string::option")]
    pub transfer: Option<String>,
}

/// Pricing for one specific domain, as reported by [`PorkbunClient::check_domain`][super::PorkbunClient::check_domain].
#[derive(Debug, Clone, Serialize)]
pub struct DomainPricing {
    pub domain: String,
    pub pricing: Option<Pricing>,
}

/// Response returned by `/domain/create`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCreateResponse {
    #[serde(default, with = "primitive_as_string::option")]
    pub invoice_id: Option<String>,
}

/// Response returned by `/domain/getNs`.
#[derive(Debug, Clone, Deserialize)]
pub struct NameserverResponse {
    #[serde(default)]
    pub ns: Vec<String>,
}

/// Response returned by `/ssl/retrieve`. Porkbun names these fields without any word separators. The public key is
/// also sent, but it can be derived from the private key and isn't kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SslBundle {
    #[serde(default, rename = "certificatechain")]
    pub certificate_chain: String,
    #[serde(default, rename = "privatekey")]
    pub private_key: String,
    #[serde(default, rename = "intermediatecertificate")]
    pub intermediate_certificate: String,
}

/// Response returned by Porkbun's `/create` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    #[serde(with = "primitive_as_string")]
    pub id: String,
}

/// Response returned by endpoints that have no fields other than the base `status` field. An empty, but non-unit,
/// struct is needed to get serde to parse the response correctly.
#[derive(Debug, Clone, Deserialize)]
pub struct EmptyResponse {}

/// Response returned by Porkbun's `/retrieve` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponse {
    #[serde(default)]
    pub records: Vec<DNSRecord>,
}

/// A record type as Porkbun reports it. Types this client can't create are still listed, under their own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordKind {
    Known(RecordType),
    Other(String),
}

impl RecordKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(typ) => typ.as_str(),
            Self::Other(name) => name,
        }
    }

    pub fn known(&self) -> Option<RecordType> {
        match self {
            Self::Known(typ) => Some(*typ),
            Self::Other(_) => None,
        }
    }
}

impl From<RecordType> for RecordKind {
    fn from(value: RecordType) -> Self {
        Self::Known(value)
    }
}

impl From<String> for RecordKind {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(typ) => Self::Known(typ),
            Err(_) => {
                log::debug!("Porkbun reported an unfamiliar record type '{value}'");
                Self::Other(value)
            },
        }
    }
}

impl From<RecordKind> for String {
    fn from(value: RecordKind) -> Self {
        match value {
            RecordKind::Known(typ) => typ.into(),
            RecordKind::Other(name) => name,
        }
    }
}

impl PartialEq<RecordType> for RecordKind {
    fn eq(&self, other: &RecordType) -> bool {
        self.known() == Some(*other)
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single Porkbun DNS record. `name` is always fully-qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DNSRecord {
    #[serde(with = "primitive_as_string")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub typ: RecordKind,
    pub content: String,
    #[serde(default, with = "optional_or_stringified_number")]
    pub ttl: Option<u32>,
    #[serde(default, with = "optional_or_stringified_number")]
    pub prio: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response returned by `/domain/getUrlForwarding`.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlForwardListResponse {
    #[serde(default)]
    pub forwards: Vec<UrlForward>,
}

/// A URL forward configured on a domain. An empty `subdomain` means the root of the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlForward {
    #[serde(with = "primitive_as_string")]
    pub id: String,
    #[serde(default)]
    pub subdomain: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: ForwardKind,
    #[serde(default, with = "flexible_bool")]
    pub include_path: bool,
    #[serde(default, with = "flexible_bool")]
    pub wildcard: bool,
}

/// Which kind of HTTP redirect a [`UrlForward`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardKind {
    /// HTTP 301.
    Permanent,
    /// HTTP 302/307.
    Temporary,
}

impl ForwardKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Temporary => "temporary",
        }
    }

    /// Picks the forward kind for an HTTP status code. Only `301` is permanent; everything else Porkbun treats as a
    /// temporary redirect.
    pub fn from_status(code: u16) -> Self {
        if code == 301 { Self::Permanent } else { Self::Temporary }
    }
}

impl Display for ForwardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Porkbun's spelling of booleans in request payloads.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// A `serde(with)` module that handles a `u32` which may or may not be present, and which may or may not be
/// stringified. Serialization always produces a plain number or `null`.
pub mod optional_or_stringified_number {
    use serde::{Deserializer, Serializer, de};

    #[derive(Debug)]
    struct Visitor;

    impl Visitor {
        /// Tries to convert the given value into a `u32`. If the conversion fails for any reason, the error message is
        /// always "integer out of range".
        fn try_int<T: TryInto<u32>, E: de::Error>(self, x: T) -> Result<u32, E> {
            x.try_into().map_err(|_| de::Error::custom("integer out of range"))
        }
    }

    #[rustfmt::skip]
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an integer, a string, or null")
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            self.visit_none()
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                Ok(None)
            } else {
                let i = v.parse::<i64>().map_err(de::Error::custom)?;
                self.try_int(i).map(Some)
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { self.try_int(v).map(Some) }
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> { self.try_int(v).map(Some) }
    }

    /// Deserializes a `u32` which may be a string and which may also be absent.
    pub fn deserialize<'de, D>(d: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(Visitor)
    }

    pub fn serialize<S>(val: &Option<u32>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *val {
            Some(n) => s.serialize_u32(n),
            None => s.serialize_none(),
        }
    }
}

/// A `serde(with)` module that supports deserializing any primitive type into a string. Porkbun is not consistent
/// about whether IDs come back as numbers or strings.
pub mod primitive_as_string {
    use serde::{Deserializer, Serializer, de};

    #[derive(Debug)]
    struct Visitor;

    #[rustfmt::skip]
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a primitive value or a string")
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> { Ok(v) }
        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> { Ok(v.to_string()) }
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> { Ok(v.to_string()) }
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(v.to_string()) }
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> { Ok(v.to_string()) }
        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> { Ok(v.to_string()) }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(Visitor)
    }

    pub fn serialize<S>(val: &str, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(val)
    }

    /// The same as the parent module, but for values that may be `null` or missing entirely. Empty strings count as
    /// missing.
    pub mod option {
        use serde::{Deserializer, Serializer, de};

        struct OptionVisitor;

        impl<'de> de::Visitor<'de> for OptionVisitor {
            type Value = Option<String>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a primitive value, a string, or null")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
                let str = super::deserialize(deserializer)?;
                Ok(Some(str).filter(|s| !s.is_empty()))
            }
        }

        pub fn deserialize<'de, D>(d: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            d.deserialize_option(OptionVisitor)
        }

        pub fn serialize<S>(val: &Option<String>, s: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match val {
                Some(str) => s.serialize_str(str),
                None => s.serialize_none(),
            }
        }
    }
}

/// A `serde(with)` module for Porkbun's many spellings of a boolean: real booleans, `0`/`1` (as numbers or strings),
/// and `"yes"`/`"no"`. Serializes as a plain boolean.
pub mod flexible_bool {
    use serde::{Deserializer, Serializer, de};

    struct Visitor;

    #[rustfmt::skip]
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a boolean, 0/1, \"yes\"/\"no\", or null")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> { Ok(v) }
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> { Ok(v != 0) }
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(v != 0) }
        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> { Ok(false) }
        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> { Ok(false) }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" | "on" => Ok(true),
                "no" | "false" | "0" | "off" | "" => Ok(false),
                other => Err(de::Error::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(Visitor)
    }

    pub fn serialize<S>(val: &bool, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_bool(*val)
    }
}
