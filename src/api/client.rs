use std::net::IpAddr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map as JsonMap, Value as JsonValue, json};

use super::model::{
    CreateResponse, DNSRecord, Domain, DomainCreateResponse, DomainListResponse, DomainPricing, EmptyResponse,
    ForwardKind, NameserverResponse, PingResponse, PricingResponse, RetrieveResponse, SslBundle, UrlForward,
    UrlForwardListResponse, yes_no,
};
use super::transport::{HttpTransport, Transport};
use super::{BASE_URL, Error, RecordType, Result, fully_qualified};
use crate::config::Credentials;

type JsonObject = JsonMap<String, JsonValue>;

/// The access point to the Porkbun API.
///
/// One client is built per process run and handed by reference to whatever needs it. It never caches anything between
/// calls: every method is exactly one round trip (or two, for [`upsert_record`][Self::upsert_record]).
pub struct PorkbunClient {
    transport: Box<dyn Transport>,
    base_url: String,
    credentials: Option<Credentials>,
}

/// The user-supplied parts of a DNS record, as sent to `/dns/create` and `/dns/edit`.
///
/// `name` is the subdomain only (`None` or empty for the root of the domain). `prio` and `ttl` are left out of the
/// request entirely when `None`, which lets Porkbun apply its defaults instead of receiving an unintended zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    pub typ: RecordType,
    pub content: String,
    pub name: Option<String>,
    pub prio: Option<u32>,
    pub ttl: Option<u32>,
}

impl RecordSpec {
    pub fn new(typ: RecordType, content: impl Into<String>) -> Self {
        Self {
            typ,
            content: content.into(),
            name: None,
            prio: None,
            ttl: None,
        }
    }

    pub fn name(mut self, name: Option<impl Into<String>>) -> Self {
        self.name = name.map(Into::into).filter(|n: &String| !n.is_empty());
        self
    }

    pub fn prio(mut self, prio: Option<u32>) -> Self {
        self.prio = prio;
        self
    }

    pub fn ttl(mut self, ttl: Option<u32>) -> Self {
        self.ttl = ttl;
        self
    }

    /// The fully-qualified name Porkbun will report for this record on the given domain.
    pub fn fqdn(&self, domain: &str) -> String {
        fully_qualified(self.name.as_deref(), domain)
    }

    fn payload(&self) -> JsonValue {
        let mut payload = json!({
            "type": self.typ,
            "content": self.content,
        });

        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            payload["name"] = json!(name);
        }
        if let Some(prio) = self.prio {
            payload["prio"] = json!(prio.to_string());
        }
        if let Some(ttl) = self.ttl {
            payload["ttl"] = json!(ttl.to_string());
        }

        payload
    }
}

/// What [`PorkbunClient::upsert_record`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created { id: String },
    Updated { id: String },
}

impl UpsertOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Created { id } | Self::Updated { id } => id,
        }
    }
}

impl PorkbunClient {
    /// Creates a client that talks to the real Porkbun API over HTTPS.
    pub fn new(credentials: Option<Credentials>) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, BASE_URL, credentials))
    }

    /// Creates a client on top of any [`Transport`], rooted at any base URL.
    pub fn with_transport(
        transport: impl Transport + 'static,
        base_url: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Whether this client has a complete key pair. Calls made without one fail before touching the network.
    pub fn has_credentials(&self) -> bool {
        self.credentials.as_ref().is_some_and(Credentials::is_complete)
    }

    /// Checks that the credentials work, returning the public IP address Porkbun sees.
    pub async fn ping(&self) -> Result<IpAddr> {
        let res = self.request::<PingResponse>("ping", json!({})).await?;
        Ok(res.your_ip)
    }

    /// Lists every domain in the account.
    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        let res = self.request::<DomainListResponse>("domain/listAll", json!({})).await?;
        Ok(res.domains)
    }

    /// Looks up registration, renewal and transfer prices for the given domain's TLD.
    pub async fn check_domain(&self, domain: &str) -> Result<DomainPricing> {
        let res = self.request::<PricingResponse>(&format!("pricing/get/{domain}"), json!({})).await?;
        Ok(DomainPricing {
            domain: domain.to_string(),
            pricing: res.for_domain(domain).cloned(),
        })
    }

    /// Registers a new domain. **This charges the account.**
    ///
    /// Returns the invoice ID if Porkbun gave one back.
    pub async fn create_domain(&self, domain: &str, whois_privacy: bool, auto_renew: bool) -> Result<Option<String>> {
        let payload = json!({
            "registrationType": "personal",
            "adminFilingType": "",
            "whoisPrivacy": yes_no(whois_privacy),
            "autoRenew": yes_no(auto_renew),
        });
        let res = self.request::<DomainCreateResponse>(&format!("domain/create/{domain}"), payload).await?;
        Ok(res.invoice_id)
    }

    /// Gets the authoritative nameservers for a domain. An empty list means Porkbun's defaults are in use.
    pub async fn get_nameservers(&self, domain: &str) -> Result<Vec<String>> {
        let res = self.request::<NameserverResponse>(&format!("domain/getNs/{domain}"), json!({})).await?;
        Ok(res.ns)
    }

    /// Replaces the authoritative nameservers for a domain.
    pub async fn update_nameservers(&self, domain: &str, nameservers: &[String]) -> Result<()> {
        let payload = json!({ "ns": nameservers });
        self.request::<EmptyResponse>(&format!("domain/updateNs/{domain}"), payload).await?;
        Ok(())
    }

    /// Retrieves the free SSL certificate bundle Porkbun generates for a domain.
    pub async fn retrieve_ssl(&self, domain: &str) -> Result<SslBundle> {
        self.request(&format!("ssl/retrieve/{domain}"), json!({})).await
    }

    /// Gets all the existing records for the given domain name, in the order Porkbun returns them.
    pub async fn list_records(&self, domain: &str) -> Result<Vec<DNSRecord>> {
        let res = self.request::<RetrieveResponse>(&format!("dns/retrieve/{domain}"), json!({})).await?;
        Ok(res.records)
    }

    /// Creates a new DNS record and returns its ID.
    pub async fn create_record(&self, domain: &str, spec: &RecordSpec) -> Result<String> {
        let res = self.request::<CreateResponse>(&format!("dns/create/{domain}"), spec.payload()).await?;
        Ok(res.id)
    }

    /// Overwrites the record with the given ID.
    pub async fn edit_record(&self, domain: &str, record_id: &str, spec: &RecordSpec) -> Result<()> {
        let endpoint = format!("dns/edit/{domain}/{record_id}");
        self.request::<EmptyResponse>(&endpoint, spec.payload()).await?;
        Ok(())
    }

    /// Deletes the record with the given ID.
    pub async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        let endpoint = format!("dns/delete/{domain}/{record_id}");
        self.request::<EmptyResponse>(&endpoint, json!({})).await?;
        Ok(())
    }

    /// Deletes every record of the given type at the given subdomain (`None` for the root).
    pub async fn delete_records_by_name_type(
        &self,
        domain: &str,
        typ: RecordType,
        subdomain: Option<&str>,
    ) -> Result<()> {
        let mut endpoint = format!("dns/deleteByNameType/{domain}/{typ}");
        if let Some(sub) = subdomain.filter(|s| !s.is_empty()) {
            endpoint.push('/');
            endpoint.push_str(sub);
        }
        self.request::<EmptyResponse>(&endpoint, json!({})).await?;
        Ok(())
    }

    /// Creates the record if no record with the same type and fully-qualified name exists yet, otherwise edits the
    /// first one that matches.
    ///
    /// This is a read followed by a write: anything that changes the zone in between goes unnoticed.
    pub async fn upsert_record(&self, domain: &str, spec: &RecordSpec) -> Result<UpsertOutcome> {
        let records = self.list_records(domain).await?;
        let target = spec.fqdn(domain);

        let existing = records.iter().find(|rec| rec.typ == spec.typ && rec.name == target);
        match existing {
            Some(record) => {
                log::info!("Updating existing record {} ({} {target})", record.id, spec.typ);
                self.edit_record(domain, &record.id, spec).await?;
                Ok(UpsertOutcome::Updated { id: record.id.clone() })
            },
            None => {
                log::info!("Creating new record ({} {target})", spec.typ);
                let id = self.create_record(domain, spec).await?;
                Ok(UpsertOutcome::Created { id })
            },
        }
    }

    /// Lists the URL forwards on a domain.
    pub async fn list_url_forwards(&self, domain: &str) -> Result<Vec<UrlForward>> {
        let endpoint = format!("domain/getUrlForwarding/{domain}");
        let res = self.request::<UrlForwardListResponse>(&endpoint, json!({})).await?;
        Ok(res.forwards)
    }

    /// Adds a URL forward. An empty `subdomain` forwards the root of the domain.
    pub async fn add_url_forward(
        &self,
        domain: &str,
        subdomain: &str,
        location: &str,
        kind: ForwardKind,
        wildcard: bool,
        include_path: bool,
    ) -> Result<()> {
        let mut payload = json!({
            "location": location,
            "type": kind,
            "includePath": yes_no(include_path),
            "wildcard": yes_no(wildcard),
        });
        if !subdomain.is_empty() {
            payload["subdomain"] = json!(subdomain);
        }

        self.request::<EmptyResponse>(&format!("domain/addUrlForwarding/{domain}"), payload).await?;
        Ok(())
    }

    /// Deletes the URL forward with the given ID.
    pub async fn delete_url_forward(&self, domain: &str, forward_id: &str) -> Result<()> {
        let endpoint = format!("domain/deleteUrlForwarding/{domain}/{forward_id}");
        self.request::<EmptyResponse>(&endpoint, json!({})).await?;
        Ok(())
    }

    /// Makes a POST request to Porkbun's API and returns the result parsed from JSON.
    ///
    /// `payload` should be a JSON object; the two API keys are merged into it.
    async fn request<R>(&self, endpoint: &str, payload: JsonValue) -> Result<R>
    where
        R: DeserializeOwned,
    {
        // Checked before anything else so that a missing key pair never turns into network traffic.
        let credentials = self.credentials.as_ref().filter(|c| c.is_complete()).ok_or(Error::Config)?;

        let mut payload = match payload {
            JsonValue::Object(map) => map,
            _ => JsonObject::new(),
        };
        payload.insert("apikey".to_string(), json!(credentials.api_key));
        payload.insert("secretapikey".to_string(), json!(credentials.secret_key));

        let url = format!("{}/{endpoint}", self.base_url);
        log::debug!("Calling Porkbun endpoint /{endpoint}");
        let res = self.transport.post(&url, &JsonValue::Object(payload)).await?;

        let res_json = match serde_json::from_str::<JsonValue>(&res.body) {
            Ok(json) => json,
            Err(_) if !res.is_success() => return Err(Error::Network(format!("HTTP {} from /{endpoint}", res.status))),
            Err(err) => return Err(Error::Network(format!("Porkbun API returned invalid JSON: {err}"))),
        };

        // All Porkbun endpoints should return objects with a 'status'
        match res_json {
            JsonValue::Object(mut map) if map.get_str("status") == Some("SUCCESS") => {
                map.remove("status");
                serde_json::from_value(JsonValue::Object(map))
                    .map_err(|err| Error::InvalidResponse(format!("/{endpoint}: {err}")))
            },
            JsonValue::Object(mut map) if map.get_str("status") == Some("ERROR") => {
                let message = match map.remove("message") {
                    Some(JsonValue::String(msg)) => msg,
                    _ => format!("request to /{endpoint} failed without a message"),
                };
                Err(Error::Api(message))
            },
            _ if !res.is_success() => Err(Error::Network(format!("HTTP {} from /{endpoint}", res.status))),
            json => Err(Error::InvalidResponse(format!("/{endpoint}: {json}"))),
        }
    }
}

trait JsonObjectExt {
    /// Combines [`JsonMap::get`] and [`JsonValue::as_str`] into one method that only returns the value if it both
    /// exists and is a string.
    fn get_str(&self, key: &str) -> Option<&str>;
}

impl JsonObjectExt for JsonObject {
    #[inline]
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(JsonValue::as_str)
    }
}
