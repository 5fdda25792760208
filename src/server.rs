//! A JSON-RPC 2.0 tool server for agent hosts, speaking newline-delimited JSON over stdin and stdout.
//!
//! Only three methods are understood: `initialize`, `tools/list` and `tools/call`. Every other method, and every
//! message without an `id` (a notification), is read and dropped without a reply. A line that isn't JSON at all ends
//! the session.

use eyre::WrapErr;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value as JsonValue, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::api::model::{optional_or_stringified_number, primitive_as_string};
use crate::api::{PorkbunClient, RecordSpec, RecordType};
use crate::config::{API_KEY_VAR, SECRET_KEY_VAR};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// A JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    ListDomains,
    CheckDomain,
    DnsList,
    DnsUpdate,
    DnsDelete,
}

impl Tool {
    const ALL: [Tool; 5] = [Self::ListDomains, Self::CheckDomain, Self::DnsList, Self::DnsUpdate, Self::DnsDelete];

    const fn name(self) -> &'static str {
        match self {
            Self::ListDomains => "porkbun_list_domains",
            Self::CheckDomain => "porkbun_check_domain",
            Self::DnsList => "porkbun_dns_list",
            Self::DnsUpdate => "porkbun_dns_update",
            Self::DnsDelete => "porkbun_dns_delete",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    fn definition(self) -> JsonValue {
        let domain = json!({ "type": "string", "description": "Domain name (e.g. example.com)" });
        let (description, schema) = match self {
            Self::ListDomains => ("List all domains in the Porkbun account.", json!({
                "type": "object",
                "properties": {},
            })),
            Self::CheckDomain => ("Check if a domain is available and get pricing.", json!({
                "type": "object",
                "properties": { "domain": domain },
                "required": ["domain"],
            })),
            Self::DnsList => ("Get all DNS records for a domain.", json!({
                "type": "object",
                "properties": { "domain": domain },
                "required": ["domain"],
            })),
            Self::DnsUpdate => ("Create a DNS record, or update the existing one with the same type and name.", json!({
                "type": "object",
                "properties": {
                    "domain": domain,
                    "type": {
                        "type": "string",
                        "enum": RecordType::ALL.map(RecordType::as_str),
                        "description": "Record type",
                    },
                    "content": { "type": "string", "description": "Record content (IP address, hostname, text...)" },
                    "name": { "type": "string", "description": "Subdomain (optional, e.g. 'www')" },
                    "prio": { "type": "integer", "description": "Priority (MX and SRV records)" },
                    "ttl": { "type": "integer", "description": "Time to live, in seconds" },
                },
                "required": ["domain", "type", "content"],
            })),
            Self::DnsDelete => ("Delete a DNS record by ID.", json!({
                "type": "object",
                "properties": {
                    "domain": domain,
                    "record_id": { "type": "string", "description": "Record ID, as returned by porkbun_dns_list" },
                },
                "required": ["domain", "record_id"],
            })),
        };

        json!({ "name": self.name(), "description": description, "inputSchema": schema })
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct DomainArgs {
    domain: String,
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
    domain: String,
    #[serde(rename = "type")]
    typ: RecordType,
    content: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, with = "optional_or_stringified_number")]
    prio: Option<u32>,
    #[serde(default, with = "optional_or_stringified_number")]
    ttl: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    domain: String,
    #[serde(with = "primitive_as_string")]
    record_id: String,
}

/// Serves requests from `input` until it closes or sends a line that can't be read as JSON, writing one line per
/// response to `output`. Blank lines are skipped.
pub async fn serve<R, W>(client: &PorkbunClient, input: R, mut output: W) -> eyre::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    log::info!("Tool server ready (protocol {PROTOCOL_VERSION})");
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("Failed to read a request, shutting down: {err}");
                break;
            },
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonValue = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                log::error!("Received a line that is not JSON, shutting down: {err}");
                break;
            },
        };

        let Some(response) = handle(client, &request).await else {
            continue;
        };

        let mut text = serde_json::to_string(&response).wrap_err("Failed to serialize response")?;
        text.push('\n');
        output.write_all(text.as_bytes()).await.wrap_err("Failed to write response")?;
        output.flush().await.wrap_err("Failed to write response")?;
    }

    log::info!("Tool server input closed");
    Ok(())
}

/// Works out the response to a single message, if it needs one.
async fn handle(client: &PorkbunClient, request: &JsonValue) -> Option<JsonValue> {
    let method = request.get("method").and_then(JsonValue::as_str)?;
    let Some(id) = request.get("id").cloned() else {
        log::debug!("Ignoring notification {method}");
        return None;
    };

    log::debug!("Handling {method} (id {id})");
    let outcome = match method {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") },
        })),
        "tools/list" => Ok(json!({ "tools": Tool::ALL.map(Tool::definition) })),
        "tools/call" => call_tool(client, request.get("params")).await,
        other => {
            log::debug!("Ignoring unsupported method {other}");
            return None;
        },
    };

    Some(match outcome {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(err) => {
            log::warn!("{method} failed: {}", err.message);
            json!({ "jsonrpc": "2.0", "id": id, "error": { "code": err.code, "message": err.message } })
        },
    })
}

fn parse_args<T: DeserializeOwned>(tool: Tool, arguments: Option<JsonValue>) -> Result<T, RpcError> {
    let arguments = arguments.unwrap_or_else(|| json!({}));
    serde_json::from_value(arguments)
        .map_err(|err| RpcError::invalid_params(format!("Invalid arguments for {}: {err}", tool.name())))
}

async fn call_tool(client: &PorkbunClient, params: Option<&JsonValue>) -> Result<JsonValue, RpcError> {
    let params = params.cloned().unwrap_or(JsonValue::Null);
    let params: CallParams =
        serde_json::from_value(params).map_err(|err| RpcError::invalid_params(format!("Invalid params: {err}")))?;

    // Checked up front so that nothing reaches the network without a key pair.
    if !client.has_credentials() {
        return Err(RpcError::internal(format!("Error: {API_KEY_VAR} and {SECRET_KEY_VAR} not set.")));
    }

    let tool = Tool::from_name(&params.name)
        .ok_or_else(|| RpcError::internal(format!("Tool not found: {}", params.name)))?;

    let value = run_tool(client, tool, params.arguments).await?;
    let text = serde_json::to_string_pretty(&value)
        .map_err(|err| RpcError::internal(format!("Error executing {}: {err}", tool.name())))?;
    Ok(json!({ "content": [{ "type": "text", "text": text }] }))
}

async fn run_tool(client: &PorkbunClient, tool: Tool, arguments: Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let failed = |err: crate::api::Error| RpcError::internal(format!("Error executing {}: {err}", tool.name()));

    let value = match tool {
        Tool::ListDomains => {
            let domains = client.list_domains().await.map_err(failed)?;
            let summary: Vec<JsonValue> = domains
                .iter()
                .map(|d| json!({ "domain": d.name, "status": d.status, "autoRenew": d.auto_renew }))
                .collect();
            json!(summary)
        },
        Tool::CheckDomain => {
            let args: DomainArgs = parse_args(tool, arguments)?;
            json!(client.check_domain(&args.domain).await.map_err(failed)?)
        },
        Tool::DnsList => {
            let args: DomainArgs = parse_args(tool, arguments)?;
            json!(client.list_records(&args.domain).await.map_err(failed)?)
        },
        Tool::DnsUpdate => {
            let args: UpdateArgs = parse_args(tool, arguments)?;
            let spec = RecordSpec::new(args.typ, args.content).name(args.name).prio(args.prio).ttl(args.ttl);
            json!(client.upsert_record(&args.domain, &spec).await.map_err(failed)?)
        },
        Tool::DnsDelete => {
            let args: DeleteArgs = parse_args(tool, arguments)?;
            client.delete_record(&args.domain, &args.record_id).await.map_err(failed)?;
            json!({ "deleted": args.record_id })
        },
    };

    Ok(value)
}
