use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::{ForwardKind, RecordType};
use crate::bulk::BulkFormat;

const EXAMPLES: &str = "\
Examples:
  porkbun configure                           Set up API credentials
  porkbun ping                                Test the API connection
  porkbun domain list                         List all domains
  porkbun dns list example.com                List DNS records
  porkbun dns upsert example.com A 1.2.3.4 -n www
  porkbun interactive                         Interactive mode
  porkbun bulk export example.com -o records.json";

#[derive(Debug, Parser)]
#[command(name = "porkbun", version, about, max_term_width = 100, after_help = EXAMPLES)]
pub struct Cli {
    /// Path to the JSON file holding your Porkbun API key pair.
    ///
    /// Defaults to 'porkbun-cli/config.json' inside your user configuration directory.
    #[arg(short, long, global = true, env = "PORKBUN_CLI_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Controls the verbosity of diagnostic logs (written to stderr).
    ///
    /// Possible log levels are 'off', 'error', 'warn', 'info', 'debug', and 'trace' (in that order).
    #[arg(long, global = true, env = "PORKBUN_LOG_LEVEL", value_name = "LEVEL", default_value = "warn")]
    pub log_level: log::LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure API credentials.
    Configure,

    /// Test the API connection.
    Ping,

    /// Interactive menu mode.
    #[command(visible_alias = "i")]
    Interactive,

    /// Domain management.
    #[command(subcommand)]
    Domain(DomainCommand),

    /// DNS record management.
    #[command(subcommand)]
    Dns(DnsCommand),

    /// URL forwarding management.
    #[command(subcommand)]
    Url(UrlCommand),

    /// Bulk DNS record import and export.
    #[command(subcommand)]
    Bulk(BulkCommand),

    /// Run a JSON-RPC tool server on stdin/stdout for agent hosts.
    ///
    /// Credentials come from PORKBUN_API_KEY and PORKBUN_SECRET_KEY when both are set, and from the credentials file
    /// otherwise.
    Serve,
}

#[derive(Debug, Subcommand)]
pub enum DomainCommand {
    /// List all domains in the account.
    List,

    /// Check domain availability and pricing.
    Search { domain: String },

    /// Purchase a domain (asks for confirmation first).
    Buy { domain: String },

    /// Show a domain's nameservers.
    Ns { domain: String },

    /// Replace a domain's nameservers.
    NsSet {
        domain: String,

        /// Nameserver hostnames.
        #[arg(required = true, num_args = 1..)]
        nameservers: Vec<String>,
    },

    /// Retrieve a domain's SSL certificate bundle.
    Ssl {
        domain: String,

        /// Write '<PREFIX>.crt', '<PREFIX>.key' and '<PREFIX>.ca' instead of printing a preview.
        #[arg(short, long, value_name = "PREFIX")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DnsCommand {
    /// List DNS records.
    List {
        domain: String,

        /// Only show records of this type.
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        typ: Option<RecordType>,
    },

    /// Create a DNS record.
    Create {
        domain: String,

        /// Record type (A, AAAA, CNAME, MX, TXT, ...).
        #[arg(value_name = "TYPE")]
        typ: RecordType,

        /// Record content.
        content: String,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Edit a DNS record by ID.
    Edit {
        domain: String,

        /// Record ID.
        id: String,

        /// Record type.
        #[arg(value_name = "TYPE")]
        typ: RecordType,

        /// Record content.
        content: String,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Delete a DNS record by ID (asks for confirmation first).
    Delete {
        domain: String,

        /// Record ID.
        id: String,
    },

    /// Create a DNS record, or update the existing one with the same type and name.
    Upsert {
        domain: String,

        /// Record type.
        #[arg(value_name = "TYPE")]
        typ: RecordType,

        /// Record content.
        content: String,

        #[command(flatten)]
        fields: RecordFields,
    },
}

/// Optional fields shared by the record-writing commands.
#[derive(Debug, Clone, Args)]
pub struct RecordFields {
    /// Subdomain (leave out for the root of the domain).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Priority (MX and SRV records).
    #[arg(short, long)]
    pub prio: Option<u32>,

    /// Time to live, in seconds.
    #[arg(short, long)]
    pub ttl: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum UrlCommand {
    /// List URL forwards.
    List { domain: String },

    /// Create a URL forward.
    Set {
        domain: String,

        /// Destination URL.
        location: String,

        /// Subdomain to forward (leave out for the root of the domain).
        #[arg(short, long, default_value = "")]
        subdomain: String,

        /// Redirect status code.
        #[arg(short = 't', long = "type", value_enum, default_value_t = RedirectCode::Found)]
        redirect: RedirectCode,

        /// Forward every subdomain too.
        #[arg(short, long)]
        wildcard: bool,

        /// Append the request path to the destination URL.
        #[arg(short = 'p', long = "path")]
        include_path: bool,
    },

    /// Delete a URL forward by ID.
    Delete {
        domain: String,

        /// Forward ID.
        id: String,
    },
}

/// HTTP status codes accepted by `url set --type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RedirectCode {
    #[value(name = "301")]
    MovedPermanently,
    #[value(name = "302")]
    Found,
    #[value(name = "307")]
    TemporaryRedirect,
}

impl RedirectCode {
    pub const fn code(self) -> u16 {
        match self {
            Self::MovedPermanently => 301,
            Self::Found => 302,
            Self::TemporaryRedirect => 307,
        }
    }

    pub fn kind(self) -> ForwardKind {
        ForwardKind::from_status(self.code())
    }
}

#[derive(Debug, Subcommand)]
pub enum BulkCommand {
    /// Export a domain's DNS records to JSON or CSV.
    Export {
        domain: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = BulkFormat::Json)]
        format: BulkFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import DNS records from a JSON or CSV file.
    Import {
        /// Import file (JSON or CSV).
        file: PathBuf,

        /// Target domain (overrides the one in a JSON file; required for CSV).
        #[arg(short, long)]
        domain: Option<String>,

        /// File format (detected from the file extension by default).
        #[arg(short, long, value_enum)]
        format: Option<BulkFormat>,

        /// Show what would be done without making any changes.
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn command_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn record_flags_parse() {
        let cli = Cli::try_parse_from(["porkbun", "dns", "create", "example.com", "mx", "mail.example.com", "-p", "10"])
            .unwrap();
        let Command::Dns(DnsCommand::Create { typ, content, fields, .. }) = cli.command else {
            panic!("wrong command parsed");
        };
        assert_eq!(typ, RecordType::MX);
        assert_eq!(content, "mail.example.com");
        assert_eq!((fields.name, fields.prio, fields.ttl), (None, Some(10), None));
    }

    #[test]
    fn interactive_has_a_short_alias() {
        let cli = Cli::try_parse_from(["porkbun", "i"]).unwrap();
        assert!(matches!(cli.command, Command::Interactive));
    }

    #[test]
    fn unknown_record_types_are_rejected() {
        assert!(Cli::try_parse_from(["porkbun", "dns", "create", "example.com", "SOA", "x"]).is_err());
    }

    #[test]
    fn redirect_codes_map_to_forward_kinds() {
        let cli = Cli::try_parse_from(["porkbun", "url", "set", "example.com", "https://example.net", "-t", "301"])
            .unwrap();
        let Command::Url(UrlCommand::Set { redirect, subdomain, .. }) = cli.command else {
            panic!("wrong command parsed");
        };
        assert_eq!(redirect.kind(), ForwardKind::Permanent);
        assert_eq!(subdomain, "");
        assert_eq!(RedirectCode::TemporaryRedirect.kind(), ForwardKind::Temporary);
    }

    #[test]
    fn ns_set_needs_at_least_one_nameserver() {
        assert!(Cli::try_parse_from(["porkbun", "domain", "ns-set", "example.com"]).is_err());
    }
}
