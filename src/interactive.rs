//! Menu-driven mode for people sitting at a terminal.
//!
//! All prompting goes through the [`Prompter`] trait, so that menus can be driven by a script instead of a keyboard.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use eyre::{WrapErr, eyre};

use crate::api::{ForwardKind, PorkbunClient, RecordSpec, RecordType};
use crate::bulk::{self, BulkFormat};
use crate::commands::{CONFIRM_TOKEN, dns, domain, is_confirmation, url};

/// Asking the user something failed (the terminal went away, or input was interrupted). Unlike API failures, these
/// end the session.
#[derive(Debug, thiserror::Error)]
#[error("Prompt failed: {0}")]
pub struct PromptError(String);

impl From<dialoguer::Error> for PromptError {
    fn from(err: dialoguer::Error) -> Self {
        Self(err.to_string())
    }
}

pub trait Prompter {
    /// Picks one of `items`. `None` means the user backed out.
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>, PromptError>;

    /// Reads a line of free text. May be empty.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String, PromptError>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError>;
}

/// Prompts on the real terminal using [`dialoguer`].
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>, PromptError> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?;
        Ok(choice)
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String, PromptError> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        let answer = Confirm::with_theme(&self.theme).with_prompt(prompt).default(default).interact()?;
        Ok(answer)
    }
}

/// Whether menu mode can run in this process at all. Worked out once, at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Terminal,
    Headless,
}

impl Capability {
    pub fn detect() -> Self {
        if io::stdin().is_terminal() && io::stdout().is_terminal() {
            Self::Terminal
        } else {
            Self::Headless
        }
    }

    pub fn prompter(self) -> eyre::Result<TerminalPrompter> {
        match self {
            Self::Terminal => Ok(TerminalPrompter {
                theme: ColorfulTheme::default(),
            }),
            Self::Headless => Err(eyre!(
                "Interactive mode needs a terminal on stdin and stdout; use the regular commands instead (see --help)"
            )),
        }
    }
}

const ENTER_MANUALLY: &str = "[Enter manually]";

const MAIN_MENU: &[&str] = &[
    "Manage DNS Records",
    "Manage URL Forwarding",
    "Manage Domains",
    "Bulk Operations",
    "Exit",
];
const DNS_MENU: &[&str] = &["List records", "Create record", "Edit record", "Delete record", "Back"];
const URL_MENU: &[&str] = &["List forwards", "Add forward", "Delete forward", "Back"];
const DOMAIN_MENU: &[&str] = &[
    "List all domains",
    "Check domain availability",
    "View nameservers",
    "Get SSL certificate",
    "Back",
];
const BULK_MENU: &[&str] = &["Export records", "Import records", "Back"];

/// Runs menu mode until the user exits. Fails straight away if the API can't be reached with the configured keys.
pub async fn run(client: &PorkbunClient, prompter: &mut dyn Prompter) -> eyre::Result<()> {
    let ip = client
        .ping()
        .await
        .wrap_err("API connection failed (run 'porkbun configure' to set up your API keys)")?;

    println!("Porkbun CLI - Interactive Mode");
    println!("Connected (IP: {ip})\n");

    let mut session = Session { client, prompter };
    session.main_menu().await?;

    println!("Goodbye!");
    Ok(())
}

struct Session<'a, 'p> {
    client: &'a PorkbunClient,
    prompter: &'p mut dyn Prompter,
}

/// Prints what went wrong with a menu action so the menu can carry on. Prompt failures are passed back up instead.
fn report(result: eyre::Result<()>) -> eyre::Result<()> {
    match result {
        Err(err) if err.downcast_ref::<PromptError>().is_some() => Err(err),
        Err(err) => {
            eprintln!("\nError: {err:#}\n");
            Ok(())
        },
        Ok(()) => Ok(()),
    }
}

fn parse_number(text: &str, what: &str) -> eyre::Result<Option<u32>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some).wrap_err_with(|| format!("Invalid {what}: '{text}'"))
}

impl Session<'_, '_> {
    async fn main_menu(&mut self) -> eyre::Result<()> {
        while let Some(choice) = self.prompter.select("What would you like to do?", MAIN_MENU)? {
            match choice {
                0 => self.dns_menu().await?,
                1 => self.url_menu().await?,
                2 => self.domain_menu().await?,
                3 => self.bulk_menu().await?,
                _ => break,
            }
        }
        Ok(())
    }

    /// Lets the user choose one of their domains, or type one in. Falls back to typing when the domain list can't be
    /// fetched or is empty.
    async fn pick_domain(&mut self) -> eyre::Result<Option<String>> {
        let domains: Vec<String> = match self.client.list_domains().await {
            Ok(domains) => domains.into_iter().map(|d| d.name).collect(),
            Err(err) => {
                log::warn!("Could not list domains, falling back to manual entry: {err}");
                Vec::new()
            },
        };

        if domains.is_empty() {
            return self.ask_domain();
        }

        let mut items: Vec<&str> = domains.iter().map(String::as_str).collect();
        items.push(ENTER_MANUALLY);
        match self.prompter.select("Select domain", &items)? {
            Some(i) if i < domains.len() => Ok(Some(domains[i].clone())),
            Some(_) => self.ask_domain(),
            None => Ok(None),
        }
    }

    fn ask_domain(&mut self) -> eyre::Result<Option<String>> {
        let domain = self.prompter.input("Domain name", None)?;
        Ok(Some(domain.trim().to_string()).filter(|d| !d.is_empty()))
    }

    /// Asks for the confirmation token. Anything other than the exact token is a no.
    fn confirm_token(&mut self, what: &str) -> eyre::Result<bool> {
        let answer = self.prompter.input(&format!("Type '{CONFIRM_TOKEN}' to delete {what}"), None)?;
        let confirmed = is_confirmation(&answer);
        if !confirmed {
            println!("Aborted.");
        }
        Ok(confirmed)
    }

    async fn dns_menu(&mut self) -> eyre::Result<()> {
        let Some(domain) = self.pick_domain().await? else { return Ok(()) };
        let title = format!("DNS Records for {domain}");

        while let Some(choice) = self.prompter.select(&title, DNS_MENU)? {
            let result = match choice {
                0 => self.list_records(&domain).await,
                1 => self.create_record(&domain).await,
                2 => self.edit_record(&domain).await,
                3 => self.delete_record(&domain).await,
                _ => break,
            };
            report(result)?;
        }
        Ok(())
    }

    async fn list_records(&mut self, domain: &str) -> eyre::Result<()> {
        let records = self.client.list_records(domain).await?;
        dns::print_records(&records);
        Ok(())
    }

    /// Walks through the fields of a record. Priority is only asked for record types that use it.
    fn ask_record_spec(&mut self) -> eyre::Result<Option<RecordSpec>> {
        let types: Vec<&str> = RecordType::ALL.iter().map(|t| t.as_str()).collect();
        let Some(typ) = self.prompter.select("Record type", &types)?.and_then(|i| RecordType::ALL.get(i).copied())
        else {
            return Ok(None);
        };

        let name = self.prompter.input("Subdomain (blank for root)", None)?;
        let content = self.prompter.input("Content", None)?;
        if content.trim().is_empty() {
            println!("Content is required.");
            return Ok(None);
        }

        let prio = if typ.uses_priority() {
            parse_number(&self.prompter.input("Priority", Some("10"))?, "priority")?
        } else {
            None
        };
        let ttl = parse_number(&self.prompter.input("TTL (blank for default)", None)?, "TTL")?;

        let spec = RecordSpec::new(typ, content.trim()).name(Some(name.trim())).prio(prio).ttl(ttl);
        Ok(Some(spec))
    }

    async fn create_record(&mut self, domain: &str) -> eyre::Result<()> {
        let Some(spec) = self.ask_record_spec()? else { return Ok(()) };
        let id = self.client.create_record(domain, &spec).await?;
        println!("Record created successfully (ID: {id}).");
        Ok(())
    }

    async fn edit_record(&mut self, domain: &str) -> eyre::Result<()> {
        let id = self.prompter.input("Record ID", None)?;
        let id = id.trim();
        if id.is_empty() {
            return Ok(());
        }

        let Some(spec) = self.ask_record_spec()? else { return Ok(()) };
        self.client.edit_record(domain, id, &spec).await?;
        println!("Record updated successfully.");
        Ok(())
    }

    async fn delete_record(&mut self, domain: &str) -> eyre::Result<()> {
        let id = self.prompter.input("Record ID", None)?;
        let id = id.trim();
        if id.is_empty() || !self.confirm_token(&format!("record {id}"))? {
            return Ok(());
        }

        self.client.delete_record(domain, id).await?;
        println!("Record deleted successfully.");
        Ok(())
    }

    async fn url_menu(&mut self) -> eyre::Result<()> {
        let Some(domain) = self.pick_domain().await? else { return Ok(()) };
        let title = format!("URL Forwarding for {domain}");

        while let Some(choice) = self.prompter.select(&title, URL_MENU)? {
            let result = match choice {
                0 => self.list_forwards(&domain).await,
                1 => self.add_forward(&domain).await,
                2 => self.delete_forward(&domain).await,
                _ => break,
            };
            report(result)?;
        }
        Ok(())
    }

    async fn list_forwards(&mut self, domain: &str) -> eyre::Result<()> {
        let forwards = self.client.list_url_forwards(domain).await?;
        url::print_forwards(&forwards);
        Ok(())
    }

    async fn add_forward(&mut self, domain: &str) -> eyre::Result<()> {
        let subdomain = self.prompter.input("Subdomain (blank for root)", None)?;
        let location = self.prompter.input("Destination URL", None)?;
        if location.trim().is_empty() {
            println!("A destination URL is required.");
            return Ok(());
        }

        let kind = match self.prompter.select("Redirect type", &["301 (Permanent)", "302 (Temporary)"])? {
            Some(0) => ForwardKind::Permanent,
            Some(_) => ForwardKind::Temporary,
            None => return Ok(()),
        };
        let wildcard = self.prompter.confirm("Forward all subdomains too (wildcard)?", false)?;
        let include_path = self.prompter.confirm("Include the request path?", false)?;

        self.client
            .add_url_forward(domain, subdomain.trim(), location.trim(), kind, wildcard, include_path)
            .await?;
        println!("URL forward added successfully.");
        Ok(())
    }

    async fn delete_forward(&mut self, domain: &str) -> eyre::Result<()> {
        let id = self.prompter.input("Forward ID", None)?;
        let id = id.trim();
        if id.is_empty() || !self.confirm_token(&format!("forward {id}"))? {
            return Ok(());
        }

        self.client.delete_url_forward(domain, id).await?;
        println!("URL forward deleted successfully.");
        Ok(())
    }

    async fn domain_menu(&mut self) -> eyre::Result<()> {
        while let Some(choice) = self.prompter.select("Domain Management", DOMAIN_MENU)? {
            let result = match choice {
                0 => self.list_domains().await,
                1 => self.check_domain().await,
                2 => self.show_nameservers().await,
                3 => self.fetch_ssl().await,
                _ => break,
            };
            report(result)?;
        }
        Ok(())
    }

    async fn list_domains(&mut self) -> eyre::Result<()> {
        let domains = self.client.list_domains().await?;
        domain::print_domains(&domains);
        Ok(())
    }

    async fn check_domain(&mut self) -> eyre::Result<()> {
        let Some(name) = self.ask_domain()? else { return Ok(()) };
        let pricing = self.client.check_domain(&name).await?;
        domain::print_pricing(&pricing);
        Ok(())
    }

    async fn show_nameservers(&mut self) -> eyre::Result<()> {
        let Some(name) = self.pick_domain().await? else { return Ok(()) };
        let nameservers = self.client.get_nameservers(&name).await?;
        domain::print_nameservers(&name, &nameservers);
        Ok(())
    }

    async fn fetch_ssl(&mut self) -> eyre::Result<()> {
        let Some(name) = self.pick_domain().await? else { return Ok(()) };
        let bundle = self.client.retrieve_ssl(&name).await?;

        let prefix = self.prompter.input("Save files with prefix (blank to preview)", None)?;
        let prefix = prefix.trim();
        if prefix.is_empty() {
            domain::print_ssl_preview(&bundle);
        } else {
            let written = domain::save_ssl_bundle(&bundle, &PathBuf::from(prefix)).await?;
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
        Ok(())
    }

    async fn bulk_menu(&mut self) -> eyre::Result<()> {
        while let Some(choice) = self.prompter.select("Bulk Operations", BULK_MENU)? {
            let result = match choice {
                0 => self.export_records().await,
                1 => self.import_records().await,
                _ => break,
            };
            report(result)?;
        }
        Ok(())
    }

    async fn export_records(&mut self) -> eyre::Result<()> {
        let Some(domain) = self.pick_domain().await? else { return Ok(()) };
        let format = match self.prompter.select("Format", &["JSON", "CSV"])? {
            Some(0) => BulkFormat::Json,
            Some(_) => BulkFormat::Csv,
            None => return Ok(()),
        };

        let output = self.prompter.input("Output file (blank for screen)", None)?;
        let output = Some(PathBuf::from(output.trim())).filter(|p| !p.as_os_str().is_empty());
        bulk::export_to(self.client, &domain, format, output.as_deref()).await
    }

    /// Imports a file, offering a dry run first.
    async fn import_records(&mut self) -> eyre::Result<()> {
        let file = self.prompter.input("Import file", None)?;
        let file = PathBuf::from(file.trim());
        if file.as_os_str().is_empty() {
            return Ok(());
        }

        let domain = self.prompter.input("Domain (blank to use the one in the file)", None)?;
        let domain = Some(domain.trim()).filter(|d| !d.is_empty());

        if self.prompter.confirm("Do a dry run first?", true)? {
            bulk::import_from(self.client, &file, domain, None, true).await?;
            if !self.prompter.confirm("Apply these changes now?", false)? {
                return Ok(());
            }
        }

        bulk::import_from(self.client, &file, domain, None, false).await?;
        Ok(())
    }
}
