use std::ffi::OsString;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use eyre::WrapErr;

use super::confirm_destructive;
use super::render::{self, DOMAIN_HEADERS};
use crate::api::model::{DomainPricing, SslBundle};
use crate::api::{Domain, PorkbunClient};
use crate::cli::DomainCommand;
use crate::config::write_private;

/// How much of the certificate chain is shown when it isn't being saved.
const CHAIN_PREVIEW_CHARS: usize = 500;

pub async fn run(command: DomainCommand, client: &PorkbunClient, input: &mut dyn BufRead) -> eyre::Result<()> {
    match command {
        DomainCommand::List => {
            let domains = client.list_domains().await?;
            print_domains(&domains);
        },
        DomainCommand::Search { domain } => {
            let pricing = client.check_domain(&domain).await?;
            print_pricing(&pricing);
        },
        DomainCommand::Buy { domain } => buy(client, &domain, input).await?,
        DomainCommand::Ns { domain } => {
            let nameservers = client.get_nameservers(&domain).await?;
            print_nameservers(&domain, &nameservers);
        },
        DomainCommand::NsSet { domain, nameservers } => {
            client.update_nameservers(&domain, &nameservers).await?;
            println!("Nameservers updated successfully.");
        },
        DomainCommand::Ssl { domain, output } => {
            let bundle = client.retrieve_ssl(&domain).await?;
            match output {
                Some(prefix) => {
                    let written = save_ssl_bundle(&bundle, &prefix).await?;
                    let names: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
                    println!("SSL files written: {}", names.join(", "));
                },
                None => print_ssl_preview(&bundle),
            }
        },
    }

    Ok(())
}

async fn buy(client: &PorkbunClient, domain: &str, input: &mut dyn BufRead) -> eyre::Result<()> {
    println!("PREPARING TO BUY DOMAIN: {domain}");
    println!("This will charge your Porkbun account.");
    if !confirm_destructive(input)? {
        println!("Aborted.");
        return Ok(());
    }

    let invoice = client.create_domain(domain, true, true).await?;
    println!("Success! Domain registered.");
    if let Some(invoice) = invoice {
        println!("Invoice ID: {invoice}");
    }
    Ok(())
}

pub fn print_domains(domains: &[Domain]) {
    if domains.is_empty() {
        println!("No domains found.");
    } else {
        println!("{}", render::table(DOMAIN_HEADERS, render::domain_rows(domains)));
    }
}

pub fn print_pricing(res: &DomainPricing) {
    println!("\nDomain: {}", res.domain);
    match &res.pricing {
        Some(pricing) => {
            let price = |p: &Option<String>| p.as_deref().map(|p| format!("${p}")).unwrap_or_else(|| "N/A".into());
            println!("  Registration: {}", price(&pricing.registration));
            println!("  Renewal:      {}", price(&pricing.renewal));
            println!("  Transfer:     {}", price(&pricing.transfer));
        },
        None => println!("  Pricing information not available"),
    }
}

pub fn print_nameservers(domain: &str, nameservers: &[String]) {
    if nameservers.is_empty() {
        println!("No nameservers found (using Porkbun defaults)");
    } else {
        println!("Nameservers for {domain}:");
        for ns in nameservers {
            println!("  {ns}");
        }
    }
}

pub fn print_ssl_preview(bundle: &SslBundle) {
    println!("=== Certificate Chain ===");
    let preview: String = bundle.certificate_chain.chars().take(CHAIN_PREVIEW_CHARS).collect();
    println!("{preview}...");
    println!("\n=== Private Key ===");
    println!("[REDACTED - use --output to save]");
    println!("\nUse --output PREFIX to save the certificate files");
}

/// Writes the chain, private key and intermediate certificate next to each other as `<prefix>.crt`, `<prefix>.key`
/// and `<prefix>.ca`. The key file is only readable by its owner.
pub async fn save_ssl_bundle(bundle: &SslBundle, prefix: &Path) -> eyre::Result<[PathBuf; 3]> {
    let crt = with_suffix(prefix, ".crt");
    let key = with_suffix(prefix, ".key");
    let ca = with_suffix(prefix, ".ca");

    tokio::fs::write(&crt, &bundle.certificate_chain)
        .await
        .wrap_err_with(|| format!("Failed to write {}", crt.display()))?;
    write_private(&key, bundle.private_key.as_bytes())
        .await
        .wrap_err_with(|| format!("Failed to write {}", key.display()))?;
    tokio::fs::write(&ca, &bundle.intermediate_certificate)
        .await
        .wrap_err_with(|| format!("Failed to write {}", ca.display()))?;

    Ok([crt, key, ca])
}

/// Appends to the final path component, so `certs/example` becomes `certs/example.crt` even if `example` already has
/// a dot in it.
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
