//! Handlers for the one-shot CLI verbs.

pub mod dns;
pub mod domain;
pub mod render;
pub mod url;

use std::io::{self, BufRead, Write};
use std::path::Path;

use eyre::{WrapErr, eyre};

use crate::api::PorkbunClient;
use crate::config::Credentials;

/// The exact text a user has to type before anything irreversible happens.
pub const CONFIRM_TOKEN: &str = "YES";

/// Whether a line of user input is the confirmation token. Surrounding whitespace is forgiven; anything else
/// (including `yes` or `y`) is not.
pub fn is_confirmation(line: &str) -> bool {
    line.trim() == CONFIRM_TOKEN
}

/// Asks the user to type [`CONFIRM_TOKEN`] and reads their answer from `input`.
pub fn confirm_destructive(input: &mut dyn BufRead) -> io::Result<bool> {
    print!("Type '{CONFIRM_TOKEN}' to confirm: ");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(is_confirmation(&line))
}

fn prompt_line(input: &mut dyn BufRead, prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// `porkbun configure`: asks for both API keys and saves them.
pub async fn configure(path: &Path, input: &mut dyn BufRead) -> eyre::Result<()> {
    println!("Porkbun API Configuration");
    println!("Get your API keys from: https://porkbun.com/account/api");
    println!();

    let api_key = prompt_line(input, "Enter API Key: ").wrap_err("Failed to read API key")?;
    let secret_key = prompt_line(input, "Enter Secret API Key: ").wrap_err("Failed to read secret API key")?;
    if api_key.is_empty() || secret_key.is_empty() {
        return Err(eyre!("Both the API key and the secret API key are required"));
    }

    Credentials::new(api_key, secret_key).save(path).await?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

/// `porkbun ping`.
pub async fn ping(client: &PorkbunClient) -> eyre::Result<()> {
    let ip = client.ping().await?;
    println!("Success! Your IP: {ip}");
    Ok(())
}
