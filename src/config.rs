use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eyre::{WrapErr, eyre};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Directory (under the user's configuration directory) that holds the credentials file.
const CONFIG_DIR_NAME: &str = "porkbun-cli";
const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variables that supply credentials to the tool server, taking precedence over the credentials file.
pub const API_KEY_VAR: &str = "PORKBUN_API_KEY";
pub const SECRET_KEY_VAR: &str = "PORKBUN_SECRET_KEY";

/// A Porkbun API key pair, stored on disk as `{"apikey": "...", "secretapikey": "..."}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "apikey", default)]
    pub api_key: String,
    #[serde(rename = "secretapikey", default)]
    pub secret_key: String,
}

/// Keys never show up in debug output (and therefore never in logs).
impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &str| if key.is_empty() { "<empty>" } else { "<redacted>" };
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("secret_key", &redact(&self.secret_key))
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Both keys must be present before any authenticated call is made.
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }

    /// Reads credentials from [`API_KEY_VAR`] and [`SECRET_KEY_VAR`]. Both must be set and non-empty.
    pub fn from_env() -> Option<Self> {
        let api_key = crate::get_var(API_KEY_VAR)?;
        let secret_key = crate::get_var(SECRET_KEY_VAR)?;
        Some(Self::new(api_key, secret_key)).filter(Self::is_complete)
    }

    /// Loads credentials from the given file. A missing file is not an error: it just means nobody has run
    /// `porkbun configure` yet.
    pub async fn load(path: &Path) -> eyre::Result<Option<Self>> {
        log::trace!("Reading credentials from {}", path.display());

        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No credentials file at {}", path.display());
                return Ok(None);
            },
            Err(err) => return Err(err).wrap_err("Failed to read credentials file"),
        };

        let credentials = serde_json::from_str(&text).wrap_err("Failed to parse credentials file")?;
        Ok(Some(credentials))
    }

    /// Writes these credentials to the given file, creating parent directories as needed. On Unix, the file is only
    /// readable and writable by its owner.
    pub async fn save(&self, path: &Path) -> eyre::Result<()> {
        if !self.is_complete() {
            return Err(eyre!("Both the API key and the secret API key are required"));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.wrap_err("Failed to create config directory")?;
        }

        let mut text = serde_json::to_string_pretty(self).wrap_err("Failed to serialize credentials")?;
        text.push('\n');
        write_private(path, text.as_bytes()).await.wrap_err("Failed to write credentials file")
    }
}

/// The default location of the credentials file: `<config dir>/porkbun-cli/config.json` (for example,
/// `~/.config/porkbun-cli/config.json` on Linux).
pub fn default_credentials_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Loads the credentials a command should run with.
///
/// When `prefer_env` is set (the tool server), a complete pair of environment variables wins over the file. A file
/// that exists but can't be read is reported and then treated as absent, so that the failure surfaces later as a
/// missing-credentials error on the first authenticated call.
pub async fn resolve_credentials(path: &Path, prefer_env: bool) -> Option<Credentials> {
    if prefer_env && let Some(credentials) = Credentials::from_env() {
        log::debug!("Using credentials from {API_KEY_VAR} and {SECRET_KEY_VAR}");
        return Some(credentials);
    }

    match Credentials::load(path).await {
        Ok(credentials) => credentials,
        Err(err) => {
            log::warn!("Error loading config from {}: {err:#}", path.display());
            None
        },
    }
}

/// Writes a file that only its owner can read (and write). Used for credentials and private keys.
pub async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }

    Ok(())
}
