//! API credential loading from the process environment and `~/.soulcanvas/.env`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::config::config_dir;

/// Fallback variable consulted after the configured one.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Credentials loaded from a `.env` file.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a credential value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Load credentials from a specific `.env` path.
///
/// A missing file yields empty credentials.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        debug!(path = %path.display(), "no credentials file");
        return Ok(Credentials::default());
    }

    let mut vars = BTreeMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read credentials at {}", path.display()))?;

    for item in iter {
        let (key, value) = item.with_context(|| {
            format!(
                "failed to parse key-value entry in credentials file {}",
                path.display()
            )
        })?;
        vars.insert(key, value);
    }

    Ok(Credentials { vars })
}

/// Load credentials from `~/.soulcanvas/.env`.
///
/// # Errors
///
/// Returns an error when the home directory cannot be resolved or the file
/// is malformed.
pub fn load_default_credentials() -> anyhow::Result<Credentials> {
    load_credentials(&config_dir()?.join(".env"))
}

/// Resolve the API key.
///
/// Order:
/// 1. `key_env` from the process environment
/// 2. `API_KEY` from the process environment
/// 3. `key_env` from the `.env` credentials
/// 4. `API_KEY` from the `.env` credentials
///
/// Blank values are skipped.
pub fn resolve_api_key(
    key_env: &str,
    credentials: &Credentials,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    let names = [key_env, FALLBACK_API_KEY_ENV];
    let from_env = names.iter().find_map(|&name| {
        env(name)
            .filter(|v| !v.trim().is_empty())
            .inspect(|_| debug!(source = name, "using API key from environment"))
    });
    from_env.or_else(|| {
        names.iter().find_map(|&name| {
            credentials
                .get(name)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_owned)
                .inspect(|_| debug!(source = name, "using API key from .env"))
        })
    })
}
