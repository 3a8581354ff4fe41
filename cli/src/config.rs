//! Connection and pacing configuration.
//!
//! Everything the Plex client needs is resolved once at startup from flags, the
//! environment and an optional `.env` file, so a missing token fails before any
//! request is made.

use anyhow::{bail, Context, Result};
use clap::Args;
use retitle::plex::{PlexClient, PlexClientBuilder, RetryPolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    /// Plex server base URL, e.g. http://127.0.0.1:32400
    #[arg(long, env = "PLEX_URL", global = true)]
    pub server: Option<String>,

    /// Plex auth token
    #[arg(long, env = "PLEX_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Attempts per request before giving up
    #[arg(long, default_value_t = 5, global = true)]
    pub retries: u32,

    /// Delay between attempts, in milliseconds
    #[arg(long, default_value_t = 1000, global = true)]
    pub retry_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,
}

/// Library section selection, by id or by name.
#[derive(Debug, Clone, Args)]
pub struct SectionArgs {
    /// Library section id (skips the lookup by name)
    #[arg(long, env = "PLEX_SECTION_ID")]
    pub section_id: Option<String>,

    /// Library section name
    #[arg(long, env = "PLEX_LIBRARY")]
    pub library: Option<String>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Plex server base URL (required)
    pub server: String,
    /// Plex token (required)
    pub token: String,
    pub retry: RetryPolicy,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_args(args: &ServerArgs) -> Result<Self> {
        let server = match args.server.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => bail!("missing server url: pass --server or set PLEX_URL"),
        };
        let token = match args.token.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => bail!("missing token: pass --token or set PLEX_TOKEN"),
        };

        Ok(Self {
            server,
            token,
            retry: RetryPolicy {
                max_attempts: args.retries.max(1),
                delay: Duration::from_millis(args.retry_delay_ms),
            },
            request_timeout_secs: args.timeout,
        })
    }

    pub fn client(&self) -> Result<PlexClient> {
        PlexClientBuilder::new()
            .base_url(&self.server)
            .token(&self.token)
            .retry(self.retry)
            .request_timeout(self.request_timeout_secs)
            .build()
            .context("failed to create Plex client")
    }
}

/// Make a configured root absolute against the working directory.
pub fn absolute_root(root: &Path) -> Result<PathBuf> {
    std::path::absolute(root).with_context(|| format!("invalid root path {}", root.display()))
}
