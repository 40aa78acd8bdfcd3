//! Configuration types for vigil.
//!
//! [`Config::load`] layers an optional TOML file on top of hardcoded
//! defaults. [`Config::defaults`] returns the same defaults without touching
//! the filesystem (useful in tests). The feed list is a plain value handed
//! to the pipeline at construction time; nothing here is a process-wide
//! singleton.

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[run]
environment   = "dev"
tracking_mode = "full-reconciliation"
data_dir      = "/var/lib/vigil"

[[feeds]]
name        = "ssh-dictionary-attacks"
description = "IP addresses that have been seen initiating an SSH connection to a remote host. This report lists hosts that are suspicious of more than just port scanning. These hosts may be SSH server cataloging or conducting authentication attack attempts"
url         = "http://charles.the-haleys.org/ssh_dico_attack_with_timestamps.php?days=1"
alert_title = "SSH Port Scanning and Bruteforcing Authentication"
source      = "charles.the-haleys.org"
abuse_email = "contact@frogfishtech.com"
disabled    = false
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub run: RunConfig,
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

/// `[run]` section: environment namespace, tracking strategy, storage root.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub tracking_mode: TrackingMode,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Notification queue name; defaults to
    /// `<environment>-early-warning-service`.
    #[serde(default)]
    pub queue_name: Option<String>,
    /// Webhook endpoint for the HTTP notifier adapter.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

fn default_environment() -> String {
    "dev".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/vigil")
}

impl RunConfig {
    pub fn queue_name(&self) -> String {
        self.queue_name.clone().unwrap_or_else(|| {
            format!("{}-early-warning-service", self.environment.to_lowercase())
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            tracking_mode: TrackingMode::default(),
            data_dir: default_data_dir(),
            queue_name: None,
            webhook_url: None,
        }
    }
}

/// Which presence-tracking strategy the state store runs.
///
/// Full reconciliation keeps accurate entrance/exit intervals at the cost
/// of rewriting the whole feed state each cycle; new-only never revisits a
/// record once created, trading exit history for one existence check and at
/// most one write per address ever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackingMode {
    #[default]
    FullReconciliation,
    NewOnly,
}

impl std::str::FromStr for TrackingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-reconciliation" => Ok(TrackingMode::FullReconciliation),
            "new-only" => Ok(TrackingMode::NewOnly),
            other => Err(format!(
                "unknown tracking mode {other:?} (expected \"full-reconciliation\" or \"new-only\")"
            )),
        }
    }
}

/// One `[[feeds]]` descriptor: a configured feed source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub description: String,
    pub url: String,
    pub alert_title: String,
    /// Source domain, used as the storage namespace segment.
    pub source: String,
    pub abuse_email: String,
    #[serde(default)]
    pub disabled: bool,
}

impl Config {
    /// Load from an optional TOML file layered on top of the built-in
    /// defaults. A missing file falls back to defaults alone.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
