//! Run configuration, deserialized by the `autofix` binary from its layered config sources.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

/// API Key wrapper that hides the key in debug output.
#[derive(Clone, Deserialize)]
pub struct ApiKey(pub String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// Configuration for LLM clients.
#[derive(Clone, Debug, Deserialize)]
pub struct LLMConfig {
    /// Hostname and port at which to find the LLM serve. Example: "http://[::1]:11434"
    #[serde(default)]
    pub address: Option<String>,

    /// API Key for the LLM service. Never read from config files; filled in from the
    /// environment by the binary.
    #[serde(skip)]
    pub api_key: Option<ApiKey>,

    /// Which backend to use, e.g. "anthropic" or "ollama".
    pub backend: String,

    /// Name of the model to invoke.
    pub model: String,

    /// Maximum output tokens.
    pub max_tokens: u32,

    #[serde(flatten)]
    pub unknown: HashMap<String, Value>,
}

/// Top-level configuration for one auto-fix run.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Compute and report fixes without writing them to disk.
    pub dry_run: bool,

    /// Upper bound on a single repair-service call, in seconds.
    pub timeout_secs: u64,

    /// Lines of context shown on each side of the offending line.
    pub context_lines: usize,

    /// Name of the environment variable holding the repair service credential.
    pub api_key_env: String,

    /// Whether a missing credential aborts the run. Only local backends can do without one.
    pub require_api_key: bool,

    pub repair: LLMConfig,

    #[serde(flatten)]
    pub unknown: HashMap<String, Value>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Warns about every config key that does not correspond to a known option.
    pub fn validate(&self) {
        unknown_field_warning("", &self.unknown);
        unknown_field_warning("repair", &self.repair.unknown);
    }
}

/// Prints out a warning message for every field in `unknown`.
///
/// This is intended for use by config validation routines. `prefix` should be the path to this
/// entry (e.g. the `[repair]` table should call this with a `prefix` of `repair`).
pub fn unknown_field_warning(prefix: &str, unknown: &HashMap<String, Value>) {
    let mut entries: Vec<_> = unknown.keys().collect();
    entries.sort_unstable();
    entries.into_iter().for_each(|name| match prefix {
        "" => warn!("unknown config key {name}"),
        p => warn!("unknown config key {p}.{name}"),
    });
}
