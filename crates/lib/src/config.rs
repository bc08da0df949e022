//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.pagehook/config.json`) and then
//! overridden from the environment (`PORT`, `VERIFY_TOKEN`, `PAGE_ACCESS_TOKEN`, ...).
//! Built once at startup and shared read-only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder handshake secret used when nothing is configured. Never matches a real subscription.
pub const PLACEHOLDER_VERIFY_TOKEN: &str = "YOUR_VERIFY_TOKEN";
/// Placeholder page access token used when nothing is configured. Graph API calls will be rejected.
pub const PLACEHOLDER_PAGE_ACCESS_TOKEN: &str = "YOUR_PAGE_TOKEN";

const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com";
const DEFAULT_GRAPH_API_VERSION: &str = "v12.0";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Messenger platform credentials and Graph API endpoint.
    #[serde(default)]
    pub messenger: MessengerConfig,
}

/// Listener bind, port, and reply delivery mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for HTTP (default 3000). Overridden by PORT env.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"). Overridden by BIND env.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Whether the webhook waits for reply delivery before acknowledging the platform.
    #[serde(default)]
    pub reply_delivery: ReplyDelivery,
}

/// How `POST /webhook` treats the outbound reply calls it triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyDelivery {
    /// Spawn each reply on its own task and acknowledge immediately.
    #[default]
    Background,

    /// Send replies in order before acknowledging. The acknowledgement is the same either way.
    Await,
}

/// Messenger / Graph API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessengerConfig {
    /// Shared secret for the `hub.verify_token` handshake. Overridden by VERIFY_TOKEN env.
    #[serde(default = "default_verify_token")]
    pub verify_token: String,

    /// Page access token sent as `access_token` on every Graph API call. Overridden by PAGE_ACCESS_TOKEN (or PAGE_ACCESS) env.
    #[serde(default = "default_page_access_token")]
    pub page_access_token: String,

    /// Graph API base URL. Overridden by GRAPH_API_BASE env (useful for local stand-ins).
    #[serde(default = "default_graph_api_base")]
    pub graph_api_base: String,

    /// Graph API version segment used for the send endpoint.
    #[serde(default = "default_graph_api_version")]
    pub graph_api_version: String,
}

fn default_port() -> u16 {
    3000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_verify_token() -> String {
    PLACEHOLDER_VERIFY_TOKEN.to_string()
}

fn default_page_access_token() -> String {
    PLACEHOLDER_PAGE_ACCESS_TOKEN.to_string()
}

fn default_graph_api_base() -> String {
    DEFAULT_GRAPH_API_BASE.to_string()
}

fn default_graph_api_version() -> String {
    DEFAULT_GRAPH_API_VERSION.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            reply_delivery: ReplyDelivery::default(),
        }
    }
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            verify_token: default_verify_token(),
            page_access_token: default_page_access_token(),
            graph_api_base: default_graph_api_base(),
            graph_api_version: default_graph_api_version(),
        }
    }
}

impl MessengerConfig {
    /// Names of credentials still set to their placeholder values.
    pub fn placeholder_credentials(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.verify_token == PLACEHOLDER_VERIFY_TOKEN {
            names.push("VERIFY_TOKEN");
        }
        if self.page_access_token == PLACEHOLDER_PAGE_ACCESS_TOKEN {
            names.push("PAGE_ACCESS_TOKEN");
        }
        names
    }
}

/// Non-empty, trimmed value of an environment lookup.
fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Apply environment overrides using `lookup` (e.g. `|k| std::env::var(k).ok()`).
/// Empty values are ignored; an unparseable PORT is logged and ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = non_empty(lookup("PORT")) {
        match port.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => log::warn!(
                "ignoring invalid PORT {:?}, keeping {}",
                port,
                config.server.port
            ),
        }
    }
    if let Some(bind) = non_empty(lookup("BIND")) {
        config.server.bind = bind;
    }
    if let Some(token) = non_empty(lookup("VERIFY_TOKEN")) {
        config.messenger.verify_token = token;
    }
    if let Some(token) =
        non_empty(lookup("PAGE_ACCESS_TOKEN")).or_else(|| non_empty(lookup("PAGE_ACCESS")))
    {
        config.messenger.page_access_token = token;
    }
    if let Some(base) = non_empty(lookup("GRAPH_API_BASE")) {
        config.messenger.graph_api_base = base;
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("PAGEHOOK_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".pagehook").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from `path` (or PAGEHOOK_CONFIG_PATH / default), then apply process env overrides.
/// Missing file => default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let mut config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    apply_env_overrides(&mut config, |k| std::env::var(k).ok());
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_are_placeholders_on_port_3000() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.reply_delivery, ReplyDelivery::Background);
        assert_eq!(config.messenger.verify_token, PLACEHOLDER_VERIFY_TOKEN);
        assert_eq!(config.messenger.page_access_token, PLACEHOLDER_PAGE_ACCESS_TOKEN);
        assert_eq!(config.messenger.graph_api_base, "https://graph.facebook.com");
        assert_eq!(config.messenger.graph_api_version, "v12.0");
        assert_eq!(
            config.messenger.placeholder_credentials(),
            vec!["VERIFY_TOKEN", "PAGE_ACCESS_TOKEN"]
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        let vars = env(&[
            ("PORT", "8080"),
            ("VERIFY_TOKEN", "  s3cret "),
            ("PAGE_ACCESS_TOKEN", "EAAB"),
            ("GRAPH_API_BASE", "http://127.0.0.1:9999"),
        ]);
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.messenger.verify_token, "s3cret");
        assert_eq!(config.messenger.page_access_token, "EAAB");
        assert_eq!(config.messenger.graph_api_base, "http://127.0.0.1:9999");
        assert!(config.messenger.placeholder_credentials().is_empty());
    }

    #[test]
    fn page_access_alias_is_used_when_primary_missing() {
        let mut config = Config::default();
        let vars = env(&[("PAGE_ACCESS", "legacy")]);
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());
        assert_eq!(config.messenger.page_access_token, "legacy");

        let vars = env(&[("PAGE_ACCESS", "legacy"), ("PAGE_ACCESS_TOKEN", "primary")]);
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());
        assert_eq!(config.messenger.page_access_token, "primary");
    }

    #[test]
    fn empty_and_invalid_env_values_are_ignored() {
        let mut config = Config::default();
        config.server.port = 4000;
        let vars = env(&[("PORT", "not-a-port"), ("VERIFY_TOKEN", "   ")]);
        apply_env_overrides(&mut config, |k| vars.get(k).cloned());
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.messenger.verify_token, PLACEHOLDER_VERIFY_TOKEN);
    }

    #[test]
    fn parses_camel_case_file() {
        let json = r#"{
            "server": { "port": 5050, "replyDelivery": "await" },
            "messenger": { "verifyToken": "tok", "graphApiVersion": "v19.0" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 5050);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.reply_delivery, ReplyDelivery::Await);
        assert_eq!(config.messenger.verify_token, "tok");
        assert_eq!(config.messenger.page_access_token, PLACEHOLDER_PAGE_ACCESS_TOKEN);
        assert_eq!(config.messenger.graph_api_version, "v19.0");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.messenger.verify_token, PLACEHOLDER_VERIFY_TOKEN);
    }
}
