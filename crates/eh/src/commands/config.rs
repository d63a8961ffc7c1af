//! `eh config`: the TOML settings file.
//!
//! The file lives at `$EH_CONFIG`, else `$XDG_CONFIG_HOME/eh/config.toml`,
//! else `~/.config/eh/config.toml`. A missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use directories::BaseDirs;
use eventhive_search::EventTypeMatch;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CommandContext, CommandError, Result};
use crate::output::DateFormat;

/// Schema version written to new files.
const CONFIG_VERSION: u32 = 1;

/// Tokens up to this many characters are masked completely.
const TOKEN_MASK_MIN_LENGTH: usize = 8;

/// Characters kept visible at each end of a longer token.
const TOKEN_MASK_VISIBLE_CHARS: usize = 4;

/// Accepted values of `token_storage`.
const TOKEN_STORAGE_VALUES: [&str; 2] = ["session", "keyring"];

/// Keys accepted by `eh config set`.
const SETTABLE_KEYS: [&str; 7] = [
    "base_url",
    "token_storage",
    "output.color",
    "output.date_format",
    "search.event_type_match",
    "http.timeout_secs",
    "http.max_retries",
];

/// Template written by `eh config edit` when no file exists yet.
const DEFAULT_CONFIG: &str = r#"# eh configuration
version = 1

# Event Hive backend. Overridden by --url and EVENTHIVE_URL.
# base_url = "http://127.0.0.1:8000"

# "session" keeps the sign-in in ~/.cache/eh/session.json, "keyring" in the OS keyring.
# token_storage = "session"

[output]
# color = true            # NO_COLOR and --no-color still win
# date_format = "long"    # long | iso | short | relative

[search]
# event_type_match = "exact"   # exact | title-contains

[http]
# timeout_secs = 30
# max_retries = 3
"#;

/// Contents of `config.toml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Absent in hand-written files; treated as the current version.
    #[serde(default = "current_version")]
    pub version: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// `session` (default) or `keyring`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_storage: Option<String>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

fn current_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            base_url: None,
            token_storage: None,
            output: OutputConfig::default(),
            search: SearchConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Returns true if sessions are kept in the OS keyring.
    pub fn uses_keyring(&self) -> bool {
        self.token_storage.as_deref() == Some("keyring")
    }

    /// How `--type` filters are compared.
    pub fn event_type_match(&self) -> Result<EventTypeMatch> {
        match self.search.event_type_match.as_deref() {
            None => Ok(EventTypeMatch::default()),
            Some(value) => value.parse().map_err(CommandError::Config),
        }
    }

    /// Date display format. Unknown values fall back to the default.
    pub fn date_format(&self) -> DateFormat {
        match self.output.date_format.as_deref() {
            None => DateFormat::default(),
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!(value, "unknown output.date_format, using default");
                DateFormat::default()
            }),
        }
    }

    /// Per-request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.http.timeout_secs.map(Duration::from_secs)
    }

    /// Every explicitly set key with its value, in file order.
    fn settings(&self) -> Vec<(&'static str, String)> {
        let mut settings = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                settings.push((key, value));
            }
        };
        push("base_url", self.base_url.clone());
        push("token_storage", self.token_storage.clone());
        push("output.color", self.output.color.map(|c| c.to_string()));
        push("output.date_format", self.output.date_format.clone());
        push("search.event_type_match", self.search.event_type_match.clone());
        push("http.timeout_secs", self.http.timeout_secs.map(|s| s.to_string()));
        push("http.max_retries", self.http.max_retries.map(|r| r.to_string()));
        settings
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// One of [`DateFormat::VALUES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default comparison for the event type filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_match: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Retries for rate-limited requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

/// Wraps an I/O or codec failure with what we were doing.
fn config_error(action: &str, path: &Path, err: impl std::fmt::Display) -> CommandError {
    CommandError::Config(format!("cannot {} {}: {}", action, path.display(), err))
}

/// Resolves the config file location.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os("EH_CONFIG").filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let base = match env::var_os("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config"))
            .ok_or_else(|| CommandError::Config("no home directory found".to_string()))?,
    };
    Ok(base.join("eh").join("config.toml"))
}

/// Loads the configuration, or defaults when no file exists.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let text = fs::read_to_string(&path).map_err(|e| config_error("read", &path, e))?;
    let config: Config = toml::from_str(&text).map_err(|e| config_error("parse", &path, e))?;
    migrate_config(config)
}

/// Brings an older file up to [`CONFIG_VERSION`]. Version 1 is the first schema.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version != CONFIG_VERSION {
        debug!(from = config.version, to = CONFIG_VERSION, "migrating config");
        config.version = CONFIG_VERSION;
    }
    Ok(config)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| config_error("create", parent, e)),
        None => Ok(()),
    }
}

fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;
    ensure_parent(&path)?;
    let text = toml::to_string_pretty(config).map_err(|e| config_error("encode", &path, e))?;
    fs::write(&path, text).map_err(|e| config_error("write", &path, e))
}

/// `eh config show`
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;
    let exists = path.exists();

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": exists,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    if ctx.use_colors {
        use owo_colors::OwoColorize;
        println!("{}", path.display().to_string().bold());
    } else {
        println!("{}", path.display());
    }

    if !exists {
        println!("(not created yet; 'eh config edit' writes a template)");
        return Ok(());
    }

    let settings = config.settings();
    if settings.is_empty() {
        println!("(all defaults)");
    }
    let width = settings.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in settings {
        println!("  {:<width$}  {}", key, value, width = width);
    }
    Ok(())
}

/// `eh config edit`: opens `$EDITOR` (then `$VISUAL`, then `vi`), writing the
/// template first if the file does not exist.
pub async fn execute_edit(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    ensure_parent(&path)?;

    if !path.exists() {
        fs::write(&path, DEFAULT_CONFIG).map_err(|e| config_error("create", &path, e))?;
        if !ctx.quiet && !ctx.json_output {
            eprintln!("Wrote template to {}", path.display());
        }
    }

    let editor = ["EDITOR", "VISUAL"]
        .iter()
        .find_map(|var| env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_string());
    debug!(path = %path.display(), editor, "opening config in editor");

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .await
        .map_err(|e| CommandError::Config(format!("cannot start editor '{}': {}", editor, e)))?;

    let valid = load_config().is_ok();

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "editor": editor,
            "editor_ok": status.success(),
            "valid": valid,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !status.success() {
        eprintln!("{} exited with {}", editor, status);
    } else if !valid {
        eprintln!("Warning: {} no longer parses; run 'eh config show' for details", path.display());
    } else if !ctx.quiet {
        println!("Saved {}", path.display());
    }
    Ok(())
}

/// Arguments of `eh config set`.
pub struct ConfigSetOptions {
    /// Dotted key, e.g. `search.event_type_match`.
    pub key: String,
    pub value: String,
}

/// `eh config set`: validates one value and rewrites the file.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let stored = apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;
    debug!(key = %opts.key, value = %stored, "config updated");

    if ctx.json_output {
        let output = serde_json::json!({
            "key": opts.key,
            "value": stored,
            "path": get_config_path()?.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{} = {}", opts.key, stored);
    }
    Ok(())
}

/// Validates `value`, stores it under `key` and returns the stored form.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    let invalid = |expected: &str| {
        CommandError::Config(format!("invalid {} '{}': expected {}", key, value, expected))
    };

    let stored = match key {
        "base_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid("an http:// or https:// URL"));
            }
            let url = value.trim_end_matches('/').to_string();
            config.base_url = Some(url.clone());
            url
        }
        "token_storage" => {
            if !TOKEN_STORAGE_VALUES.contains(&value) {
                return Err(invalid(&TOKEN_STORAGE_VALUES.join(" or ")));
            }
            config.token_storage = Some(value.to_string());
            value.to_string()
        }
        "output.color" => {
            let color = parse_bool(value)?;
            config.output.color = Some(color);
            color.to_string()
        }
        "output.date_format" => {
            let format: DateFormat = value.parse().map_err(CommandError::Config)?;
            config.output.date_format = Some(format.as_str().to_string());
            format.as_str().to_string()
        }
        "search.event_type_match" => {
            let mode: EventTypeMatch = value.parse().map_err(CommandError::Config)?;
            config.search.event_type_match = Some(mode.as_str().to_string());
            mode.as_str().to_string()
        }
        "http.timeout_secs" => {
            let secs: u64 = parse_number(value)?;
            if secs == 0 {
                return Err(invalid("a number of seconds above zero"));
            }
            config.http.timeout_secs = Some(secs);
            secs.to_string()
        }
        "http.max_retries" => {
            let retries: u32 = parse_number(value)?;
            config.http.max_retries = Some(retries);
            retries.to_string()
        }
        _ => {
            return Err(CommandError::Config(format!(
                "unknown key '{}' (settable: {})",
                key,
                SETTABLE_KEYS.join(", ")
            )))
        }
    };
    Ok(stored)
}

/// `eh config path`
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Shows the first and last few characters of a session token.
///
/// Counts characters, not bytes.
pub(crate) fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= TOKEN_MASK_MIN_LENGTH {
        return "****".to_string();
    }
    let head: String = chars[..TOKEN_MASK_VISIBLE_CHARS].iter().collect();
    let tail: String = chars[chars.len() - TOKEN_MASK_VISIBLE_CHARS..].iter().collect();
    format!("{}...{}", head, tail)
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "'{}' is not a boolean (try true or false)",
            s
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T> {
    s.trim()
        .parse()
        .map_err(|_| CommandError::Config(format!("Invalid number '{}'", s)))
}
