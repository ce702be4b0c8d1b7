//! Application configuration for upskill.
//!
//! User config lives at `~/.upskill/upskill.toml`.
//! CLI flags override config file values, which override defaults.
//! Secrets and database ids are never stored in the file; the config only
//! names the environment variables that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UpskillError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "upskill.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".upskill";

/// Blocklist used when no blocklist file can be read.
pub const DEFAULT_BLOCKLIST: &[&str] = &["Inc.", "LLC", "Benefits", "Insurance", "Salary"];

// ---------------------------------------------------------------------------
// Config structs (matching upskill.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Record store (tracker + inbox databases).
    #[serde(default)]
    pub store: StoreConfig,

    /// Document fetching.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Skill dictionary, blocklist, and known skills.
    #[serde(default)]
    pub skills: SkillsConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the record-store API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API version header value.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Name of the env var holding the integration token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Name of the env var holding the tracker database id.
    #[serde(default = "default_tracker_db_env")]
    pub tracker_db_env: String,

    /// Name of the env var holding the inbox database id.
    #[serde(default = "default_inbox_db_env")]
    pub inbox_db_env: String,

    /// HTTP transport timeout for store calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_version: default_api_version(),
            token_env: default_token_env(),
            tracker_db_env: default_tracker_db_env(),
            inbox_db_env: default_inbox_db_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.notion.com/v1".into()
}
fn default_api_version() -> String {
    "2022-06-28".into()
}
fn default_token_env() -> String {
    "NOTION_TOKEN".into()
}
fn default_tracker_db_env() -> String {
    "MASTER_DB_ID".into()
}
fn default_inbox_db_env() -> String {
    "INBOX_DB_ID".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout for a single posting.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// CSS selector for the posting body; falls back to `<body>` when absent.
    #[serde(default = "default_content_selector")]
    pub content_selector: String,

    /// Substrings that identify an anti-bot challenge page.
    #[serde(default = "default_block_markers")]
    pub block_markers: Vec<String>,

    /// Characters of fetched text echoed at debug level.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            content_selector: default_content_selector(),
            block_markers: default_block_markers(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_content_selector() -> String {
    ".job-description".into()
}
fn default_block_markers() -> Vec<String> {
    vec!["confirm you are a human".into(), "Access Denied".into()]
}
fn default_preview_chars() -> usize {
    300
}

/// How a header-like line matching no known section affects zoning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguousHeaders {
    /// Stay in the current zone.
    #[default]
    Keep,
    /// Fall back to the neutral zone.
    Reset,
}

/// `[skills]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    /// JSON array of dictionary terms. Relative paths resolve against the config dir.
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: String,

    /// JSON array of blocklisted substrings. Relative paths resolve against the config dir.
    #[serde(default = "default_blocklist_path")]
    pub blocklist_path: String,

    /// Skills the user already has; everything else is a gap.
    #[serde(default = "default_known_skills")]
    pub known_skills: Vec<String>,

    /// Zoning policy for unrecognized headers.
    #[serde(default)]
    pub ambiguous_headers: AmbiguousHeaders,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            dictionary_path: default_dictionary_path(),
            blocklist_path: default_blocklist_path(),
            known_skills: default_known_skills(),
            ambiguous_headers: AmbiguousHeaders::default(),
        }
    }
}

fn default_dictionary_path() -> String {
    "skills.json".into()
}
fn default_blocklist_path() -> String {
    "blocklist.json".into()
}
fn default_known_skills() -> Vec<String> {
    ["SQL", "Python", "Tableau", "Generative BI"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Store credentials (runtime, resolved from env)
// ---------------------------------------------------------------------------

/// Token and database ids resolved from the environment.
#[derive(Clone)]
pub struct StoreCredentials {
    pub token: String,
    pub tracker_db: String,
    pub inbox_db: String,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("token", &"<redacted>")
            .field("tracker_db", &self.tracker_db)
            .field("inbox_db", &self.inbox_db)
            .finish()
    }
}

impl StoreCredentials {
    /// Read all three values from the env vars named in `config`.
    pub fn from_env(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            token: required_env(&config.token_env)?,
            tracker_db: required_env(&config.tracker_db_env)?,
            inbox_db: required_env(&config.inbox_db_env)?,
        })
    }
}

fn required_env(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(UpskillError::config(format!(
            "missing required environment variable {var_name}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Skill lists (runtime, loaded from JSON files)
// ---------------------------------------------------------------------------

/// Dictionary and blocklist loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLists {
    pub dictionary: Vec<String>,
    pub blocklist: Vec<String>,
}

impl Default for SkillLists {
    fn default() -> Self {
        Self {
            dictionary: Vec::new(),
            blocklist: DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SkillLists {
    /// Load both lists. A missing or malformed file falls back to the default
    /// for that list and is logged; it is never an error.
    pub fn load(config: &SkillsConfig, base_dir: &Path) -> Self {
        let defaults = Self::default();

        let dictionary = match read_word_list(&resolve(base_dir, &config.dictionary_path)) {
            Some(list) => list,
            None => {
                tracing::warn!(
                    path = %config.dictionary_path,
                    "skill dictionary not found, using tagger only"
                );
                defaults.dictionary
            }
        };

        let blocklist = match read_word_list(&resolve(base_dir, &config.blocklist_path)) {
            Some(list) => list,
            None => {
                tracing::warn!(
                    path = %config.blocklist_path,
                    "blocklist not found, using default minimal blocklist"
                );
                defaults.blocklist
            }
        };

        Self {
            dictionary,
            blocklist,
        }
    }
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn read_word_list(path: &Path) -> Option<Vec<String>> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(list) => Some(list),
        Err(e) => {
            tracing::debug!(?path, error = %e, "word list is not a JSON string array");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.upskill/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| UpskillError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.upskill/upskill.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| UpskillError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| UpskillError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| UpskillError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| UpskillError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| UpskillError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
