//! `~/.denim/config.toml` loading.
//!
//! Every section is optional; accessors on [`DenimConfig`] resolve the
//! defaults so callers never see a missing value.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fmt, fs, io};

use denim_types::ui::UiOptions;
use serde::Deserialize;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_RAG_TIMEOUT_SECS: u64 = 60;
/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "DENIM_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct DenimConfig {
    pub app: Option<AppConfig>,
    pub storage: Option<StorageConfig>,
    pub export: Option<ExportConfig>,
    pub rag: Option<RagConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config at {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config at {}: {source}", path.display())
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for markers and borders.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the saved answers. Default: `~/.denim`.
    pub dir: Option<String>,
    /// Quiet period before an autosave write. Default: 500.
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    /// Where `denim_onboarding.json` is written. Default: current directory.
    pub dir: Option<String>,
}

/// RAG proxy backend.
///
/// ```toml
/// [rag]
/// base_url = "https://rag.example.com/api"
/// api_key = "${RAG_API_KEY}"
/// timeout_seconds = 60
/// ```
#[derive(Default, Deserialize)]
pub struct RagConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

// Manual Debug impl to prevent leaking the API key in logs.
impl fmt::Debug for RagConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("RagConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &key)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl RagConfig {
    /// Base URL with `${VAR}` references expanded and trailing slashes removed.
    #[must_use]
    pub fn resolved_base_url(&self) -> Option<String> {
        let url = expand_env_vars(self.base_url.as_deref()?);
        let url = url.trim_end_matches('/');
        (!url.is_empty()).then(|| url.to_string())
    }

    /// API key with `${VAR}` references expanded. An empty result means no key.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        let key = expand_env_vars(self.api_key.as_deref()?);
        (!key.trim().is_empty()).then_some(key)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_RAG_TIMEOUT_SECS))
    }
}

/// Replace `${VAR}` with the variable's value (missing variables become empty).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand a leading `~` to the home directory.
fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    }
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".denim"), |home| home.join(".denim"))
}

impl DenimConfig {
    /// Load from [`DenimConfig::path`]. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|s| s.dir.as_deref())
            .map_or_else(default_data_dir, expand_home)
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        let ms = self
            .storage
            .as_ref()
            .and_then(|s| s.debounce_ms)
            .unwrap_or(DEFAULT_DEBOUNCE_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .as_ref()
            .and_then(|e| e.dir.as_deref())
            .map_or_else(|| PathBuf::from("."), expand_home)
    }
}

/// `$DENIM_CONFIG`, else `~/.denim/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".denim").join("config.toml"))
}
