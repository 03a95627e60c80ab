use crate::core::classifier::CategoryRules;
use crate::domain::model::{CategoryFilter, SectionFilter};
use crate::utils::error::{MenuError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuConfig {
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub menu: MenuSettings,
    #[serde(default)]
    pub output: OutputConfig,
    pub rules: Option<CategoryRules>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuSettings {
    /// Public site origin; the QR code points at `<origin>/menu`.
    pub origin: Option<String>,
    pub section: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl MenuConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MenuError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MenuError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn backend(&self) -> Result<&BackendConfig> {
        self.backend
            .as_ref()
            .ok_or_else(|| MenuError::MissingConfigError {
                field: "backend".to_string(),
            })
    }

    pub fn timeout(&self) -> Duration {
        let seconds = self
            .backend
            .as_ref()
            .and_then(|b| b.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        Duration::from_secs(seconds)
    }

    /// The shared keyword lists. Overlapping measured/excluded entries are
    /// reported once here.
    pub fn rules(&self) -> CategoryRules {
        let rules = self.rules.clone().unwrap_or_default().normalized();
        for category in rules.overlapping_categories() {
            tracing::warn!(
                "Category '{}' is both measured and excluded; it will not get pour prices",
                category
            );
        }
        rules
    }

    pub fn section(&self) -> Result<SectionFilter> {
        self.menu
            .section
            .as_deref()
            .map(str::parse::<SectionFilter>)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub fn category(&self) -> CategoryFilter {
        self.menu
            .category
            .as_deref()
            .map(CategoryFilter::from)
            .unwrap_or_default()
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.as_ref().map(|l| l.format).unwrap_or_default()
    }
}

impl Validate for MenuConfig {
    fn validate(&self) -> Result<()> {
        if let Some(backend) = &self.backend {
            validate_url("backend.url", &backend.url)?;
            validate_non_empty_string("backend.anon_key", &backend.anon_key)?;
            if backend.anon_key.starts_with("${") {
                return Err(MenuError::InvalidConfigValueError {
                    field: "backend.anon_key".to_string(),
                    value: backend.anon_key.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        if let Some(origin) = &self.menu.origin {
            validate_url("menu.origin", origin)?;
        }

        validate_path("output.path", &self.output.path)?;
        self.section()?;
        Ok(())
    }
}
