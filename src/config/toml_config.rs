use crate::adapters::notion::DEFAULT_NOTION_VERSION;
use crate::config::PipelineConfig;
use crate::core::normalize::{DEFAULT_DETAIL, MAX_DETAIL_LEN};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_extension_list, validate_non_empty_string, validate_range, validate_resolved,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const MAX_DISPATCH_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    pub api_token: String,
    pub collection_id: String,
    pub dispatch_delay_ms: Option<u64>,
    pub notion_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            allowed_extensions: default_extensions(),
            delimiter: default_delimiter(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default = "default_detail")]
    pub detail_default: String,
    #[serde(default = "default_detail_max_len")]
    pub detail_max_len: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            detail_default: default_detail(),
            detail_max_len: default_detail_max_len(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["xlsx".to_string(), "csv".to_string()]
}

fn default_delimiter() -> char {
    ','
}

fn default_detail() -> String {
    DEFAULT_DETAIL.to_string()
}

fn default_detail_max_len() -> usize {
    MAX_DETAIL_LEN
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NOTION_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.store.dispatch_delay_ms.unwrap_or(1000))
    }

    pub fn delimiter(&self) -> Result<u8> {
        u8::try_from(self.input.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| EtlError::InvalidConfigValueError {
                field: "input.delimiter".to_string(),
                value: self.input.delimiter.to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            })
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            store_endpoint: self.store.endpoint.clone(),
            api_token: self.store.api_token.clone(),
            target_collection_id: self.store.collection_id.clone(),
            dispatch_delay: self.dispatch_delay(),
            skip_rows: self.input.skip_rows,
            allowed_extensions: self.input.allowed_extensions.clone(),
            detail_default: self.normalize.detail_default.clone(),
            detail_max_len: self.normalize.detail_max_len,
            notion_version: self
                .store
                .notion_version
                .clone()
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("store.endpoint", &self.store.endpoint)?;

        validate_resolved("store.api_token", &self.store.api_token)?;
        validate_non_empty_string("store.api_token", &self.store.api_token)?;
        validate_resolved("store.collection_id", &self.store.collection_id)?;
        validate_non_empty_string("store.collection_id", &self.store.collection_id)?;

        if let Some(delay) = self.store.dispatch_delay_ms {
            validate_range("store.dispatch_delay_ms", delay, 0, MAX_DISPATCH_DELAY_MS)?;
        }

        validate_extension_list("input.allowed_extensions", &self.input.allowed_extensions)?;
        self.delimiter()?;

        validate_non_empty_string("normalize.detail_default", &self.normalize.detail_default)?;
        validate_range(
            "normalize.detail_max_len",
            self.normalize.detail_max_len,
            1,
            MAX_DETAIL_LEN,
        )?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
