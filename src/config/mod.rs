pub mod cli;
pub mod toml_config;

use crate::adapters::notion::DEFAULT_NOTION_VERSION;
use crate::core::normalize::{DEFAULT_DETAIL, MAX_DETAIL_LEN};
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use clap::Parser;
use std::time::Duration;

/// Everything a batch needs, passed in explicitly at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub store_endpoint: String,
    pub api_token: String,
    pub target_collection_id: String,
    pub dispatch_delay: Duration,
    pub skip_rows: usize,
    pub allowed_extensions: Vec<String>,
    pub detail_default: String,
    pub detail_max_len: usize,
    pub notion_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_endpoint: "https://api.notion.com".to_string(),
            api_token: String::new(),
            target_collection_id: String::new(),
            dispatch_delay: Duration::from_secs(1),
            skip_rows: 0,
            allowed_extensions: vec!["xlsx".to_string(), "csv".to_string()],
            detail_default: DEFAULT_DETAIL.to_string(),
            detail_max_len: MAX_DETAIL_LEN,
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        }
    }
}

impl ConfigProvider for PipelineConfig {
    fn skip_rows(&self) -> usize {
        self.skip_rows
    }

    fn dispatch_delay(&self) -> Duration {
        self.dispatch_delay
    }

    fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    fn detail_default(&self) -> &str {
        &self.detail_default
    }

    fn detail_max_len(&self) -> usize {
        self.detail_max_len
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cartola-sync")]
#[command(about = "Upload bank statement rows to a Notion database")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "cartola-sync.toml")]
    pub config: String,

    /// Statement file to upload
    #[arg(short, long)]
    pub file: Option<String>,

    /// Leading title rows before the header (overrides config)
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Minimum gap between record-store calls in ms (overrides config)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Process everything but write to an in-memory store
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋檔案設定
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(skip_rows) = self.skip_rows {
            tracing::info!("🔧 skip_rows overridden to: {}", skip_rows);
            config.skip_rows = skip_rows;
        }
        if let Some(delay_ms) = self.delay_ms {
            tracing::info!("🔧 dispatch delay overridden to: {}ms", delay_ms);
            config.dispatch_delay = Duration::from_millis(delay_ms);
        }
    }
}
