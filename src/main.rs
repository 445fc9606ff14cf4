use cartola_sync::core::RecordStore;
use cartola_sync::utils::{logger, validation::Validate};
use cartola_sync::{
    CliConfig, CsvDecoder, InMemoryStore, LocalStorage, NotionStore, PipelineConfig,
    StatementDecoder, TomlConfig, UploadEngine,
};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置
    let toml_config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if toml_config.logging.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("🚀 Starting cartola-sync");

    if let Err(e) = toml_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let mut config = toml_config.to_pipeline_config();
    cli.apply_overrides(&mut config);
    let decoder = StatementDecoder::new(CsvDecoder::new(toml_config.delimiter()?));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("🛑 Interrupt received, stopping after the current row");
            on_signal.cancel();
        }
    });

    let exit_code = if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - records go to an in-memory store");
        let store = Arc::new(InMemoryStore::new());
        let code = upload(&cli, decoder, store.clone(), config, cancel).await;
        tracing::info!("🔍 Dry run produced {} records", store.records().len());
        code
    } else {
        let store = NotionStore::new(
            config.store_endpoint.clone(),
            config.api_token.clone(),
            config.target_collection_id.clone(),
        )?
        .with_notion_version(config.notion_version.clone());
        upload(&cli, decoder, store, config, cancel).await
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Runs one batch, prints the JSON response and returns the exit code.
async fn upload<R: RecordStore>(
    cli: &CliConfig,
    decoder: StatementDecoder,
    store: R,
    config: PipelineConfig,
    cancel: CancellationToken,
) -> i32 {
    let engine = UploadEngine::new(LocalStorage::new(".".to_string()), decoder, store, config);
    let response = engine.respond_with_cancel(cli.file.as_deref(), cancel).await;

    match serde_json::to_string(&response) {
        Ok(body) => println!("{}", body),
        Err(e) => tracing::error!("Could not encode response: {}", e),
    }
    exit_code(response.status_code())
}

// 400 是使用者輸入問題，其餘皆為執行失敗
fn exit_code(status: u16) -> i32 {
    match status {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartola_sync::{BatchResponse, EtlError};

    #[test]
    fn test_exit_code_follows_response_status() {
        assert_eq!(exit_code(BatchResponse::from_summary(&Default::default()).status_code()), 0);
        assert_eq!(exit_code(BatchResponse::from_error(&EtlError::MissingFile).status_code()), 1);
        let rejected = EtlError::StoreError {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(exit_code(BatchResponse::from_error(&rejected).status_code()), 2);
    }
}
