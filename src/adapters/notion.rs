use crate::domain::model::{Record, COL_BALANCE, COL_CHARGE, COL_CREDIT, COL_DATE, COL_DETAIL};
use crate::domain::ports::RecordStore;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates one page per record in a Notion database.
pub struct NotionStore {
    client: Client,
    endpoint: String,
    api_token: String,
    database_id: String,
    notion_version: String,
}

impl NotionStore {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            database_id: database_id.into(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        })
    }

    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }

    /// 建立頁面的請求內容，屬性名稱與範本欄位相同
    pub fn page_payload(&self, record: &Record) -> Value {
        json!({
            "parent": { "database_id": self.database_id },
            "properties": {
                COL_DATE: { "date": { "start": record.iso_date() } },
                COL_DETAIL: { "title": [ { "text": { "content": record.detail } } ] },
                COL_CHARGE: { "number": record.charge_amount },
                COL_CREDIT: { "number": record.credit_amount },
                COL_BALANCE: { "number": record.balance },
            }
        })
    }
}

#[async_trait]
impl RecordStore for NotionStore {
    async fn create(&self, record: &Record) -> Result<()> {
        let url = format!("{}/v1/pages", self.endpoint);
        tracing::debug!("Creating page at: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .header("Notion-Version", &self.notion_version)
            .json(&self.page_payload(record))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Record store response status: {}", status);
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);

        Err(EtlError::StoreError {
            status: status.as_u16(),
            message,
        })
    }
}
