use crate::domain::model::REQUIRED_COLUMNS;
use crate::utils::error::{EtlError, Result};

/// Checks the decoded header against a fixed set of required columns.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    required: Vec<String>,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect())
    }
}

impl SchemaValidator {
    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }

    /// Fails with every absent column and the full header found.
    pub fn validate(&self, columns: &[String]) -> Result<()> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|req| !columns.iter().any(|c| c == *req))
            .cloned()
            .collect();

        if missing.is_empty() {
            tracing::debug!("✅ Header contains all {} required columns", self.required.len());
            return Ok(());
        }

        tracing::error!(?missing, found = ?columns, "❌ Statement header is missing required columns");
        Err(EtlError::MissingColumns {
            missing,
            found: columns.to_vec(),
        })
    }
}
