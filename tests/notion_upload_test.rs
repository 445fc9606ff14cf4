use cartola_sync::{
    BatchResponse, CsvDecoder, LocalStorage, NotionStore, PipelineConfig, SkipReason, UploadEngine,
};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

const STATEMENT: &str = "\
Fecha,Detalle,Monto cargo ($),Monto abono ($),Saldo ($)
15-03-2024,Compra 1,1500,,98500
16-03-2024,Rechazada,200,,98300
17-03-2024,Compra 2,300,,98000
18/03/2024,Compra 3,300,,97700
";

#[tokio::test]
async fn test_end_to_end_against_mock_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cartola.csv"), STATEMENT).unwrap();

    let server = MockServer::start();
    let accepted = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/pages")
            .header("Authorization", "Bearer secret_e2e")
            .body_contains("Compra");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"object": "page"}));
    });
    let rejected = server.mock(|when, then| {
        when.method(POST).path("/v1/pages").body_contains("Rechazada");
        then.status(400).json_body(serde_json::json!({
            "object": "error",
            "message": "body failed validation"
        }));
    });

    let config = PipelineConfig {
        store_endpoint: server.base_url(),
        api_token: "secret_e2e".to_string(),
        target_collection_id: "db-e2e".to_string(),
        dispatch_delay: Duration::from_millis(10),
        ..PipelineConfig::default()
    };
    let store = NotionStore::new(
        config.store_endpoint.clone(),
        config.api_token.clone(),
        config.target_collection_id.clone(),
    )
    .unwrap();
    let engine = UploadEngine::new(
        LocalStorage::new(dir.path().to_str().unwrap().to_string()),
        CsvDecoder::default(),
        store,
        config,
    );

    let summary = engine.run(Some("cartola.csv")).await.unwrap();

    accepted.assert_hits(2);
    rejected.assert_hits(1);
    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.uploaded_count, 2);
    assert_eq!(summary.skipped.len(), 2);
    assert_eq!(
        summary.skipped[0].reason,
        SkipReason::DispatchFailed(
            "Record store rejected request (status 400): body failed validation".to_string()
        )
    );
    assert_eq!(
        summary.skipped[1].reason,
        SkipReason::InvalidDateFormat("18/03/2024".to_string())
    );
    assert_eq!(
        BatchResponse::from_summary(&summary),
        BatchResponse::Success {
            message: "2 of 4 uploaded".to_string()
        }
    );
}
