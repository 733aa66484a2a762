//! Health endpoint integration tests

use crate::common::{BASE_URL, TestClient};

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_liveness() {
    let client = TestClient::new(BASE_URL);

    let response: serde_json::Value = client
        .get_with_query("/v3/health/liveness", &[])
        .await
        .expect("Failed to call liveness");

    assert_eq!(response["code"], 0);
    assert_eq!(response["data"], "ok");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_readiness_reports_database() {
    let client = TestClient::new(BASE_URL);

    let response = client
        .raw_get("/v3/health/readiness")
        .await
        .expect("Failed to call readiness");

    assert!(
        response.status() == 200 || response.status() == 503,
        "readiness must answer with 200 or 503"
    );
}
