//! Integration tests for the catalog HTTP client
//!
//! These tests run the client against a local wiremock server to verify
//! listing deserialization, download materialization, and error mapping.

use datashed_core::catalog::{Catalog, DatasetId};
use datashed_core::client::{CatalogClient, CatalogClientConfig};
use datashed_core::error::{CatalogError, Error};
use datashed_core::fetch::{DatasetFetcher, StorageEncoding};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(CatalogClientConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_list_datasets_parses_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "datasets": [
                {"id": 31, "name": "credit-g", "instance_count": 1000, "feature_count": 21},
                {"id": 1590, "name": "adult", "instance_count": null, "feature_count": 15},
                {"id": 4, "name": "labor"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let datasets = client.list_datasets().await.unwrap();

    assert_eq!(datasets.len(), 3);
    assert_eq!(datasets[0].id, DatasetId(31));
    assert_eq!(datasets[0].instance_count, Some(1000));
    assert_eq!(datasets[1].instance_count, None);
    assert_eq!(datasets[2].feature_count, None);
}

#[tokio::test]
async fn test_list_datasets_maps_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_datasets().await.unwrap_err();

    match err {
        Error::Catalog(CatalogError::ServerError { code, message }) => {
            assert_eq!(code, 503);
            assert!(message.contains("maintenance"));
        }
        other => panic!("Expected ServerError, got: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_materializes_description_and_data_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/31"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 31, "name": "credit-g"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/31/file"))
        .and(query_param("encoding", "feather"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"FEA1\x00\x01".to_vec()))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("31");
    let client = client_for(&server);

    client
        .fetch(DatasetId(31), StorageEncoding::Feather, &dest)
        .await
        .unwrap();

    let description = std::fs::read_to_string(dest.join("description.json")).unwrap();
    assert!(description.contains("credit-g"));

    let data = std::fs::read(dest.join("dataset.feather")).unwrap();
    assert_eq!(data, b"FEA1\x00\x01");
}

#[tokio::test]
async fn test_fetch_sends_csv_encoding_for_standard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 8})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/8/file"))
        .and(query_param("encoding", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n1,2\n"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("8");
    let client = client_for(&server);

    client
        .fetch(DatasetId(8), StorageEncoding::Standard, &dest)
        .await
        .unwrap();

    assert!(dest.join("dataset.csv").is_file());
}

#[tokio::test]
async fn test_fetch_maps_missing_dataset_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such dataset"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("999");
    let client = client_for(&server);

    let err = client
        .fetch(DatasetId(999), StorageEncoding::Standard, &dest)
        .await
        .unwrap_err();

    match err {
        Error::Catalog(CatalogError::DatasetNotFound { id }) => assert_eq!(id, 999),
        other => panic!("Expected DatasetNotFound, got: {other}"),
    }

    // No data file was written for the missing dataset
    assert!(!dest.join("dataset.csv").exists());
}

#[tokio::test]
async fn test_fetch_maps_server_failure_on_data_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 12})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets/12/file"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("12");
    let client = client_for(&server);

    let err = client
        .fetch(DatasetId(12), StorageEncoding::Standard, &dest)
        .await
        .unwrap_err();

    match err {
        Error::Catalog(CatalogError::ServerError { code, .. }) => assert_eq!(code, 500),
        other => panic!("Expected ServerError, got: {other}"),
    }
}
