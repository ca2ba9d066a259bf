#![cfg(feature = "s3")]

mod support;

use std::sync::Arc;

use anyhow::Result;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::Client;
use credentials_loader::{CredentialsLoader, ErrorKind, S3ObjectStore};
use serde_json::json;
use support::s3_config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> S3ObjectStore {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "wiremock"))
        .endpoint_url(server.uri())
        .force_path_style(true)
        .build();

    S3ObjectStore::with_client(Client::from_conf(config))
}

#[tokio::test]
async fn s3_store_fetches_object_by_bucket_and_key() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fi-credentials-test/credentials.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"version":1,"source":"s3","database":{"username":"test","password":"test"}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let loader = CredentialsLoader::with_object_store(Arc::new(store_for(&server)));

    loader
        .load(s3_config("fi-credentials-test", "credentials.json"), false)
        .await?;
    loader
        .load(s3_config("fi-credentials-test", "credentials.json"), false)
        .await?;

    assert_eq!(loader.get_key("source"), Some(json!("s3")));
    assert_eq!(loader.get_key("database").unwrap()["password"], "test");

    Ok(())
}

#[tokio::test]
async fn s3_store_plain_text_is_decode_error() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fi-credentials-test/credentials.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("plain text", "text/plain"))
        .mount(&server)
        .await;

    let loader = CredentialsLoader::with_object_store(Arc::new(store_for(&server)));

    let err = loader
        .load(s3_config("fi-credentials-test", "credentials.txt"), false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);

    Ok(())
}

#[tokio::test]
async fn s3_store_access_denied_is_fetch_error() -> Result<()> {
    let server = MockServer::start().await;

    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>"#;

    Mock::given(method("GET"))
        .and(path("/fi-credentials-test/credentials.json"))
        .respond_with(ResponseTemplate::new(403).set_body_raw(body, "application/xml"))
        .mount(&server)
        .await;

    let loader = CredentialsLoader::with_object_store(Arc::new(store_for(&server)));

    let err = loader
        .load(s3_config("fi-credentials-test", "credentials.json"), false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(!loader.is_loaded());

    Ok(())
}
