//! HTTP surface checks over a real listener.
#![cfg(feature = "server")]

use std::net::SocketAddr;
use std::sync::Arc;

use documntr::{server, CodeAnalyzer, StubModel};
use serde_json::Value;

async fn spawn_app(analyzer: CodeAnalyzer) -> SocketAddr {
    let app = server::router(Arc::new(analyzer));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn analyze_returns_the_documented_code() {
    let addr = spawn_app(CodeAnalyzer::new(StubModel::new(vec!["documented".into()]))).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/analyze"))
        .json(&serde_json::json!({ "code": "fn main() {}" }))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["documented_code"], "documented");
    assert!(body["generation_time"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn empty_code_maps_to_bad_request() {
    let addr = spawn_app(CodeAnalyzer::new(StubModel::new(Vec::new()))).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/analyze"))
        .json(&serde_json::json!({ "code": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Please enter some code to analyze.");
}

#[tokio::test]
async fn model_failure_maps_to_internal_error() {
    let addr = spawn_app(CodeAnalyzer::new(StubModel::failing("API Error"))).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/analyze"))
        .json(&serde_json::json!({ "code": "fn main() {}" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "An error occurred: API Error");
}

#[tokio::test]
async fn health_and_metrics_respond() {
    let addr = spawn_app(CodeAnalyzer::new(StubModel::new(vec!["doc".into()]))).await;
    let client = reqwest::Client::new();

    let health = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");

    client
        .post(format!("http://{addr}/analyze"))
        .json(&serde_json::json!({ "code": "let x = 1;" }))
        .send()
        .await
        .unwrap();

    let metrics: Value = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(metrics["num_generations"], 1);
    assert_eq!(metrics["total_tokens"], 4);
}
