#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use billfold_rust::{router, AppState, MemoryBillRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub fn app() -> Router {
    router(AppState::new(Arc::new(MemoryBillRepository::new())))
}

/// 发送请求，返回状态码与 JSON 响应体 (空响应体为 Null)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    owner: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(owner) = owner {
        builder = builder.header("CH-USER", owner.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, owner: i64) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(owner), None).await
}

/// 创建账单并返回其ID
pub async fn create(
    app: &Router,
    owner: i64,
    bill_type: &str,
    category: &str,
    amount: &str,
    date: &str,
    currency: &str,
) -> i64 {
    let payload = json!({
        "amount": amount,
        "date": date,
        "billType": bill_type,
        "billCategory": category,
        "currencyCode": currency,
    });
    let (status, body) = send(app, Method::POST, "/api/v1/bills", Some(owner), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["id"].as_i64().unwrap()
}

pub async fn delete(app: &Router, owner: i64, id: i64) -> StatusCode {
    let uri = format!("/api/v1/bills/{}", id);
    send(app, Method::DELETE, &uri, Some(owner), None).await.0
}
