//! Mock REST collection shared by the integration tests
//!
//! Serves `/products` the way a naive JSON collection server would: list
//! requests ignore every query parameter and return all records in insertion
//! id order, single-record routes do plain CRUD. The list response can be
//! overridden, delayed or failed to simulate a misbehaving server.

#![allow(dead_code)]

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use catalog_query::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct MockCollection {
    products: Arc<Mutex<BTreeMap<u32, Value>>>,
    list_body: Arc<Mutex<Option<Value>>>,
    list_status: Arc<Mutex<Option<StatusCode>>>,
    list_delay: Arc<Mutex<Option<Duration>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockCollection {
    pub fn with_products(products: &[Product]) -> Self {
        let mock = Self::default();
        {
            let mut map = mock.products.lock().unwrap();
            for p in products {
                map.insert(p.id, serde_json::to_value(p).unwrap());
            }
        }
        mock
    }

    /// Answer list requests with `body` instead of the stored records
    pub fn respond_with(&self, body: Value) {
        *self.list_body.lock().unwrap() = Some(body);
    }

    /// Answer list requests with a bare status code
    pub fn fail_with(&self, status: StatusCode) {
        *self.list_status.lock().unwrap() = Some(status);
    }

    /// Hold list responses back for `delay`
    pub fn delay_by(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    /// Raw query strings of every list request so far
    pub fn received_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn stored(&self, id: u32) -> Option<Value> {
        self.products.lock().unwrap().get(&id).cloned()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/products", get(list).post(create))
            .route("/products/{id}", get(read).put(replace).delete(remove))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral local port and return the base URL
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

/// Base URL of a port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn remote_config(base_url: &str) -> RemoteConfig {
    RemoteConfig::new(base_url).with_timeout(Duration::from_millis(500))
}

async fn list(State(mock): State<MockCollection>, RawQuery(query): RawQuery) -> Response {
    mock.queries.lock().unwrap().push(query.unwrap_or_default());

    let delay = *mock.list_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let status = *mock.list_status.lock().unwrap();
    if let Some(status) = status {
        return status.into_response();
    }

    let body = mock.list_body.lock().unwrap().clone();
    match body {
        Some(body) => Json(body).into_response(),
        None => {
            let all: Vec<Value> = mock.products.lock().unwrap().values().cloned().collect();
            Json(Value::Array(all)).into_response()
        }
    }
}

async fn read(
    State(mock): State<MockCollection>,
    Path(id): Path<u32>,
) -> Result<Json<Value>, StatusCode> {
    mock.stored(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create(
    State(mock): State<MockCollection>,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut products = mock.products.lock().unwrap();
    let id = match body.get("id").and_then(Value::as_u64) {
        Some(id) => id as u32,
        None => products.keys().next_back().map_or(1, |last| last + 1),
    };
    if products.contains_key(&id) {
        return Err(StatusCode::CONFLICT);
    }
    body["id"] = Value::from(id);
    products.insert(id, body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn replace(
    State(mock): State<MockCollection>,
    Path(id): Path<u32>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut products = mock.products.lock().unwrap();
    if !products.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    body["id"] = Value::from(id);
    products.insert(id, body.clone());
    Ok(Json(body))
}

async fn remove(
    State(mock): State<MockCollection>,
    Path(id): Path<u32>,
) -> Result<Json<Value>, StatusCode> {
    mock.products
        .lock()
        .unwrap()
        .remove(&id)
        .map(|_| Json(Value::Object(Default::default())))
        .ok_or(StatusCode::NOT_FOUND)
}
