//! REST implementation of the product source and repository
//!
//! Talks to a JSON collection server (json-server dialect): list queries use
//! `_sort` / `_order` plus one suffixed parameter per filter, single records
//! live under `{collection}/{id}`.

use crate::config::RemoteConfig;
use crate::core::error::{CatalogResult, ProductError, SourceError};
use crate::core::filter::{Filter, Operator};
use crate::core::planner::{plan, search};
use crate::core::product::{NewProduct, Product, ProductPatch};
use crate::core::query::Query;
use crate::core::service::{ProductRepository, ProductSource};
use crate::core::sort::sort_products;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use validator::Validate;

/// Remote product collection over HTTP
#[derive(Debug, Clone)]
pub struct RemoteProductSource {
    client: Client,
    config: RemoteConfig,
}

impl RemoteProductSource {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn record_url(&self, id: u32) -> String {
        format!("{}/{}", self.config.collection_url(), id)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SourceError> {
        let response = request
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!(status = %response.status(), url = %response.url(), "remote response");
        Ok(response)
    }

    fn transport_error(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            err.into()
        }
    }

    /// Map a non-success response; 404 on a record URL means the id is unknown
    fn check_record_status(response: Response, id: u32) -> CatalogResult<Response> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(ProductError::NotFound { id }.into()),
            status if status.is_success() => Ok(response),
            status => Err(SourceError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            }
            .into()),
        }
    }

    async fn decode_record(&self, response: Response) -> CatalogResult<Product> {
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body).map_err(|e| {
            SourceError::MalformedResponse {
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Whether the collection dialect can express this filter
fn is_remote_expressible(filter: &Filter) -> bool {
    matches!(
        filter.operator,
        Operator::Eq
            | Operator::Neq
            | Operator::Gt
            | Operator::Lt
            | Operator::Gte
            | Operator::Lte
            | Operator::Like
    )
}

/// Query-string parameters for a list request
///
/// `_sort` and `_order` come first, then one parameter per filter the dialect
/// supports, then `q` for the search term. Values are left unencoded; the
/// HTTP client encodes them.
pub fn remote_query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("_sort".to_string(), query.sort.field.to_string()),
        ("_order".to_string(), query.sort.order.to_string()),
    ];

    for filter in &query.filters {
        let suffix = match filter.operator {
            Operator::Eq => "",
            Operator::Neq => "_ne",
            Operator::Gt => "_gt",
            Operator::Lt => "_lt",
            Operator::Gte => "_gte",
            Operator::Lte => "_lte",
            Operator::Like => "_like",
            _ => continue,
        };
        pairs.push((format!("{}{}", filter.field, suffix), filter.value.to_text()));
    }

    if let Some(term) = query.search_term() {
        pairs.push(("q".to_string(), term.to_string()));
    }

    pairs
}

/// Filters the server never sees and that must be applied after the fetch
fn residual_filters(query: &Query) -> Vec<Filter> {
    query
        .filters
        .iter()
        .filter(|f| !is_remote_expressible(f))
        .cloned()
        .collect()
}

/// Decode a list body; anything but an array of products is malformed
pub fn decode_product_list(body: Value) -> Result<Vec<Product>, SourceError> {
    let Value::Array(items) = body else {
        return Err(SourceError::MalformedResponse {
            message: format!("expected an array, got {}", json_kind(&body)),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| SourceError::MalformedResponse {
                message: format!("element {}: {}", index, e),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl ProductSource for RemoteProductSource {
    async fn fetch(&self, query: &Query) -> Result<Vec<Product>, SourceError> {
        let url = self.config.collection_url();
        let pairs = remote_query_pairs(query);
        tracing::debug!(%url, params = ?pairs, "fetching products from remote collection");

        let response = self.send(self.client.get(&url).query(&pairs)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                SourceError::MalformedResponse {
                    message: e.to_string(),
                }
            }
        })?;
        let products = decode_product_list(body)?;
        tracing::debug!(count = products.len(), "remote collection returned products");

        // Ordering, and filters the dialect cannot carry, are enforced here
        let residual = residual_filters(query);
        let products = plan(&products, &residual);
        let products = match query.search_term() {
            Some(term) => search(products, term),
            None => products,
        };
        Ok(sort_products(products, &query.sort))
    }
}

#[async_trait]
impl ProductRepository for RemoteProductSource {
    async fn create(&self, product: NewProduct) -> CatalogResult<Product> {
        product.validate()?;

        let response = self
            .send(self.client.post(self.config.collection_url()).json(&product))
            .await?;
        let status = response.status();
        if let (StatusCode::CONFLICT, Some(id)) = (status, product.id) {
            return Err(ProductError::AlreadyExists { id }.into());
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            }
            .into());
        }

        let created = self.decode_record(response).await?;
        tracing::info!(id = created.id, "product created");
        Ok(created)
    }

    async fn get(&self, id: u32) -> CatalogResult<Product> {
        let response = self.send(self.client.get(self.record_url(id))).await?;
        let response = Self::check_record_status(response, id)?;
        self.decode_record(response).await
    }

    async fn update(&self, id: u32, patch: ProductPatch) -> CatalogResult<Product> {
        patch.validate()?;

        // PUT replaces the whole record, so merge onto the current one first
        let current = self.get(id).await?;
        let merged = current.apply(&patch);

        let response = self
            .send(self.client.put(self.record_url(id)).json(&merged))
            .await?;
        let response = Self::check_record_status(response, id)?;
        let updated = self.decode_record(response).await?;
        tracing::info!(id, "product updated");
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> CatalogResult<()> {
        let response = self.send(self.client.delete(self.record_url(id))).await?;
        Self::check_record_status(response, id)?;
        tracing::info!(id, "product deleted");
        Ok(())
    }
}
