//! REST client for the hosted `customers` collection.

use crate::error::StoreError;
use async_trait::async_trait;
use jia_config::StoreConfig;
use jia_protocol::{Customer, CustomerDraft};
use log::{debug, info};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Request timeout applied to every store call.
const STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Read/insert operations against the `customers` collection.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Return all records ordered by name.
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;
    /// Return the total record count.
    async fn count_customers(&self) -> Result<u64, StoreError>;
    /// Insert a draft; the store assigns `id` and `created_at`.
    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, StoreError>;
}

/// Store client speaking a PostgREST-style HTTP surface.
pub struct RestCustomerStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestCustomerStore {
    /// Build a client for the configured store endpoint.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(STORE_TIMEOUT)
            .build()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        info!("store client ready (url={})", config.url);
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// URL of the `customers` collection.
    fn collection_url(&self) -> String {
        format!("{}/rest/v1/customers", self.base_url)
    }

    /// Attach the credential headers every store request carries.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl CustomerStore for RestCustomerStore {
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        debug!("listing customers");
        let response = self
            .authorized(self.http.get(self.collection_url()))
            .query(&[("select", "*"), ("order", "name.asc")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_store_failure(status, &body));
        }
        let customers: Vec<Customer> = response
            .json()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        debug!("listed customers (count={})", customers.len());
        Ok(customers)
    }

    async fn count_customers(&self) -> Result<u64, StoreError> {
        debug!("counting customers");
        let response = self
            .authorized(self.http.get(self.collection_url()))
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_store_failure(status, &body));
        }
        let header = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        parse_content_range_total(&header).ok_or_else(|| {
            StoreError::Unavailable(format!("missing count in content-range: {header:?}"))
        })
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, StoreError> {
        info!("creating customer (name={})", draft.name);
        let response = self
            .authorized(self.http.post(self.collection_url()))
            .header("Prefer", "return=representation")
            .json(draft)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_store_failure(status, &body));
        }
        let mut rows: Vec<Customer> = response
            .json()
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        if rows.is_empty() {
            return Err(StoreError::Unavailable(
                "store returned no representation for the created record".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }
}

/// Map a non-success store response onto the error taxonomy.
///
/// Constraint violations (400/409/422) become `Validation`; everything else
/// is `Unavailable`.
fn map_store_failure(status: StatusCode, body: &str) -> StoreError {
    let message = extract_store_message(body)
        .unwrap_or_else(|| format!("store error {}", status.as_u16()));
    match status {
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Validation(message)
        }
        _ => StoreError::Unavailable(message),
    }
}

/// Pull the `message` field out of a store error body, if it is JSON.
fn extract_store_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse the total from a `Content-Range` header such as `0-0/57` or `*/57`.
fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{map_store_failure, parse_content_range_total};
    use crate::error::StoreError;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    #[test]
    fn content_range_total_parses_both_shapes() {
        assert_eq!(parse_content_range_total("0-0/57"), Some(57));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("garbage"), None);
        assert_eq!(parse_content_range_total("0-0/many"), None);
    }

    #[test]
    fn constraint_statuses_map_to_validation() {
        let err = map_store_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "null value in column \"name\""}"#,
        );
        match err {
            StoreError::Validation(message) => {
                assert!(message.contains("null value"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn server_failures_map_to_unavailable_with_fallback_message() {
        let err = map_store_failure(StatusCode::BAD_GATEWAY, "");
        match err {
            StoreError::Unavailable(message) => assert_eq!(message, "store error 502"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
