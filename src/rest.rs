//! PostgREST-style HTTP adapter for [`PersistentStore`].

use reqwest::StatusCode;
use reqwest::blocking::{RequestBuilder, Response};
use serde_json::Value;

use crate::error::StoreError;
use crate::traits::{Filter, PersistentStore, Table};

const URL_VAR: &str = "STORE_URL";
const KEY_VAR: &str = "STORE_KEY";

#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base of the REST endpoint, e.g. "http://localhost:3000".
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl RestConfig {
    /// Reads `STORE_URL` and `STORE_KEY`. Returns `None` without a URL.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(URL_VAR).ok().map(|value| clean_env_value(&value))?;
        if base_url.is_empty() {
            return None;
        }
        let api_key = std::env::var(KEY_VAR)
            .ok()
            .map(|value| clean_env_value(&value))
            .filter(|value| !value.is_empty());

        Some(Self {
            base_url,
            api_key,
            ..Self::default()
        })
    }
}

/// Strips whitespace and stray quotes left over from `.env` files.
fn clean_env_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"')
        .trim()
        .to_string()
}

/// Blocking client for a PostgREST-style API with one endpoint per table.
#[derive(Debug, Clone)]
pub struct RestStore {
    config: RestConfig,
    client: reqwest::blocking::Client,
}

impl RestStore {
    /// Builds the HTTP client. No request is made until first use.
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, table: Table) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), table.name())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request
                .header("apikey", key.as_str())
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorized(request).send()?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(status_error(status, response.text().unwrap_or_default()))
        }
    }

    /// Single-row bulk insert that merges on the table's key column.
    fn upsert_request(&self, table: Table, key: &str, mut record: Value) -> RequestBuilder {
        if let Value::Object(fields) = &mut record {
            fields.insert(table.key_column().to_string(), Value::String(key.to_string()));
        }
        self.client
            .post(self.url(table))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[record])
    }

    fn delete_request(&self, table: Table, key: &str) -> RequestBuilder {
        self.client
            .delete(self.url(table))
            .query(&[(table.key_column(), format!("eq.{}", key))])
    }

    /// `Since` filters are pushed down as `{column}=gte.{rfc3339}`.
    fn select_request(&self, table: Table, filter: &Filter) -> RequestBuilder {
        let mut params = vec![("select", "*".to_string())];
        if let Filter::Since { column, cutoff } = filter {
            params.push((*column, format!("gte.{}", cutoff.to_rfc3339())));
        }
        self.client.get(self.url(table)).query(&params)
    }
}

fn status_error(status: StatusCode, body: String) -> StoreError {
    StoreError::Status {
        status: status.as_u16(),
        body,
    }
}

impl PersistentStore for RestStore {
    fn upsert(&self, table: Table, key: &str, record: Value) -> Result<(), StoreError> {
        self.send(self.upsert_request(table, key, record))?;
        Ok(())
    }

    fn insert(&self, table: Table, record: Value) -> Result<(), StoreError> {
        self.send(self.client.post(self.url(table)).json(&record))?;
        Ok(())
    }

    fn delete(&self, table: Table, key: &str) -> Result<(), StoreError> {
        self.send(self.delete_request(table, key))?;
        Ok(())
    }

    fn get(&self, table: Table, key: &str) -> Result<Option<Value>, StoreError> {
        let request = self.client.get(self.url(table)).query(&[
            ("select", "*".to_string()),
            (table.key_column(), format!("eq.{}", key)),
        ]);
        let rows: Vec<Value> = self.send(request)?.json()?;
        Ok(rows.into_iter().next())
    }

    fn select_all(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let rows: Vec<Value> = self.send(self.select_request(table, filter))?.json()?;
        Ok(rows)
    }
}
