//! AnkiConnect HTTP client.
//!
//! One synchronous request per call, no retries, transport-default
//! timeouts. The client touches no local state; all side effects happen
//! on the automation endpoint.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{Action, ActionRequest, ActionResponse, ExportParams, ImportParams};

/// Default AnkiConnect endpoint on the local machine.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8765";

/// Errors from the AnkiConnect client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Endpoint unreachable or the transport failed mid-request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint answered but reported a failure.
    #[error("AnkiConnect error: {0}")]
    Remote(String),

    /// The endpoint answered without an error but the result value has the
    /// wrong shape for the action.
    #[error("unexpected {action} result: {value}")]
    UnexpectedResult {
        action: &'static str,
        value: Value,
    },
}

/// AnkiConnect client bound to one endpoint URL.
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
}

impl Client {
    /// Creates a client for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Performs one AnkiConnect call and returns the raw result value.
    async fn invoke<P: Serialize>(
        &self,
        action: Action,
        params: Option<P>,
    ) -> Result<Value, Error> {
        let request = ActionRequest::new(action, params);
        tracing::debug!(action = action.as_str(), "AnkiConnect call");
        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(Error::Remote(format!(
                "HTTP {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }

        let decoded: ActionResponse = serde_json::from_slice(&body)?;
        if let Some(message) = decoded.error {
            return Err(Error::Remote(message));
        }
        Ok(decoded.result.unwrap_or(Value::Null))
    }

    /// Reports the endpoint's API version. Doubles as the connectivity probe.
    pub async fn version(&self) -> Result<i64, Error> {
        let result = self.invoke::<()>(Action::Version, None).await?;
        match result.as_i64() {
            Some(version) => Ok(version),
            None => Err(Error::UnexpectedResult {
                action: Action::Version.as_str(),
                value: result,
            }),
        }
    }

    /// Imports a staged archive into the collection.
    ///
    /// Only a boolean `true` result counts as success; anything else takes
    /// the failure path.
    pub async fn import_package(&self, path: &Path) -> Result<(), Error> {
        let params = ImportParams {
            path: path.to_string_lossy().into_owned(),
        };
        let result = self.invoke(Action::ImportPackage, Some(params)).await?;
        match result {
            Value::Bool(true) => Ok(()),
            other => Err(Error::UnexpectedResult {
                action: Action::ImportPackage.as_str(),
                value: other,
            }),
        }
    }

    /// Asks the endpoint to export `deck` to `path`.
    ///
    /// The result value is not checked; callers verify success through the
    /// file's presence on disk.
    pub async fn export_package(
        &self,
        deck: &str,
        path: &Path,
        include_sched: bool,
    ) -> Result<(), Error> {
        let params = ExportParams {
            deck: deck.to_owned(),
            path: path.to_string_lossy().into_owned(),
            include_sched,
        };
        self.invoke(Action::ExportPackage, Some(params)).await?;
        Ok(())
    }
}
