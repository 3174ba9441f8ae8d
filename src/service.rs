//! HTTP client for the driver filter backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{form::FilterRequest, submit::SubmitError};

/// Remote service that turns an uploaded schedule into a filtered one.
#[async_trait]
pub trait FilterService: Send + Sync {
    /// Send the payload and return the response body on success.
    async fn filter_driver(&self, request: FilterRequest) -> Result<Vec<u8>, SubmitError>;
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Message for a failed response: the server's `error` field, or the status.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()))
}

/// `POST {base_url}/filter-driver` over reqwest.
#[derive(Clone, Debug)]
pub struct HttpFilterService {
    http: Client,
    endpoint: String,
}

impl HttpFilterService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/filter-driver", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport(e: impl std::fmt::Display) -> SubmitError {
    SubmitError::Transport(e.to_string())
}

#[async_trait]
impl FilterService for HttpFilterService {
    async fn filter_driver(&self, request: FilterRequest) -> Result<Vec<u8>, SubmitError> {
        tracing::info!(
            "POST {} driver={:?} file={}",
            self.endpoint,
            request.driver_name,
            request.file.name()
        );
        let form = request.into_multipart().await.map_err(transport)?;

        let resp = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(transport)?;
        tracing::info!("response {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(SubmitError::Service {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(body.to_vec())
    }
}
