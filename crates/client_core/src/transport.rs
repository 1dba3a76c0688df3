//! Request/response primitive used for every state-changing call.

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{FormFields, ServerReply};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {path} failed: {reason}")]
    Request { path: String, reason: String },
    #[error("server returned HTTP {status} for {path}")]
    Status { path: String, status: u16 },
    #[error("malformed reply from {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("transport is unavailable")]
    Unavailable,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(&self, path: &str, fields: FormFields)
        -> Result<ServerReply, TransportError>;
}

pub struct MissingTransport;

#[async_trait]
impl Transport for MissingTransport {
    async fn post_form(
        &self,
        _path: &str,
        _fields: FormFields,
    ) -> Result<ServerReply, TransportError> {
        Err(TransportError::Unavailable)
    }
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(server_url).map_err(|err| TransportError::InvalidUrl {
            url: server_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl {
                url: server_url.to_string(),
                reason: "server_url must start with http:// or https://".to_string(),
            });
        }
        Ok(Self { http, base_url })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|err| TransportError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        path: &str,
        fields: FormFields,
    ) -> Result<ServerReply, TransportError> {
        let url = self.endpoint(path)?;
        debug!("transport: post url={url}");

        let res = self
            .http
            .post(url)
            .form(&fields)
            .send()
            .await
            .map_err(|err| {
                warn!("transport: request failed path={path} err={err}");
                TransportError::Request {
                    path: path.to_string(),
                    reason: err.to_string(),
                }
            })?;

        let status = res.status();
        if !status.is_success() {
            warn!("transport: non-success status path={path} status={status}");
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = res.text().await.map_err(|err| TransportError::Request {
            path: path.to_string(),
            reason: err.to_string(),
        })?;

        serde_json::from_str::<ServerReply>(&body).map_err(|err| {
            warn!("transport: malformed reply path={path} err={err}");
            TransportError::Malformed {
                path: path.to_string(),
                reason: err.to_string(),
            }
        })
    }
}
