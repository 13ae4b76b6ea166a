use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::{AppError, AppResult, HttpError};

use super::request::HttpRequest;
use super::response::HttpResponse;

const DEFAULT_USER_AGENT: &str = concat!("reqflow/", env!("CARGO_PKG_VERSION"));

/// Transport seam used by the chain and batch executors.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends one request and returns its response.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the response
    /// cannot be read.
    async fn execute(&self, request: HttpRequest) -> AppResult<HttpResponse>;

    /// Sets the timeout applied to every following request.
    fn set_timeout(&mut self, timeout: Duration);
}

/// [`HttpClient`] backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Builds a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying TLS backend fails to initialize.
    pub fn new() -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        Ok(Self {
            client,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        let url = url::Url::parse(&request.url).map_err(|err| {
            AppError::http(HttpError::InvalidUrl {
                url: request.url.clone(),
                source: err,
            })
        })?;

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .timeout(self.timeout);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let has_content_type = request.header(CONTENT_TYPE.as_str()).is_some();
        if let Some(body) = request.body {
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, body.content_type);
            }
            builder = builder.body(body.content);
        }
        let built = builder
            .build()
            .map_err(|err| AppError::http(HttpError::BuildRequestFailed { source: err }))?;

        debug!("Sending {} {}", request.method, request.url);
        let response = self
            .client
            .execute(built)
            .await
            .map_err(|err| AppError::http(HttpError::Transport { source: err }))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| AppError::http(HttpError::ResponseReadFailed { source: err }))?;

        Ok(HttpResponse::new(status, headers, bytes.to_vec()))
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
