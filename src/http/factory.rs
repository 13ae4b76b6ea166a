use crate::config::{BodyKind, RequestSpec, RunConfig};
use crate::error::{AppError, AppResult, HttpError};

use super::method::HttpMethod;
use super::request::{HttpRequest, RequestBody, parse_header_line};

/// Builds transport requests from config entries or ad-hoc arguments.
pub trait RequestFactory: Send + Sync {
    /// Assembles the request described by `request` against `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the config is invalid, the method is unknown
    /// or a header line is malformed.
    fn create_from_config(&self, config: &RunConfig, request: &RequestSpec)
    -> AppResult<HttpRequest>;

    /// Assembles a one-off request. `header` may be empty; `body` is sent
    /// as JSON for methods that carry one.
    ///
    /// # Errors
    ///
    /// Returns an error when the method is unknown or the header is
    /// malformed.
    fn create_simple(&self, url: &str, method: &str, header: &str, body: &str)
    -> AppResult<HttpRequest>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRequestFactory;

impl RequestFactory for DefaultRequestFactory {
    fn create_from_config(
        &self,
        config: &RunConfig,
        request: &RequestSpec,
    ) -> AppResult<HttpRequest> {
        config
            .validate()
            .map_err(|err| AppError::http(HttpError::ConfigValidation { source: err }))?;

        let method: HttpMethod = request.method.parse()?;
        let mut http_request = HttpRequest::new(method, request.url(&config.base_url));
        for line in &request.headers {
            let (key, value) = parse_header_line(line)?;
            http_request.set_header(key, value);
        }

        if method.carries_body()
            && let Some((kind, content)) = request.body()
        {
            http_request.body = Some(match kind {
                BodyKind::Json => RequestBody::json(content),
                BodyKind::Form => RequestBody::form(content),
                BodyKind::Raw => RequestBody::raw(content),
            });
        }
        Ok(http_request)
    }

    fn create_simple(
        &self,
        url: &str,
        method: &str,
        header: &str,
        body: &str,
    ) -> AppResult<HttpRequest> {
        let method: HttpMethod = method.parse()?;
        let mut http_request = HttpRequest::new(method, url.to_owned());
        if !header.trim().is_empty() {
            let (key, value) = parse_header_line(header)?;
            http_request.set_header(key, value);
        }
        if method.carries_body() && !body.is_empty() {
            http_request.body = Some(RequestBody::json(body));
        }
        Ok(http_request)
    }
}
