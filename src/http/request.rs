use crate::error::HttpError;

use super::method::HttpMethod;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Splits a `Key: Value` header line on its first colon.
///
/// # Errors
///
/// Returns an error when the colon is missing or the key is blank.
pub fn parse_header_line(line: &str) -> Result<(String, String), HttpError> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| HttpError::InvalidHeaderFormat {
            value: line.to_owned(),
        })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(HttpError::EmptyHeaderKey {
            value: line.to_owned(),
        });
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: &'static str,
    pub content: String,
}

impl RequestBody {
    #[must_use]
    pub fn json(content: &str) -> Self {
        Self {
            content_type: CONTENT_TYPE_JSON,
            content: content.to_owned(),
        }
    }

    #[must_use]
    pub fn form(content: &str) -> Self {
        Self {
            content_type: CONTENT_TYPE_FORM,
            content: content.to_owned(),
        }
    }

    #[must_use]
    pub fn raw(content: &str) -> Self {
        Self {
            content_type: CONTENT_TYPE_TEXT,
            content: content.to_owned(),
        }
    }
}

/// A fully assembled request, ready for an [`super::HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    #[must_use]
    pub const fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any earlier value under the same
    /// case-insensitive name.
    pub fn set_header(&mut self, key: String, value: String) {
        if let Some(entry) = self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            entry.1 = value;
            return;
        }
        self.headers.push((key, value));
    }

    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}
