use std::fmt;
use std::io::Cursor;

use tokio::io::{AsyncRead, AsyncReadExt};

pub type BodyReader = Box<dyn AsyncRead + Send + Unpin>;

/// A response as handed back by an [`super::HttpClient`].
///
/// The body is a reader so consumers can bound how much they pull; whoever
/// drains it is expected to install a fresh copy for later readers.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<BodyReader>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body: Some(Box::new(Cursor::new(body))),
        }
    }

    #[must_use]
    pub const fn without_body(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn replace_body(&mut self, body: Vec<u8>) {
        self.body = Some(Box::new(Cursor::new(body)));
    }

    /// Reads the remaining body as lossy UTF-8 and puts a copy back.
    ///
    /// # Errors
    ///
    /// Returns an error when the body reader fails.
    pub async fn text(&mut self) -> std::io::Result<String> {
        let Some(mut reader) = self.body.take() else {
            return Ok(String::new());
        };
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        let text = String::from_utf8_lossy(&buffer).into_owned();
        self.replace_body(buffer);
        Ok(text)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
