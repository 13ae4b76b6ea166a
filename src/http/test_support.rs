use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, HttpError};

use super::client::HttpClient;
use super::request::HttpRequest;
use super::response::HttpResponse;

#[derive(Debug, Clone)]
pub(crate) enum MockReply {
    Body { status: u16, body: String },
    NoBody { status: u16 },
    Fail,
}

/// Records every request and answers from a per-URL script.
#[derive(Debug)]
pub(crate) struct MockClient {
    replies: HashMap<String, MockReply>,
    fallback: MockReply,
    delay: Option<Duration>,
    calls: Mutex<Vec<HttpRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        Self {
            replies: HashMap::new(),
            fallback: MockReply::Body {
                status: 200,
                body: "{}".to_owned(),
            },
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn reply(mut self, url: &str, status: u16, body: &str) -> Self {
        self.replies.insert(
            url.to_owned(),
            MockReply::Body {
                status,
                body: body.to_owned(),
            },
        );
        self
    }

    pub(crate) fn reply_without_body(mut self, url: &str, status: u16) -> Self {
        self.replies
            .insert(url.to_owned(), MockReply::NoBody { status });
        self
    }

    pub(crate) fn fail(mut self, url: &str) -> Self {
        self.replies.insert(url.to_owned(), MockReply::Fail);
        self
    }

    pub(crate) fn fail_all(mut self) -> Self {
        self.fallback = MockReply::Fail;
        self
    }

    pub(crate) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.url).collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn execute(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        let url = request.url.clone();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(&url).unwrap_or(&self.fallback) {
            MockReply::Body { status, body } => Ok(HttpResponse::new(
                *status,
                vec![("content-type".to_owned(), "application/json".to_owned())],
                body.clone().into_bytes(),
            )),
            MockReply::NoBody { status } => Ok(HttpResponse::without_body(*status)),
            MockReply::Fail => Err(AppError::http(HttpError::MockFailure { url })),
        }
    }

    fn set_timeout(&mut self, _timeout: Duration) {}
}
