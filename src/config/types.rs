use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeout applied when the config leaves `timeout` unset or zero.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Order in which a chain run visits its requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionOrder {
    /// Parent-first post-order, reversed: dependents run before the
    /// requests they depend on.
    #[default]
    Compat,
    /// Every request runs after the request it depends on.
    DependencyFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Raw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub headers: Vec<String>,
    pub raw_body: Option<String>,
    pub form_body: Option<String>,
    pub json_body: Option<String>,
    #[serde(default)]
    pub extract: BTreeMap<String, String>,
    pub depends_on: Option<String>,
}

impl RequestSpec {
    #[must_use]
    pub fn new(name: &str, method: &str, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            method: method.to_owned(),
            path: path.to_owned(),
            ..Self::default()
        }
    }

    /// The request this one depends on; an empty string means none.
    #[must_use]
    pub fn dependency(&self) -> Option<&str> {
        self.depends_on.as_deref().filter(|name| !name.is_empty())
    }

    /// The populated body variant, checked json, then form, then raw.
    #[must_use]
    pub fn body(&self) -> Option<(BodyKind, &str)> {
        [
            (BodyKind::Json, self.json_body.as_deref()),
            (BodyKind::Form, self.form_body.as_deref()),
            (BodyKind::Raw, self.raw_body.as_deref()),
        ]
        .into_iter()
        .find_map(|(kind, body)| body.filter(|body| !body.is_empty()).map(|body| (kind, body)))
    }

    #[must_use]
    pub fn body_count(&self) -> usize {
        [&self.json_body, &self.form_body, &self.raw_body]
            .into_iter()
            .filter(|body| body.as_deref().is_some_and(|body| !body.is_empty()))
            .count()
    }

    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    #[serde(default)]
    pub base_url: String,
    /// Whole-run budget in seconds.
    #[serde(default)]
    pub timeout: u64,
    #[serde(default)]
    pub concurrency: bool,
    #[serde(default)]
    pub ignore_fail: bool,
    #[serde(default)]
    pub execution_order: ExecutionOrder,
    #[serde(default, rename = "request")]
    pub requests: Vec<RequestSpec>,
}

impl RunConfig {
    #[must_use]
    pub fn new(base_url: &str, requests: Vec<RequestSpec>) -> Self {
        Self {
            base_url: base_url.to_owned(),
            timeout: DEFAULT_TIMEOUT_SECS,
            requests,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        let secs = if self.timeout == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout
        };
        Duration::from_secs(secs)
    }
}
