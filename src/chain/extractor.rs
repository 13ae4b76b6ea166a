use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::{Number, Value};
use tokio::io::AsyncReadExt;

use crate::context::RunContext;
use crate::error::{AppError, AppResult, ChainError};
use crate::http::HttpResponse;

use super::limits::MAX_RESPONSE_BODY_BYTES;

/// Looks a single path up in a JSON document.
pub trait JsonExtractor: Send + Sync {
    /// Returns `None` when the text is not JSON or the path does not exist.
    fn extract(&self, json: &str, path: &str) -> Option<String>;
}

/// Dot-path extractor over `serde_json`.
///
/// Paths look like `data.items.0.id`: keys separated by dots, numeric
/// segments index arrays and `\.` keeps a literal dot inside a key. `#` as
/// the last segment yields an array's length; `#` followed by more segments
/// projects them over every element, so `items.#.id` collects each item's
/// id into an array and skips items without one. Wildcards and `#(...)`
/// queries are not supported.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathExtractor;

impl JsonExtractor for PathExtractor {
    fn extract(&self, json: &str, path: &str) -> Option<String> {
        let document: Value = serde_json::from_str(json).ok()?;
        let segments = split_path(path)?;
        lookup(&document, &segments).map(|found| render_value(&found))
    }
}

fn lookup<'doc>(current: &'doc Value, segments: &[String]) -> Option<Cow<'doc, Value>> {
    let Some((segment, rest)) = segments.split_first() else {
        return Some(Cow::Borrowed(current));
    };
    if segment == "#" {
        let items = current.as_array()?;
        if rest.is_empty() {
            return Some(Cow::Owned(Value::from(items.len())));
        }
        let projected = items
            .iter()
            .filter_map(|item| lookup(item, rest))
            .map(Cow::into_owned)
            .collect();
        return Some(Cow::Owned(Value::Array(projected)));
    }
    let next = match current {
        Value::Object(map) => map.get(segment.as_str())?,
        Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => return None,
    };
    lookup(next, rest)
}

fn split_path(path: &str) -> Option<Vec<String>> {
    if path.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    segments.push(current);
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Number(number) => render_number(number),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Integers keep their source digits; anything with a fraction or exponent
/// is printed as a plain decimal, so `1e3` becomes `1000`.
fn render_number(number: &Number) -> String {
    let raw = number.to_string();
    let digits = raw.strip_prefix('-').unwrap_or(&raw);
    if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return raw;
    }
    match number.as_f64() {
        Some(value) if value.is_finite() => value.to_string(),
        Some(_) | None => raw,
    }
}

/// Pulls every variable in `extract` out of the response body.
///
/// The body is read through a capped reader, then put back on the response
/// so later consumers can read it again. Extraction is all-or-nothing.
///
/// # Errors
///
/// Returns an error when the context is done, the body is missing, too
/// large or unreadable, or any path is absent.
pub async fn extract_variables(
    ctx: &RunContext,
    extractor: &dyn JsonExtractor,
    response: &mut HttpResponse,
    extract: &BTreeMap<String, String>,
) -> AppResult<BTreeMap<String, String>> {
    if let Some(err) = ctx.err() {
        return Err(err.into());
    }

    let body = read_capped_body(response).await?;
    let json = std::str::from_utf8(&body).ok();

    let mut variables = BTreeMap::new();
    for (variable, path) in extract {
        if let Some(err) = ctx.err() {
            return Err(err.into());
        }
        let value = json
            .and_then(|text| extractor.extract(text, path))
            .ok_or_else(|| ChainError::PathNotFound {
                variable: variable.clone(),
                path: path.clone(),
            })?;
        variables.insert(variable.clone(), value);
    }
    Ok(variables)
}

async fn read_capped_body(response: &mut HttpResponse) -> AppResult<Vec<u8>> {
    let Some(mut reader) = response.body.take() else {
        return Err(AppError::chain(ChainError::NilResponse));
    };

    let mut body = Vec::new();
    (&mut reader)
        .take(MAX_RESPONSE_BODY_BYTES)
        .read_to_end(&mut body)
        .await
        .map_err(|err| AppError::chain(ChainError::ReadResponseBody { source: err }))?;

    let mut probe = [0u8; 1];
    let extra = reader.read(&mut probe).await.unwrap_or(0);
    if extra > 0 {
        return Err(AppError::chain(ChainError::ResponseTooLarge {
            limit: MAX_RESPONSE_BODY_BYTES,
        }));
    }

    response.replace_body(body.clone());
    Ok(body)
}
