use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::ChainError;

use super::limits::{MAX_BODY_LEN, MAX_VARIABLE_DEPTH, MAX_VARIABLE_VALUE_LEN};

static VARIABLE_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").ok());

/// Read/write access to the variables of one chain run.
pub trait VariableResolver: Send + Sync {
    /// Stores `value` under `name`, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::EmptyVariableName`] for an empty name.
    fn set(&mut self, name: &str, value: &str) -> Result<(), ChainError>;

    fn get(&self, name: &str) -> Option<&str>;

    /// Substitutes every known `${name}` in `input`.
    fn resolve(&self, input: &str) -> String;

    fn resolve_headers(&self, headers: &[String]) -> Vec<String> {
        headers.iter().map(|header| self.resolve(header)).collect()
    }

    /// Resolves a body and caps the result; absent or empty bodies pass
    /// through untouched.
    fn resolve_body(&self, body: Option<&str>) -> Option<String> {
        match body {
            Some(content) if !content.is_empty() => {
                Some(truncate_chars(&self.resolve(content), MAX_BODY_LEN).into_owned())
            }
            Some(_) | None => body.map(str::to_owned),
        }
    }
}

/// Outcome of a bounded expansion that nested too deeply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DepthExceeded;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    values: HashMap<String, String>,
}

impl VariableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub const fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub(crate) fn resolve_with_depth(
        &self,
        input: &str,
        depth: usize,
    ) -> Result<String, DepthExceeded> {
        if depth >= MAX_VARIABLE_DEPTH {
            return Err(DepthExceeded);
        }
        let Some(pattern) = VARIABLE_PATTERN.as_ref() else {
            return Ok(input.to_owned());
        };

        let mut exceeded = false;
        let resolved = pattern.replace_all(input, |caps: &Captures<'_>| {
            let token = caps.get(0).map_or("", |found| found.as_str());
            if exceeded {
                return token.to_owned();
            }
            let name = caps.get(1).map_or("", |found| found.as_str());
            let Some(value) = self.values.get(name) else {
                return token.to_owned();
            };
            let value = truncate_chars(value, MAX_VARIABLE_VALUE_LEN);
            match self.resolve_with_depth(&value, depth.saturating_add(1)) {
                Ok(expanded) => expanded,
                Err(DepthExceeded) => {
                    exceeded = true;
                    token.to_owned()
                }
            }
        });

        if exceeded {
            return Err(DepthExceeded);
        }
        Ok(resolved.into_owned())
    }
}

impl VariableResolver for VariableStore {
    fn set(&mut self, name: &str, value: &str) -> Result<(), ChainError> {
        if name.is_empty() {
            return Err(ChainError::EmptyVariableName);
        }
        self.values.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn resolve(&self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }
        self.resolve_with_depth(input, 0)
            .unwrap_or_else(|DepthExceeded| input.to_owned())
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> Cow<'_, str> {
    value
        .char_indices()
        .nth(max_chars)
        .map_or(Cow::Borrowed(value), |(cut, _)| {
            Cow::Owned(value.get(..cut).unwrap_or(value).to_owned())
        })
}
