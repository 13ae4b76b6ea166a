use std::collections::HashSet;

use crate::error::ConfigError;

use super::types::{RequestSpec, RunConfig};

impl RunConfig {
    /// Checks the structural invariants every run relies on.
    ///
    /// Dependency references and cycles are checked when the chain graph is
    /// built, since batch runs ignore `depends_on`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if self.requests.is_empty() {
            return Err(ConfigError::NoRequests);
        }

        let mut names = HashSet::with_capacity(self.requests.len());
        for (index, request) in self.requests.iter().enumerate() {
            validate_request(request, index, &mut names)?;
        }
        Ok(())
    }
}

fn validate_request<'cfg>(
    request: &'cfg RequestSpec,
    index: usize,
    names: &mut HashSet<&'cfg str>,
) -> Result<(), ConfigError> {
    if request.name.is_empty() {
        return Err(ConfigError::MissingRequestName { index });
    }
    if !names.insert(request.name.as_str()) {
        return Err(ConfigError::DuplicateRequestName {
            name: request.name.clone(),
        });
    }
    if request.method.is_empty() {
        return Err(ConfigError::MissingMethod {
            name: request.name.clone(),
        });
    }
    if request.path.is_empty() {
        return Err(ConfigError::MissingPath {
            name: request.name.clone(),
        });
    }
    if request.body_count() > 1 {
        return Err(ConfigError::MultipleBodies {
            name: request.name.clone(),
        });
    }
    Ok(())
}
