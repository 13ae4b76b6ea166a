use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::{RequestSpec, RunConfig};
use crate::context::RunContext;
use crate::error::{AppError, AppResult, ChainError};
use crate::http::{HttpClient, RequestFactory};

use super::extractor::{JsonExtractor, extract_variables};
use super::variables::VariableResolver;

/// Outcome of one processed chain request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status_code: u16,
    pub variables: BTreeMap<String, String>,
    pub success: bool,
}

/// Runs a single chain request: substitute, send, extract.
#[derive(Clone)]
pub struct RequestProcessor {
    factory: Arc<dyn RequestFactory>,
    client: Arc<dyn HttpClient>,
    extractor: Arc<dyn JsonExtractor>,
}

impl RequestProcessor {
    #[must_use]
    pub const fn new(
        factory: Arc<dyn RequestFactory>,
        client: Arc<dyn HttpClient>,
        extractor: Arc<dyn JsonExtractor>,
    ) -> Self {
        Self {
            factory,
            client,
            extractor,
        }
    }

    /// Processes `spec` against the variables gathered so far and commits
    /// the variables it extracts.
    ///
    /// # Errors
    ///
    /// Returns the context error when the run is done, a
    /// [`ChainError::RequestCreation`] or [`ChainError::RequestExecution`]
    /// when the request cannot be built or sent, and a
    /// [`ChainError::VariableExtraction`] carrying the response status when
    /// extraction fails. Nothing is committed on error.
    pub async fn process_request(
        &self,
        ctx: &RunContext,
        spec: &RequestSpec,
        config: &RunConfig,
        store: &mut dyn VariableResolver,
    ) -> AppResult<ExecutionResult> {
        if let Some(err) = ctx.err() {
            return Err(err.into());
        }

        let resolved = prepare(spec, store);
        let request = self
            .factory
            .create_from_config(config, &resolved)
            .map_err(|err| ChainError::RequestCreation {
                source: Box::new(err),
            })?;

        debug!("Executing '{}': {} {}", spec.name, request.method, request.url);
        let mut response = tokio::select! {
            reason = ctx.done() => return Err(reason.into()),
            outcome = self.client.execute(request) => {
                outcome.map_err(|err| ChainError::RequestExecution { source: Box::new(err) })?
            }
        };

        let mut result = ExecutionResult {
            status_code: response.status,
            variables: BTreeMap::new(),
            success: true,
        };
        if resolved.extract.is_empty() {
            return Ok(result);
        }

        let status = response.status;
        let wrap = |err: AppError| ChainError::VariableExtraction {
            status,
            source: Box::new(err),
        };
        let variables = extract_variables(
            ctx,
            self.extractor.as_ref(),
            &mut response,
            &resolved.extract,
        )
        .await
        .map_err(wrap)?;
        if variables.keys().any(String::is_empty) {
            return Err(wrap(AppError::chain(ChainError::EmptyVariableName)).into());
        }

        for (name, value) in &variables {
            store.set(name, value)?;
        }
        result.variables = variables;
        Ok(result)
    }
}

fn prepare(spec: &RequestSpec, store: &dyn VariableResolver) -> RequestSpec {
    let mut resolved = spec.clone();
    resolved.path = store.resolve(&spec.path);
    resolved.headers = store.resolve_headers(&spec.headers);
    resolved.json_body = store.resolve_body(spec.json_body.as_deref());
    resolved.form_body = store.resolve_body(spec.form_body.as_deref());
    resolved.raw_body = store.resolve_body(spec.raw_body.as_deref());
    resolved
}
