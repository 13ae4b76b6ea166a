use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::context::RunContext;
use crate::engine::{RequestReport, ResultCollector};
use crate::error::{AppResult, ChainError};
use crate::http::{HttpClient, RequestFactory};

use super::dependency::DependencyGraph;
use super::extractor::{JsonExtractor, PathExtractor};
use super::processor::{ExecutionResult, RequestProcessor};
use super::variables::VariableStore;

/// Summary of a completed chain run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    /// Names that succeeded, in the order they ran.
    pub executed: Vec<String>,
    /// Result per attempted request; failures skipped under `ignore_fail`
    /// have `success == false`.
    pub results: BTreeMap<String, ExecutionResult>,
    /// The variable store as it stood when the run finished.
    pub variables: BTreeMap<String, String>,
}

/// Runs a config's requests in dependency order, threading extracted
/// variables from one request into the next.
#[derive(Clone)]
pub struct ChainExecutor {
    factory: Arc<dyn RequestFactory>,
    client: Arc<dyn HttpClient>,
    extractor: Arc<dyn JsonExtractor>,
    collector: Option<ResultCollector>,
}

impl ChainExecutor {
    #[must_use]
    pub fn new(factory: Arc<dyn RequestFactory>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            factory,
            client,
            extractor: Arc::new(PathExtractor),
            collector: None,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn JsonExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_collector(mut self, collector: ResultCollector) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Executes the whole chain.
    ///
    /// # Errors
    ///
    /// Returns a structural error before any request runs, the context
    /// error when the run is cancelled or times out, and
    /// [`ChainError::RequestFailed`] for the first failing request unless
    /// `ignore_fail` is set.
    pub async fn execute(&self, ctx: &RunContext, config: &RunConfig) -> AppResult<ChainReport> {
        if let Some(err) = ctx.err() {
            return Err(err.into());
        }
        let graph = DependencyGraph::build(&config.requests)?;
        let order = graph.execution_order(config.execution_order)?;
        debug!("Chain plan has {} request(s)", order.len());

        let processor = RequestProcessor::new(
            Arc::clone(&self.factory),
            Arc::clone(&self.client),
            Arc::clone(&self.extractor),
        );
        let mut store = VariableStore::new();
        let mut processed = HashSet::with_capacity(order.len());
        let mut report = ChainReport::default();

        for name in &order {
            if let Some(err) = ctx.err() {
                return Err(err.into());
            }
            if processed.contains(name) {
                continue;
            }
            let Some(spec) = graph.request(name) else {
                continue;
            };

            let started = Instant::now();
            let outcome = processor
                .process_request(ctx, spec, config, &mut store)
                .await;
            let duration = started.elapsed();
            let url = spec.url(&config.base_url);

            match outcome {
                Ok(result) => {
                    info!(
                        "Request '{}' completed with status {} in {:?}",
                        spec.name, result.status_code, duration
                    );
                    self.collect(&RequestReport {
                        name: &spec.name,
                        method: &spec.method,
                        url: &url,
                        status_code: Some(result.status_code),
                        error: None,
                        duration,
                        variables: Some(&result.variables),
                    });
                    processed.insert(name.clone());
                    report.executed.push(name.clone());
                    report.results.insert(name.clone(), result);
                }
                Err(err) => {
                    let status_code = err.status_code();
                    self.collect(&RequestReport {
                        name: &spec.name,
                        method: &spec.method,
                        url: &url,
                        status_code,
                        error: Some(&err),
                        duration,
                        variables: None,
                    });
                    if let Some(reason) = ctx.err() {
                        return Err(reason.into());
                    }
                    if !config.ignore_fail {
                        return Err(ChainError::RequestFailed {
                            name: name.clone(),
                            source: Box::new(err),
                        }
                        .into());
                    }
                    warn!(
                        "Request '{}' failed: {}, continuing due to ignore_fail",
                        spec.name, err
                    );
                    report.results.insert(
                        name.clone(),
                        ExecutionResult {
                            status_code: status_code.unwrap_or(0),
                            variables: BTreeMap::new(),
                            success: false,
                        },
                    );
                }
            }
        }

        report.variables = store
            .values()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(report)
    }

    fn collect(&self, report: &RequestReport<'_>) {
        if let Some(collector) = self.collector.as_ref() {
            collector(report);
        }
    }
}
