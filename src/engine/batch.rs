use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use crate::config::{RequestSpec, RunConfig};
use crate::context::RunContext;
use crate::error::{AppError, AppResult, ChainError};
use crate::http::{HttpClient, HttpRequest, HttpResponse, RequestFactory};

use super::collector::{RequestReport, ResultCollector};

/// Upper bound on concurrent batch workers.
pub const DEFAULT_MAX_WORKERS: usize = 5;

type JobQueue = Arc<Mutex<mpsc::Receiver<RequestSpec>>>;

/// Runs a config's requests with no variables and no dependencies.
#[derive(Clone)]
pub struct BatchExecutor {
    factory: Arc<dyn RequestFactory>,
    client: Arc<dyn HttpClient>,
    collector: Option<ResultCollector>,
    max_workers: usize,
}

impl BatchExecutor {
    #[must_use]
    pub fn new(factory: Arc<dyn RequestFactory>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            factory,
            client,
            collector: None,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    #[must_use]
    pub fn with_collector(mut self, collector: ResultCollector) -> Self {
        self.collector = Some(collector);
        self
    }

    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Runs the batch concurrently when the config asks for it, otherwise in
    /// config order.
    ///
    /// # Errors
    ///
    /// See [`BatchExecutor::execute_sequential`] and
    /// [`BatchExecutor::execute_concurrent`].
    pub async fn execute(&self, ctx: &RunContext, config: &RunConfig) -> AppResult<()> {
        if config.concurrency {
            self.execute_concurrent(ctx, config).await
        } else {
            self.execute_sequential(ctx, config).await
        }
    }

    /// Runs the requests one at a time in config order.
    ///
    /// Once the context is done, `ignore_fail` runs skip every remaining
    /// request and still succeed.
    ///
    /// # Errors
    ///
    /// Returns the context error, or [`ChainError::BatchRequestFailed`] for
    /// the first failing request, unless `ignore_fail` is set.
    pub async fn execute_sequential(&self, ctx: &RunContext, config: &RunConfig) -> AppResult<()> {
        for spec in &config.requests {
            if let Some(reason) = ctx.err() {
                if config.ignore_fail {
                    warn!(
                        "Skipping '{}': {}, continuing due to ignore_fail",
                        spec.name, reason
                    );
                    continue;
                }
                return Err(reason.into());
            }

            if let Err(err) = self.run_request(ctx, config, spec).await {
                if config.ignore_fail {
                    warn!("Request '{}' failed: {}, continuing", spec.name, err);
                    continue;
                }
                return Err(batch_failure(&spec.name, err));
            }
        }
        Ok(())
    }

    /// Runs the requests on up to `max_workers` tasks.
    ///
    /// Workers never cancel each other; the first failure is kept and the
    /// rest are dropped.
    ///
    /// # Errors
    ///
    /// Returns the context error when the run is done, otherwise the first
    /// captured [`ChainError::BatchRequestFailed`] unless `ignore_fail` is
    /// set.
    pub async fn execute_concurrent(&self, ctx: &RunContext, config: &RunConfig) -> AppResult<()> {
        let total = config.requests.len();
        if total == 0 {
            return Ok(());
        }
        let workers = self.max_workers.min(total);
        debug!("Starting {} batch worker(s) for {} request(s)", workers, total);

        let (job_tx, job_rx) = mpsc::channel::<RequestSpec>(total);
        let jobs: JobQueue = Arc::new(Mutex::new(job_rx));
        let (error_tx, mut error_rx) = mpsc::channel::<AppError>(1);
        let shared = Arc::new(config.clone());

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let executor = self.clone();
            let ctx = ctx.clone();
            let config = Arc::clone(&shared);
            let jobs = Arc::clone(&jobs);
            let errors = error_tx.clone();
            handles.push(tokio::spawn(async move {
                executor
                    .worker(worker_id, &ctx, &config, &jobs, &errors)
                    .await;
            }));
        }
        drop(error_tx);

        for spec in &config.requests {
            if ctx.is_done() {
                break;
            }
            if job_tx.send(spec.clone()).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        for handle in handles {
            if let Err(err) = handle.await {
                warn!("Batch worker stopped abnormally: {}", err);
            }
        }

        if let Some(reason) = ctx.err() {
            return Err(reason.into());
        }
        if !config.ignore_fail
            && let Ok(err) = error_rx.try_recv()
        {
            return Err(err);
        }
        Ok(())
    }

    /// Sends one ad-hoc request and hands back its response.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be built or sent, or the
    /// context is done first.
    pub async fn execute_simple(
        &self,
        ctx: &RunContext,
        url: &str,
        method: &str,
        header: &str,
        body: &str,
    ) -> AppResult<HttpResponse> {
        let request = self
            .factory
            .create_simple(url, method, header, body)
            .map_err(|err| ChainError::RequestCreation {
                source: Box::new(err),
            })?;

        let started = Instant::now();
        let outcome = self.send(ctx, request).await;
        self.collect(&RequestReport {
            name: "",
            method,
            url,
            status_code: outcome.as_ref().ok().map(|response| response.status),
            error: outcome.as_ref().err(),
            duration: started.elapsed(),
            variables: None,
        });
        outcome
    }

    async fn worker(
        &self,
        worker_id: usize,
        ctx: &RunContext,
        config: &RunConfig,
        jobs: &JobQueue,
        errors: &mpsc::Sender<AppError>,
    ) {
        loop {
            if ctx.is_done() {
                debug!("Worker {} stopping: run is done", worker_id);
                return;
            }
            let job = {
                let mut queue = jobs.lock().await;
                tokio::select! {
                    _reason = ctx.done() => None,
                    job = queue.recv() => job,
                }
            };
            let Some(spec) = job else {
                return;
            };

            if let Err(err) = self.run_request(ctx, config, &spec).await {
                if config.ignore_fail {
                    warn!("Request '{}' failed: {}, continuing", spec.name, err);
                    continue;
                }
                if errors.try_send(batch_failure(&spec.name, err)).is_err() {
                    debug!("Worker {} dropped a later failure", worker_id);
                }
            }
        }
    }

    async fn run_request(
        &self,
        ctx: &RunContext,
        config: &RunConfig,
        spec: &RequestSpec,
    ) -> AppResult<u16> {
        let url = spec.url(&config.base_url);
        let started = Instant::now();
        let outcome = match self.factory.create_from_config(config, spec) {
            Ok(request) => self.send(ctx, request).await,
            Err(err) => Err(AppError::chain(ChainError::RequestCreation {
                source: Box::new(err),
            })),
        };
        let duration = started.elapsed();
        let status_code = outcome.as_ref().ok().map(|response| response.status);
        self.collect(&RequestReport {
            name: &spec.name,
            method: &spec.method,
            url: &url,
            status_code,
            error: outcome.as_ref().err(),
            duration,
            variables: None,
        });
        if let Some(status) = status_code {
            info!("Request '{}' completed with status {} in {:?}", spec.name, status, duration);
        }
        outcome.map(|response| response.status)
    }

    async fn send(&self, ctx: &RunContext, request: HttpRequest) -> AppResult<HttpResponse> {
        if let Some(reason) = ctx.err() {
            return Err(reason.into());
        }
        tokio::select! {
            reason = ctx.done() => Err(reason.into()),
            outcome = self.client.execute(request) => outcome.map_err(|err| {
                AppError::chain(ChainError::RequestExecution { source: Box::new(err) })
            }),
        }
    }

    fn collect(&self, report: &RequestReport<'_>) {
        if let Some(collector) = self.collector.as_ref() {
            collector(report);
        }
    }
}

fn batch_failure(name: &str, err: AppError) -> AppError {
    AppError::chain(ChainError::BatchRequestFailed {
        name: name.to_owned(),
        source: Box::new(err),
    })
}
