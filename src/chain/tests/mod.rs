use std::future::Future;
use std::sync::Arc;

use crate::config::{RequestSpec, RunConfig};
use crate::http::{DefaultRequestFactory, HttpClient};
use crate::http::test_support::MockClient;

use super::ChainExecutor;

mod extractor;
mod processor;

const BASE_URL: &str = "http://api.test";

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn request(name: &str, method: &str, path: &str) -> RequestSpec {
    RequestSpec::new(name, method, path)
}

fn depends(name: &str, parent: &str) -> RequestSpec {
    let mut spec = RequestSpec::new(name, "GET", &format!("/{}", name));
    spec.depends_on = Some(parent.to_owned());
    spec
}

fn url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

fn config(requests: Vec<RequestSpec>) -> RunConfig {
    RunConfig::new(BASE_URL, requests)
}

fn executor(client: &Arc<MockClient>) -> ChainExecutor {
    let transport: Arc<dyn HttpClient> = client.clone();
    ChainExecutor::new(Arc::new(DefaultRequestFactory), transport)
}
