use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use reqflow::args::{Cli, Command, ReqArgs};
use reqflow::chain::ChainExecutor;
use reqflow::config::load_and_validate;
use reqflow::context::RunContext;
use reqflow::engine::{BatchExecutor, RequestReport, ResultCollector};
use reqflow::error::AppResult;
use reqflow::http::{DefaultRequestFactory, HttpClient, ReqwestClient, RequestFactory};
use reqflow::report::{Palette, RunSummary, format_response, format_result_line, format_variables};

type SharedSummary = Arc<Mutex<RunSummary>>;

pub(crate) async fn run_command(cli: Cli) -> AppResult<()> {
    let palette = Palette::detect(cli.no_color);
    match cli.command {
        Command::Req(args) => run_simple(&args, palette).await,
        Command::Bat(args) => run_batch(&args.config, palette).await,
        Command::Chain(args) => run_chain(&args.config, palette).await,
    }
}

async fn run_simple(args: &ReqArgs, palette: Palette) -> AppResult<()> {
    let (factory, client) = collaborators(args.timeout)?;
    let ctx = RunContext::with_timeout(args.timeout);
    let executor =
        BatchExecutor::new(factory, client).with_collector(printing_collector(palette, None));

    let header = args.header_line();
    let body = args.json.as_deref().unwrap_or_default();
    let mut response = executor
        .execute_simple(&ctx, &args.url, &args.method, &header, body)
        .await?;
    let text = response.text().await?;
    println!(
        "{}",
        format_response(response.status, &response.headers, &text, palette)
    );
    Ok(())
}

async fn run_batch(path: &Path, palette: Palette) -> AppResult<()> {
    let config = load_and_validate(path)?;
    let timeout = config.timeout_duration();
    debug!(
        "Batch of {} request(s), concurrency={}, timeout={:?}",
        config.requests.len(),
        config.concurrency,
        timeout
    );

    let (factory, client) = collaborators(timeout)?;
    let summary = SharedSummary::default();
    let ctx = RunContext::with_timeout(timeout);
    let executor = BatchExecutor::new(factory, client)
        .with_collector(printing_collector(palette, Some(Arc::clone(&summary))));

    let outcome = executor.execute(&ctx, &config).await;
    print_summary(&summary, palette);
    outcome
}

async fn run_chain(path: &Path, palette: Palette) -> AppResult<()> {
    let config = load_and_validate(path)?;
    let timeout = config.timeout_duration();
    debug!(
        "Chain of {} request(s), order={:?}, timeout={:?}",
        config.requests.len(),
        config.execution_order,
        timeout
    );

    let (factory, client) = collaborators(timeout)?;
    let summary = SharedSummary::default();
    let ctx = RunContext::with_timeout(timeout);
    let executor = ChainExecutor::new(factory, client)
        .with_collector(printing_collector(palette, Some(Arc::clone(&summary))));

    let outcome = executor.execute(&ctx, &config).await;
    print_summary(&summary, palette);
    let report = outcome?;
    debug!(
        "Chain finished: {} executed, {} variable(s) in store",
        report.executed.len(),
        report.variables.len()
    );
    Ok(())
}

fn collaborators(timeout: Duration) -> AppResult<(Arc<dyn RequestFactory>, Arc<dyn HttpClient>)> {
    let mut client = ReqwestClient::new()?;
    client.set_timeout(timeout);
    Ok((Arc::new(DefaultRequestFactory), Arc::new(client)))
}

fn printing_collector(palette: Palette, summary: Option<SharedSummary>) -> ResultCollector {
    Arc::new(move |report: &RequestReport<'_>| {
        println!("{}", format_result_line(report, palette));
        if let Some(variables) = report.variables {
            print!("{}", format_variables(variables, palette));
        }
        if let Some(totals) = summary.as_ref()
            && let Ok(mut totals) = totals.lock()
        {
            totals.record(report);
        }
    })
}

fn print_summary(summary: &SharedSummary, palette: Palette) {
    let Ok(totals) = summary.lock() else {
        return;
    };
    let rendered = totals.render(palette);
    if !rendered.is_empty() {
        println!();
        println!("{}", rendered);
    }
}
