use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_DIRECTIVE: &str = "info";
const VERBOSE_DIRECTIVE: &str = "debug";

/// Installs the global subscriber on stderr so stdout carries only the run
/// report. A second call keeps the first subscriber.
pub fn init_logging(verbose: bool, no_color: bool) {
    let reqflow_log = std::env::var("REQFLOW_LOG").ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(reqflow_log.as_deref(), rust_log.as_deref(), verbose);
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        tracing::debug!("Keeping the existing subscriber: {}", err);
    }
}

/// `REQFLOW_LOG` beats `RUST_LOG`; with neither set, `--verbose` picks
/// between `debug` and `info`. Blank values count as unset.
fn filter_directive<'env>(
    reqflow_log: Option<&'env str>,
    rust_log: Option<&'env str>,
    verbose: bool,
) -> &'env str {
    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };
    reqflow_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or(fallback)
}
