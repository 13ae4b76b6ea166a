mod commands;

use clap::Parser;

use reqflow::args::Cli;
use reqflow::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let cli = Cli::parse();

    crate::logger::init_logging(cli.verbose, cli.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(commands::run_command(cli))
}
