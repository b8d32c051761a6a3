use std::process::ExitCode;

use clap::Parser;
use nestegg::api::cli::{self, Cli};
use nestegg::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);
    cli::run(cli).await
}
