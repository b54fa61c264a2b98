use clap::Parser;
use color_eyre::Result;
use std::process::ExitCode;

mod app;
mod config;
mod error;
mod loader;
mod output;
mod reference;

use app::App;
use config::{CliArgs, Config};

const EXIT_ISSUES: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {:?}", color_eyre::Report::new(error));
            return Ok(ExitCode::from(EXIT_FAILURE));
        }
    };

    // Logs go to stderr so JSON reports stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(config);
    match app.run().await {
        Ok(report) if report.has_errors() => Ok(ExitCode::from(EXIT_ISSUES)),
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            app.print_error(&error);
            Ok(ExitCode::from(EXIT_FAILURE))
        }
    }
}
