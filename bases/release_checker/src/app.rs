use crate::config::Config;
use crate::loader::load_release;
use crate::output::OutputHandler;
use crate::reference::load_reference;
use color_eyre::Result;
use release_rules::{Level, Report, Runner};
use tracing::info;

pub struct App {
    config: Config,
    output: OutputHandler,
}

impl App {
    pub fn new(config: Config) -> Self {
        let output = OutputHandler::new(config.format, config.min_level, config.verbose);
        Self { config, output }
    }

    /// Load, validate and print. The returned report is unfiltered.
    pub async fn run(&self) -> Result<Report> {
        let release = load_release(&self.config.root).await?;
        let reference = match &self.config.reference {
            Some(path) => Some(load_reference(path).await?),
            None => None,
        };
        info!(
            "Checking {} ({} tracks, reference: {})",
            release.root_path,
            release.track_count(),
            reference.as_ref().map_or("none", |r| r.title.as_str())
        );

        let report = Runner::new(self.config.runner.clone()).run(&release, reference.as_ref());
        info!(
            errors = report.count(Level::Error),
            warnings = report.count(Level::Warning),
            score = report.score,
            "Check complete"
        );

        self.output.print_report(&self.config.root, &report)?;
        Ok(report)
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
