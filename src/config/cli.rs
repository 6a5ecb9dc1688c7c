use crate::config::toml_config::SuiteConfig;
use crate::core::report::{ReportFormat, ReportSettings};
use crate::core::runner::{RunOptions, MAX_RERUNS, MAX_WORKERS};
use crate::utils::error::Result;
use crate::utils::validation;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "reqres-autotests")]
#[command(about = "Automated API checks for the ReqRes users service")]
pub struct RunnerArgs {
    #[arg(long, help = "Suite file (TOML) with runner, report and filter settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Environment file to load instead of ./.env")]
    pub env_file: Option<PathBuf>,

    #[arg(short = 'n', long, help = "Number of cases to run in parallel")]
    pub workers: Option<usize>,

    #[arg(long, help = "Re-run a failing case up to N more times")]
    pub reruns: Option<u32>,

    #[arg(long, help = "Delay between reruns in milliseconds")]
    pub rerun_delay_ms: Option<u64>,

    #[arg(long, help = "Per-attempt timeout in seconds")]
    pub case_timeout: Option<u64>,

    #[arg(long, help = "Directory for generated reports")]
    pub report_dir: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Report formats: json, csv")]
    pub format: Vec<ReportFormat>,

    #[arg(long, value_delimiter = ',', help = "Run only these cases")]
    pub only: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Skip these cases")]
    pub skip: Vec<String>,

    #[arg(long, help = "List registered cases and exit")]
    pub list: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl RunnerArgs {
    /// Command-line values win over the suite file, which wins over defaults.
    pub fn resolve(&self, file: &SuiteConfig) -> Result<(RunOptions, ReportSettings)> {
        let defaults = RunOptions::default();
        let runner = file.runner.clone().unwrap_or_default();
        let filters = file.filters.clone().unwrap_or_default();

        let workers = self.workers.or(runner.workers).unwrap_or(defaults.workers);
        validation::validate_range("workers", workers, 1, MAX_WORKERS)?;
        let reruns = self.reruns.or(runner.reruns).unwrap_or(defaults.reruns);
        validation::validate_range("reruns", reruns, 0, MAX_RERUNS)?;

        let case_timeout = match self.case_timeout.or(runner.case_timeout_seconds) {
            Some(secs) => {
                validation::validate_positive_number("case_timeout", secs, 1)?;
                Duration::from_secs(secs)
            }
            None => defaults.case_timeout,
        };

        let options = RunOptions {
            workers,
            reruns,
            rerun_delay: self
                .rerun_delay_ms
                .or(runner.rerun_delay_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.rerun_delay),
            case_timeout,
            only: if self.only.is_empty() {
                filters.only.unwrap_or_default()
            } else {
                self.only.clone()
            },
            skip: if self.skip.is_empty() {
                filters.skip.unwrap_or_default()
            } else {
                self.skip.clone()
            },
        };

        let report_defaults = ReportSettings::default();
        let output_dir = self
            .report_dir
            .clone()
            .or_else(|| file.report.as_ref().and_then(|r| r.output_dir.clone()));
        if let Some(dir) = &output_dir {
            validation::validate_path("report_dir", dir)?;
        }

        let formats = if self.format.is_empty() {
            file.report_formats()?.unwrap_or(report_defaults.formats)
        } else {
            self.format.clone()
        };

        let report = ReportSettings {
            output_dir: output_dir.map(PathBuf::from).unwrap_or(report_defaults.output_dir),
            formats,
        };

        Ok((options, report))
    }
}
