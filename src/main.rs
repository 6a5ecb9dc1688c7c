use clap::Parser;
use reqres_autotests::app::cases::DEFAULT_SUITE_NAME;
use reqres_autotests::utils::error::{ApiTestError, ErrorSeverity};
use reqres_autotests::utils::logger;
use reqres_autotests::{default_suite, CaseContext, RunnerArgs, Settings, SuiteConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = RunnerArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting reqres-autotests");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    match run(&args).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(
                "❌ Run aborted: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

/// Returns whether every executed case passed.
async fn run(args: &RunnerArgs) -> Result<bool, ApiTestError> {
    let suite_file = match &args.config {
        Some(path) => {
            tracing::info!("📄 Loading suite file {}", path.display());
            SuiteConfig::from_file(path)?
        }
        None => SuiteConfig::default(),
    };

    let (options, report_settings) = args.resolve(&suite_file)?;
    let suite_name = suite_file.suite_name().unwrap_or(DEFAULT_SUITE_NAME).to_string();
    let suite = default_suite(&suite_name).with_options(options);

    if args.list {
        for name in suite.case_names() {
            println!("{}", name);
        }
        return Ok(true);
    }

    suite.check_filters()?;

    let settings = Settings::load(args.env_file.as_deref())?;
    tracing::info!("🌐 Target API: {}", settings.base_url);
    let context = CaseContext::new(settings)?;

    let report = suite.run(context).await;

    let written = report.write(&report_settings.output_dir, &report_settings.formats)?;
    for path in &written {
        tracing::info!("📁 Report saved to: {}", path.display());
    }

    for failure in report.failures() {
        eprintln!(
            "❌ {}: {}",
            failure.name,
            failure.message.as_deref().unwrap_or("failed")
        );
    }

    println!(
        "{} {}: {} passed, {} failed, {} skipped ({:.1}% success) in {}ms",
        if report.is_success() { "✅" } else { "❌" },
        report.suite,
        report.passed,
        report.failed,
        report.skipped,
        report.success_rate(),
        report.duration_ms
    );

    Ok(report.is_success())
}
