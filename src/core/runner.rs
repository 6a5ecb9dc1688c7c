use crate::core::report::{CaseResult, Outcome, RunReport};
use crate::domain::ports::{ApiCase, CaseContext};
use crate::utils::error::{ApiTestError, Result, TIMED_OUT};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Upper bound for `workers`; larger values are clamped by the runner and
/// rejected by config validation.
pub const MAX_WORKERS: usize = 256;
pub const MAX_RERUNS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Cases in flight at once.
    pub workers: usize,
    /// Extra attempts for a failing case.
    pub reruns: u32,
    pub rerun_delay: Duration,
    /// Upper bound for a single attempt.
    pub case_timeout: Duration,
    pub only: Vec<String>,
    pub skip: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            reruns: 0,
            rerun_delay: Duration::ZERO,
            case_timeout: Duration::from_secs(30),
            only: Vec::new(),
            skip: Vec::new(),
        }
    }
}

/// Ordered collection of cases run against one [`CaseContext`].
pub struct TestSuite {
    name: String,
    cases: Vec<Arc<dyn ApiCase>>,
    options: RunOptions,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn add_case(&mut self, case: Box<dyn ApiCase>) {
        self.cases.push(Arc::from(case));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn case_names(&self) -> Vec<&str> {
        self.cases.iter().map(|c| c.name()).collect()
    }

    /// Unknown names in `only`/`skip` usually mean a typo on the command line.
    pub fn check_filters(&self) -> Result<()> {
        let names = self.case_names();
        for wanted in self.options.only.iter().chain(self.options.skip.iter()) {
            if !names.contains(&wanted.as_str()) {
                return Err(ApiTestError::InvalidConfigValueError {
                    field: "filters".to_string(),
                    value: wanted.clone(),
                    reason: format!("No such case. Known cases: {}", names.join(", ")),
                });
            }
        }
        Ok(())
    }

    fn skip_reason(&self, case: &dyn ApiCase, context: &CaseContext) -> Option<String> {
        let name = case.name();
        if !self.options.only.is_empty() && !self.options.only.iter().any(|n| n == name) {
            return Some("not selected by --only".to_string());
        }
        if self.options.skip.iter().any(|n| n == name) {
            return Some("excluded by --skip".to_string());
        }
        if !case.should_run(context) {
            return Some("precondition not met".to_string());
        }
        None
    }

    pub async fn run(&self, context: CaseContext) -> RunReport {
        let started_at = Utc::now();
        let workers = self.options.workers.clamp(1, MAX_WORKERS);
        let semaphore = Arc::new(Semaphore::new(workers));

        tracing::info!(
            "🎬 Running suite '{}' ({} cases, {} workers, {} reruns)",
            self.name,
            self.cases.len(),
            workers,
            self.options.reruns
        );

        let mut pending = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            if let Some(reason) = self.skip_reason(&**case, &context) {
                tracing::info!("⏭️ {} skipped: {}", case.name(), reason);
                pending.push(Pending::Done(skipped(&**case, reason)));
                continue;
            }

            let case = Arc::clone(case);
            let context = context.clone();
            let semaphore = Arc::clone(&semaphore);
            let options = self.options.clone();
            let handle = tokio::spawn(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire_owned().await.ok();
                execute_with_reruns(case, context, &options).await
            });
            pending.push(Pending::Running(handle));
        }

        let mut results = Vec::with_capacity(pending.len());
        for (index, entry) in pending.into_iter().enumerate() {
            match entry {
                Pending::Done(result) => results.push(result),
                Pending::Running(handle) => match handle.await {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        let case = &self.cases[index];
                        tracing::error!("❌ {} worker crashed: {}", case.name(), e);
                        results.push(CaseResult {
                            name: case.name().to_string(),
                            description: case.description().to_string(),
                            tags: case.tags(),
                            outcome: Outcome::Failed,
                            attempts: 0,
                            duration_ms: 0,
                            flaky: false,
                            message: Some(e.to_string()),
                        });
                    }
                },
            }
        }

        let report = RunReport::new(self.name.clone(), started_at, Utc::now(), results);
        tracing::info!(
            "📊 Suite '{}': {} passed, {} failed, {} skipped, {} flaky in {}ms",
            report.suite,
            report.passed,
            report.failed,
            report.skipped,
            report.flaky,
            report.duration_ms
        );
        report
    }
}

enum Pending {
    Done(CaseResult),
    Running(tokio::task::JoinHandle<CaseResult>),
}

fn skipped(case: &dyn ApiCase, reason: String) -> CaseResult {
    CaseResult {
        name: case.name().to_string(),
        description: case.description().to_string(),
        tags: case.tags(),
        outcome: Outcome::Skipped,
        attempts: 0,
        duration_ms: 0,
        flaky: false,
        message: Some(reason),
    }
}

async fn execute_with_reruns(
    case: Arc<dyn ApiCase>,
    context: CaseContext,
    options: &RunOptions,
) -> CaseResult {
    let started = Instant::now();
    let max_attempts = options.reruns.saturating_add(1);
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_attempts {
        attempts += 1;
        if attempts > 1 && !options.rerun_delay.is_zero() {
            tokio::time::sleep(options.rerun_delay).await;
        }

        match execute_once(Arc::clone(&case), context.clone(), options.case_timeout).await {
            Ok(()) => {
                if attempts > 1 {
                    tracing::warn!("⚠️ {} passed on attempt {}", case.name(), attempts);
                } else {
                    tracing::info!("✅ {} passed", case.name());
                }
                last_error = None;
                break;
            }
            Err(e) => {
                tracing::warn!(
                    "❌ {} failed (attempt {}/{}): {}",
                    case.name(),
                    attempts,
                    max_attempts,
                    e
                );
                if attempts < max_attempts && !e.is_retryable() {
                    tracing::debug!(
                        "{} failure is {:?}, not transient; rerunning anyway",
                        case.name(),
                        e.category()
                    );
                }
                last_error = Some(e);
            }
        }
    }

    let (outcome, message) = match &last_error {
        None => (Outcome::Passed, None),
        Some(e) => {
            tracing::error!("💡 {}: {}", case.name(), e.recovery_suggestion());
            (Outcome::Failed, Some(e.to_string()))
        }
    };

    CaseResult {
        name: case.name().to_string(),
        description: case.description().to_string(),
        tags: case.tags(),
        outcome,
        attempts,
        duration_ms: started.elapsed().as_millis() as u64,
        flaky: outcome == Outcome::Passed && attempts > 1,
        message,
    }
}

/// One attempt in its own task, so a panic or a timeout fails only this case.
async fn execute_once(case: Arc<dyn ApiCase>, context: CaseContext, timeout: Duration) -> Result<()> {
    let name = case.name().to_string();
    let mut handle = tokio::spawn(async move { case.run(&context).await });

    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ApiTestError::CaseAborted {
            name,
            reason: if join_error.is_panic() {
                "panicked".to_string()
            } else {
                join_error.to_string()
            },
        }),
        Err(_) => {
            handle.abort();
            Err(ApiTestError::CaseAborted {
                name,
                reason: format!("{} {:?}", TIMED_OUT, timeout),
            })
        }
    }
}
