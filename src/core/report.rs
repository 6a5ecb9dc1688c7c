use crate::utils::error::{ApiTestError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub outcome: Outcome,
    pub attempts: u32,
    pub duration_ms: u64,
    /// Passed, but only after at least one failed attempt.
    pub flaky: bool,
    /// Failure or skip reason.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub flaky: usize,
    pub results: Vec<CaseResult>,
}

impl RunReport {
    pub fn new(
        suite: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: Vec<CaseResult>,
    ) -> Self {
        let count = |outcome: Outcome| results.iter().filter(|r| r.outcome == outcome).count();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

        Self {
            suite,
            started_at,
            finished_at,
            duration_ms,
            total: results.len(),
            passed: count(Outcome::Passed),
            failed: count(Outcome::Failed),
            skipped: count(Outcome::Skipped),
            flaky: results.iter().filter(|r| r.flaky).count(),
            results,
        }
    }

    /// Share of executed (non-skipped) cases that passed, in percent.
    pub fn success_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            return 100.0;
        }
        self.passed as f64 / executed as f64 * 100.0
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.outcome == Outcome::Failed)
    }

    /// Writes one file per format into `dir`, creating it if needed.
    pub fn write(&self, dir: &Path, formats: &[ReportFormat]) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for format in formats {
            let path = dir.join(format.file_name());
            match format {
                ReportFormat::Json => self.write_json(&path)?,
                ReportFormat::Csv => self.write_csv(&path)?,
            }
            tracing::debug!("Wrote {} report to {}", format, path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "name",
            "outcome",
            "attempts",
            "duration_ms",
            "flaky",
            "tags",
            "message",
        ])?;

        for result in &self.results {
            writer.write_record([
                result.name.clone(),
                result.outcome.to_string(),
                result.attempts.to_string(),
                result.duration_ms.to_string(),
                result.flaky.to_string(),
                result.tags.join(";"),
                result.message.clone().unwrap_or_default(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Json => "report.json",
            ReportFormat::Csv => "report.csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Json => f.write_str("json"),
            ReportFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ApiTestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(ApiTestError::InvalidConfigValueError {
                field: "report.formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: json, csv".to_string(),
            }),
        }
    }
}

/// Where and how the report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub formats: Vec<ReportFormat>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./reports"),
            formats: vec![ReportFormat::Json],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn result(name: &str, outcome: Outcome, flaky: bool) -> CaseResult {
        CaseResult {
            name: name.to_string(),
            description: String::new(),
            tags: vec!["smoke".to_string(), "users".to_string()],
            outcome,
            attempts: if flaky { 2 } else { 1 },
            duration_ms: 12,
            flaky,
            message: match outcome {
                Outcome::Failed => Some("page number: expected 2, got 1".to_string()),
                _ => None,
            },
        }
    }

    fn sample_report() -> RunReport {
        let started = Utc::now();
        RunReport::new(
            "reqres-smoke".to_string(),
            started,
            started + chrono::Duration::milliseconds(340),
            vec![
                result("list-users", Outcome::Passed, false),
                result("single-user-1", Outcome::Passed, true),
                result("create-user", Outcome::Failed, false),
                result("login", Outcome::Skipped, false),
            ],
        )
    }

    #[test]
    fn test_counts_and_rate() {
        let report = sample_report();
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.flaky, 1);
        assert_eq!(report.duration_ms, 340);
        assert!(!report.is_success());
        assert!((report.success_rate() - 66.666).abs() < 0.01);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_empty_run_is_successful() {
        let now = Utc::now();
        let report = RunReport::new("empty".to_string(), now, now, Vec::new());
        assert!(report.is_success());
        assert_eq!(report.success_rate(), 100.0);
    }

    #[test]
    fn test_write_json_and_csv() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested");
        let report = sample_report();

        let paths = report
            .write(&out, &[ReportFormat::Json, ReportFormat::Csv])
            .unwrap();
        assert_eq!(paths.len(), 2);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("report.json")).unwrap())
                .unwrap();
        assert_eq!(json["suite"], "reqres-smoke");
        assert_eq!(json["results"][2]["outcome"], "failed");

        let mut reader = csv::Reader::from_path(out.join("report.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[1][0], "single-user-1");
        assert_eq!(&rows[1][4], "true");
        assert_eq!(&rows[0][5], "smoke;users");
        assert_eq!(&rows[2][6], "page number: expected 2, got 1");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!(" csv ".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
