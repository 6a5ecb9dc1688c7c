use crate::core::report::ReportFormat;
use crate::core::runner::{MAX_RERUNS, MAX_WORKERS};
use crate::utils::error::{ApiTestError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of `autotests.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub suite: Option<SuiteSection>,
    pub runner: Option<RunnerSection>,
    pub report: Option<ReportSection>,
    pub filters: Option<FilterSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerSection {
    pub workers: Option<usize>,
    pub reruns: Option<u32>,
    pub rerun_delay_ms: Option<u64>,
    pub case_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    pub output_dir: Option<String>,
    pub formats: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSection {
    pub only: Option<Vec<String>>,
    pub skip: Option<Vec<String>>,
}

impl SuiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiTestError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| ApiTestError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unknown names stay verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ApiTestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn suite_name(&self) -> Option<&str> {
        self.suite.as_ref().map(|s| s.name.as_str())
    }

    pub fn report_formats(&self) -> Result<Option<Vec<ReportFormat>>> {
        self.report
            .as_ref()
            .and_then(|r| r.formats.as_ref())
            .map(|formats| {
                formats
                    .iter()
                    .map(|f| f.parse::<ReportFormat>())
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()
    }
}

impl Validate for SuiteConfig {
    fn validate(&self) -> Result<()> {
        if let Some(suite) = &self.suite {
            validation::validate_non_empty_string("suite.name", &suite.name)?;
        }

        if let Some(runner) = &self.runner {
            if let Some(workers) = runner.workers {
                validation::validate_range("runner.workers", workers, 1, MAX_WORKERS)?;
            }
            if let Some(reruns) = runner.reruns {
                validation::validate_range("runner.reruns", reruns, 0, MAX_RERUNS)?;
            }
            if let Some(timeout) = runner.case_timeout_seconds {
                validation::validate_positive_number("runner.case_timeout_seconds", timeout, 1)?;
            }
        }

        if let Some(report) = &self.report {
            if let Some(dir) = &report.output_dir {
                validation::validate_path("report.output_dir", dir)?;
            }
        }

        self.report_formats()?;
        Ok(())
    }
}
