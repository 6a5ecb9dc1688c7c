pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::RunnerArgs;

pub use crate::adapters::http::{ApiResponse, ReqresClient};
pub use crate::app::cases::default_suite;
pub use crate::config::{toml_config::SuiteConfig, Settings};
pub use crate::core::report::{ReportFormat, RunReport};
pub use crate::core::runner::{RunOptions, TestSuite};
pub use crate::domain::ports::{ApiCase, CaseContext};
pub use crate::utils::error::{ApiTestError, Result};
