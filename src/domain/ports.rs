use crate::adapters::http::ReqresClient;
use crate::config::Settings;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Fixture handed to every case: settings plus a client built from them.
#[derive(Debug, Clone)]
pub struct CaseContext {
    pub settings: Arc<Settings>,
    pub client: ReqresClient,
}

impl CaseContext {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = ReqresClient::new(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            client,
        })
    }
}

#[async_trait]
pub trait ApiCase: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Labels copied into the report, e.g. `smoke` or `users`.
    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn should_run(&self, _context: &CaseContext) -> bool {
        true
    }

    async fn run(&self, context: &CaseContext) -> Result<()>;
}
