use crate::core::assertions::assert_that;
use crate::domain::model::{LoginRequest, LoginResponse};
use crate::domain::ports::{ApiCase, CaseContext};
use crate::utils::error::{ApiTestError, Result};
use async_trait::async_trait;

/// `POST /login` with `TEST_USER_EMAIL` / `TEST_USER_PASSWORD`.
/// Skipped unless both are configured.
pub struct LoginCase;

#[async_trait]
impl ApiCase for LoginCase {
    fn name(&self) -> &str {
        "login"
    }

    fn description(&self) -> &str {
        "Configured test user can log in and receives a token"
    }

    fn tags(&self) -> Vec<String> {
        vec!["auth".to_string()]
    }

    fn should_run(&self, context: &CaseContext) -> bool {
        context.settings.credentials().is_some()
    }

    async fn run(&self, context: &CaseContext) -> Result<()> {
        let (email, password) =
            context
                .settings
                .credentials()
                .ok_or_else(|| ApiTestError::MissingConfigError {
                    field: "TEST_USER_EMAIL/TEST_USER_PASSWORD".to_string(),
                })?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = context.client.login(&request).await?;

        assert_that(response.status_code())
            .described_as("HTTP status of login")
            .is_equal_to(200)?;

        let login: LoginResponse = response.json("LoginResponse")?;
        assert_that(login.token.as_str())
            .described_as("login token")
            .is_not_blank()?;

        Ok(())
    }
}
