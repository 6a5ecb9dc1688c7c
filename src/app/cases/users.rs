use crate::core::assertions::assert_that;
use crate::domain::model::{CreateUser, CreateUserResponse, ListUsersResponse, SingleUserResponse};
use crate::domain::ports::{ApiCase, CaseContext};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Support banner ReqRes currently attaches to user payloads.
pub const REQRES_SUPPORT_TEXT: &str =
    "Tired of writing endless social media content? Let Content Caddy generate it for you.";

fn smoke_tags() -> Vec<String> {
    vec!["smoke".to_string(), "users".to_string()]
}

/// `GET /users?page=&per_page=` returns the requested page.
pub struct ListUsersCase {
    page: u32,
    per_page: u32,
}

impl ListUsersCase {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

impl Default for ListUsersCase {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

#[async_trait]
impl ApiCase for ListUsersCase {
    fn name(&self) -> &str {
        "list-users"
    }

    fn description(&self) -> &str {
        "Paginated user list matches ListUsersResponse"
    }

    fn tags(&self) -> Vec<String> {
        smoke_tags()
    }

    async fn run(&self, context: &CaseContext) -> Result<()> {
        let response = context.client.list_users(self.page, self.per_page).await?;

        assert_that(response.status_code())
            .described_as("HTTP status of the user list")
            .is_equal_to(200)?;

        let users: ListUsersResponse = response.json("ListUsersResponse")?;

        assert_that(users.page)
            .described_as("page number in pagination")
            .is_equal_to(self.page)?;
        assert_that(users.per_page)
            .described_as("users per page")
            .is_equal_to(self.per_page)?;
        assert_that(users.data.len() as u32)
            .described_as("users returned on the page")
            .is_less_than_or_equal_to(self.per_page)?;

        tracing::debug!("Users on page {}: {:?}", users.page, users.data);
        Ok(())
    }
}

/// Fields a [`SingleUserCase`] compares against.
#[derive(Debug, Clone)]
pub struct ExpectedUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl ExpectedUser {
    pub fn new(id: i64, email: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

/// `GET /users/{id}`, one instance per parameter set.
pub struct SingleUserCase {
    name: String,
    expected: ExpectedUser,
    support_text: Option<String>,
}

impl SingleUserCase {
    pub fn new(expected: ExpectedUser) -> Self {
        Self {
            name: format!("single-user-{}", expected.id),
            expected,
            support_text: None,
        }
    }

    pub fn with_support_text(mut self, text: &str) -> Self {
        self.support_text = Some(text.to_string());
        self
    }
}

#[async_trait]
impl ApiCase for SingleUserCase {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Single user payload matches SingleUserResponse and the expected identity"
    }

    fn tags(&self) -> Vec<String> {
        smoke_tags()
    }

    async fn run(&self, context: &CaseContext) -> Result<()> {
        let response = context.client.get_user(self.expected.id).await?;

        assert_that(response.status_code())
            .described_as("HTTP status of a single user")
            .is_equal_to(200)?;

        let user: SingleUserResponse = response.json("SingleUserResponse")?;

        assert_that(user.data.id)
            .described_as("user id in the response")
            .is_equal_to(self.expected.id)?;
        assert_that(user.data.email.as_str())
            .described_as("user email")
            .is_equal_to(self.expected.email.as_str())?;
        assert_that(user.data.first_name.as_str())
            .described_as("user first name")
            .is_equal_to(self.expected.first_name.as_str())?;
        assert_that(user.data.last_name.as_str())
            .described_as("user last name")
            .is_equal_to(self.expected.last_name.as_str())?;

        if let Some(text) = &self.support_text {
            assert_that(user.support.text.as_str())
                .described_as("support text")
                .is_equal_to(text.as_str())?;
        }

        Ok(())
    }
}

/// `GET /users/{id}` for an id past the data set answers 404.
pub struct UserNotFoundCase {
    id: i64,
}

impl UserNotFoundCase {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[async_trait]
impl ApiCase for UserNotFoundCase {
    fn name(&self) -> &str {
        "user-not-found"
    }

    fn description(&self) -> &str {
        "Unknown user id returns 404"
    }

    fn tags(&self) -> Vec<String> {
        vec!["negative".to_string(), "users".to_string()]
    }

    async fn run(&self, context: &CaseContext) -> Result<()> {
        let response = context.client.get_user(self.id).await?;
        assert_that(response.status_code())
            .described_as("HTTP status for a missing user")
            .is_equal_to(404)?;

        Ok(())
    }
}

/// `POST /users` echoes the submitted user with an id and timestamp.
pub struct CreateUserCase {
    user: CreateUser,
}

impl CreateUserCase {
    pub fn new(name: &str, job: &str) -> Self {
        Self {
            user: CreateUser {
                name: name.to_string(),
                job: job.to_string(),
            },
        }
    }
}

#[async_trait]
impl ApiCase for CreateUserCase {
    fn name(&self) -> &str {
        "create-user"
    }

    fn description(&self) -> &str {
        "Created user is echoed back with an id"
    }

    fn tags(&self) -> Vec<String> {
        smoke_tags()
    }

    async fn run(&self, context: &CaseContext) -> Result<()> {
        let response = context.client.create_user(&self.user).await?;

        assert_that(response.status_code())
            .described_as("HTTP status of user creation")
            .is_equal_to(201)?;

        let created: CreateUserResponse = response.json("CreateUserResponse")?;

        assert_that(created.name.as_str())
            .described_as("created user name")
            .is_equal_to(self.user.name.as_str())?;
        assert_that(created.job.as_str())
            .described_as("created user job")
            .is_equal_to(self.user.job.as_str())?;
        assert_that(created.id.as_str())
            .described_as("created user id")
            .is_not_blank()?;

        Ok(())
    }
}
