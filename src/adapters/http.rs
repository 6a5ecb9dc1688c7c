use crate::config::Settings;
use crate::core::schema;
use crate::domain::model::{
    CreateUser, CreateUserResponse, ListUsersResponse, LoginRequest, LoginResponse,
    SingleUserResponse,
};
use crate::utils::error::{ApiTestError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Raw outcome of one HTTP exchange. The body is kept as JSON so cases can
/// assert on the status before committing to a model.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: StatusCode,
    pub body: serde_json::Value,
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Validates the body against `T`.
    pub fn json<T: DeserializeOwned>(&self, model: &str) -> Result<T> {
        schema::validate_schema(model, &self.body)
    }
}

#[derive(Debug, Clone)]
pub struct ReqresClient {
    client: Client,
    base_url: String,
}

impl ReqresClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in settings.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiTestError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(&value).map_err(|e| ApiTestError::InvalidConfigValueError {
                    field: name.clone(),
                    value: "***".to_string(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        let text = response.text().await?;
        let elapsed = started.elapsed();

        tracing::info!("{} {} -> {} ({:?})", method, final_url, status.as_u16(), elapsed);

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        tracing::debug!("Response body: {}", body);

        Ok(ApiResponse {
            url: final_url,
            status,
            body,
            elapsed,
        })
    }

    pub async fn list_users(&self, page: u32, per_page: u32) -> Result<ApiResponse> {
        self.get(&format!("users?page={}&per_page={}", page, per_page))
            .await
    }

    pub async fn get_user(&self, id: i64) -> Result<ApiResponse> {
        self.get(&format!("users/{}", id)).await
    }

    pub async fn create_user(&self, user: &CreateUser) -> Result<ApiResponse> {
        self.post("users", user).await
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse> {
        self.post("login", credentials).await
    }

    /// `list_users` followed by schema validation; any non-200 status is an error.
    pub async fn fetch_users(&self, page: u32, per_page: u32) -> Result<ListUsersResponse> {
        let response = self.list_users(page, per_page).await?;
        expect_status(&response, StatusCode::OK)?;
        response.json("ListUsersResponse")
    }

    pub async fn fetch_user(&self, id: i64) -> Result<SingleUserResponse> {
        let response = self.get_user(id).await?;
        expect_status(&response, StatusCode::OK)?;
        response.json("SingleUserResponse")
    }

    pub async fn register_user(&self, user: &CreateUser) -> Result<CreateUserResponse> {
        let response = self.create_user(user).await?;
        expect_status(&response, StatusCode::CREATED)?;
        response.json("CreateUserResponse")
    }

    pub async fn fetch_token(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let response = self.login(credentials).await?;
        expect_status(&response, StatusCode::OK)?;
        response.json("LoginResponse")
    }
}

fn expect_status(response: &ApiResponse, expected: StatusCode) -> Result<()> {
    if response.status != expected {
        return Err(ApiTestError::AssertionError {
            description: format!("HTTP status of {}", response.url),
            expected: expected.as_u16().to_string(),
            actual: response.status.as_u16().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> ReqresClient {
        let settings = Settings::new(server.base_url()).with_api_key("reqres-free-v1");
        ReqresClient::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_default_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/users/1")
                .header("x-api-key", "reqres-free-v1")
                .header("Content-Type", "application/json");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        });

        let response = client_for(&server).get("/users/1").await.unwrap();

        mock.assert();
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body["ok"], true);
        assert!(response.url.ends_with("/users/1"));
    }

    #[tokio::test]
    async fn test_empty_and_plain_text_bodies() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(204);
        });
        server.mock(|when, then| {
            when.method(GET).path("/text");
            then.status(502).body("Bad Gateway");
        });

        let client = client_for(&server);
        let empty = client.get("empty").await.unwrap();
        assert_eq!(empty.body, serde_json::Value::Null);

        let text = client.get("text").await.unwrap();
        assert_eq!(text.status_code(), 502);
        assert_eq!(text.body, serde_json::Value::String("Bad Gateway".to_string()));
    }

    #[tokio::test]
    async fn test_create_user_posts_json_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users")
                .json_body(serde_json::json!({"name": "morpheus", "job": "leader"}));
            then.status(201).json_body(serde_json::json!({
                "name": "morpheus",
                "job": "leader",
                "id": "42",
                "createdAt": "2026-10-17T10:00:00.000Z"
            }));
        });

        let created = client_for(&server)
            .register_user(&CreateUser {
                name: "morpheus".to_string(),
                job: "leader".to_string(),
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(created.id, "42");
    }

    #[tokio::test]
    async fn test_fetch_user_reports_unexpected_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/23");
            then.status(404).json_body(serde_json::json!({}));
        });

        let err = client_for(&server).fetch_user(23).await.unwrap_err();
        match err {
            ApiTestError::AssertionError { expected, actual, .. } => {
                assert_eq!(expected, "200");
                assert_eq!(actual, "404");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_users_validates_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/users")
                .query_param("page", "1")
                .query_param("per_page", "1");
            then.status(200).json_body(serde_json::json!({
                "page": 1,
                "per_page": 1,
                "total": 12,
                "total_pages": 12,
                "data": [{
                    "id": 1,
                    "email": "george.bluth@reqres.in",
                    "first_name": "George",
                    "last_name": "Bluth",
                    "avatar": "https://reqres.in/img/faces/1-image.jpg"
                }],
                "support": {"url": "https://reqres.in", "text": "support"}
            }));
        });

        let users = client_for(&server).fetch_users(1, 1).await.unwrap();

        mock.assert();
        assert_eq!(users.total_pages, 12);
        assert_eq!(users.data[0].last_name, "Bluth");
    }

    #[tokio::test]
    async fn test_fetch_token_rejects_missing_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(serde_json::json!({"email": "eve.holt@reqres.in", "password": "cityslicka"}));
            then.status(200).json_body(serde_json::json!({"token": "QpwL5tke4Pnpja7X4"}));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/login")
                .json_body(serde_json::json!({"email": "peter@klaven", "password": "x"}));
            then.status(200).json_body(serde_json::json!({"error": "user not found"}));
        });

        let client = client_for(&server);
        let login = client
            .fetch_token(&LoginRequest {
                email: "eve.holt@reqres.in".to_string(),
                password: "cityslicka".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.token, "QpwL5tke4Pnpja7X4");

        let err = client
            .fetch_token(&LoginRequest {
                email: "peter@klaven".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiTestError::SchemaValidationError { ref model, .. } if model == "LoginResponse"
        ));
    }

    #[test]
    fn test_invalid_api_key_header_is_config_error() {
        let settings = Settings::new("https://reqres.in/api").with_api_key("bad\nkey");
        let err = ReqresClient::new(&settings).unwrap_err();
        assert!(matches!(err, ApiTestError::InvalidConfigValueError { .. }));
    }
}
