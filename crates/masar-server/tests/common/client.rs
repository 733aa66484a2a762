//! HTTP test client for API testing
//!
//! A lightweight reqwest wrapper with token management for exercising the
//! Masar API against a running server.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// API response envelope
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiResponse<T> {
    /// Response code (0 = success)
    pub code: i32,
    /// Response message
    pub message: Option<String>,
    /// Response data
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.code == 0 || self.code == 200
    }

    /// Get data or return error
    pub fn into_data(self) -> Result<T, TestClientError> {
        if self.is_success() {
            self.data.ok_or(TestClientError::EmptyResponse)
        } else {
            Err(TestClientError::ApiError {
                code: self.code,
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

/// Login response
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_ttl: i64,
    pub role: String,
    pub username: String,
}

/// Test HTTP client with token management
pub struct TestClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl TestClient {
    /// Create a new test client
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Create a new test client and login
    pub async fn new_with_login(
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, TestClientError> {
        let mut client = Self::new(base_url);
        client.login(username, password).await?;
        Ok(client)
    }

    /// Get the access token (for sharing between clients)
    pub fn token(&self) -> Option<&String> {
        self.access_token.as_ref()
    }

    /// Login and store the access token
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), TestClientError> {
        let response = self
            .client
            .post(format!("{}/v3/auth/user/login", self.base_url))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(TestClientError::LoginFailed);
        }

        let body = response.text().await?;
        let data: LoginResponse =
            serde_json::from_str(&body).map_err(|_| TestClientError::LoginFailed)?;
        self.access_token = Some(data.access_token);

        Ok(())
    }

    fn with_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => builder.header("accessToken", token),
            None => builder,
        }
    }

    /// GET with query parameters, deserializing the body
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TestClientError> {
        let response = self
            .with_token(self.client.get(format!("{}{}", self.base_url, path)))
            .query(query)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    /// POST a form body, deserializing the response
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, TestClientError> {
        let response = self
            .with_token(self.client.post(format!("{}{}", self.base_url, path)))
            .form(form)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    /// PUT a form body, deserializing the response
    pub async fn put_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, TestClientError> {
        let response = self
            .with_token(self.client.put(format!("{}{}", self.base_url, path)))
            .form(form)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    /// DELETE with query parameters, deserializing the response
    pub async fn delete_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TestClientError> {
        let response = self
            .with_token(self.client.delete(format!("{}{}", self.base_url, path)))
            .query(query)
            .send()
            .await?;

        Ok(response.json().await?)
    }

    /// Raw GET for status-code assertions
    pub async fn raw_get(&self, path: &str) -> Result<Response, TestClientError> {
        let response = self
            .with_token(self.client.get(format!("{}{}", self.base_url, path)))
            .send()
            .await?;

        Ok(response)
    }
}

/// Test client errors
#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("login failed")]
    LoginFailed,

    #[error("response contained no data")]
    EmptyResponse,

    #[error("API error {code}: {message}")]
    ApiError { code: i32, message: String },
}
