//! HTTP collaborator: issues admin API requests with the session token
//! attached, decodes JSON bodies, and classifies them before handing a
//! typed resource back to the caller.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderName;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::classify::{ApiOutcome, DomainError};
use crate::config::AdminConfig;
use crate::error::{PeonyAdminError, Result};
use crate::resources::User;
use crate::session::SessionStore;

/// Client for the Peony admin API
pub struct AdminClient {
    http: reqwest::Client,
    config: AdminConfig,
    auth_header: HeaderName,
    session: Arc<dyn SessionStore>,
}

impl AdminClient {
    /// Create a new client against a validated configuration
    pub fn new(config: AdminConfig, session: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate()?;

        let auth_header = HeaderName::try_from(config.auth_header.to_lowercase())
            .map_err(|_| {
                PeonyAdminError::invalid_config(format!(
                    "auth_header '{}' is not a valid header name",
                    config.auth_header
                ))
            })?;

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_seconds));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config,
            auth_header,
            session,
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Authenticate with email and password.
    ///
    /// On success the server issues the token in the response header (the
    /// same header name requests authenticate with); it is written to the
    /// session store. A 2xx response without the header is an error.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiOutcome<()>> {
        let url = self.config.endpoint_url("/auth")?;
        tracing::debug!(%url, "logging in");

        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status().is_success() {
            let token = response
                .headers()
                .get(&self.auth_header)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .ok_or(PeonyAdminError::TokenNotIssued)?;
            self.session.set_token(&token)?;
            return Ok(ApiOutcome::Ok(()));
        }

        // Failed logins answer with a body; classify it like any other.
        let status = response.status();
        let body = response.json::<Value>().await?;
        match DomainError::from_value(&body) {
            Some(domain) => Ok(ApiOutcome::Domain(domain)),
            None => Err(PeonyAdminError::general(format!(
                "login failed with status {} and an unrecognized body",
                status
            ))),
        }
    }

    /// Fetch the currently authenticated user
    pub async fn current_user(&self) -> Result<ApiOutcome<User>> {
        self.request(Method::GET, "/auth", &[], None::<&()>).await
    }

    /// Drop the session token locally. No server round trip.
    pub fn logout(&self) -> Result<()> {
        self.session.unset_token()
    }

    /// Issue a request and classify the decoded body.
    ///
    /// The token is read synchronously from the session store and attached
    /// when present; when absent the request is still sent and the server's
    /// 401 domain error flows back through the classifier.
    pub(crate) async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiOutcome<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, value) = self.send_value(method, path, query, body).await?;
        tracing::debug!(%status, path, "decoded response body");

        if let Some(domain) = DomainError::from_value(&value) {
            return Ok(ApiOutcome::Domain(domain));
        }

        let resource = serde_json::from_value(value)?;
        Ok(ApiOutcome::Ok(resource))
    }

    async fn send_value<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<(StatusCode, Value)>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint_url(path)?;
        let mut builder = self.http.request(method.clone(), url);

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(token) = self.session.token() {
            builder = builder.header(self.auth_header.clone(), token);
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(%method, path, "issuing admin API request");
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "transport failure");
            e
        })?;

        let status = response.status();
        let value = response.json::<Value>().await.map_err(|e| {
            tracing::warn!(%method, path, %status, error = %e, "response body decode failure");
            e
        })?;

        Ok((status, value))
    }
}
