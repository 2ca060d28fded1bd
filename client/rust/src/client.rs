//! HTTP client implementation over reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::models::{
    Booking, CheckoutRequest, CheckoutSession, Decorator, DecoratorAssignment, DecoratorRequest,
    InsertResult, NewBooking, Payment, RoleBody, Service, User, UserProfile, WorkStatusUpdate,
};
use crate::routes;
use crate::status::Role;
use crate::traits::{BookingApi, CatalogApi, PaymentApi, TokenSource, UserApi};

/// Default backend address for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL. Every request is resolved against it.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the marketplace backend.
///
/// Two variants share this type: the public client sends no credentials,
/// the secure client attaches `Authorization: Bearer` from a
/// [`TokenSource`] and revokes it when the backend answers 401/403.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("secure", &self.tokens.is_some())
            .finish()
    }
}

impl HttpClient {
    /// Create a client that sends no credentials.
    pub fn public(config: &ClientConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a client that authenticates every request.
    pub fn secure(config: &ClientConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        Self::build(config, Some(tokens))
    }

    fn build(config: &ClientConfig, tokens: Option<Arc<dyn TokenSource>>) -> Result<Self> {
        let parsed = Url::parse(&config.base_url).map_err(|e| {
            ClientError::InvalidArgument(format!("base url {:?}: {}", config.base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidArgument(format!(
                "base url {:?}: unsupported scheme",
                config.base_url
            )));
        }

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// The configured base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_secure(&self) -> bool {
        self.tokens.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.request(method, self.url(path))
    }

    /// Send a request, attaching the token and mapping failure statuses.
    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Response> {
        let token = match &self.tokens {
            Some(tokens) => tokens.bearer_token().await,
            None => None,
        };
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ClientError::Connection(e.to_string())
            } else {
                ClientError::Http(e)
            }
        })?;
        let status = response.status();
        debug!(method = %method, path = %path, status = %status, "Backend request");

        if status.is_success() {
            return Ok(response);
        }

        if let Some(tokens) = &self.tokens {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                warn!(method = %method, path = %path, status = %status, "Backend rejected credentials, signing out");
                tokens.revoke(token.as_deref()).await;
                return Err(ClientError::Unauthorized(status));
            }
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status,
            body: body.chars().take(200).collect(),
        })
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(format!("{}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .send(Method::GET, path, self.request(Method::GET, path))
            .await?;
        Self::decode(path, response).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let request = self.request(method.clone(), path).json(body);
        self.send(method, path, request).await
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        let request = self.request(method.clone(), path);
        self.send(method, path, request).await?;
        Ok(())
    }
}

fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ClientError::InvalidArgument(format!("{} must not be empty", kind)));
    }
    Ok(())
}

#[async_trait]
impl CatalogApi for HttpClient {
    async fn list_services(&self) -> Result<Vec<Service>> {
        self.get_json(routes::SERVICES).await
    }

    async fn get_service(&self, id: &str) -> Result<Service> {
        require_id("service id", id)?;
        self.get_json(&routes::service(id)).await
    }
}

#[async_trait]
impl BookingApi for HttpClient {
    async fn create_booking(&self, booking: &NewBooking) -> Result<String> {
        let response = self
            .send_json(Method::POST, routes::BOOKINGS, booking)
            .await?;
        let result: InsertResult = Self::decode(routes::BOOKINGS, response).await?;
        result
            .inserted_id
            .ok_or_else(|| ClientError::Decode("booking insert returned no id".to_string()))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.get_json(routes::BOOKINGS).await
    }

    async fn list_user_bookings(&self, uid: &str) -> Result<Vec<Booking>> {
        require_id("user id", uid)?;
        self.get_json(&routes::user_bookings(uid)).await
    }

    async fn delete_booking(&self, id: &str) -> Result<()> {
        require_id("booking id", id)?;
        self.send_empty(Method::DELETE, &routes::booking(id)).await
    }

    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let response = self
            .send_json(Method::POST, routes::CHECKOUT_SESSION, request)
            .await?;
        Self::decode(routes::CHECKOUT_SESSION, response).await
    }
}

#[async_trait]
impl PaymentApi for HttpClient {
    async fn list_payments(&self) -> Result<Vec<Payment>> {
        self.get_json(routes::PAYMENTS).await
    }

    async fn list_client_payments(&self, email: &str) -> Result<Vec<Payment>> {
        require_id("email", email)?;
        self.get_json(&routes::client_payments(email)).await
    }

    async fn list_decorator_payments(&self, email: &str) -> Result<Vec<Payment>> {
        require_id("email", email)?;
        self.get_json(&routes::decorator_payments(email)).await
    }

    async fn assign_decorator(&self, payment_id: &str, body: &DecoratorAssignment) -> Result<()> {
        require_id("payment id", payment_id)?;
        self.send_json(Method::PATCH, &routes::assign_decorator(payment_id), body)
            .await?;
        Ok(())
    }

    async fn update_work_status(&self, payment_id: &str, body: &WorkStatusUpdate) -> Result<()> {
        require_id("payment id", payment_id)?;
        self.send_json(Method::PATCH, &routes::work_status(payment_id), body)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserApi for HttpClient {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        require_id("email", &profile.email)?;
        self.send_json(Method::POST, routes::USER, profile).await?;
        Ok(())
    }

    async fn get_role(&self, email: &str) -> Result<Role> {
        require_id("email", email)?;
        let body: RoleBody = self.get_json(&routes::user_role(email)).await?;
        Ok(body.role)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json(routes::ALL_USERS).await
    }

    async fn update_role(&self, email: &str, role: Role) -> Result<()> {
        require_id("email", email)?;
        self.send_json(Method::PUT, &routes::update_role(email), &RoleBody { role })
            .await?;
        Ok(())
    }

    async fn list_decorators(&self) -> Result<Vec<Decorator>> {
        self.get_json(routes::DECORATORS).await
    }

    async fn list_decorator_requests(&self) -> Result<Vec<DecoratorRequest>> {
        self.get_json(routes::DECORATOR_REQUESTS).await
    }

    async fn delete_decorator_request(&self, id: &str) -> Result<()> {
        require_id("request id", id)?;
        self.send_empty(Method::DELETE, &routes::delete_request(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::default()
            .with_base_url("https://api.example.com/")
            .with_timeout(Duration::from_secs(5));
        let client = HttpClient::public(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
        assert!(!client.is_secure());
        assert_eq!(client.url("/services"), "https://api.example.com/services");
    }

    #[test]
    fn test_invalid_base_url_fails() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(matches!(
            HttpClient::public(&config),
            Err(ClientError::InvalidArgument(_))
        ));

        let config = ClientConfig::default().with_base_url("ftp://files.example.com");
        assert!(HttpClient::public(&config).is_err());
    }

    #[tokio::test]
    async fn test_empty_id_is_rejected_before_sending() {
        let client = HttpClient::public(&ClientConfig::default()).unwrap();
        let err = client.delete_booking("  ").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }
}
