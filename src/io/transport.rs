use std::fmt::{Display, Formatter};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{Client, Method, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;

/// Sends requests to the remote endpoints as the signed in user.
/// Shared by everything that talks to the endpoints, rather than each building its own.
#[async_trait]
pub trait AuthenticatedTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, TransportError>;

    async fn post(&self, url: &str, body: String) -> Result<String, TransportError>;
}

#[derive(Debug)]
pub enum TransportError {
    Network(reqwest::Error),
    Json(serde_json::Error),
    Status { status: u16, body: String },
    Other(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self {
            TransportError::Network(e) => write!(f, "Network Error: {}", e),
            TransportError::Json(e) => write!(f, "Deserialization Error: {}", e),
            TransportError::Status { status, body } => write!(f, "Status: {}. Body: {}", status, body),
            TransportError::Other(e) => write!(f, "Unknown Error: {}", e),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Network(e)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Json(e)
    }
}

/// Adds the sign in token as a bearer token, when there is one.
pub struct BearerTransport {
    client: Client,
    token: Option<String>,
    timeout: Duration,
}

impl BearerTransport {
    pub fn new(token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            token,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, String> {
        let token = config.get_auth().read_token()?;
        if token.is_none() {
            debug!("No token configured, requests will be unauthenticated");
        }
        Ok(Self::new(token, *config.get_api().get_timeout()))
    }

    fn new_request(&self, method: Method, url: &str) -> Result<Request, reqwest::Error> {
        let mut builder = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json")
            .header("Cache-Control", "no-cache")
            .timeout(self.timeout);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder.build()
    }

    async fn execute(&self, request: Request) -> Result<String, TransportError> {
        trace!("{} {}", request.method(), request.url());
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl AuthenticatedTransport for BearerTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let request = self.new_request(Method::GET, url)?;
        self.execute(request).await
    }

    async fn post(&self, url: &str, body: String) -> Result<String, TransportError> {
        let mut request = self.new_request(Method::POST, url)?;
        *request.body_mut() = Some(body.into());
        self.execute(request).await
    }
}

pub async fn get_json<T: DeserializeOwned>(
    transport: &dyn AuthenticatedTransport,
    url: &str,
) -> Result<T, TransportError> {
    let s = transport.get(url).await?;
    Ok(serde_json::from_str(&s)?)
}

pub async fn post_json<B: Serialize + Sync>(
    transport: &dyn AuthenticatedTransport,
    url: &str,
    payload: &B,
) -> Result<String, TransportError> {
    let body = serde_json::to_string(payload)?;
    transport.post(url, body).await
}
