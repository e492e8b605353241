//! HTTP client for menu-server

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, AppError, ErrorCode};

use crate::{ClientError, ClientResult};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Network HTTP client holding the bearer token of the current session
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base: Url,
    token: RwLock<Option<String>>,
}

impl HttpClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Append `segments` to the base URL, percent-encoding each one
    pub fn url_for(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    fn request(&self, method: Method, segments: &[&str]) -> ClientResult<RequestBuilder> {
        let req = self.client.request(method, self.url_for(segments)?);
        Ok(match self.token.read().as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let response = self.request(Method::GET, segments)?.send().await?;
        Self::handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::POST, segments)?.json(body).send().await?;
        Self::handle_response(response).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let response = self.request(Method::POST, segments)?.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Api(parse_error(status, &text)));
        }

        serde_json::from_str(&text).map_err(|e| {
            ClientError::InvalidResponse(format!("{} (status {})", e, status.as_u16()))
        })
    }
}

/// Rebuild the server's `AppError` from an error body
///
/// Bodies that are not an error envelope (proxies, panics) fall back to a
/// code derived from the status.
fn parse_error(status: StatusCode, text: &str) -> AppError {
    if let Ok(body) = serde_json::from_str::<ApiResponse>(text) {
        return body.into();
    }

    let code = match status {
        StatusCode::UNAUTHORIZED => ErrorCode::NotAuthenticated,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::BAD_REQUEST => ErrorCode::InvalidRequest,
        StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::ValidationFailed,
        StatusCode::TOO_MANY_REQUESTS => ErrorCode::TooManyRequests,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT | StatusCode::BAD_GATEWAY => {
            ErrorCode::StoreUnavailable
        }
        StatusCode::REQUEST_TIMEOUT => ErrorCode::TimeoutError,
        _ => ErrorCode::InternalError,
    };
    let message = if text.trim().is_empty() {
        code.message().to_string()
    } else {
        text.trim().to_string()
    };
    AppError::with_message(code, message)
}
