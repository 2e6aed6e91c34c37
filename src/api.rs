use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{
    AuthCheckResponse, CheckInResponse, CheckoutResponse, LoginResponse, MessageResponse, Shift,
};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("unable to reach backend: {0}")]
    Network(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {}", .message.as_deref().unwrap_or("access denied"))]
    Forbidden { message: Option<String> },
    #[error("backend error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Backend { status: u16, message: Option<String> },
    #[error("invalid backend response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    Request(String),
}

impl ApiError {
    /// Message from the backend's `{"error": ...}` body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Forbidden { message } | ApiError::Backend { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FundShiftRequest {
    pub shift_id: i64,
    pub amount: f64,
    pub phone_number: String,
}

/// The backend endpoints the client consumes.
#[async_trait]
pub trait ShiftApi: Send + Sync {
    async fn list_shifts(&self) -> Result<Vec<Shift>, ApiError>;

    async fn register(&self, shift_id: i64) -> Result<MessageResponse, ApiError>;

    async fn check_in(&self, shift_id: i64) -> Result<CheckInResponse, ApiError>;

    async fn check_out(
        &self,
        shift_id: i64,
        beneficiaries_served: u32,
    ) -> Result<CheckoutResponse, ApiError>;

    async fn approve_payment(&self, roster_id: i64) -> Result<MessageResponse, ApiError>;

    async fn fund_shift(&self, request: &FundShiftRequest) -> Result<MessageResponse, ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn check_auth(&self) -> Result<AuthCheckResponse, ApiError>;
}

#[derive(Clone)]
pub struct HttpApi {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    pub fn new(base_url: Url, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("volaplace-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Request, ApiError> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Request(format!("invalid endpoint {path}: {e}")))?;
        let mut builder = self
            .http
            .request(method, endpoint)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    async fn execute_text(&self, request: reqwest::Request) -> Result<String, ApiError> {
        info!(method = %request.method(), url = %request.url(), "backend request");
        for (name, value) in request.headers() {
            if name.as_str().eq_ignore_ascii_case("authorization") {
                debug!("  {}: Bearer [REDACTED]", name);
            } else {
                debug!("  {}: {}", name, value.to_str().unwrap_or("[invalid]"));
            }
        }

        let res = self.http.execute(request).await.map_err(|err| {
            warn!(?err, "backend unreachable");
            ApiError::Network(err.to_string())
        })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %body, "backend rejected request");
            return Err(classify_failure(status, &body));
        }
        let body = res.text().await.map_err(|err| {
            warn!(?err, %status, "failed to read backend response");
            ApiError::Network(err.to_string())
        })?;
        debug!(%status, body = %body, "backend response");
        Ok(body)
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::Request) -> Result<T, ApiError> {
        let body = self.execute_text(request).await?;
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        let request = self.build_request(Method::POST, path, Some(&body))?;
        self.execute(request).await
    }
}

#[async_trait]
impl ShiftApi for HttpApi {
    async fn list_shifts(&self) -> Result<Vec<Shift>, ApiError> {
        let request = self.build_request(Method::GET, "api/shifts", None)?;
        let body = self.execute_text(request).await?;
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn register(&self, shift_id: i64) -> Result<MessageResponse, ApiError> {
        self.post(&format!("api/shifts/{shift_id}/register"), json!({}))
            .await
    }

    async fn check_in(&self, shift_id: i64) -> Result<CheckInResponse, ApiError> {
        self.post(&format!("api/shifts/{shift_id}/checkin"), json!({}))
            .await
    }

    async fn check_out(
        &self,
        shift_id: i64,
        beneficiaries_served: u32,
    ) -> Result<CheckoutResponse, ApiError> {
        self.post(
            &format!("api/shifts/{shift_id}/checkout"),
            checkout_body(beneficiaries_served),
        )
        .await
    }

    async fn approve_payment(&self, roster_id: i64) -> Result<MessageResponse, ApiError> {
        self.post(&format!("api/admin/approve-payment/{roster_id}"), json!({}))
            .await
    }

    async fn fund_shift(&self, request: &FundShiftRequest) -> Result<MessageResponse, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Request(e.to_string()))?;
        self.post("api/payments/fund-shift", body).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.post(
            "api/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let request = self.build_request(Method::POST, "api/auth/logout", Some(&json!({})))?;
        self.execute_text(request).await.map(|_| ())
    }

    async fn check_auth(&self) -> Result<AuthCheckResponse, ApiError> {
        let request = self.build_request(Method::GET, "api/auth/check", None)?;
        self.execute(request).await
    }
}

pub fn checkout_body(beneficiaries_served: u32) -> Value {
    json!({ "beneficiaries_served": beneficiaries_served })
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Extract `error` from a JSON error body.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

pub fn classify_failure(status: StatusCode, body: &str) -> ApiError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden { message },
        _ => ApiError::Backend {
            status: status.as_u16(),
            message,
        },
    }
}
