//! HTTP client for the Stocksim backend.
//!
//! All business logic (pricing, balance checks, trade execution) runs on the
//! server; this client only performs authenticated fetches and decodes the
//! JSON responses into [`crate::models`] types.
//!
//! A 401 ([`ApiError::Unauthorized`]) is the UI's cue to call
//! `SessionManager::logout` and return to the login screen.

use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::chart::TimePoint;
use crate::models::{
    Dashboard, Holding, LoginResponse, Stock, StudentPortfolio, StudentSummary, TradeReceipt,
};

use super::ApiError;

/// HTTP request timeout.
/// The backend is a small classroom server; 30s covers cold starts
/// without leaving the UI hanging forever.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Direction of a trade, as it appears in the endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
        }
    }
}

#[derive(Serialize)]
struct StudentLoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    teacher_username: &'a str,
}

#[derive(Serialize)]
struct TeacherLoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct TradeRequest {
    amount: f64,
}

#[derive(Serialize)]
struct AddStudentRequest<'a> {
    username: &'a str,
    password: &'a str,
    funds: f64,
}

#[derive(Serialize)]
struct ChangePasswordRequest<'a> {
    new_password: &'a str,
}

#[derive(Serialize)]
struct AddFundsRequest {
    amount: f64,
}

/// API client for the Stocksim backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create an unauthenticated client against the given base URL
    /// (e.g. `http://localhost:5001`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a client with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("{e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let mut request = self
            .client
            .get(self.url(path))
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let mut request = self
            .client
            .post(self.url(path))
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    /// POST whose response body is only interesting on failure.
    async fn post_discard(&self, path: &str, body: &impl Serialize) -> Result<(), ApiError> {
        debug!(path, "POST");
        let mut request = self
            .client
            .post(self.url(path))
            .header(header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApiError::from_status(status, &body));
        }
        Ok(())
    }

    /// Bodyless POST; the backend's management endpoints take no payload.
    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "POST");
        let mut request = self
            .client
            .post(self.url(path))
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApiError::from_status(status, &body));
        }
        Ok(())
    }

    // ===== Authentication =====

    /// Log a student in. Student accounts are scoped to their teacher, so the
    /// teacher's username is part of the credentials.
    pub async fn login_student(
        &self,
        username: &str,
        password: &str,
        teacher_username: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.post_json(
            "/api/auth/student/login",
            &StudentLoginRequest {
                username,
                password,
                teacher_username,
            },
        )
        .await
    }

    pub async fn login_teacher(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.post_json(
            "/api/auth/teacher/login",
            &TeacherLoginRequest { username, password },
        )
        .await
    }

    // ===== Stocks =====

    /// Full catalog of tradable stocks.
    pub async fn fetch_stocks(&self) -> Result<Vec<Stock>, ApiError> {
        self.get_json("/api/stocks/all").await
    }

    /// One stock with its price history.
    pub async fn fetch_stock(&self, id: i64) -> Result<Stock, ApiError> {
        self.get_json(&format!("/api/stocks/{}", id)).await
    }

    /// Buy or sell `amount` shares of a stock. The server validates funds
    /// and holdings; rejections come back as [`ApiError::Backend`].
    pub async fn trade(
        &self,
        id: i64,
        action: TradeAction,
        amount: f64,
    ) -> Result<TradeReceipt, ApiError> {
        self.post_json(
            &format!("/api/stocks/{}/{}", id, action.as_str()),
            &TradeRequest { amount },
        )
        .await
    }

    // ===== Student endpoints =====

    /// Portfolio value over time, the input series for chart windowing.
    pub async fn fetch_portfolio_history(&self) -> Result<Vec<TimePoint>, ApiError> {
        self.get_json("/api/student/portfolio-history").await
    }

    /// The student's current positions.
    pub async fn fetch_holdings(&self) -> Result<Vec<Holding>, ApiError> {
        self.get_json("/api/student/stocks").await
    }

    pub async fn fetch_dashboard(&self) -> Result<Dashboard, ApiError> {
        self.get_json("/api/student/dashboard").await
    }

    // ===== Teacher endpoints =====

    /// Roster of the teacher's student accounts.
    pub async fn fetch_students(&self) -> Result<Vec<StudentSummary>, ApiError> {
        self.get_json("/api/teacher/students").await
    }

    /// Create a student account with an initial balance.
    pub async fn add_student(
        &self,
        username: &str,
        password: &str,
        funds: f64,
    ) -> Result<(), ApiError> {
        self.post_discard(
            "/api/teacher/add-student",
            &AddStudentRequest {
                username,
                password,
                funds,
            },
        )
        .await
    }

    pub async fn change_student_password(
        &self,
        id: i64,
        new_password: &str,
    ) -> Result<(), ApiError> {
        self.post_discard(
            &format!("/api/teacher/student/{}/change-password", id),
            &ChangePasswordRequest { new_password },
        )
        .await
    }

    /// Issue additional funds to a student account.
    pub async fn add_funds(&self, id: i64, amount: f64) -> Result<(), ApiError> {
        self.post_discard(
            &format!("/api/teacher/student/{}/add-funds", id),
            &AddFundsRequest { amount },
        )
        .await
    }

    pub async fn delete_student(&self, id: i64) -> Result<(), ApiError> {
        self.post_empty(&format!("/api/teacher/delete-student/{}", id))
            .await
    }

    /// A student's holdings and performance series, for the teacher's
    /// student detail view.
    pub async fn fetch_student_portfolio(&self, id: i64) -> Result<StudentPortfolio, ApiError> {
        self.get_json(&format!("/api/teacher/student-portfolio/{}", id))
            .await
    }
}
