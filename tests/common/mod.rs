#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use volaplace_client::api::{ApiError, FundShiftRequest, ShiftApi};
use volaplace_client::model::{
    AuthCheckResponse, CheckInResponse, CheckoutResponse, LoginResponse, MessageResponse, Shift,
    ShiftState, User,
};
use volaplace_client::store::{self, KeyValueStore, SqliteStore};
use tokio::sync::Mutex;

pub async fn setup_store() -> Arc<dyn KeyValueStore> {
    let pool = store::init_pool("sqlite::memory:").await.unwrap();
    store::run_migrations(&pool).await.unwrap();
    Arc::new(SqliteStore::new(pool))
}

pub fn funded_shift(id: i64) -> Shift {
    Shift {
        id,
        title: format!("Food distribution #{id}"),
        date: Some("2025-03-01".into()),
        start_time: Some("09:00".into()),
        end_time: Some("13:00".into()),
        max_volunteers: Some(10),
        volunteers_signed_up: Some(3),
        is_funded: Some(true),
        funded_amount: Some(5000.0),
        status: Some(ShiftState::Upcoming),
        ..Default::default()
    }
}

pub fn user(id: i64, role: &str) -> User {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": "Achieng",
        "email": "achieng@example.org",
        "role": role,
    }))
    .unwrap()
}

/// Fake backend: serves a mutable shift list, records every call and fails
/// the next call when a failure is queued.
#[derive(Clone, Default)]
pub struct RecordingApi {
    shifts: Arc<Mutex<Vec<Shift>>>,
    failures: Arc<Mutex<VecDeque<ApiError>>>,
    calls: Arc<Mutex<Vec<String>>>,
    checkout: Arc<Mutex<Option<CheckoutResponse>>>,
    login: Arc<Mutex<Option<LoginResponse>>>,
    auth_check: Arc<Mutex<Option<AuthCheckResponse>>>,
}

impl RecordingApi {
    pub fn with_shifts(shifts: Vec<Shift>) -> Self {
        Self {
            shifts: Arc::new(Mutex::new(shifts)),
            ..Default::default()
        }
    }

    pub async fn set_shifts(&self, shifts: Vec<Shift>) {
        *self.shifts.lock().await = shifts;
    }

    pub async fn fail_next(&self, err: ApiError) {
        self.failures.lock().await.push_back(err);
    }

    pub async fn set_checkout(&self, res: CheckoutResponse) {
        *self.checkout.lock().await = Some(res);
    }

    pub async fn set_login(&self, res: LoginResponse) {
        *self.login.lock().await = Some(res);
    }

    pub async fn set_auth_check(&self, res: AuthCheckResponse) {
        *self.auth_check.lock().await = Some(res);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().await.push(call);
        match self.failures.lock().await.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ShiftApi for RecordingApi {
    async fn list_shifts(&self) -> Result<Vec<Shift>, ApiError> {
        self.record("list_shifts".into()).await?;
        Ok(self.shifts.lock().await.clone())
    }

    async fn register(&self, shift_id: i64) -> Result<MessageResponse, ApiError> {
        self.record(format!("register:{shift_id}")).await?;
        Ok(MessageResponse { message: None })
    }

    async fn check_in(&self, shift_id: i64) -> Result<CheckInResponse, ApiError> {
        self.record(format!("check_in:{shift_id}")).await?;
        Ok(CheckInResponse {
            message: Some("Checked in successfully".into()),
            check_in_time: Some("2025-03-01T09:02:00".into()),
        })
    }

    async fn check_out(
        &self,
        shift_id: i64,
        beneficiaries_served: u32,
    ) -> Result<CheckoutResponse, ApiError> {
        self.record(format!("check_out:{shift_id}:{beneficiaries_served}"))
            .await?;
        let canned = self.checkout.lock().await.clone();
        Ok(canned.unwrap_or(CheckoutResponse {
            payout_amount: 450.0,
            message: "Payment pending approval.".into(),
            payment_status: None,
            check_out_time: Some("2025-03-01T13:01:00".into()),
        }))
    }

    async fn approve_payment(&self, roster_id: i64) -> Result<MessageResponse, ApiError> {
        self.record(format!("approve_payment:{roster_id}")).await?;
        Ok(MessageResponse {
            message: Some("Payment approved and sent".into()),
        })
    }

    async fn fund_shift(&self, request: &FundShiftRequest) -> Result<MessageResponse, ApiError> {
        self.record(format!("fund_shift:{}:{}", request.shift_id, request.amount))
            .await?;
        Ok(MessageResponse { message: None })
    }

    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.record(format!("login:{email}")).await?;
        let canned = self.login.lock().await.clone();
        canned.ok_or(ApiError::Unauthorized)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout".into()).await
    }

    async fn check_auth(&self) -> Result<AuthCheckResponse, ApiError> {
        self.record("check_auth".into()).await?;
        let canned = self.auth_check.lock().await.clone();
        Ok(canned.unwrap_or(AuthCheckResponse {
            authenticated: false,
            user: None,
        }))
    }
}
