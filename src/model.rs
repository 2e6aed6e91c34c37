use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Shift lifecycle as reported by the backend for the shift itself (not the
/// volunteer's relationship to it).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShiftState {
    Upcoming,
    Active,
    Completed,
    #[serde(other)]
    Other,
}

/// Roster relationship between a volunteer and a shift, as cached locally or
/// echoed by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RosterStatus {
    Registered,
    CheckedIn,
    PendingPayment,
    Completed,
}

/// Canonical display state of a shift for the signed-in volunteer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Available,
    Registered,
    CheckedIn,
    PendingPayment,
    Completed,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Available => "available",
            DisplayStatus::Registered => "registered",
            DisplayStatus::CheckedIn => "checked_in",
            DisplayStatus::PendingPayment => "pending_payment",
            DisplayStatus::Completed => "completed",
        }
    }

    /// Position along the lifecycle; later states have a higher rank.
    pub fn rank(&self) -> u8 {
        match self {
            DisplayStatus::Available => 0,
            DisplayStatus::Registered => 1,
            DisplayStatus::CheckedIn => 2,
            DisplayStatus::PendingPayment => 3,
            DisplayStatus::Completed => 4,
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<RosterStatus> for DisplayStatus {
    fn from(status: RosterStatus) -> Self {
        match status {
            RosterStatus::Registered => DisplayStatus::Registered,
            RosterStatus::CheckedIn => DisplayStatus::CheckedIn,
            RosterStatus::PendingPayment => DisplayStatus::PendingPayment,
            RosterStatus::Completed => DisplayStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub geofence_radius: Option<f64>,
}

/// A shift as returned by `GET /api/shifts`. Volunteer-specific fields are
/// only populated when the caller has a roster relationship with the shift.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Shift {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub max_volunteers: Option<u32>,
    #[serde(default)]
    pub volunteers_signed_up: Option<u32>,
    #[serde(default)]
    pub project: Option<Project>,
    #[serde(default)]
    pub is_funded: Option<bool>,
    #[serde(default)]
    pub funded_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<ShiftState>,

    #[serde(default)]
    pub roster_status: Option<RosterStatus>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub is_paid: Option<bool>,
    #[serde(default)]
    pub payout_amount: Option<f64>,
    #[serde(default)]
    pub beneficiaries_served: Option<u32>,
}

impl Shift {
    pub fn has_open_spots(&self) -> bool {
        match self.max_volunteers {
            Some(max) => self.volunteers_signed_up.unwrap_or(0) < max,
            None => true,
        }
    }
}

/// Locally cached optimistic copy of a roster relationship, written after a
/// user action succeeds and before the backend read path reflects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub roster_status: RosterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beneficiaries_served: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl RosterEntry {
    pub fn new(roster_status: RosterStatus, updated_at: DateTime<Utc>) -> Self {
        Self {
            roster_status,
            check_in_time: None,
            check_out_time: None,
            payout_amount: None,
            beneficiaries_served: None,
            is_paid: None,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Volunteer,
    OrgAdmin,
    Admin,
    #[serde(other)]
    Unknown,
}

/// Signed-in user as stored under the `user` key. Unknown fields are kept so
/// the stored object round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Partial,
    Pending,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckInResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub payout_amount: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub check_out_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthCheckResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}
