//! Volunteer-side client for the VolaPlace shift marketplace.
//!
//! The backend owns geofencing, payouts and payments. This crate derives what
//! a volunteer sees for each shift from backend fields plus a local
//! optimistic cache, and drives the register / check-in / check-out calls.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod payments;
pub mod reconcile;
pub mod store;
pub mod volunteer;
