//! Volunteer shift tracking: fetch, act, and keep the optimistic cache and the
//! in-memory lists in step.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use crate::api::{ApiError, ShiftApi};
use crate::auth::expire_on_unauthorized;
use crate::error::{describe_failure, fallback_message, ActionError};
use crate::model::{CheckoutResponse, PaymentStatus, Role, RosterEntry};
use crate::reconcile::{action_for, Action, ShiftBoard, Transition};
use crate::store::{KeyValueStore, RosterStore, SessionStore};

pub struct Volunteer {
    api: Arc<dyn ShiftApi>,
    roster: RosterStore,
    session: SessionStore,
    user_id: i64,
    board: ShiftBoard,
}

impl Volunteer {
    pub fn new(
        api: Arc<dyn ShiftApi>,
        kv: Arc<dyn KeyValueStore>,
        user_id: i64,
        optimistic_ttl: Duration,
    ) -> Self {
        Self {
            api,
            roster: RosterStore::new(kv.clone()),
            session: SessionStore::new(kv),
            user_id,
            board: ShiftBoard::new(optimistic_ttl),
        }
    }

    /// Build from the stored session. Only volunteer accounts track shifts.
    pub async fn from_session(
        api: Arc<dyn ShiftApi>,
        kv: Arc<dyn KeyValueStore>,
        optimistic_ttl: Duration,
    ) -> Result<Self, ActionError> {
        let session = SessionStore::new(kv.clone());
        let user = session.user().await?.ok_or(ActionError::NotLoggedIn)?;
        if user.role != Role::Volunteer {
            return Err(ActionError::NotAllowed(
                "Only volunteer accounts can track shifts".into(),
            ));
        }
        Ok(Self::new(api, kv, user.id, optimistic_ttl))
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn board(&self) -> &ShiftBoard {
        &self.board
    }

    /// Refetch every shift, pair each with its cached roster entry and drop
    /// cache entries the backend has caught up with, or whose shift it no
    /// longer lists. Returns the number of shifts loaded.
    #[instrument(skip_all, fields(user_id = self.user_id))]
    pub async fn refresh(&mut self) -> Result<usize, ActionError> {
        let shifts = match self.api.list_shifts().await {
            Ok(shifts) => shifts,
            Err(err) => return Err(self.fail(None, err).await),
        };
        let cached = self.roster.entries_for(self.user_id).await?;
        let count = shifts.len();
        self.board
            .load(shifts, |shift_id| cached.get(&shift_id).cloned());

        let mut stale = self.board.superseded_entries();
        stale.extend(
            cached
                .keys()
                .copied()
                .filter(|shift_id| self.board.find(*shift_id).is_none()),
        );
        if !stale.is_empty() {
            self.roster.remove(self.user_id, &stale).await?;
        }
        info!(count, pruned = stale.len(), "shifts refreshed");
        Ok(count)
    }

    #[instrument(skip_all, fields(user_id = self.user_id, shift_id = shift_id))]
    pub async fn register(&mut self, shift_id: i64) -> Result<String, ActionError> {
        let previous = self.ensure_action(shift_id, Action::Register)?;
        let res = match self.api.register(shift_id).await {
            Ok(res) => res,
            Err(err) => return Err(self.fail(Some(Action::Register), err).await),
        };
        self.record(shift_id, previous.as_ref(), Transition::Register)
            .await?;
        info!("registered for shift");
        Ok(res
            .message
            .unwrap_or_else(|| "Successfully registered for shift!".into()))
    }

    #[instrument(skip_all, fields(user_id = self.user_id, shift_id = shift_id))]
    pub async fn check_in(&mut self, shift_id: i64) -> Result<String, ActionError> {
        let previous = self.ensure_action(shift_id, Action::CheckIn)?;
        let res = match self.api.check_in(shift_id).await {
            Ok(res) => res,
            Err(err) => return Err(self.fail(Some(Action::CheckIn), err).await),
        };
        let check_in_time = res
            .check_in_time
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        self.record(
            shift_id,
            previous.as_ref(),
            Transition::CheckIn { check_in_time },
        )
        .await?;
        info!("checked in");
        Ok(res
            .message
            .unwrap_or_else(|| "Checked in successfully!".into()))
    }

    #[instrument(skip_all, fields(user_id = self.user_id, shift_id = shift_id, beneficiaries_served = beneficiaries_served))]
    pub async fn check_out(
        &mut self,
        shift_id: i64,
        beneficiaries_served: u32,
    ) -> Result<String, ActionError> {
        let previous = self.ensure_action(shift_id, Action::CheckOut)?;
        let res = match self.api.check_out(shift_id, beneficiaries_served).await {
            Ok(res) => res,
            Err(err) => return Err(self.fail(Some(Action::CheckOut), err).await),
        };
        let check_out_time = res
            .check_out_time
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        self.record(
            shift_id,
            previous.as_ref(),
            Transition::CheckOut {
                check_out_time,
                payout_amount: res.payout_amount,
                beneficiaries_served,
            },
        )
        .await?;
        info!(payout = res.payout_amount, "checked out");
        Ok(checkout_message(&res))
    }

    /// Refuse actions the shift row does not offer, returning the
    /// unconfirmed entry the transition builds on.
    fn ensure_action(
        &self,
        shift_id: i64,
        action: Action,
    ) -> Result<Option<RosterEntry>, ActionError> {
        let tracked = self
            .board
            .find(shift_id)
            .ok_or(ActionError::UnknownShift(shift_id))?;
        let now = Utc::now();
        let ttl = self.board.ttl();
        let status = tracked.status_at(now, ttl);
        let button = action_for(status, &tracked.view());
        if button.action != Some(action) {
            return Err(ActionError::NotAllowed(format!(
                "{} is not available for this shift (status: {})",
                action.label(),
                status
            )));
        }
        if action == Action::Register && !self.board.is_open(shift_id) {
            return Err(ActionError::NotAllowed(
                "This shift is no longer open for registration".into(),
            ));
        }
        if !button.enabled {
            return Err(ActionError::NotAllowed(
                "This shift is not funded yet; registration opens once it is funded".into(),
            ));
        }
        Ok(tracked.unconfirmed().cloned())
    }

    async fn record(
        &mut self,
        shift_id: i64,
        previous: Option<&RosterEntry>,
        transition: Transition,
    ) -> Result<RosterEntry, ActionError> {
        let now = Utc::now();
        let entry = transition.apply(previous, now);
        let stored = self.roster.put(self.user_id, shift_id, &entry, now).await?;
        let touched = self.board.apply(shift_id, &stored);
        if touched == 0 {
            warn!(shift_id, "shift missing from in-memory lists");
        }
        Ok(stored)
    }

    async fn fail(&self, action: Option<Action>, err: ApiError) -> ActionError {
        let fallback = action.map_or("Failed to load shifts", fallback_message);
        warn!(error = %err, ?action, "shift action failed");
        if let Err(store_err) = expire_on_unauthorized(&self.session, &err).await {
            return store_err;
        }
        describe_failure(action, &err, fallback)
    }
}

pub fn checkout_message(res: &CheckoutResponse) -> String {
    match res.payment_status {
        Some(PaymentStatus::Completed) => {
            format!("{} You earned KES {}!", res.message, res.payout_amount)
        }
        Some(PaymentStatus::Partial) => res.message.clone(),
        _ => format!(
            "Checked out! Earned KES {}. {}",
            res.payout_amount, res.message
        )
        .trim_end()
        .to_string(),
    }
}
