//! Organization funding and admin payout approval. Both are thin calls; the
//! backend owns every payment rule.

use tracing::{info, instrument};

use crate::api::{FundShiftRequest, ShiftApi};
use crate::auth::expire_on_unauthorized;
use crate::error::{describe_failure, ActionError};
use crate::store::SessionStore;

#[instrument(skip_all, fields(roster_id = roster_id))]
pub async fn approve_payment(
    api: &dyn ShiftApi,
    session: &SessionStore,
    roster_id: i64,
) -> Result<String, ActionError> {
    match api.approve_payment(roster_id).await {
        Ok(res) => {
            info!("payment approved");
            Ok(res.message.unwrap_or_else(|| "Payment approved".into()))
        }
        Err(err) => {
            expire_on_unauthorized(session, &err).await?;
            Err(describe_failure(None, &err, "Failed to approve payment"))
        }
    }
}

#[instrument(skip_all, fields(shift_id = request.shift_id, amount = request.amount))]
pub async fn fund_shift(
    api: &dyn ShiftApi,
    session: &SessionStore,
    request: &FundShiftRequest,
) -> Result<String, ActionError> {
    if request.amount.is_nan() || request.amount <= 0.0 {
        return Err(ActionError::NotAllowed(
            "Funding amount must be greater than zero".into(),
        ));
    }
    if request.phone_number.trim().is_empty() {
        return Err(ActionError::NotAllowed("A phone number is required".into()));
    }
    match api.fund_shift(request).await {
        Ok(res) => {
            info!("shift funding initiated");
            Ok(res
                .message
                .unwrap_or_else(|| "Funding request sent. Confirm on your phone.".into()))
        }
        Err(err) => {
            expire_on_unauthorized(session, &err).await?;
            Err(describe_failure(None, &err, "Failed to fund shift"))
        }
    }
}
