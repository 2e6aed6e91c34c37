use tracing::{info, instrument, warn};

use crate::api::{ApiError, ShiftApi};
use crate::error::{describe_failure, ActionError};
use crate::model::User;
use crate::store::SessionStore;

/// On a 401 the stored token and user are no longer usable; drop them so the
/// next command asks for a login.
pub(crate) async fn expire_on_unauthorized(
    session: &SessionStore,
    err: &ApiError,
) -> Result<(), ActionError> {
    if matches!(err, ApiError::Unauthorized) {
        warn!("backend rejected token; clearing session");
        session.clear().await?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn login(
    api: &dyn ShiftApi,
    session: &SessionStore,
    email: &str,
    password: &str,
) -> Result<User, ActionError> {
    let res = match api.login(email, password).await {
        Ok(res) => res,
        // A 401 here means bad credentials, not an expired session.
        Err(ApiError::Unauthorized) => {
            return Err(ActionError::Rejected("Invalid email or password".into()))
        }
        Err(err) => return Err(describe_failure(None, &err, "Login failed")),
    };

    session.set_user(&res.user).await?;
    match res.access_token.as_deref() {
        Some(token) => session.set_token(token).await?,
        None => warn!("login response carried no access token"),
    }
    info!(user_id = res.user.id, role = ?res.user.role, "logged in");
    Ok(res.user)
}

/// Best-effort backend logout; the local session is always cleared.
#[instrument(skip_all)]
pub async fn logout(api: &dyn ShiftApi, session: &SessionStore) -> Result<(), ActionError> {
    if let Err(err) = api.logout().await {
        warn!(error = %err, "backend logout failed");
    }
    session.clear().await?;
    Ok(())
}

/// Confirm the stored token is still accepted. Returns the refreshed user,
/// or `None` after clearing a session the backend no longer recognises.
#[instrument(skip_all)]
pub async fn verify(api: &dyn ShiftApi, session: &SessionStore) -> Result<Option<User>, ActionError> {
    if session.token().await?.is_none() {
        return Ok(session.user().await?);
    }
    match api.check_auth().await {
        Ok(res) if res.authenticated => {
            if let Some(user) = &res.user {
                session.set_user(user).await?;
                return Ok(Some(user.clone()));
            }
            Ok(session.user().await?)
        }
        Ok(_) | Err(ApiError::Unauthorized) | Err(ApiError::Forbidden { .. }) => {
            session.clear().await?;
            Ok(None)
        }
        Err(ApiError::Backend { status: 422, .. }) => {
            // Malformed token.
            session.clear().await?;
            Ok(None)
        }
        Err(err) => Err(describe_failure(None, &err, "Token verification failed")),
    }
}
