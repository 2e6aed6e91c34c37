use std::sync::Arc;

use tracing::{info, warn};

use super::{KeyValueStore, StoreError};
use crate::model::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// The signed-in session: bearer token and user object.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn token(&self) -> Result<Option<String>, StoreError> {
        let token = self.kv.get_item(TOKEN_KEY).await?;
        Ok(token.filter(|t| !t.trim().is_empty()))
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.kv.set_item(TOKEN_KEY, token).await
    }

    /// The stored user, or `None` when absent. An unreadable user object
    /// clears the whole session.
    pub async fn user(&self) -> Result<Option<User>, StoreError> {
        let Some(raw) = self.kv.get_item(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(?err, "stored user is unreadable; clearing session");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn set_user(&self, user: &User) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user)?;
        self.kv.set_item(USER_KEY, &raw).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove_item(TOKEN_KEY).await?;
        self.kv.remove_item(USER_KEY).await?;
        info!("session cleared");
        Ok(())
    }
}
