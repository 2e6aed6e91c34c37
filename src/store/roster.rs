use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{KeyValueStore, StoreError};
use crate::model::RosterEntry;

pub const ROSTER_KEY: &str = "volunteer_roster_status";

/// `{ [userId]: { [shiftId]: RosterEntry } }`, ids as JSON object keys.
pub type RosterMap = BTreeMap<String, BTreeMap<String, RosterEntry>>;

/// Typed access to the optimistic roster cache.
///
/// Every mutation is a read/modify/write of the whole map under one key.
/// Two processes writing at once can lose an update; the last write wins.
#[derive(Clone)]
pub struct RosterStore {
    kv: Arc<dyn KeyValueStore>,
}

impl RosterStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> Result<RosterMap, StoreError> {
        let Some(raw) = self.kv.get_item(ROSTER_KEY).await? else {
            return Ok(RosterMap::new());
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(err) => {
                warn!(?err, "discarding unreadable roster cache");
                Ok(RosterMap::new())
            }
        }
    }

    async fn save(&self, map: &RosterMap) -> Result<(), StoreError> {
        let raw = serde_json::to_string(map)?;
        self.kv.set_item(ROSTER_KEY, &raw).await
    }

    pub async fn get(&self, user_id: i64, shift_id: i64) -> Result<Option<RosterEntry>, StoreError> {
        let map = self.load().await?;
        Ok(map
            .get(&user_id.to_string())
            .and_then(|shifts| shifts.get(&shift_id.to_string()))
            .cloned())
    }

    pub async fn entries_for(&self, user_id: i64) -> Result<BTreeMap<i64, RosterEntry>, StoreError> {
        let map = self.load().await?;
        let entries = map
            .get(&user_id.to_string())
            .map(|shifts| {
                shifts
                    .iter()
                    .filter_map(|(id, entry)| Some((id.parse::<i64>().ok()?, entry.clone())))
                    .collect()
            })
            .unwrap_or_default();
        Ok(entries)
    }

    /// Store `entry` stamped with `now`, returning the stored copy.
    pub async fn put(
        &self,
        user_id: i64,
        shift_id: i64,
        entry: &RosterEntry,
        now: DateTime<Utc>,
    ) -> Result<RosterEntry, StoreError> {
        let mut stamped = entry.clone();
        stamped.updated_at = now;

        let mut map = self.load().await?;
        map.entry(user_id.to_string())
            .or_default()
            .insert(shift_id.to_string(), stamped.clone());
        self.save(&map).await?;
        debug!(user_id, shift_id, status = ?stamped.roster_status, "roster cache updated");
        Ok(stamped)
    }

    /// Drop the listed shift entries for `user_id`. Returns how many existed.
    pub async fn remove(&self, user_id: i64, shift_ids: &[i64]) -> Result<usize, StoreError> {
        if shift_ids.is_empty() {
            return Ok(0);
        }
        let mut map = self.load().await?;
        let user_key = user_id.to_string();
        let Some(shifts) = map.get_mut(&user_key) else {
            return Ok(0);
        };
        let removed = shift_ids
            .iter()
            .filter(|id| shifts.remove(&id.to_string()).is_some())
            .count();
        if shifts.is_empty() {
            map.remove(&user_key);
        }
        if removed > 0 {
            self.save(&map).await?;
            debug!(user_id, removed, "pruned roster cache");
        }
        Ok(removed)
    }
}
