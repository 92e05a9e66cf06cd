/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::tools::error::AppError;
use async_trait::async_trait;
use chrono::Duration;
use rustc_hash::FxHashMap;
use std::sync::{PoisonError, RwLock};

pub fn cooldown_key(
    UserId(user_id): &UserId,
    kind: &NotificationKind,
    dedupe_key: &str,
) -> String {
    format!("{user_id}:{kind}:{dedupe_key}")
}

/// Last-emitted bookkeeping behind the dispatcher. Keyed per
/// (recipient, kind, subject); a multi-instance deployment swaps in a
/// shared store without touching the dispatcher contract.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    /// Records `now` for `key` and returns true when the previous emission
    /// is older than `window`. A false return leaves the entry untouched.
    /// The check and the mark are a single atomic step per key.
    async fn try_acquire(
        &self,
        key: &str,
        now: TimeStamp,
        window: Duration,
    ) -> Result<bool, AppError>;
}

/// Process-local cooldown table. Entries are never deleted; cardinality is
/// bounded by riders x notification kinds, and a restart costs at most one
/// extra duplicate per live key.
#[derive(Default)]
pub struct InMemoryCooldownStore {
    entries: RwLock<FxHashMap<String, TimeStamp>>,
}

impl InMemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdates or seeds an entry, bypassing the window check.
    pub fn set_last_emitted(&self, key: &str, at: TimeStamp) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), at);
    }
}

#[async_trait]
impl CooldownStore for InMemoryCooldownStore {
    async fn try_acquire(
        &self,
        key: &str,
        now: TimeStamp,
        window: Duration,
    ) -> Result<bool, AppError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(TimeStamp(last_emitted)) = entries.get(key) {
            let TimeStamp(now_inner) = now;
            if now_inner - *last_emitted < window {
                return Ok(false);
            }
        }

        entries.insert(key.to_string(), now);
        Ok(true)
    }
}
