/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::notification::cooldown::{cooldown_key, CooldownStore};
use crate::realtime::channel::{user_group, ChannelManager};
use crate::storage::{Datastore, NotificationEvent};
use crate::tools::error::AppError;
use crate::tools::prometheus::{DISPATCHED_NOTIFICATIONS, SUPPRESSED_NOTIFICATIONS};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub struct NotificationDispatcher {
    store: Arc<dyn Datastore>,
    channels: Arc<ChannelManager>,
    cooldowns: Arc<dyn CooldownStore>,
    cooldown_window: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn Datastore>,
        channels: Arc<ChannelManager>,
        cooldowns: Arc<dyn CooldownStore>,
        cooldown_window: Duration,
    ) -> Self {
        Self {
            store,
            channels,
            cooldowns,
            cooldown_window,
        }
    }

    /// Creates a durable notification event and pushes it to the
    /// recipient's user group. With a dedupe key, at most one event is
    /// emitted per (recipient, kind, key) within the cooldown window;
    /// `Ok(None)` is the defined suppression outcome, not an error.
    ///
    /// The cooldown entry is refreshed before the durable write, so a
    /// failed write under-notifies instead of flooding on retry storms.
    pub async fn dispatch(
        &self,
        recipient_user_id: &UserId,
        kind: NotificationKind,
        title: &str,
        body: &str,
        metadata: Value,
        dedupe_key: Option<&str>,
    ) -> Result<Option<NotificationEvent>, AppError> {
        let now = TimeStamp(Utc::now());

        if let Some(dedupe_key) = dedupe_key {
            let key = cooldown_key(recipient_user_id, &kind, dedupe_key);
            if !self
                .cooldowns
                .try_acquire(&key, now, self.cooldown_window)
                .await?
            {
                SUPPRESSED_NOTIFICATIONS.inc();
                return Ok(None);
            }
        }

        let event = NotificationEvent {
            id: NotificationId(Uuid::new_v4().to_string()),
            recipient_user_id: recipient_user_id.to_owned(),
            kind,
            title: title.to_string(),
            body: body.to_string(),
            metadata,
            created_at: now,
        };

        self.store.create_notification_event(&event).await?;

        self.channels.broadcast(
            &user_group(recipient_user_id),
            "notification",
            json!({
                "id": event.id.to_owned(),
                "kind": event.kind,
                "title": event.title.to_owned(),
                "body": event.body.to_owned(),
                "metadata": event.metadata.to_owned(),
                "createdAt": event.created_at,
            }),
        );
        DISPATCHED_NOTIFICATIONS.inc();

        Ok(Some(event))
    }
}
