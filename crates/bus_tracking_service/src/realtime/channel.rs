/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::tools::prometheus::{CONNECTED_CLIENTS, DROPPED_BROADCASTS};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};
use tracing::warn;
use uuid::Uuid;

pub fn user_group(UserId(user_id): &UserId) -> String {
    format!("user:{user_id}")
}

pub fn vehicle_group(VehicleId(vehicle_id): &VehicleId) -> String {
    format!("vehicle:{vehicle_id}")
}

/// Event frame pushed over a live connection.
#[derive(Clone, Debug)]
pub struct StreamEvent {
    pub event: String,
    pub payload: Value,
}

struct ConnectionEntry {
    sender: Sender<StreamEvent>,
    groups: HashSet<String>,
}

#[derive(Default)]
struct Registry {
    connections: FxHashMap<ConnectionId, ConnectionEntry>,
    groups: FxHashMap<String, HashSet<ConnectionId>>,
}

impl Registry {
    fn join(&mut self, connection_id: &ConnectionId, group: &str) {
        if let Some(entry) = self.connections.get_mut(connection_id) {
            entry.groups.insert(group.to_string());
            self.groups
                .entry(group.to_string())
                .or_default()
                .insert(connection_id.to_owned());
        }
    }

    fn leave(&mut self, connection_id: &ConnectionId, group: &str) {
        if let Some(entry) = self.connections.get_mut(connection_id) {
            entry.groups.remove(group);
        }
        if let Some(members) = self.groups.get_mut(group) {
            members.remove(connection_id);
            if members.is_empty() {
                self.groups.remove(group);
            }
        }
    }

    fn remove(&mut self, connection_id: &ConnectionId) {
        if let Some(entry) = self.connections.remove(connection_id) {
            for group in entry.groups {
                if let Some(members) = self.groups.get_mut(&group) {
                    members.remove(connection_id);
                    if members.is_empty() {
                        self.groups.remove(&group);
                    }
                }
            }
            CONNECTED_CLIENTS.dec();
        }
    }
}

/// Group membership and fanout for live connections. The registry is the
/// only process-wide mutable state besides the cooldown table; critical
/// sections are short and no lock is held across a suspension point.
pub struct ChannelManager {
    registry: RwLock<Registry>,
    buffer_size: usize,
}

impl ChannelManager {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            buffer_size,
        }
    }

    /// Admits a connection under an already verified identity and joins it
    /// to its own user group. The caller owns the receiving half of the
    /// channel for the lifetime of the connection.
    pub fn register(&self, identity: &AuthIdentity) -> (ConnectionId, Receiver<StreamEvent>) {
        let connection_id = ConnectionId(Uuid::new_v4().to_string());
        let (sender, receiver) = mpsc::channel(self.buffer_size);

        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        registry.connections.insert(
            connection_id.to_owned(),
            ConnectionEntry {
                sender,
                groups: HashSet::new(),
            },
        );
        registry.join(&connection_id, &user_group(&identity.user_id));
        CONNECTED_CLIENTS.inc();

        (connection_id, receiver)
    }

    pub fn join(&self, connection_id: &ConnectionId, group: &str) {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .join(connection_id, group);
    }

    pub fn leave(&self, connection_id: &ConnectionId, group: &str) {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .leave(connection_id, group);
    }

    /// Removes the connection from every group and frees its slot. Also
    /// invoked by the session guard when a client drops the stream.
    pub fn unregister(&self, connection_id: &ConnectionId) {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(connection_id);
    }

    pub fn is_member(&self, connection_id: &ConnectionId, group: &str) -> bool {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .groups
            .get(group)
            .map_or(false, |members| members.contains(connection_id))
    }

    /// Best-effort fanout to every connection in `group`. Slow consumers
    /// with a full buffer miss the event; closed consumers are pruned.
    pub fn broadcast(&self, group: &str, event: &str, payload: Value) {
        let members: Vec<(ConnectionId, Sender<StreamEvent>)> = {
            let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
            match registry.groups.get(group) {
                Some(members) => members
                    .iter()
                    .filter_map(|connection_id| {
                        registry
                            .connections
                            .get(connection_id)
                            .map(|entry| (connection_id.to_owned(), entry.sender.to_owned()))
                    })
                    .collect(),
                None => return,
            }
        };

        let mut closed_connections = Vec::new();
        for (connection_id, sender) in members {
            let frame = StreamEvent {
                event: event.to_string(),
                payload: payload.to_owned(),
            };
            match sender.try_send(frame) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    DROPPED_BROADCASTS.inc();
                    warn!(tag = "[Slow Consumer]", group = %group, event = %event);
                }
                Err(TrySendError::Closed(_)) => closed_connections.push(connection_id),
            }
        }

        for connection_id in closed_connections {
            self.unregister(&connection_id);
        }
    }
}
