/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
#![allow(clippy::expect_used)]

use std::sync::Arc;

use crate::notification::cooldown::{CooldownStore, InMemoryCooldownStore};
use crate::notification::dispatcher::NotificationDispatcher;
use crate::realtime::channel::ChannelManager;
use crate::redis::types::{RedisConnectionPool, RedisSettings};
use crate::storage::{redis::RedisStore, Datastore};
use crate::tools::auth::{AuthService, CredentialVerifier};
use crate::tools::logger::LoggerConfig;
use chrono::Duration;
use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub workers: usize,
    pub logger_cfg: LoggerConfig,
    pub redis_cfg: RedisConfig,
    pub auth_url: String,
    pub auth_api_key: String,
    pub auth_token_expiry: u32,
    pub notification_cooldown_seconds: u32,
    pub stream_buffer_size: usize,
    pub request_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_pool_size: usize,
    pub reconnect_max_attempts: u32,
    pub reconnect_delay: u32,
    pub default_ttl: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Datastore>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub channels: Arc<ChannelManager>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub request_timeout: u64,
}

impl AppState {
    pub async fn new(app_config: AppConfig) -> AppState {
        let redis = Arc::new(
            RedisConnectionPool::new(RedisSettings {
                host: app_config.redis_cfg.redis_host,
                port: app_config.redis_cfg.redis_port,
                pool_size: app_config.redis_cfg.redis_pool_size,
                reconnect_max_attempts: app_config.redis_cfg.reconnect_max_attempts,
                reconnect_delay: app_config.redis_cfg.reconnect_delay,
                default_ttl: app_config.redis_cfg.default_ttl,
            })
            .await
            .expect("Failed to create Redis connection pool"),
        );

        let store: Arc<dyn Datastore> = Arc::new(RedisStore::new(redis.to_owned()));

        let verifier: Arc<dyn CredentialVerifier> = Arc::new(AuthService::new(
            Url::parse(app_config.auth_url.as_str()).expect("Failed to parse auth_url."),
            app_config.auth_api_key,
            app_config.auth_token_expiry,
            redis,
        ));

        let channels = Arc::new(ChannelManager::new(app_config.stream_buffer_size));

        let cooldowns: Arc<dyn CooldownStore> = Arc::new(InMemoryCooldownStore::new());

        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.to_owned(),
            channels.to_owned(),
            cooldowns,
            Duration::seconds(app_config.notification_cooldown_seconds.into()),
        ));

        AppState {
            store,
            verifier,
            channels,
            dispatcher,
            request_timeout: app_config.request_timeout,
        }
    }
}
