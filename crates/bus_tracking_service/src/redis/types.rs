/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::tools::error::AppError;
use fred::{
    interfaces::ClientLike,
    types::{ReconnectPolicy, RedisConfig},
};
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub pool_size: usize,
    pub reconnect_max_attempts: u32,
    /// Reconnect delay in milliseconds
    pub reconnect_delay: u32,
    /// TTL in seconds
    pub default_ttl: u32,
}

impl Default for RedisSettings {
    fn default() -> Self {
        RedisSettings {
            host: String::from("localhost"),
            port: 6379,
            pool_size: 10,
            reconnect_max_attempts: 5,
            reconnect_delay: 1000,
            default_ttl: 3600,
        }
    }
}

pub struct RedisConnectionPool {
    pub pool: fred::clients::RedisPool,
    pub config: RedisSettings,
}

impl RedisConnectionPool {
    /// Create a new Redis connection pool and wait for the first
    /// connection to be established.
    pub async fn new(conf: RedisSettings) -> Result<Self, AppError> {
        let redis_connection_url = format!("redis://{}:{}", conf.host, conf.port);

        let config = RedisConfig::from_url(&redis_connection_url).map_err(|err| {
            error!(tag = "[Redis Configuration Failed]", error = %err);
            AppError::RedisConnectionError
        })?;

        let reconnect_policy = ReconnectPolicy::new_constant(
            conf.reconnect_max_attempts,
            conf.reconnect_delay,
        );

        let pool = fred::clients::RedisPool::new(
            config,
            None,
            None,
            Some(reconnect_policy),
            conf.pool_size,
        )
        .map_err(|err| {
            error!(tag = "[Redis Pool Creation Failed]", error = %err);
            AppError::RedisConnectionError
        })?;

        pool.init().await.map_err(|err| {
            error!(tag = "[Redis Connection Failed]", error = %err);
            AppError::RedisConnectionError
        })?;

        Ok(Self { pool, config: conf })
    }
}
