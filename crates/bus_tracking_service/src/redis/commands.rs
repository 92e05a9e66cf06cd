/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::redis::types::RedisConnectionPool;
use crate::tools::error::AppError;
use fred::{
    interfaces::{KeysInterface, ListInterface},
    types::Expiration,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

impl RedisConnectionPool {
    /// Serialize and store a value under `key` with the default TTL.
    #[instrument(level = "DEBUG", skip(self, value))]
    pub async fn set_key<V>(&self, key: &str, value: V) -> Result<(), AppError>
    where
        V: Serialize + Send + Sync,
    {
        self.set_with_expiry(key, value, self.config.default_ttl)
            .await
    }

    #[instrument(level = "DEBUG", skip(self, value))]
    pub async fn set_with_expiry<V>(&self, key: &str, value: V, expiry: u32) -> Result<(), AppError>
    where
        V: Serialize + Send + Sync,
    {
        let value = serde_json::to_string(&value)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;

        let output: Result<(), _> = self
            .pool
            .set(key, value, Some(Expiration::EX(expiry.into())), None, false)
            .await;

        output.map_err(|_| AppError::SetFailed)
    }

    #[instrument(level = "DEBUG", skip(self))]
    pub async fn get_key<V>(&self, key: &str) -> Result<Option<V>, AppError>
    where
        V: DeserializeOwned,
    {
        let output: Option<String> = self.pool.get(key).await.map_err(|_| AppError::GetFailed)?;

        match output {
            Some(value) => serde_json::from_str::<V>(&value)
                .map(Some)
                .map_err(|err| AppError::DeserializationError(err.to_string())),
            None => Ok(None),
        }
    }

    /// Prepend a value to the list at `key`, keeping at most `max_length`
    /// entries.
    #[instrument(level = "DEBUG", skip(self, value))]
    pub async fn lpush_with_limit<V>(
        &self,
        key: &str,
        value: V,
        max_length: i64,
    ) -> Result<(), AppError>
    where
        V: Serialize + Send + Sync,
    {
        let value = serde_json::to_string(&value)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;

        let output: Result<(), _> = self.pool.lpush(key, value).await;
        output.map_err(|_| AppError::PushFailed)?;

        let output: Result<(), _> = self.pool.ltrim(key, 0, max_length - 1).await;
        output.map_err(|_| AppError::PushFailed)
    }

    #[instrument(level = "DEBUG", skip(self))]
    pub async fn lrange<V>(&self, key: &str, start: i64, stop: i64) -> Result<Vec<V>, AppError>
    where
        V: DeserializeOwned,
    {
        let output: Vec<String> = self
            .pool
            .lrange(key, start, stop)
            .await
            .map_err(|_| AppError::GetFailed)?;

        output
            .into_iter()
            .map(|value| {
                serde_json::from_str::<V>(&value)
                    .map_err(|err| AppError::DeserializationError(err.to_string()))
            })
            .collect()
    }
}
