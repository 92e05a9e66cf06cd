/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::redis::{keys::auth_token_key, types::RedisConnectionPool};
use crate::tools::callapi::call_api;
use crate::tools::error::AppError;
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseData {
    pub user_id: String,
    pub role: UserRole,
}

/// Credential seam shared by the ingestion endpoints and the stream
/// admission handshake, so both admit on exactly the same verification.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, token: &Token) -> Result<AuthIdentity, AppError>;
}

/// Verifies bearer tokens against the platform auth service, which checks
/// the token signature and expiry against the shared signing secret.
/// Verified identities are cached with expiry so repeated position updates
/// do not hit the auth service on every sample.
pub struct AuthService {
    auth_url: Url,
    auth_api_key: String,
    auth_token_expiry: u32,
    redis: Arc<RedisConnectionPool>,
}

impl AuthService {
    pub fn new(
        auth_url: Url,
        auth_api_key: String,
        auth_token_expiry: u32,
        redis: Arc<RedisConnectionPool>,
    ) -> Self {
        Self {
            auth_url,
            auth_api_key,
            auth_token_expiry,
            redis,
        }
    }
}

#[async_trait]
impl CredentialVerifier for AuthService {
    async fn verify(&self, token: &Token) -> Result<AuthIdentity, AppError> {
        if let Some(identity) = self
            .redis
            .get_key::<AuthIdentity>(&auth_token_key(token))
            .await?
        {
            return Ok(identity);
        }

        let Token(token_value) = token;
        let response = call_api::<AuthResponseData, String>(
            Method::GET,
            &self.auth_url,
            vec![
                ("content-type", "application/json"),
                ("token", token_value),
                ("api-key", &self.auth_api_key),
            ],
            None,
        )
        .await
        .map_err(|err| {
            error!(tag = "[Credential Verification Failed]", error = %err);
            AppError::OperatorAppAuthFailed
        })?;

        let identity = AuthIdentity {
            user_id: UserId(response.user_id),
            role: response.role,
        };

        self.redis
            .set_with_expiry(&auth_token_key(token), &identity, self.auth_token_expiry)
            .await?;

        Ok(identity)
    }
}
