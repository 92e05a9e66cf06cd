/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::*;
use crate::common::types::*;
use crate::redis::{keys::*, types::RedisConnectionPool};
use crate::tools::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

// Reference data (operator assignments, rider rosters) is written by the
// provisioning system under the same key namespace and only read here.
const LOCATION_HISTORY_LIMIT: i64 = 10000;
const NOTIFICATION_BACKLOG_LIMIT: i64 = 500;
const ATTENDANCE_BACKLOG_LIMIT: i64 = 1000;

pub struct RedisStore {
    redis: Arc<RedisConnectionPool>,
}

impl RedisStore {
    pub fn new(redis: Arc<RedisConnectionPool>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl Datastore for RedisStore {
    async fn operator_vehicle(&self, operator: &UserId) -> Result<Option<VehicleId>, AppError> {
        self.redis
            .get_key::<VehicleId>(&operator_vehicle_key(operator))
            .await
    }

    async fn riders_for_vehicle(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<Vec<RiderAssignment>, AppError> {
        let riders = self
            .redis
            .get_key::<Vec<RiderAssignment>>(&vehicle_riders_key(vehicle_id))
            .await?;
        Ok(riders.unwrap_or_default())
    }

    async fn rider(&self, rider_id: &RiderId) -> Result<Option<RiderAssignment>, AppError> {
        self.redis
            .get_key::<RiderAssignment>(&rider_key(rider_id))
            .await
    }

    async fn create_position_sample(&self, sample: &PositionSample) -> Result<(), AppError> {
        self.redis
            .set_key(&vehicle_location_key(&sample.vehicle_id), sample)
            .await?;
        self.redis
            .lpush_with_limit(
                &vehicle_location_history_key(&sample.vehicle_id),
                sample,
                LOCATION_HISTORY_LIMIT,
            )
            .await
    }

    async fn latest_position(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<Option<PositionSample>, AppError> {
        self.redis
            .get_key::<PositionSample>(&vehicle_location_key(vehicle_id))
            .await
    }

    async fn create_notification_event(&self, event: &NotificationEvent) -> Result<(), AppError> {
        self.redis
            .lpush_with_limit(
                &user_notifications_key(&event.recipient_user_id),
                event,
                NOTIFICATION_BACKLOG_LIMIT,
            )
            .await
    }

    async fn notifications_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<NotificationEvent>, AppError> {
        self.redis
            .lrange::<NotificationEvent>(&user_notifications_key(user_id), 0, limit as i64 - 1)
            .await
    }

    async fn create_attendance_event(&self, event: &AttendanceEvent) -> Result<(), AppError> {
        self.redis
            .lpush_with_limit(
                &vehicle_attendance_key(&event.vehicle_id),
                event,
                ATTENDANCE_BACKLOG_LIMIT,
            )
            .await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.redis
            .set_key(&health_check_key(), "bus-tracking-service-health-check")
            .await?;

        let health_check_resp = self.redis.get_key::<String>(&health_check_key()).await?;

        if health_check_resp.is_none() {
            return Err(AppError::InternalError(
                "Health check failed as cannot get key from redis".to_string(),
            ));
        }

        Ok(())
    }
}
