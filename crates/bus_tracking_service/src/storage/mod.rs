/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
pub mod redis;

use crate::common::types::*;
use crate::tools::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Position report persisted for a vehicle. The most recent sample by
/// `created_at` is the canonical current location.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PositionSample {
    pub vehicle_id: VehicleId,
    pub pt: Point,
    pub speed_kph: Option<SpeedKph>,
    pub heading: Option<Direction>,
    pub accuracy_m: Option<Accuracy>,
    pub created_at: TimeStamp,
}

/// Fixed geographic stop a rider is registered against. Reference data,
/// never mutated here.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPoint {
    pub id: RegistrationPointId,
    pub name: String,
    pub pt: Point,
    pub route_id: Option<RouteId>,
    pub order: u32,
}

/// Rider with its registration point and guardian identity joined in, the
/// shape the proximity evaluation needs per vehicle.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RiderAssignment {
    pub id: RiderId,
    pub name: String,
    pub vehicle_id: VehicleId,
    pub registration_point: RegistrationPoint,
    pub guardian_user_id: UserId,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: NotificationId,
    pub recipient_user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub metadata: Value,
    pub created_at: TimeStamp,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    pub id: AttendanceId,
    pub vehicle_id: VehicleId,
    pub rider_id: RiderId,
    pub kind: AttendanceKind,
    pub created_at: TimeStamp,
}

/// Narrow datastore seam. Each call is atomic and reads are strongly
/// consistent with prior writes from the same process.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn operator_vehicle(&self, operator: &UserId) -> Result<Option<VehicleId>, AppError>;

    async fn riders_for_vehicle(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<Vec<RiderAssignment>, AppError>;

    async fn rider(&self, rider_id: &RiderId) -> Result<Option<RiderAssignment>, AppError>;

    async fn create_position_sample(&self, sample: &PositionSample) -> Result<(), AppError>;

    async fn latest_position(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<Option<PositionSample>, AppError>;

    async fn create_notification_event(&self, event: &NotificationEvent) -> Result<(), AppError>;

    async fn notifications_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<NotificationEvent>, AppError>;

    async fn create_attendance_event(&self, event: &AttendanceEvent) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
