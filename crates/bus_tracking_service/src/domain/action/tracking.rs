/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::domain::types::tracking::*;
use crate::environment::AppState;
use crate::tools::error::AppError;
use actix_web::web::Data;

const NOTIFICATION_PAGE_LIMIT: usize = 50;

pub async fn get_latest_vehicle_location(
    token: Token,
    data: Data<AppState>,
    vehicle_id: VehicleId,
) -> Result<VehicleLocationResponse, AppError> {
    let _identity = data.verifier.verify(&token).await?;

    let location = data
        .store
        .latest_position(&vehicle_id)
        .await?
        .ok_or_else(|| {
            let VehicleId(vehicle_id) = &vehicle_id;
            AppError::VehicleLocationNotFound(vehicle_id.to_owned())
        })?;

    Ok(VehicleLocationResponse { location })
}

/// Durable notification backlog for the caller, newest first. Live events
/// missed while offline are reconciled from here on reconnect.
pub async fn list_notifications(
    token: Token,
    data: Data<AppState>,
) -> Result<NotificationsResponse, AppError> {
    let identity = data.verifier.verify(&token).await?;

    let notifications = data
        .store
        .notifications_for_user(&identity.user_id, NOTIFICATION_PAGE_LIMIT)
        .await?;

    Ok(NotificationsResponse { notifications })
}
