/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get,
    web::{Data, Json, Path},
    HttpRequest,
};

use crate::{
    common::types::VehicleId,
    domain::{action::tracking, api::read_token, types::tracking::*},
    environment::AppState,
    tools::error::AppError,
};

#[get("/vehicle/{vehicleId}/location")]
pub async fn get_latest_vehicle_location(
    data: Data<AppState>,
    path: Path<String>,
    req: HttpRequest,
) -> Result<Json<VehicleLocationResponse>, AppError> {
    let vehicle_id = VehicleId(path.into_inner());
    let token = read_token(&req)?;

    Ok(Json(
        tracking::get_latest_vehicle_location(token, data, vehicle_id).await?,
    ))
}

#[get("/notifications")]
pub async fn list_notifications(
    data: Data<AppState>,
    req: HttpRequest,
) -> Result<Json<NotificationsResponse>, AppError> {
    let token = read_token(&req)?;

    Ok(Json(tracking::list_notifications(token, data).await?))
}
