/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    post,
    web::{Data, Json},
    HttpRequest,
};

use crate::{
    domain::{action::driver, api::read_token, types::driver::*},
    environment::AppState,
    tools::error::AppError,
};

use crate::common::types::APISuccess;

#[post("/driver/location")]
pub async fn update_vehicle_location(
    data: Data<AppState>,
    param_obj: Json<UpdateVehicleLocationRequest>,
    req: HttpRequest,
) -> Result<Json<APISuccess>, AppError> {
    let request_body = param_obj.into_inner();
    let token = read_token(&req)?;

    Ok(Json(
        driver::update_vehicle_location(token, data, request_body).await?,
    ))
}

#[post("/driver/attendance")]
pub async fn record_attendance(
    data: Data<AppState>,
    param_obj: Json<RecordAttendanceRequest>,
    req: HttpRequest,
) -> Result<Json<AttendanceResponse>, AppError> {
    let request_body = param_obj.into_inner();
    let token = read_token(&req)?;

    Ok(Json(
        driver::record_attendance(token, data, request_body).await?,
    ))
}
