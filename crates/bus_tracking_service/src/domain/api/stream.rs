/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use actix_web::{
    get, post,
    web::{Data, Json},
    HttpRequest, HttpResponse,
};

use crate::{
    common::types::APISuccess,
    domain::{action::stream, api::read_token, types::stream::SubscriptionRequest},
    environment::AppState,
    tools::error::AppError,
};

#[get("/stream")]
pub async fn open_stream(data: Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let token = read_token(&req)?;

    stream::open_stream(token, data).await
}

#[post("/stream/subscribe")]
pub async fn subscribe_vehicle(
    data: Data<AppState>,
    param_obj: Json<SubscriptionRequest>,
    req: HttpRequest,
) -> Result<Json<APISuccess>, AppError> {
    let request_body = param_obj.into_inner();
    let token = read_token(&req)?;

    Ok(Json(
        stream::subscribe_vehicle(token, data, request_body).await?,
    ))
}

#[post("/stream/unsubscribe")]
pub async fn unsubscribe_vehicle(
    data: Data<AppState>,
    param_obj: Json<SubscriptionRequest>,
    req: HttpRequest,
) -> Result<Json<APISuccess>, AppError> {
    let request_body = param_obj.into_inner();
    let token = read_token(&req)?;

    Ok(Json(
        stream::unsubscribe_vehicle(token, data, request_body).await?,
    ))
}
