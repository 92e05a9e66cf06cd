/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;
use crate::domain::types::stream::SubscriptionRequest;
use crate::environment::AppState;
use crate::realtime::channel::vehicle_group;
use crate::realtime::session::sse_stream_response;
use crate::tools::error::AppError;
use actix_web::{web::Data, HttpResponse};
use tracing::debug;

const MIN_VEHICLE_ID_LENGTH: usize = 3;

/// Admits a connection. Verification happens before the stream is opened,
/// a refused credential never reaches the application protocol.
pub async fn open_stream(token: Token, data: Data<AppState>) -> Result<HttpResponse, AppError> {
    let identity = data.verifier.verify(&token).await?;
    Ok(sse_stream_response(data.channels.to_owned(), &identity))
}

/// Joins the caller's connection to a vehicle group. Identifiers below the
/// minimum plausible length are dropped without an error or a group
/// change.
pub async fn subscribe_vehicle(
    token: Token,
    data: Data<AppState>,
    request_body: SubscriptionRequest,
) -> Result<APISuccess, AppError> {
    let _identity = data.verifier.verify(&token).await?;

    if request_body.vehicle_id.len() < MIN_VEHICLE_ID_LENGTH {
        debug!(tag = "[Ignored Subscription]", vehicle_id = %request_body.vehicle_id);
        return Ok(APISuccess::default());
    }

    data.channels.join(
        &ConnectionId(request_body.connection_id),
        &vehicle_group(&VehicleId(request_body.vehicle_id)),
    );

    Ok(APISuccess::default())
}

pub async fn unsubscribe_vehicle(
    token: Token,
    data: Data<AppState>,
    request_body: SubscriptionRequest,
) -> Result<APISuccess, AppError> {
    let _identity = data.verifier.verify(&token).await?;

    if request_body.vehicle_id.len() < MIN_VEHICLE_ID_LENGTH {
        debug!(tag = "[Ignored Subscription]", vehicle_id = %request_body.vehicle_id);
        return Ok(APISuccess::default());
    }

    data.channels.leave(
        &ConnectionId(request_body.connection_id),
        &vehicle_group(&VehicleId(request_body.vehicle_id)),
    );

    Ok(APISuccess::default())
}
