/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::geofence::{classify_proximity, ProximityZone};
use crate::common::types::*;
use crate::common::utils::{distance_between_in_meters, validate_coordinates};
use crate::domain::types::driver::*;
use crate::environment::AppState;
use crate::realtime::channel::vehicle_group;
use crate::storage::{AttendanceEvent, PositionSample, RiderAssignment};
use crate::tools::error::AppError;
use actix_web::web::Data;
use chrono::Utc;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

/// Handles one position report from a vehicle operator: authorize,
/// validate, persist, broadcast to the vehicle group, then evaluate every
/// assigned rider against its registration point.
pub async fn update_vehicle_location(
    token: Token,
    data: Data<AppState>,
    request_body: UpdateVehicleLocationRequest,
) -> Result<APISuccess, AppError> {
    let identity = data.verifier.verify(&token).await?;
    if identity.role != UserRole::Operator {
        return Err(AppError::AccessDenied);
    }

    let vehicle_id = data
        .store
        .operator_vehicle(&identity.user_id)
        .await?
        .ok_or(AppError::VehicleAssignmentNotFound)?;

    validate_coordinates(&request_body.pt.lat, &request_body.pt.lon)?;

    let sample = PositionSample {
        vehicle_id: vehicle_id.to_owned(),
        pt: request_body.pt.to_owned(),
        speed_kph: request_body.speed,
        heading: request_body.heading,
        accuracy_m: request_body.acc,
        created_at: request_body.ts.unwrap_or(TimeStamp(Utc::now())),
    };

    data.store.create_position_sample(&sample).await?;

    data.channels.broadcast(
        &vehicle_group(&vehicle_id),
        "position",
        serde_json::to_value(&sample)
            .map_err(|err| AppError::SerializationError(err.to_string()))?,
    );

    // The sample is durable and broadcast at this point. Rider evaluation
    // is enrichment, one rider failing must not take down the rest or the
    // request.
    match data.store.riders_for_vehicle(&vehicle_id).await {
        Ok(riders) => {
            for rider in riders {
                if let Err(err) = evaluate_rider_proximity(&data, &sample, &rider).await {
                    let RiderId(rider_id) = &rider.id;
                    error!(tag = "[Rider Proximity Dispatch Failed]", rider_id = %rider_id, error = %err);
                }
            }
        }
        Err(err) => {
            let VehicleId(vehicle_id) = &vehicle_id;
            error!(tag = "[Rider Roster Lookup Failed]", vehicle_id = %vehicle_id, error = %err);
        }
    }

    Ok(APISuccess::default())
}

async fn evaluate_rider_proximity(
    data: &Data<AppState>,
    sample: &PositionSample,
    rider: &RiderAssignment,
) -> Result<(), AppError> {
    let point = &rider.registration_point;
    let distance = distance_between_in_meters(&sample.pt, &point.pt);

    let RegistrationPointId(point_id) = &point.id;
    let metadata = json!({
        "vehicleId": sample.vehicle_id.to_owned(),
        "riderId": rider.id.to_owned(),
        "registrationPointId": point.id.to_owned(),
        "distanceM": distance.round() as i64,
    });

    match classify_proximity(distance) {
        Some(ProximityZone::Arrived) => {
            data.dispatcher
                .dispatch(
                    &rider.guardian_user_id,
                    NotificationKind::VehicleArrived,
                    "Bus arrived",
                    &format!("{}'s bus has arrived near {}.", rider.name, point.name),
                    metadata,
                    Some(&format!("arrived:{point_id}")),
                )
                .await?;
        }
        Some(ProximityZone::Approaching) => {
            data.dispatcher
                .dispatch(
                    &rider.guardian_user_id,
                    NotificationKind::VehicleApproaching,
                    "Bus is near pickup",
                    &format!(
                        "{}'s bus is about {}m from {}.",
                        rider.name,
                        distance.round() as i64,
                        point.name
                    ),
                    metadata,
                    Some(&format!("near:{point_id}")),
                )
                .await?;
        }
        None => {}
    }

    Ok(())
}

/// Records a boarding or drop-off reported by the operator and fans the
/// event out on the vehicle group. Boarding additionally notifies the
/// rider's guardian through the dispatcher.
pub async fn record_attendance(
    token: Token,
    data: Data<AppState>,
    request_body: RecordAttendanceRequest,
) -> Result<AttendanceResponse, AppError> {
    let identity = data.verifier.verify(&token).await?;
    if identity.role != UserRole::Operator {
        return Err(AppError::AccessDenied);
    }

    let vehicle_id = data
        .store
        .operator_vehicle(&identity.user_id)
        .await?
        .ok_or(AppError::VehicleAssignmentNotFound)?;

    let rider = data
        .store
        .rider(&request_body.rider_id)
        .await?
        .filter(|rider| rider.vehicle_id == vehicle_id)
        .ok_or_else(|| {
            let RiderId(rider_id) = &request_body.rider_id;
            AppError::RiderNotFound(rider_id.to_owned())
        })?;

    let event = AttendanceEvent {
        id: AttendanceId(Uuid::new_v4().to_string()),
        vehicle_id: vehicle_id.to_owned(),
        rider_id: rider.id.to_owned(),
        kind: request_body.kind,
        created_at: TimeStamp(Utc::now()),
    };

    data.store.create_attendance_event(&event).await?;

    if event.kind == AttendanceKind::Boarded {
        let RiderId(rider_id) = &rider.id;
        data.dispatcher
            .dispatch(
                &rider.guardian_user_id,
                NotificationKind::RiderBoarded,
                "Rider boarded",
                &format!("{} boarded the bus.", rider.name),
                json!({
                    "riderId": rider.id.to_owned(),
                    "vehicleId": vehicle_id.to_owned(),
                    "attendanceId": event.id.to_owned(),
                }),
                Some(&format!("boarded:{rider_id}")),
            )
            .await?;
    }

    data.channels.broadcast(
        &vehicle_group(&vehicle_id),
        "attendance",
        json!({
            "id": event.id.to_owned(),
            "vehicleId": event.vehicle_id.to_owned(),
            "riderId": event.rider_id.to_owned(),
            "kind": event.kind,
            "createdAt": event.created_at,
        }),
    );

    Ok(AttendanceResponse { event })
}
