use crate::common::types::*;
use crate::storage::AttendanceEvent;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleLocationRequest {
    pub pt: Point,
    pub speed: Option<SpeedKph>,
    pub heading: Option<Direction>,
    pub acc: Option<Accuracy>,
    pub ts: Option<TimeStamp>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendanceRequest {
    pub rider_id: RiderId,
    pub kind: AttendanceKind,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub event: AttendanceEvent,
}
