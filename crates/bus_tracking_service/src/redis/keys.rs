/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use crate::common::types::*;

pub fn operator_vehicle_key(UserId(user_id): &UserId) -> String {
    format!("bts:operator:vehicle:{user_id}")
}

pub fn vehicle_riders_key(VehicleId(vehicle_id): &VehicleId) -> String {
    format!("bts:vehicle:riders:{vehicle_id}")
}

pub fn rider_key(RiderId(rider_id): &RiderId) -> String {
    format!("bts:rider:{rider_id}")
}

pub fn vehicle_location_key(VehicleId(vehicle_id): &VehicleId) -> String {
    format!("bts:vehicle:loc:{vehicle_id}")
}

pub fn vehicle_location_history_key(VehicleId(vehicle_id): &VehicleId) -> String {
    format!("bts:vehicle:loc:history:{vehicle_id}")
}

pub fn user_notifications_key(UserId(user_id): &UserId) -> String {
    format!("bts:user:notifications:{user_id}")
}

pub fn vehicle_attendance_key(VehicleId(vehicle_id): &VehicleId) -> String {
    format!("bts:vehicle:attendance:{vehicle_id}")
}

pub fn auth_token_key(Token(token): &Token) -> String {
    format!("bts:auth:token:{token}")
}

pub fn health_check_key() -> String {
    "bts:health_check".to_string()
}
