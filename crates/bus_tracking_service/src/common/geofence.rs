/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

/// Vehicle is considered arrived at a registration point within this radius.
pub const ARRIVED_RADIUS_METERS: f64 = 200.0;
/// Vehicle is considered approaching a registration point within this radius.
pub const APPROACHING_RADIUS_METERS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProximityZone {
    Arrived,
    Approaching,
}

/// Classifies a vehicle-to-registration-point distance. Both radii are
/// inclusive and mutually exclusive, arrived takes precedence.
pub fn classify_proximity(distance_meters: f64) -> Option<ProximityZone> {
    if distance_meters <= ARRIVED_RADIUS_METERS {
        Some(ProximityZone::Arrived)
    } else if distance_meters <= APPROACHING_RADIUS_METERS {
        Some(ProximityZone::Approaching)
    } else {
        None
    }
}
