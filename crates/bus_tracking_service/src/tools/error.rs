/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    error_message: String,
    pub error_code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("InternalError: {0}")]
    InternalError(String),
    #[error("InvalidRequest: {0}")]
    InvalidRequest(String),
    #[error("UnprocessibleRequest: {0}")]
    UnprocessibleRequest(String),
    #[error("SerializationError: {0}")]
    SerializationError(String),
    #[error("DeserializationError: {0}")]
    DeserializationError(String),
    #[error("ExternalAPICallError: {0}")]
    ExternalAPICallError(String),
    #[error("Operator authentication failed")]
    OperatorAppAuthFailed,
    #[error("Access denied for role")]
    AccessDenied,
    #[error("Operator has no assigned vehicle")]
    VehicleAssignmentNotFound,
    #[error("Rider not found on vehicle : {0}")]
    RiderNotFound(String),
    #[error("Vehicle last known location not found : {0}")]
    VehicleLocationNotFound(String),
    #[error("Invalid GPS data : {0}")]
    InvalidGPSData(String),
    #[error("Request timed out")]
    RequestTimeout,
    #[error("Failed to set key value in Redis")]
    SetFailed,
    #[error("Failed to get key value in Redis")]
    GetFailed,
    #[error("Failed to push entry to Redis list")]
    PushFailed,
    #[error("Failed to establish Redis connection")]
    RedisConnectionError,
}

impl AppError {
    fn error_message(&self) -> ErrorBody {
        ErrorBody {
            error_message: self.to_string(),
            error_code: self.code(),
        }
    }

    fn code(&self) -> String {
        match self {
            AppError::InternalError(_) => "INTERNAL_ERROR",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::UnprocessibleRequest(_) => "UNPROCESSIBLE_REQUEST",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
            AppError::DeserializationError(_) => "DESERIALIZATION_ERROR",
            AppError::ExternalAPICallError(_) => "EXTERNAL_API_CALL_ERROR",
            AppError::OperatorAppAuthFailed => "INVALID_TOKEN",
            AppError::AccessDenied => "ACCESS_DENIED",
            AppError::VehicleAssignmentNotFound => "VEHICLE_ASSIGNMENT_NOT_FOUND",
            AppError::RiderNotFound(_) => "RIDER_NOT_FOUND",
            AppError::VehicleLocationNotFound(_) => "VEHICLE_LOCATION_NOT_FOUND",
            AppError::InvalidGPSData(_) => "INVALID_GPS_DATA",
            AppError::RequestTimeout => "REQUEST_TIMEOUT",
            AppError::SetFailed => "REDIS_SET_FAILED",
            AppError::GetFailed => "REDIS_GET_FAILED",
            AppError::PushFailed => "REDIS_PUSH_FAILED",
            AppError::RedisConnectionError => "REDIS_CONNECTION_ERROR",
        }
        .to_string()
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(self.error_message())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessibleRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DeserializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalAPICallError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::OperatorAppAuthFailed => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::VehicleAssignmentNotFound => StatusCode::BAD_REQUEST,
            AppError::RiderNotFound(_) => StatusCode::NOT_FOUND,
            AppError::VehicleLocationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidGPSData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::SetFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GetFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::PushFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RedisConnectionError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
