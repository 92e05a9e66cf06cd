use actix_web::{
    get,
    web::{Data, Json},
};

use crate::{common::types::APISuccess, environment::AppState, tools::error::AppError};

#[get("/healthcheck")]
pub async fn health_check(data: Data<AppState>) -> Result<Json<APISuccess>, AppError> {
    data.store.health_check().await?;

    Ok(Json(APISuccess::default()))
}
