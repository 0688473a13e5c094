use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::spy_cat::{CreateSpyCat, SpyCat, SpyCatError, UpdateSpyCat};
use deployment::Deployment;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

pub async fn get_cats(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<SpyCat>>>, ApiError> {
    let cats = SpyCat::find_all(&deployment.db().pool).await?;

    Ok(ResponseJson(ApiResponse::success(cats)))
}

pub async fn get_cat(
    State(deployment): State<DeploymentImpl>,
    Path(cat_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<SpyCat>>, ApiError> {
    let cat = SpyCat::find_by_id(&deployment.db().pool, cat_id).await?;

    Ok(ResponseJson(ApiResponse::success(cat)))
}

pub async fn create_cat(
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<CreateSpyCat>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<SpyCat>>), ApiError> {
    tracing::debug!("Recruiting spy cat '{}' ({})", payload.name, payload.breed);

    if !deployment.breeds().is_valid_breed(&payload.breed).await? {
        return Err(SpyCatError::InvalidBreed(payload.breed).into());
    }

    let cat = SpyCat::create(&deployment.db().pool, &payload).await?;

    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(cat))))
}

pub async fn update_cat(
    State(deployment): State<DeploymentImpl>,
    Path(cat_id): Path<Uuid>,
    Json(payload): Json<UpdateSpyCat>,
) -> Result<ResponseJson<ApiResponse<SpyCat>>, ApiError> {
    let cat = SpyCat::update_salary(&deployment.db().pool, cat_id, payload.salary).await?;

    Ok(ResponseJson(ApiResponse::success(cat)))
}

pub async fn delete_cat(
    State(deployment): State<DeploymentImpl>,
    Path(cat_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    SpyCat::delete(&deployment.db().pool, cat_id).await?;

    tracing::debug!("Removed spy cat {}", cat_id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<DeploymentImpl> {
    let inner = Router::new()
        .route("/", get(get_cats).post(create_cat))
        .route(
            "/{cat_id}",
            get(get_cat).patch(update_cat).delete(delete_cat),
        );

    Router::new().nest("/cats", inner)
}
