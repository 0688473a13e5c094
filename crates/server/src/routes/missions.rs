use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, patch},
};
use db::models::{
    mission::{CreateMission, Mission, MissionWithTargets, UpdateMission},
    target::{Target, UpdateTarget},
};
use db::services::AssignmentService;
use deployment::Deployment;
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError, middleware::load_mission_middleware};

#[derive(Debug, Deserialize)]
pub struct AssignCatRequest {
    pub cat_id: Uuid,
}

pub async fn get_missions(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<MissionWithTargets>>>, ApiError> {
    let missions = Mission::find_all_with_targets(&deployment.db().pool).await?;

    Ok(ResponseJson(ApiResponse::success(missions)))
}

pub async fn get_mission(
    Extension(mission): Extension<Mission>,
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<MissionWithTargets>>, ApiError> {
    let targets = Target::find_by_mission(&deployment.db().pool, mission.id).await?;

    Ok(ResponseJson(ApiResponse::success(MissionWithTargets {
        mission,
        targets,
    })))
}

pub async fn create_mission(
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<CreateMission>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<MissionWithTargets>>), ApiError> {
    tracing::debug!("Filing mission with {} targets", payload.targets.len());

    let mission = Mission::create(&deployment.db().pool, &payload).await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(mission)),
    ))
}

pub async fn update_mission(
    Extension(mission): Extension<Mission>,
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<UpdateMission>,
) -> Result<ResponseJson<ApiResponse<MissionWithTargets>>, ApiError> {
    let mission = match payload.complete {
        Some(complete) => {
            AssignmentService::set_complete(&deployment.db().pool, mission.id, complete).await?
        }
        None => mission,
    };
    let targets = Target::find_by_mission(&deployment.db().pool, mission.id).await?;

    Ok(ResponseJson(ApiResponse::success(MissionWithTargets {
        mission,
        targets,
    })))
}

pub async fn delete_mission(
    Extension(mission): Extension<Mission>,
    State(deployment): State<DeploymentImpl>,
) -> Result<StatusCode, ApiError> {
    Mission::delete(&deployment.db().pool, mission.id).await?;

    tracing::debug!("Deleted mission {}", mission.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_cat(
    Extension(mission): Extension<Mission>,
    State(deployment): State<DeploymentImpl>,
    Json(payload): Json<AssignCatRequest>,
) -> Result<ResponseJson<ApiResponse<MissionWithTargets>>, ApiError> {
    tracing::debug!("Assigning cat {} to mission {}", payload.cat_id, mission.id);

    let mission =
        AssignmentService::assign_cat(&deployment.db().pool, mission.id, payload.cat_id).await?;
    let targets = Target::find_by_mission(&deployment.db().pool, mission.id).await?;

    Ok(ResponseJson(ApiResponse::success(MissionWithTargets {
        mission,
        targets,
    })))
}

pub async fn update_target(
    Extension(mission): Extension<Mission>,
    State(deployment): State<DeploymentImpl>,
    Path((_mission_id, target_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTarget>,
) -> Result<ResponseJson<ApiResponse<Target>>, ApiError> {
    let target =
        Target::update_scoped(&deployment.db().pool, mission.id, target_id, &payload).await?;

    Ok(ResponseJson(ApiResponse::success(target)))
}

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    let mission_id_router = Router::new()
        .route(
            "/",
            get(get_mission).patch(update_mission).delete(delete_mission),
        )
        .route("/assign", patch(assign_cat))
        .route("/targets/{target_id}", patch(update_target))
        .layer(from_fn_with_state(
            deployment.clone(),
            load_mission_middleware,
        ));

    let inner = Router::new()
        .route("/", get(get_missions).post(create_mission))
        .nest("/{mission_id}", mission_id_router);

    Router::new().nest("/missions", inner)
}
