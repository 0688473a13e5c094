use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use db::models::mission::Mission;
use deployment::Deployment;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

/// Loads the mission named by the `mission_id` path segment and stashes it in
/// request extensions, so nested handlers can take `Extension<Mission>` instead
/// of repeating the lookup.
pub async fn load_mission_middleware(
    State(deployment): State<DeploymentImpl>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let mission_id = params
        .get("mission_id")
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| ApiError::BadRequest("Invalid mission id".to_string()))?;

    let mission = Mission::find_by_id(&deployment.db().pool, mission_id).await?;

    request.extensions_mut().insert(mission);
    Ok(next.run(request).await)
}
