use axum::{Router, routing::get};

use crate::DeploymentImpl;

pub mod cats;
pub mod health;
pub mod missions;

pub fn router(deployment: DeploymentImpl) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(cats::router())
        .merge(missions::router(&deployment))
        .with_state(deployment)
}
