use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use services::services::{
    breed::{BreedCatalogService, BreedError},
    config::{Config, ConfigError},
};
use sqlx::Error as SqlxError;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlx(#[from] SqlxError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Breed(#[from] BreedError),
}

/// The wiring seam between the HTTP layer and everything stateful. Handlers
/// only see this trait, so alternative deployments (embedded, test) can swap
/// in their own construction without touching the routes.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new() -> Result<Self, DeploymentError>;

    fn config(&self) -> &Arc<RwLock<Config>>;

    fn db(&self) -> &DBService;

    fn breeds(&self) -> &BreedCatalogService;
}
