use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentError};
use services::services::{
    breed::BreedCatalogService,
    config::{Config, load_config_from_file, save_config_to_file},
};
use tokio::sync::RwLock;
use utils::assets::config_path;

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<RwLock<Config>>,
    db: DBService,
    breeds: BreedCatalogService,
}

impl LocalDeployment {
    /// Assembles a deployment from already-built services. Used by embedders
    /// and integration tests that bring their own database pool or point the
    /// breed client at a stand-in catalog.
    pub fn from_parts(
        config: Arc<RwLock<Config>>,
        db: DBService,
        breeds: BreedCatalogService,
    ) -> Self {
        Self { config, db, breeds }
    }
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new() -> Result<Self, DeploymentError> {
        let raw_config = load_config_from_file(&config_path()).await;

        // Save back right away so a fresh install gets a config file and a
        // migrated one is rewritten in the current shape.
        save_config_to_file(&raw_config, &config_path()).await?;

        let breeds = BreedCatalogService::new(&raw_config.cat_api_url)?;
        let db = DBService::new().await?;
        tracing::debug!("Database ready at {}", utils::assets::db_path().display());

        Ok(Self {
            config: Arc::new(RwLock::new(raw_config)),
            db,
            breeds,
        })
    }

    fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn breeds(&self) -> &BreedCatalogService {
        &self.breeds
    }
}
