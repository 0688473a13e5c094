use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

pub const CAT_API_URL: &str = "https://api.thecatapi.com/v1/breeds";

#[derive(Debug, Error)]
pub enum BreedError {
    #[error("Unable to validate breed with TheCatAPI: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for BreedError {
    fn from(err: reqwest::Error) -> Self {
        BreedError::Unavailable(err.to_string())
    }
}

/// One catalog entry; only the name takes part in validation.
#[derive(Debug, Clone, Deserialize)]
pub struct BreedRecord {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct BreedCatalogService {
    client: Client,
    catalog_url: String,
}

impl BreedCatalogService {
    pub fn new(catalog_url: &str) -> Result<Self, BreedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BreedError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            catalog_url: catalog_url.to_string(),
        })
    }

    /// Answers whether `breed` appears in the catalog, comparing names
    /// case-insensitively. Transport, status and decode problems are all
    /// `Unavailable`; a breed the catalog simply doesn't list is `Ok(false)`.
    pub async fn is_valid_breed(&self, breed: &str) -> Result<bool, BreedError> {
        let breeds = self.fetch_catalog().await?;
        let wanted = breed.to_lowercase();
        Ok(breeds.iter().any(|b| b.name.to_lowercase() == wanted))
    }

    async fn fetch_catalog(&self) -> Result<Vec<BreedRecord>, BreedError> {
        let breeds = self
            .client
            .get(&self.catalog_url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<BreedRecord>>()
            .await?;

        Ok(breeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn catalog_with(breeds: serde_json::Value) -> (MockServer, BreedCatalogService) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breeds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(breeds))
            .mount(&server)
            .await;

        let service = BreedCatalogService::new(&format!("{}/breeds", server.uri()))
            .expect("client build failed");
        (server, service)
    }

    #[tokio::test]
    async fn matches_breed_names_case_insensitively() {
        let (_server, service) = catalog_with(json!([
            {"id": "abys", "name": "Abyssinian", "origin": "Egypt"},
            {"id": "bomb", "name": "Bombay", "origin": "United States"}
        ]))
        .await;

        assert!(service.is_valid_breed("Bombay").await.unwrap());
        assert!(service.is_valid_breed("bOmBaY").await.unwrap());
        assert!(!service.is_valid_breed("Chupacabra").await.unwrap());
    }

    #[tokio::test]
    async fn catalog_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breeds"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = BreedCatalogService::new(&format!("{}/breeds", server.uri()))
            .expect("client build failed");

        let result = service.is_valid_breed("Bombay").await;
        assert!(matches!(result, Err(BreedError::Unavailable(_))));
    }

    #[tokio::test]
    async fn malformed_catalog_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/breeds"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a breed list"))
            .mount(&server)
            .await;

        let service = BreedCatalogService::new(&format!("{}/breeds", server.uri()))
            .expect("client build failed");

        let result = service.is_valid_breed("Bombay").await;
        assert!(matches!(result, Err(BreedError::Unavailable(_))));
    }
}
