use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;
use crate::models::Module;

#[async_trait]
pub trait EpokClient: Send + Sync {
    async fn list_modules(&self, kurskod: &str, only_active: bool)
        -> Result<Vec<Module>, AppError>;
}

pub struct EpokHttpClient {
    client: Client,
    api_base: String,
}

impl EpokHttpClient {
    pub fn new(api_base: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            api_base: api_base.to_string(),
        })
    }
}

#[async_trait]
impl EpokClient for EpokHttpClient {
    async fn list_modules(
        &self,
        kurskod: &str,
        only_active: bool,
    ) -> Result<Vec<Module>, AppError> {
        let mut url = super::endpoint(&self.api_base, &["epok", "courses", kurskod, "modules"])?;
        url.query_pairs_mut()
            .append_pair("onlyActive", &only_active.to_string());
        let modules = super::get_json(&self.client, url, "epok modules").await?;
        Ok(modules.unwrap_or_default())
    }
}
