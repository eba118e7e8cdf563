use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::AppError;

/// One enrolled student as Canvas reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRosterItem {
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait CanvasClient: Send + Sync {
    async fn list_roster(&self, kurskod: &str) -> Result<Vec<CanvasRosterItem>, AppError>;
}

pub struct CanvasHttpClient {
    client: Client,
    api_base: String,
}

impl CanvasHttpClient {
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
impl CanvasClient for CanvasHttpClient {
    async fn list_roster(&self, kurskod: &str) -> Result<Vec<CanvasRosterItem>, AppError> {
        let url = super::endpoint(&self.api_base, &["canvas", "courses", kurskod, "roster"])?;
        let roster = super::get_json(&self.client, url, "canvas roster").await?;
        Ok(roster.unwrap_or_default())
    }
}
