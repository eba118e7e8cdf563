use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{RegistrationPayload, RegistrationResult};

/// One already-recorded result in Ladok's roster for a course module.
///
/// `sent` is kept as a raw JSON value: Ladok versions have answered booleans,
/// strings and nothing at all here, and only the literal boolean `true`
/// counts as sent. The merge decides, not the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LadokResultEntry {
    pub personnummer: String,
    #[serde(default)]
    pub betyg: Option<String>,
    #[serde(default)]
    pub datum: Option<String>,
    #[serde(default)]
    pub sent: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ladok_status: Option<String>,
    #[serde(default)]
    pub registered_at: Option<String>,
}

impl LadokResultEntry {
    /// Strictly boolean true; `"true"` the string, numbers and absence all
    /// mean not sent.
    pub fn is_sent(&self) -> bool {
        matches!(self.sent, Some(serde_json::Value::Bool(true)))
    }

    /// Prefer the Ladok-specific status field over the generic one.
    pub fn effective_status(&self) -> Option<String> {
        self.ladok_status.clone().or_else(|| self.status.clone())
    }
}

#[async_trait]
pub trait LadokClient: Send + Sync {
    async fn get_results(
        &self,
        kurskod: &str,
        modulkod: &str,
    ) -> Result<Vec<LadokResultEntry>, AppError>;

    async fn submit_result(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationResult, AppError>;
}

pub struct LadokHttpClient {
    client: Client,
    api_base: String,
}

impl LadokHttpClient {
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
impl LadokClient for LadokHttpClient {
    async fn get_results(
        &self,
        kurskod: &str,
        modulkod: &str,
    ) -> Result<Vec<LadokResultEntry>, AppError> {
        let url = super::endpoint(
            &self.api_base,
            &["ladok", "courses", kurskod, "modules", modulkod, "results"],
        )?;
        let results = super::get_json(&self.client, url, "ladok results").await?;
        Ok(results.unwrap_or_default())
    }

    async fn submit_result(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegistrationResult, AppError> {
        let url = super::endpoint(&self.api_base, &["ladok", "results"])?;
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let result = super::read_json(response, "ladok submit").await?;
        result.ok_or_else(|| AppError::Upstream("ladok submit: empty response".to_string()))
    }
}
