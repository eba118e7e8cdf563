use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::warn;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct PersonnummerDto {
    #[serde(default)]
    pub personnummer: String,
    #[serde(default)]
    pub fornamn: String,
    #[serde(default)]
    pub efternamn: String,
}

#[async_trait]
pub trait StudentItsClient: Send + Sync {
    /// Resolve a whole set of usernames in one logical batch. An individual
    /// miss never fails the batch; it simply has no entry in the result map.
    async fn lookup_batch(
        &self,
        anvandarnamn: &[String],
    ) -> Result<HashMap<String, String>, AppError>;
}

pub struct StudentItsHttpClient {
    client: Client,
    api_base: String,
}

impl StudentItsHttpClient {
    pub fn new(api_base: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            api_base: api_base.to_string(),
        })
    }

    fn lookup_url(&self, anvandarnamn: &str) -> Result<Url, AppError> {
        let mut url = super::endpoint(&self.api_base, &["its", "personnummer"])?;
        url.query_pairs_mut()
            .append_pair("anvandarnamn", anvandarnamn);
        Ok(url)
    }

    async fn lookup_one(client: Client, url: Url, anvandarnamn: String) -> Option<(String, String)> {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .ok()?;

        let dto: PersonnummerDto = super::read_json(response, "studentits lookup")
            .await
            .ok()
            .flatten()?;

        // The gateway answers an empty string when the username is unknown.
        if dto.personnummer.is_empty() {
            None
        } else {
            Some((anvandarnamn, dto.personnummer))
        }
    }
}

#[async_trait]
impl StudentItsClient for StudentItsHttpClient {
    async fn lookup_batch(
        &self,
        anvandarnamn: &[String],
    ) -> Result<HashMap<String, String>, AppError> {
        let mut set = JoinSet::new();

        for name in anvandarnamn {
            let client = self.client.clone();
            let url = self.lookup_url(name)?;
            let name = name.clone();
            set.spawn(Self::lookup_one(client, url, name));
        }

        let mut resolved = HashMap::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Some((name, personnummer))) => {
                    resolved.insert(name, personnummer);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("personnummer lookup task failed: {}", e);
                }
            }
        }

        Ok(resolved)
    }
}
