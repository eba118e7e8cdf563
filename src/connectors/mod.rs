pub mod canvas;
pub mod epok;
pub mod ladok;
pub mod studentits;

pub use canvas::{CanvasClient, CanvasHttpClient};
pub use epok::{EpokClient, EpokHttpClient};
pub use ladok::{LadokClient, LadokHttpClient};
pub use studentits::{StudentItsClient, StudentItsHttpClient};

use reqwest::{Response, StatusCode, Url, header};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Build an endpoint URL from percent-encoded path segments. Course codes
/// and usernames come from operator input; a reserved character must not
/// rewrite the request path.
pub(crate) fn endpoint(api_base: &str, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = Url::parse(api_base)
        .map_err(|e| AppError::BadRequest(format!("invalid API base {}: {}", api_base, e)))?;
    url.path_segments_mut()
        .map_err(|_| AppError::BadRequest(format!("invalid API base {}", api_base)))?
        .extend(segments);
    Ok(url)
}

/// Decode a JSON response body, mapping non-2xx answers to an error that
/// carries the HTTP status and any textual body. 204 yields None.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<Option<T>, AppError> {
    let status = response.status();

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(AppError::Upstream(format!("{} {}: {}", what, status, body)));
    }

    serde_json::from_str::<T>(&body)
        .map(Some)
        .map_err(|e| {
            tracing::error!("failed to parse {} response: {}", what, e);
            AppError::Upstream(format!("failed to parse {} response: {}", what, e))
        })
}

/// GET with JSON accept and no-cache semantics, shared by the read paths
/// of all four connectors.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
    what: &str,
) -> Result<Option<T>, AppError> {
    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .header(header::CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    read_json(response, what).await
}
