/// TMDB poster provider
///
/// Resolves poster art through the TMDB movie details endpoint:
/// `/movie/{id}?api_key={KEY}&language=en-US`, composing the final image URL
/// from the w500 image host and the response's `poster_path`.
///
/// A transport error, timeout, non-2xx status, or missing poster path all
/// count as a failed attempt. After the attempts are spent the fixed
/// placeholder is returned, so a dead credential or a rate-limited API never
/// breaks the recommendation flow.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::TmdbMovieDetails,
    services::providers::{PosterProvider, PLACEHOLDER_POSTER_URL},
};

/// Per-attempt timeout on the metadata call
const POSTER_TIMEOUT: Duration = Duration::from_secs(5);

/// Total attempts per movie, first try included
const MAX_ATTEMPTS: u32 = 3;

/// Pause between attempts
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct TmdbPosterProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
}

impl TmdbPosterProvider {
    pub fn new(config: &Config) -> Self {
        Self::with_endpoints(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
        )
    }

    /// Builds a provider against explicit endpoints (tests point this at a
    /// local stub server)
    pub fn with_endpoints(api_key: String, api_url: String, image_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            image_url,
        }
    }

    async fn fetch_details(&self, tmdb_id: u64) -> AppResult<TmdbMovieDetails> {
        let url = format!("{}/movie/{}", self.api_url, tmdb_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .timeout(POSTER_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbPosterProvider {
    async fn resolve_poster(&self, tmdb_id: u64) -> String {
        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(RETRY_DELAY).await;
            }

            match self.fetch_details(tmdb_id).await {
                Ok(TmdbMovieDetails {
                    poster_path: Some(path),
                }) => {
                    return format!("{}{}", self.image_url, path);
                }
                Ok(TmdbMovieDetails { poster_path: None }) => {
                    tracing::warn!(tmdb_id, attempt, "TMDB response carried no poster path");
                }
                Err(e) => {
                    tracing::warn!(tmdb_id, attempt, error = %e, "Poster fetch attempt failed");
                }
            }
        }

        tracing::warn!(
            tmdb_id,
            attempts = MAX_ATTEMPTS,
            "Poster unresolved, substituting placeholder"
        );

        PLACEHOLDER_POSTER_URL.to_string()
    }
}
