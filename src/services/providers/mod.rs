pub mod tmdb;

/// Fixed fallback image used when poster resolution fails or a result slot
/// must be padded
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Trait for poster metadata providers
///
/// The metadata source is third-party, rate-limited, and flaky; the provider
/// contract absorbs every failure mode behind a URL that is always usable.
/// The trait seam also keeps the recommendation engine mockable in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Resolve the poster image URL for a TMDB movie id
    ///
    /// Never errors past this boundary: failed or empty metadata lookups
    /// resolve to the placeholder URL after the bounded retries are spent.
    async fn resolve_poster(&self, tmdb_id: u64) -> String;
}
