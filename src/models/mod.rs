use serde::{Deserialize, Serialize};

/// A single catalog entry: a recommendable movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    /// Display title. Not guaranteed unique across the catalog.
    pub title: String,
    /// TMDB identifier used to query the metadata API
    pub tmdb_id: u64,
}

/// One recommended movie returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub poster_url: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB movie details response we care about
///
/// The full response carries dozens of fields; only `poster_path` feeds the
/// poster URL composition, and it is optional even on a 200 response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
}
