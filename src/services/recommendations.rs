use std::sync::Arc;
use std::time::Duration;

use crate::{
    data::{Catalog, SimilarityMatrix},
    error::{AppError, AppResult},
    models::Recommendation,
    services::providers::{PosterProvider, PLACEHOLDER_POSTER_URL},
};

/// A recommendation result always carries exactly this many entries
pub const RECOMMENDATION_COUNT: usize = 5;

/// Pause between successive poster metadata calls. Sequential resolution
/// with fixed pacing bounds the external call rate.
const POSTER_PACING: Duration = Duration::from_millis(200);

/// Sentinel title used when the catalog is too small to fill every slot
const FALLBACK_TITLE: &str = "No Movie";

/// Ranks similar movies for a selection and enriches them with poster art
///
/// Catalog and matrix are read-only after startup, so the engine is freely
/// shareable across concurrent requests without locking.
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityMatrix>,
    posters: Arc<dyn PosterProvider>,
}

impl RecommendationEngine {
    /// Validates that catalog indices and matrix rows describe the same set
    /// of movies before serving anything
    pub fn new(
        catalog: Arc<Catalog>,
        similarity: Arc<SimilarityMatrix>,
        posters: Arc<dyn PosterProvider>,
    ) -> AppResult<Self> {
        if catalog.len() != similarity.len() {
            return Err(AppError::Internal(format!(
                "Catalog and similarity matrix disagree: {} movies vs {}x{} matrix",
                catalog.len(),
                similarity.len(),
                similarity.len()
            )));
        }

        Ok(Self {
            catalog,
            similarity,
            posters,
        })
    }

    /// Ranks row `index` descending and returns the catalog indices at ranks
    /// 2 through 6
    ///
    /// The selection itself is not excluded explicitly: self-similarity is
    /// assumed to rank first, so skipping the single top-ranked entry skips
    /// it. Ties resolve in ascending index order (the sort is stable).
    fn ranked_neighbors(&self, index: usize) -> AppResult<Vec<usize>> {
        let row = self
            .similarity
            .row(index)
            .ok_or_else(|| AppError::InvalidInput(format!("Movie index {} out of range", index)))?;

        let mut ranked: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(ranked
            .iter()
            .skip(1)
            .take(RECOMMENDATION_COUNT)
            .map(|&(i, _)| i)
            .collect())
    }

    /// Recommends for a catalog index, the contract the page uses
    ///
    /// Always returns exactly [`RECOMMENDATION_COUNT`] entries; short
    /// catalogs are padded with the sentinel title and placeholder poster.
    pub async fn recommend(&self, index: usize) -> AppResult<Vec<Recommendation>> {
        let picks = self.ranked_neighbors(index)?;

        let mut recommendations = Vec::with_capacity(RECOMMENDATION_COUNT);
        for (position, &neighbor) in picks.iter().enumerate() {
            if position > 0 {
                tokio::time::sleep(POSTER_PACING).await;
            }

            let movie = self
                .catalog
                .get(neighbor)
                .ok_or_else(|| AppError::Internal(format!("Catalog missing index {}", neighbor)))?;

            let poster_url = self.posters.resolve_poster(movie.tmdb_id).await;

            recommendations.push(Recommendation {
                title: movie.title.clone(),
                poster_url,
            });
        }

        let resolved = recommendations.len();
        while recommendations.len() < RECOMMENDATION_COUNT {
            recommendations.push(Recommendation {
                title: FALLBACK_TITLE.to_string(),
                poster_url: PLACEHOLDER_POSTER_URL.to_string(),
            });
        }

        tracing::info!(index, resolved, "Recommendations assembled");

        Ok(recommendations)
    }

    /// Title-based compatibility path
    ///
    /// Titles are not unique; the first catalog match wins. An unknown title
    /// is a caller-contract violation reported as a defined failure.
    pub async fn recommend_by_title(&self, title: &str) -> AppResult<Vec<Recommendation>> {
        let index = self
            .catalog
            .index_of_title(title)
            .ok_or_else(|| AppError::NotFound(format!("No catalog movie titled '{}'", title)))?;

        self.recommend(index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use crate::services::providers::MockPosterProvider;

    fn movie(title: &str, tmdb_id: u64) -> Movie {
        Movie {
            title: title.to_string(),
            tmdb_id,
        }
    }

    fn poster_mock() -> Arc<MockPosterProvider> {
        let mut posters = MockPosterProvider::new();
        posters
            .expect_resolve_poster()
            .returning(|id| format!("https://posters.test/{}.jpg", id));
        Arc::new(posters)
    }

    fn engine(movies: Vec<Movie>, rows: Vec<Vec<f32>>) -> RecommendationEngine {
        RecommendationEngine::new(
            Arc::new(Catalog::from_movies(movies)),
            Arc::new(SimilarityMatrix::from_rows(rows).unwrap()),
            poster_mock(),
        )
        .unwrap()
    }

    /// 8-movie catalog with a hand-ranked first row
    fn large_engine() -> RecommendationEngine {
        let movies = (0..8u64)
            .map(|i| movie(&format!("Movie {}", i), 100 + i))
            .collect();
        let mut rows = vec![vec![0.0_f32; 8]; 8];
        // Row 0 ranks: self, then 3, 1, 5, 7, 2, 6, 4
        rows[0] = vec![1.0, 0.8, 0.3, 0.9, 0.1, 0.7, 0.2, 0.5];
        engine(movies, rows)
    }

    #[tokio::test]
    async fn test_exactly_five_results() {
        let engine = large_engine();
        let recommendations = engine.recommend(0).await.unwrap();

        assert_eq!(recommendations.len(), RECOMMENDATION_COUNT);
        let titles: Vec<&str> = recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Movie 3", "Movie 1", "Movie 5", "Movie 7", "Movie 2"]
        );
        assert_eq!(
            recommendations[0].poster_url,
            "https://posters.test/103.jpg"
        );
    }

    #[tokio::test]
    async fn test_scores_non_increasing_and_below_skipped_top() {
        let engine = large_engine();
        let row = vec![1.0_f32, 0.8, 0.3, 0.9, 0.1, 0.7, 0.2, 0.5];

        let picks = engine.ranked_neighbors(0).unwrap();
        let top_score = row.iter().cloned().fold(f32::MIN, f32::max);

        let mut previous = top_score;
        for &i in &picks {
            assert!(row[i] <= previous);
            assert!(row[i] <= top_score);
            previous = row[i];
        }
    }

    #[tokio::test]
    async fn test_small_catalog_pads_with_sentinel() {
        let engine = engine(
            vec![movie("A", 1), movie("B", 2), movie("C", 3)],
            vec![
                vec![0.99, 0.5, 0.3],
                vec![0.5, 0.99, 0.2],
                vec![0.3, 0.2, 0.99],
            ],
        );

        let recommendations = engine.recommend_by_title("A").await.unwrap();
        let titles: Vec<&str> = recommendations.iter().map(|r| r.title.as_str()).collect();

        // Index 0 is skipped as the top rank; the two real neighbors come
        // first, the remaining slots are padded.
        assert_eq!(titles, vec!["B", "C", "No Movie", "No Movie", "No Movie"]);
        assert_eq!(recommendations[2].poster_url, PLACEHOLDER_POSTER_URL);
        assert_eq!(recommendations[4].poster_url, PLACEHOLDER_POSTER_URL);
    }

    #[tokio::test]
    async fn test_ties_resolve_in_ascending_index_order() {
        let engine = engine(
            vec![
                movie("A", 1),
                movie("B", 2),
                movie("C", 3),
                movie("D", 4),
            ],
            vec![
                vec![1.0, 0.5, 0.5, 0.5],
                vec![0.5, 1.0, 0.5, 0.5],
                vec![0.5, 0.5, 1.0, 0.5],
                vec![0.5, 0.5, 0.5, 1.0],
            ],
        );

        let picks = engine.ranked_neighbors(0).unwrap();
        assert_eq!(picks, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unknown_title_is_reported() {
        let engine = large_engine();
        let result = engine.recommend_by_title("Not In Catalog").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_index_rejected() {
        let engine = large_engine();
        let result = engine.recommend(42).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = RecommendationEngine::new(
            Arc::new(Catalog::from_movies(vec![movie("A", 1), movie("B", 2)])),
            Arc::new(
                SimilarityMatrix::from_rows(vec![
                    vec![1.0, 0.5, 0.2],
                    vec![0.5, 1.0, 0.7],
                    vec![0.2, 0.7, 1.0],
                ])
                .unwrap(),
            ),
            poster_mock(),
        );

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
