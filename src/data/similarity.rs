use std::sync::Arc;

use reqwest::Client as HttpClient;
use tokio::sync::OnceCell;

use crate::error::{AppError, AppResult};

/// Precomputed pairwise similarity scores between all catalog movies
///
/// Square, read-only, row-major. Entry `(i, j)` scores the similarity of
/// catalog movies `i` and `j`. Symmetry is assumed upstream, not enforced
/// here.
#[derive(Debug)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from decoded rows, validating the shape is square
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(AppError::Internal(
                "Similarity matrix is empty".to_string(),
            ));
        }

        let mut scores = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(AppError::Internal(format!(
                    "Similarity matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            scores.extend(row);
        }

        Ok(Self { n, scores })
    }

    /// Number of movies the matrix covers (N of the N×N table)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Row `i`: similarity of movie `i` against every catalog movie
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i < self.n {
            Some(&self.scores[i * self.n..(i + 1) * self.n])
        } else {
            None
        }
    }
}

/// Fetches and memoizes the similarity matrix
///
/// One loader is constructed at startup, making the matrix a process-wide,
/// lazily-initialized, read-only singleton: repeated `load` calls perform
/// the network fetch at most once and hand out the same shared matrix. The
/// cell is never invalidated for the life of the process.
pub struct SimilarityLoader {
    http_client: HttpClient,
    url: String,
    matrix: OnceCell<Arc<SimilarityMatrix>>,
}

impl SimilarityLoader {
    pub fn new(url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            url,
            matrix: OnceCell::new(),
        }
    }

    /// Returns the matrix, fetching it on first call
    ///
    /// A failed fetch (network error or non-2xx) is fatal to the caller:
    /// the application is unusable without the matrix, so there is no retry
    /// and no degraded mode here. No timeout is applied; a hung similarity
    /// host hangs startup (accepted limitation).
    pub async fn load(&self) -> AppResult<Arc<SimilarityMatrix>> {
        self.matrix
            .get_or_try_init(|| async { self.fetch().await.map(Arc::new) })
            .await
            .cloned()
    }

    async fn fetch(&self) -> AppResult<SimilarityMatrix> {
        tracing::info!(url = %self.url, "Fetching similarity matrix");

        let response = self.http_client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Similarity host returned status {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await?;

        let rows: Vec<Vec<f32>> = bincode::deserialize(&bytes).map_err(|e| {
            AppError::ExternalApi(format!("Failed to decode similarity payload: {}", e))
        })?;

        let matrix = SimilarityMatrix::from_rows(rows)?;

        tracing::info!(size = matrix.len(), "Similarity matrix loaded");

        Ok(matrix)
    }
}
