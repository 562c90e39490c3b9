use std::path::Path;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// On-disk catalog shape: a column-oriented export with parallel arrays.
///
/// Index `i` of both columns describes the same movie, and that index is the
/// row/column index of the same movie in the similarity matrix.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    title: Vec<String>,
    movie_id: Vec<u64>,
}

/// The in-memory movie catalog
///
/// Loaded once at startup and immutable afterwards. Entries are
/// index-addressable; catalog index `i` corresponds to similarity-matrix
/// row/column `i`.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Reads and decodes the catalog file
    ///
    /// A missing or malformed file is fatal: the application cannot
    /// recommend anything without its catalog.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|e| {
            AppError::Catalog(format!(
                "Failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: CatalogFile = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Catalog(format!(
                "Malformed catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::from_columns(file.title, file.movie_id)?;

        tracing::info!(movies = catalog.len(), path = %path.display(), "Catalog loaded");

        Ok(catalog)
    }

    /// Zips the parallel columns into movies, validating they agree in length
    fn from_columns(titles: Vec<String>, ids: Vec<u64>) -> AppResult<Self> {
        if titles.len() != ids.len() {
            return Err(AppError::Catalog(format!(
                "Catalog columns disagree: {} titles vs {} movie ids",
                titles.len(),
                ids.len()
            )));
        }

        let movies = titles
            .into_iter()
            .zip(ids)
            .map(|(title, tmdb_id)| Movie { title, tmdb_id })
            .collect();

        Ok(Self { movies })
    }

    /// Builds a catalog directly from movies (used by tests and tools)
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Resolves a title to its catalog index
    ///
    /// Titles are not unique; the first match in catalog order wins.
    pub fn index_of_title(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }
}
