//! Steamscope core
//!
//! Platform-agnostic analytics over a Steam release dataset: raw-record
//! decoding, parsing into typed games, (year, genre) aggregation,
//! percentile summaries, and scalar surface sampling for 3D charts.
//! This crate owns no I/O and no rendering; chart layers and dataset
//! acquisition live with the callers.

pub mod aggregate;
pub mod data;
pub mod model;
pub mod numbers;
pub mod parse;
pub mod surface;

// Re-export commonly used types
pub use aggregate::{
    aggregate_by_year_and_genre, all_genres, all_years, free_paid_per_year, genre_distribution,
    genre_z_index, main_genres, percentile, releases_per_year, score_boxes, score_for,
    stats_for_genres, year_genre_matrix,
};
pub use data::{DatasetError, RawDataset, RawGame, RawPriceOverview};
pub use model::{
    FreePaidYear, GameRecord, GenreCount, GenreScoreBox, GenreYearStat, Platform, UNKNOWN_GENRE,
    YearCount,
};
pub use parse::parse_games;
pub use surface::{SurfaceAggregation, SurfaceMode, SurfaceSampler};

/// Trait for abstracting dataset loading operations.
/// Platform-specific implementations should provide this.
pub trait DatasetLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw dataset from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the raw dataset cannot be loaded or decoded.
    fn load_raw(&self) -> Result<RawDataset, Self::Error>;

    /// Load and parse the dataset into typed games in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the raw dataset cannot be loaded.
    fn load_games(&self) -> Result<Vec<GameRecord>, Self::Error> {
        self.load_raw().map(|raw| parse_games(raw.records()))
    }
}
