//! Parameterized surface sampling for the 3D chart layer.
//!
//! A [`SurfaceSampler`] turns continuous (x, z) query coordinates into a
//! scalar height over a discrete (category, time) grid. NaN is the
//! first-class "no surface defined here" value; the consuming renderer
//! treats it as "do not draw", never as an error.
//!
//! Per-cell statistics are recomputed from the immutable game slice on
//! every call. The dataset is a few thousand records and sample counts
//! are bounded by the active surface resolution, so no grid is memoized.
use serde::{Deserialize, Serialize};

use crate::aggregate::{all_years, main_genres};
use crate::model::{GameRecord, Platform};
use crate::numbers::{round_to_index, usize_to_f64};

/// Which per-cell statistic the surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceAggregation {
    /// Release counts on a platform x year grid.
    PlatformYearCount,
    /// Release counts on a platform x month grid, zoomed into one year.
    PlatformMonthCount { year: i32 },
    /// Release counts on a genre x year grid.
    GenreYearCount,
    /// Mean review score on a genre x year grid; cells without a single
    /// positive-ratio observation are undefined.
    GenreAvgScore,
    /// Mean USD price on a genre x year grid; cells without a single
    /// priced observation are undefined.
    GenreAvgPrice,
}

impl SurfaceAggregation {
    /// Count surfaces return 0 for empty cells; average surfaces return
    /// NaN (a count of zero is meaningful, a mean of nothing is not).
    #[must_use]
    pub const fn is_count(self) -> bool {
        matches!(
            self,
            Self::PlatformYearCount | Self::PlatformMonthCount { .. } | Self::GenreYearCount
        )
    }
}

/// How the per-cell statistic is blended into the returned height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceMode {
    /// Exact per-cell lookup.
    Square,
    /// Gaussian blend along the category axis at a fixed time index.
    Wave { window: f64 },
    /// Anisotropic 2D Gaussian blend over the whole grid.
    SmoothWaves { window_x: f64, window_z: f64 },
}

/// Smoothing windows at or below zero degenerate to a delta kernel.
const MIN_WINDOW: f64 = 1e-9;

const MONTHS_PER_YEAR: usize = 12;

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / usize_to_f64(count)
    }
}

/// Samples scalar heights over an immutable snapshot of the collection.
pub struct SurfaceSampler<'a> {
    games: &'a [GameRecord],
    aggregation: SurfaceAggregation,
    genres: Vec<String>,
    years: Vec<i32>,
}

impl<'a> SurfaceSampler<'a> {
    /// Snapshot the axis domains for the chosen aggregation.
    #[must_use]
    pub fn new(games: &'a [GameRecord], aggregation: SurfaceAggregation) -> Self {
        Self {
            games,
            aggregation,
            genres: main_genres(games),
            years: all_years(games),
        }
    }

    #[must_use]
    pub const fn aggregation(&self) -> SurfaceAggregation {
        self.aggregation
    }

    /// Length of the category (x) axis.
    #[must_use]
    pub fn category_len(&self) -> usize {
        match self.aggregation {
            SurfaceAggregation::PlatformYearCount
            | SurfaceAggregation::PlatformMonthCount { .. } => Platform::ALL.len(),
            _ => self.genres.len(),
        }
    }

    /// Length of the time (z) axis.
    #[must_use]
    pub fn time_len(&self) -> usize {
        match self.aggregation {
            SurfaceAggregation::PlatformMonthCount { .. } => MONTHS_PER_YEAR,
            _ => self.years.len(),
        }
    }

    /// Axis labels for legends: platform or genre names.
    #[must_use]
    pub fn category_labels(&self) -> Vec<String> {
        match self.aggregation {
            SurfaceAggregation::PlatformYearCount
            | SurfaceAggregation::PlatformMonthCount { .. } => {
                Platform::ALL.iter().map(ToString::to_string).collect()
            }
            _ => self.genres.clone(),
        }
    }

    /// Axis labels for legends: years, or months 1-12 when zoomed.
    #[must_use]
    pub fn time_labels(&self) -> Vec<String> {
        match self.aggregation {
            SurfaceAggregation::PlatformMonthCount { .. } => {
                (1..=MONTHS_PER_YEAR).map(|m| m.to_string()).collect()
            }
            _ => self.years.iter().map(ToString::to_string).collect(),
        }
    }

    /// Exact statistic for one grid cell. Counts return 0 for empty
    /// cells; averages return NaN. Out-of-range indices return NaN.
    #[must_use]
    pub fn cell_value(&self, category_idx: usize, time_idx: usize) -> f64 {
        match self.aggregation {
            SurfaceAggregation::PlatformYearCount => {
                let (Some(platform), Some(year)) = (
                    Platform::ALL.get(category_idx).copied(),
                    self.years.get(time_idx).copied(),
                ) else {
                    return f64::NAN;
                };
                usize_to_f64(
                    self.games
                        .iter()
                        .filter(|g| g.release_year == year && g.on_platform(platform))
                        .count(),
                )
            }
            SurfaceAggregation::PlatformMonthCount { year } => {
                let Some(platform) = Platform::ALL.get(category_idx).copied() else {
                    return f64::NAN;
                };
                if time_idx >= MONTHS_PER_YEAR {
                    return f64::NAN;
                }
                let Ok(month) = u32::try_from(time_idx + 1) else {
                    return f64::NAN;
                };
                usize_to_f64(
                    self.games
                        .iter()
                        .filter(|g| {
                            g.release_year == year
                                && g.release_month == month
                                && g.on_platform(platform)
                        })
                        .count(),
                )
            }
            SurfaceAggregation::GenreYearCount => {
                let (Some(genre), Some(year)) = (
                    self.genres.get(category_idx),
                    self.years.get(time_idx).copied(),
                ) else {
                    return f64::NAN;
                };
                usize_to_f64(
                    self.games
                        .iter()
                        .filter(|g| g.release_year == year && g.main_genre == *genre)
                        .count(),
                )
            }
            SurfaceAggregation::GenreAvgScore => {
                let (Some(genre), Some(year)) = (
                    self.genres.get(category_idx),
                    self.years.get(time_idx).copied(),
                ) else {
                    return f64::NAN;
                };
                mean(
                    self.games
                        .iter()
                        .filter(|g| {
                            g.release_year == year
                                && g.main_genre == *genre
                                && g.positive_ratio_review > 0
                        })
                        .map(|g| g.score_color),
                )
            }
            SurfaceAggregation::GenreAvgPrice => {
                let (Some(genre), Some(year)) = (
                    self.genres.get(category_idx),
                    self.years.get(time_idx).copied(),
                ) else {
                    return f64::NAN;
                };
                mean(
                    self.games
                        .iter()
                        .filter(|g| g.release_year == year && g.main_genre == *genre)
                        .filter_map(|g| g.price_usd),
                )
            }
        }
    }

    /// Sample the surface at continuous (x, z) coordinates.
    #[must_use]
    pub fn sample(&self, x: f64, z: f64, mode: SurfaceMode) -> f64 {
        match mode {
            SurfaceMode::Square => {
                let (Some(ci), Some(ti)) = (
                    round_to_index(x, self.category_len()),
                    round_to_index(z, self.time_len()),
                ) else {
                    return f64::NAN;
                };
                self.cell_value(ci, ti)
            }
            SurfaceMode::Wave { window } => {
                let Some(ti) = round_to_index(z, self.time_len()) else {
                    return f64::NAN;
                };
                let w = window.max(MIN_WINDOW);
                let mut sum = 0.0;
                let mut weight = 0.0;
                for ci in 0..self.category_len() {
                    let value = self.cell_value(ci, ti);
                    if value.is_nan() {
                        continue;
                    }
                    let d = usize_to_f64(ci) - x;
                    let k = (-(d * d) / (2.0 * w * w)).exp();
                    sum += k * value;
                    weight += k;
                }
                if weight > 0.0 { sum / weight } else { 0.0 }
            }
            SurfaceMode::SmoothWaves { window_x, window_z } => {
                let wx = window_x.max(MIN_WINDOW);
                let wz = window_z.max(MIN_WINDOW);
                let mut sum = 0.0;
                let mut weight = 0.0;
                for ci in 0..self.category_len() {
                    let dx = (usize_to_f64(ci) - x) / wx;
                    for ti in 0..self.time_len() {
                        let value = self.cell_value(ci, ti);
                        if value.is_nan() {
                            continue;
                        }
                        let dz = (usize_to_f64(ti) - z) / wz;
                        let k = (-0.5 * (dx * dx + dz * dz)).exp();
                        sum += k * value;
                        weight += k;
                    }
                }
                if weight > 0.0 { sum / weight } else { 0.0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn game(year: i32, month: u32, genre: &str, score: f64) -> GameRecord {
        GameRecord {
            id: 0,
            name: String::new(),
            release_year: year,
            release_month: month,
            genres: smallvec![genre.to_string()],
            main_genre: genre.to_string(),
            positive_ratio_review: 50,
            total_reviews: 10,
            score_color: score,
            is_free: None,
            price_usd: None,
            platforms: smallvec![Platform::Windows],
        }
    }

    #[test]
    fn count_surfaces_are_classified_as_counts() {
        assert!(SurfaceAggregation::PlatformYearCount.is_count());
        assert!(SurfaceAggregation::PlatformMonthCount { year: 2020 }.is_count());
        assert!(SurfaceAggregation::GenreYearCount.is_count());
        assert!(!SurfaceAggregation::GenreAvgScore.is_count());
        assert!(!SurfaceAggregation::GenreAvgPrice.is_count());
    }

    #[test]
    fn square_mode_rejects_out_of_domain_queries() {
        let games = vec![game(2020, 1, "Action", 0.8)];
        let sampler = SurfaceSampler::new(&games, SurfaceAggregation::GenreYearCount);
        assert!(sampler.sample(-1.0, 0.0, SurfaceMode::Square).is_nan());
        assert!(sampler.sample(0.0, 7.0, SurfaceMode::Square).is_nan());
        assert!((sampler.sample(0.0, 0.0, SurfaceMode::Square) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn wave_mode_returns_zero_when_nothing_contributes() {
        let games = vec![game(2020, 1, "Action", 0.8)];
        // No record carries a price, so every price cell is NaN.
        let sampler = SurfaceSampler::new(&games, SurfaceAggregation::GenreAvgPrice);
        let height = sampler.sample(0.0, 0.0, SurfaceMode::Wave { window: 1.0 });
        assert!(height.abs() < f64::EPSILON);
    }

    #[test]
    fn month_zoom_uses_a_fixed_twelve_cell_axis() {
        let games = vec![game(2020, 3, "Action", 0.8), game(2021, 3, "Action", 0.8)];
        let sampler = SurfaceSampler::new(
            &games,
            SurfaceAggregation::PlatformMonthCount { year: 2020 },
        );
        assert_eq!(sampler.time_len(), 12);
        // windows x March
        assert!((sampler.cell_value(0, 2) - 1.0).abs() < f64::EPSILON);
        // windows x January: empty count cell is 0, not NaN
        assert!(sampler.cell_value(0, 0).abs() < f64::EPSILON);
    }
}
