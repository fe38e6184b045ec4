//! Grouping and statistics over the parsed game collection.
//!
//! Every function here is a pure transformation of an immutable slice;
//! empty input always yields empty output.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::RangeInclusive;

use crate::model::{FreePaidYear, GameRecord, GenreCount, GenreScoreBox, GenreYearStat, YearCount};
use crate::numbers::{floor_to_index, usize_to_f64};

/// Group games by (release year, main genre) and compute per-bucket
/// counts and mean review scores. Output is sorted by (year, genre).
#[must_use]
pub fn aggregate_by_year_and_genre(games: &[GameRecord]) -> Vec<GenreYearStat> {
    let mut buckets: BTreeMap<(i32, &str), (usize, f64)> = BTreeMap::new();
    for game in games {
        let bucket = buckets
            .entry((game.release_year, game.main_genre.as_str()))
            .or_insert((0, 0.0));
        bucket.0 += 1;
        bucket.1 += game.score_color;
    }
    buckets
        .into_iter()
        .map(|((year, genre), (count, score_sum))| GenreYearStat {
            year,
            genre: genre.to_string(),
            count,
            avg_score: score_sum / usize_to_f64(count),
        })
        .collect()
}

/// Distinct genres appearing in the aggregated stats, sorted
/// lexicographically. Index positions double as surface axis indices.
#[must_use]
pub fn all_genres(stats: &[GenreYearStat]) -> Vec<String> {
    let set: BTreeSet<&str> = stats.iter().map(|s| s.genre.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Distinct main genres across the game collection, sorted.
#[must_use]
pub fn main_genres(games: &[GameRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = games.iter().map(|g| g.main_genre.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Distinct release years across the game collection, sorted.
#[must_use]
pub fn all_years(games: &[GameRecord]) -> Vec<i32> {
    let set: BTreeSet<i32> = games.iter().map(|g| g.release_year).collect();
    set.into_iter().collect()
}

/// Map a genre to its axis index, 0 when absent.
#[must_use]
pub fn genre_z_index(genre: &str, genres: &[String]) -> f64 {
    usize_to_f64(genres.iter().position(|g| g == genre).unwrap_or(0))
}

/// Index the aggregated stats as year -> genre -> bucket for exact lookups.
#[must_use]
pub fn year_genre_matrix(stats: &[GenreYearStat]) -> HashMap<i32, HashMap<String, GenreYearStat>> {
    let mut matrix: HashMap<i32, HashMap<String, GenreYearStat>> = HashMap::new();
    for stat in stats {
        matrix
            .entry(stat.year)
            .or_default()
            .insert(stat.genre.clone(), stat.clone());
    }
    matrix
}

/// Exact average-score lookup by (year index, genre index), `None` when the
/// indices are out of domain or the bucket has no data.
#[must_use]
pub fn score_for(
    year_idx: usize,
    genre_idx: usize,
    years: &[i32],
    genres: &[String],
    matrix: &HashMap<i32, HashMap<String, GenreYearStat>>,
) -> Option<f64> {
    let year = years.get(year_idx)?;
    let genre = genres.get(genre_idx)?;
    matrix.get(year)?.get(genre).map(|stat| stat.avg_score)
}

/// Nearest-rank percentile: selects the existing sample at index
/// `floor((N - 1) * p)` rather than interpolating. Input must already be
/// sorted ascending; empty input yields NaN.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let span = usize_to_f64(sorted.len().saturating_sub(1));
    floor_to_index(span * p.clamp(0.0, 1.0), sorted.len())
        .and_then(|idx| sorted.get(idx).copied())
        .unwrap_or(f64::NAN)
}

/// Minimum samples a genre needs before a box summary is produced.
const BOX_MIN_SAMPLES: usize = 3;

/// Five-number score summaries for the selected genres. Genres with fewer
/// than three matching games are omitted.
#[must_use]
pub fn score_boxes(games: &[GameRecord], selected_genres: &[String]) -> Vec<GenreScoreBox> {
    selected_genres
        .iter()
        .filter_map(|genre| {
            let mut scores: Vec<f64> = games
                .iter()
                .filter(|g| g.main_genre == *genre)
                .map(|g| g.score_color)
                .collect();
            if scores.len() < BOX_MIN_SAMPLES {
                return None;
            }
            scores.sort_by(f64::total_cmp);
            Some(GenreScoreBox {
                genre: genre.clone(),
                min: scores.first().copied()?,
                q1: percentile(&scores, 0.25),
                median: percentile(&scores, 0.5),
                q3: percentile(&scores, 0.75),
                max: scores.last().copied()?,
            })
        })
        .collect()
}

/// Free-to-play vs. paid release counts per year, sorted by year.
///
/// An unknown `is_free` flag counts as paid here; this intentionally
/// differs from price-based aggregation, which skips unpriced records.
#[must_use]
pub fn free_paid_per_year(games: &[GameRecord]) -> Vec<FreePaidYear> {
    let mut buckets: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
    for game in games {
        let bucket = buckets.entry(game.release_year).or_insert((0, 0));
        if game.is_free.unwrap_or(false) {
            bucket.0 += 1;
        } else {
            bucket.1 += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(year, (free, paid))| FreePaidYear { year, free, paid })
        .collect()
}

/// Release counts per year, sorted by year.
#[must_use]
pub fn releases_per_year(games: &[GameRecord]) -> Vec<YearCount> {
    let mut buckets: BTreeMap<i32, usize> = BTreeMap::new();
    for game in games {
        *buckets.entry(game.release_year).or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Main-genre release counts restricted to an inclusive year range, sorted
/// by descending count (ties break on genre for determinism).
#[must_use]
pub fn genre_distribution(games: &[GameRecord], period: RangeInclusive<i32>) -> Vec<GenreCount> {
    let mut buckets: BTreeMap<&str, usize> = BTreeMap::new();
    for game in games {
        if period.contains(&game.release_year) {
            *buckets.entry(game.main_genre.as_str()).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<GenreCount> = buckets
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
    counts
}

/// Keep only the stats whose genre is in the selection, preserving order.
#[must_use]
pub fn stats_for_genres(stats: &[GenreYearStat], genres: &[String]) -> Vec<GenreYearStat> {
    stats
        .iter()
        .filter(|stat| genres.iter().any(|g| *g == stat.genre))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn game(year: i32, genre: &str, score: f64) -> GameRecord {
        GameRecord {
            id: 0,
            name: String::new(),
            release_year: year,
            release_month: 1,
            genres: smallvec![genre.to_string()],
            main_genre: genre.to_string(),
            positive_ratio_review: 50,
            total_reviews: 10,
            score_color: score,
            is_free: None,
            price_usd: None,
            platforms: smallvec![],
        }
    }

    #[test]
    fn buckets_partition_the_collection() {
        let games = vec![
            game(2020, "Action", 0.8),
            game(2020, "Action", 0.6),
            game(2020, "Indie", 0.9),
            game(2021, "Action", 0.5),
        ];
        let stats = aggregate_by_year_and_genre(&games);
        assert_eq!(stats.len(), 3);
        let total: usize = stats.iter().map(|s| s.count).sum();
        assert_eq!(total, games.len());

        let action_2020 = &stats[0];
        assert_eq!((action_2020.year, action_2020.genre.as_str()), (2020, "Action"));
        assert!((action_2020.avg_score - 0.7).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_by_year_and_genre(&[]).is_empty());
        assert!(releases_per_year(&[]).is_empty());
        assert!(free_paid_per_year(&[]).is_empty());
        assert!(genre_distribution(&[], 2000..=2020).is_empty());
        assert!(score_boxes(&[], &["Action".to_string()]).is_empty());
    }

    #[test]
    fn genres_are_sorted_and_deduplicated() {
        let games = vec![
            game(2020, "Indie", 0.5),
            game(2021, "Action", 0.5),
            game(2022, "Indie", 0.5),
        ];
        let stats = aggregate_by_year_and_genre(&games);
        assert_eq!(all_genres(&stats), ["Action", "Indie"]);
        assert_eq!(main_genres(&games), ["Action", "Indie"]);
        assert_eq!(all_years(&games), [2020, 2021, 2022]);
        assert!((genre_z_index("Indie", &all_genres(&stats)) - 1.0).abs() < f64::EPSILON);
        assert!((genre_z_index("RPG", &all_genres(&stats))).abs() < f64::EPSILON);
    }

    #[test]
    fn percentile_is_idempotent_on_repeated_values() {
        let sorted = [0.4, 0.4, 0.4, 0.4];
        for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!((percentile(&sorted, p) - 0.4).abs() < f64::EPSILON);
        }
        assert!(percentile(&[], 0.5).is_nan());
    }

    #[test]
    fn percentile_uses_nearest_rank() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&sorted, 0.25) - 2.0).abs() < f64::EPSILON);
        assert!((percentile(&sorted, 0.5) - 3.0).abs() < f64::EPSILON);
        assert!((percentile(&sorted, 0.75) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_boxes_skip_thin_genres() {
        let games = vec![
            game(2020, "Action", 0.2),
            game(2020, "Action", 0.6),
            game(2021, "Action", 0.4),
            game(2021, "Indie", 0.9),
            game(2021, "Indie", 0.8),
        ];
        let selection = vec!["Action".to_string(), "Indie".to_string()];
        let boxes = score_boxes(&games, &selection);
        assert_eq!(boxes.len(), 1);
        let action = &boxes[0];
        assert_eq!(action.genre, "Action");
        assert!((action.min - 0.2).abs() < f64::EPSILON);
        assert!((action.median - 0.4).abs() < f64::EPSILON);
        assert!((action.max - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_is_free_counts_as_paid() {
        let mut free = game(2020, "Action", 0.5);
        free.is_free = Some(true);
        let mut paid = game(2020, "Action", 0.5);
        paid.is_free = Some(false);
        let unknown = game(2020, "Action", 0.5);

        let counts = free_paid_per_year(&[free, paid, unknown]);
        assert_eq!(counts, [FreePaidYear { year: 2020, free: 1, paid: 2 }]);
    }

    #[test]
    fn genre_distribution_respects_period_and_order() {
        let games = vec![
            game(2019, "Action", 0.5),
            game(2020, "Action", 0.5),
            game(2020, "Indie", 0.5),
            game(2020, "Indie", 0.5),
            game(2021, "RPG", 0.5),
        ];
        let counts = genre_distribution(&games, 2020..=2020);
        assert_eq!(
            counts,
            [
                GenreCount { genre: "Indie".to_string(), count: 2 },
                GenreCount { genre: "Action".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn score_lookup_respects_axis_domains() {
        let games = vec![game(2020, "Action", 0.8), game(2021, "Indie", 0.4)];
        let stats = aggregate_by_year_and_genre(&games);
        let genres = all_genres(&stats);
        let years = all_years(&games);
        let matrix = year_genre_matrix(&stats);

        assert_eq!(score_for(0, 0, &years, &genres, &matrix), Some(0.8));
        // (2020, Indie) has no bucket.
        assert_eq!(score_for(0, 1, &years, &genres, &matrix), None);
        assert_eq!(score_for(9, 0, &years, &genres, &matrix), None);
    }

    #[test]
    fn stats_filter_keeps_selection_only() {
        let games = vec![game(2020, "Action", 0.8), game(2020, "Indie", 0.4)];
        let stats = aggregate_by_year_and_genre(&games);
        let picked = stats_for_genres(&stats, &["Indie".to_string()]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].genre, "Indie");
    }
}
