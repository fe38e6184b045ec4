//! Conversion of raw dataset records into validated [`GameRecord`]s.
//!
//! Records missing any required field are skipped, not reported: the feed
//! is known to contain incomplete entries and dropping them is a
//! data-quality policy, not a failure.
use log::debug;

use crate::data::RawGame;
use crate::model::{GameRecord, Platform, UNKNOWN_GENRE};
use crate::numbers::i64_to_f64;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Currency accepted for price resolution; other currencies leave the
/// record without a price.
const PRICE_CURRENCY: &str = "USD";

fn month_from_name(token: &str) -> Option<u32> {
    let tag = token.get(..3)?.to_ascii_lowercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == tag)
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// Split a free-text "MMM DD, YYYY" date into (year, month).
///
/// The trailing comma-separated token is the year (0 when unparsable);
/// the leading token's month name yields 1-12 (1 when unparsable).
fn parse_release_date(raw: &str) -> (i32, u32) {
    let comps: Vec<&str> = raw.split(',').collect();
    let year = comps
        .last()
        .and_then(|s| s.trim().parse::<i32>().ok())
        .unwrap_or(0);
    let month = comps
        .first()
        .map(|s| s.trim())
        .and_then(|s| s.split_whitespace().next())
        .and_then(month_from_name)
        .unwrap_or(1);
    (year, month)
}

fn resolve_price_usd(raw: &RawGame) -> Option<f64> {
    let price = raw.price_overview.as_ref()?;
    let cents = price.final_price_in_cents?;
    (price.currency.as_deref() == Some(PRICE_CURRENCY)).then(|| i64_to_f64(cents) / 100.0)
}

fn parse_game(raw: &RawGame) -> Option<GameRecord> {
    let id = raw.id?;
    let name = raw.name.clone()?;
    let genres = raw.genres.as_deref()?;
    let release_date = raw.release_date.as_deref()?;
    let positive_ratio = raw.positive_ratio_review?;
    let positive = raw.positive_review?;
    let negative = raw.negative_review?;
    let platform_tags = raw.supported_platforms.as_deref()?;

    let (release_year, release_month) = parse_release_date(release_date);
    let main_genre = genres
        .first()
        .cloned()
        .unwrap_or_else(|| UNKNOWN_GENRE.to_string());
    let positive_ratio_review = u8::try_from(positive_ratio.clamp(0, 100)).unwrap_or(0);
    let score_color = f64::from(positive_ratio_review) / 100.0;
    let total_reviews = u64::try_from((positive + negative).max(0)).unwrap_or(0);

    Some(GameRecord {
        id,
        name,
        release_year,
        release_month,
        genres: genres.iter().cloned().collect(),
        main_genre,
        positive_ratio_review,
        total_reviews,
        score_color,
        is_free: raw.is_free,
        price_usd: resolve_price_usd(raw),
        platforms: platform_tags
            .iter()
            .filter_map(|tag| Platform::from_tag(tag))
            .collect(),
    })
}

/// Parse raw records into typed games, silently dropping incomplete ones.
#[must_use]
pub fn parse_games(raw: &[RawGame]) -> Vec<GameRecord> {
    let games: Vec<GameRecord> = raw.iter().filter_map(parse_game).collect();
    let skipped = raw.len() - games.len();
    if skipped > 0 {
        debug!("skipped {skipped} incomplete records out of {}", raw.len());
    }
    games
}
