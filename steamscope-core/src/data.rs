//! Raw dataset decoding.
//!
//! Every field is optional at this stage: the parser, not the decoder,
//! decides which records are complete enough to keep.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced while decoding a raw dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset is not a valid JSON array of games: {0}")]
    Json(#[from] serde_json::Error),
}

/// Nested price block as it appears in the raw feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPriceOverview {
    pub final_price_in_cents: Option<i64>,
    pub currency: Option<String>,
}

/// One raw record as found in the dataset feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGame {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub genres: Option<Vec<String>>,
    /// Free-text date of the form "MMM DD, YYYY".
    pub release_date: Option<String>,
    pub positive_ratio_review: Option<i64>,
    pub positive_review: Option<i64>,
    pub negative_review: Option<i64>,
    pub supported_platforms: Option<Vec<String>>,
    pub is_free: Option<bool>,
    pub price_overview: Option<RawPriceOverview>,
}

/// Container for the decoded raw dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RawDataset {
    pub games: Vec<RawGame>,
}

impl RawDataset {
    /// Create an empty dataset (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self { games: Vec::new() }
    }

    /// Decode a raw dataset from a JSON array of games.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be decoded into raw records.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Create a dataset from pre-decoded records.
    #[must_use]
    pub fn from_games(games: Vec<RawGame>) -> Self {
        Self { games }
    }

    /// Keep only the first `prefix` raw records, for interactive use on
    /// large feeds.
    #[must_use]
    pub fn truncated(mut self, prefix: usize) -> Self {
        self.games.truncate(prefix);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[RawGame] {
        &self.games
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_decodes_partial_records() {
        let json = r#"[
            {
                "id": 10,
                "name": "Half-Built",
                "genres": ["Action"],
                "releaseDate": "Nov 08, 2004",
                "positiveRatioReview": 96,
                "positiveReview": 96,
                "negativeReview": 4,
                "supportedPlatforms": ["windows", "linux"],
                "isFree": false,
                "priceOverview": { "finalPriceInCents": 999, "currency": "USD" }
            },
            { "name": "No Id At All" }
        ]"#;

        let data = RawDataset::from_json(json).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.games[0].id, Some(10));
        assert_eq!(
            data.games[0]
                .price_overview
                .as_ref()
                .and_then(|p| p.final_price_in_cents),
            Some(999)
        );
        assert_eq!(data.games[1].id, None);
        assert_eq!(data.games[1].name.as_deref(), Some("No Id At All"));
    }

    #[test]
    fn dataset_rejects_non_array_input() {
        assert!(RawDataset::from_json(r#"{"games": []}"#).is_err());
    }

    #[test]
    fn truncated_keeps_leading_records() {
        let games = vec![RawGame::default(), RawGame::default(), RawGame::default()];
        let data = RawDataset::from_games(games).truncated(2);
        assert_eq!(data.len(), 2);
        assert!(RawDataset::empty().truncated(5).is_empty());
    }
}
