//! Typed records and aggregated statistics for the release dataset.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Genre assigned to records whose raw genre list is empty.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Genre list capacity stored inline without additional allocations.
pub type GenreList = SmallVec<[String; 4]>;

/// Platform set capacity; the platform axis is a closed three-way enumeration.
pub type PlatformSet = SmallVec<[Platform; 3]>;

/// Store platform a title ships on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    /// Axis order used by platform-indexed surfaces.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Mac, Platform::Linux];

    /// Parse a raw platform tag; unknown tags yield `None` and are dropped
    /// from the record's platform set.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "windows" => Some(Self::Windows),
            "mac" | "macos" => Some(Self::Mac),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Human-readable axis label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Mac => "mac",
            Self::Linux => "linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One parsed title. Created once at load time and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: i64,
    pub name: String,
    pub release_year: i32,
    /// 1-12; unparsable raw dates fall back to 1.
    pub release_month: u32,
    pub genres: GenreList,
    /// `genres[0]`, or [`UNKNOWN_GENRE`] when the genre list is empty.
    pub main_genre: String,
    /// Positive review ratio, 0-100.
    pub positive_ratio_review: u8,
    /// Positive plus negative review counts.
    pub total_reviews: u64,
    /// `positive_ratio_review / 100`, normalized into [0, 1].
    pub score_color: f64,
    /// Absent means unknown, not false.
    pub is_free: Option<bool>,
    /// Present only when a USD price was resolvable.
    pub price_usd: Option<f64>,
    pub platforms: PlatformSet,
}

impl GameRecord {
    /// Whether the record ships on the given platform.
    #[must_use]
    pub fn on_platform(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }
}

/// Aggregated (year, genre) bucket: release count plus mean review score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreYearStat {
    pub year: i32,
    pub genre: String,
    pub count: usize,
    pub avg_score: f64,
}

/// Five-number summary of review scores for one genre.
///
/// Only produced for genres with at least three samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreScoreBox {
    pub genre: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Releases observed in a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Free-to-play vs. paid split for a single year. Records with an unknown
/// `is_free` flag count as paid in this view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreePaidYear {
    pub year: i32,
    pub free: usize,
    pub paid: usize,
}

/// Releases per main genre over a caller-supplied period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}
