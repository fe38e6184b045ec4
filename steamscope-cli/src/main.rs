mod report;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, stdout};
use std::path::PathBuf;
use thiserror::Error;

use report::{Report, emit};
use steamscope_core::numbers::usize_to_f64;
use steamscope_core::{
    DatasetError, DatasetLoader, GameRecord, RawDataset, SurfaceAggregation, SurfaceMode,
    SurfaceSampler, aggregate_by_year_and_genre, all_years, free_paid_per_year, genre_distribution,
    main_genres, releases_per_year, score_boxes,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartKind {
    /// Dataset overview: record counts and axis domains
    Summary,
    /// Release counts per year
    Releases,
    /// Main-genre release counts over a year period
    GenreDistribution,
    /// Free-to-play vs. paid counts per year
    FreeVsPaid,
    /// Five-number review-score summaries per genre
    ScoreBoxes,
    /// Height field sampled from the 3D surface
    Surface,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AggregationArg {
    /// Release counts, platform x year
    PlatformYear,
    /// Release counts, platform x month (requires --year)
    PlatformMonth,
    /// Release counts, genre x year
    GenreYear,
    /// Average review score, genre x year
    GenreScore,
    /// Average USD price, genre x year
    GenrePrice,
}

impl AggregationArg {
    const fn label(self) -> &'static str {
        match self {
            Self::PlatformYear => "platform x year counts",
            Self::PlatformMonth => "platform x month counts",
            Self::GenreYear => "genre x year counts",
            Self::GenreScore => "genre x year average score",
            Self::GenrePrice => "genre x year average price (USD)",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Exact per-cell lookup
    Square,
    /// Gaussian blend along the category axis
    Wave,
    /// Anisotropic 2D Gaussian blend over the grid
    SmoothWaves,
}

#[derive(Debug, Parser)]
#[command(name = "steamscope", version)]
#[command(about = "Analytics over a Steam release dataset - aggregation and 3D surface sampling")]
struct Args {
    /// Path to the raw dataset (JSON array of games)
    dataset: PathBuf,

    /// Keep only the first N raw records
    #[arg(long)]
    prefix: Option<usize>,

    /// Chart to compute
    #[arg(long, value_enum, default_value_t = ChartKind::Summary)]
    chart: ChartKind,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Genres to include (comma-separated); defaults to the first three
    #[arg(long)]
    genres: Option<String>,

    /// Inclusive start year for the genre distribution
    #[arg(long)]
    from_year: Option<i32>,

    /// Inclusive end year for the genre distribution
    #[arg(long)]
    to_year: Option<i32>,

    // Surface-specific options
    /// Which statistic the surface exposes
    #[arg(long, value_enum, default_value_t = AggregationArg::GenreYear)]
    aggregation: AggregationArg,

    /// How cell values blend into heights
    #[arg(long, value_enum, default_value_t = ModeArg::Square)]
    surface_mode: ModeArg,

    /// Smoothing window (standard-deviation-like, in grid cells)
    #[arg(long, default_value_t = 1.0)]
    window: f64,

    /// Category-axis window for smooth-waves (defaults to --window)
    #[arg(long)]
    window_x: Option<f64>,

    /// Time-axis window for smooth-waves (defaults to --window)
    #[arg(long)]
    window_z: Option<f64>,

    /// Samples per axis; defaults to one sample per grid cell
    #[arg(long)]
    resolution: Option<usize>,

    /// Year to zoom into for the platform-month aggregation
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Debug, Error)]
enum LoadError {
    #[error("reading dataset file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Filesystem-backed dataset source.
struct FsLoader {
    path: PathBuf,
    prefix: Option<usize>,
}

impl DatasetLoader for FsLoader {
    type Error = LoadError;

    fn load_raw(&self) -> Result<RawDataset, Self::Error> {
        let text = fs::read_to_string(&self.path)?;
        let raw = RawDataset::from_json(&text)?;
        Ok(match self.prefix {
            Some(n) => raw.truncated(n),
            None => raw,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let loader = FsLoader {
        path: args.dataset.clone(),
        prefix: args.prefix,
    };
    let games = loader
        .load_games()
        .with_context(|| format!("loading dataset from {}", args.dataset.display()))?;
    info!("loaded {} games from {}", games.len(), args.dataset.display());

    let report = build_report(&args, &games)?;
    write_report(&report, &args)
}

fn build_report(args: &Args, games: &[GameRecord]) -> Result<Report> {
    let report = match args.chart {
        ChartKind::Summary => summary_report(games),
        ChartKind::Releases => releases_report(games),
        ChartKind::GenreDistribution => distribution_report(args, games),
        ChartKind::FreeVsPaid => free_paid_report(games),
        ChartKind::ScoreBoxes => score_boxes_report(args, games),
        ChartKind::Surface => surface_report(args, games)?,
    };
    Ok(report)
}

fn summary_report(games: &[GameRecord]) -> Report {
    let years = all_years(games);
    let genres = main_genres(games);
    let stats = aggregate_by_year_and_genre(games);

    let mut report = Report::new("Dataset summary", &["metric", "value"]);
    report.push_row(vec!["games".to_string(), games.len().to_string()]);
    let span = match (years.first(), years.last()) {
        (Some(first), Some(last)) => format!("{first}-{last}"),
        _ => "-".to_string(),
    };
    report.push_row(vec!["year span".to_string(), span]);
    report.push_row(vec!["main genres".to_string(), genres.len().to_string()]);
    report.push_row(vec![
        "(year, genre) buckets".to_string(),
        stats.len().to_string(),
    ]);
    let free = games.iter().filter(|g| g.is_free == Some(true)).count();
    report.push_row(vec!["free-to-play".to_string(), free.to_string()]);
    let priced = games.iter().filter(|g| g.price_usd.is_some()).count();
    report.push_row(vec!["priced in USD".to_string(), priced.to_string()]);
    report
}

fn releases_report(games: &[GameRecord]) -> Report {
    let mut report = Report::new("Releases per year", &["year", "count"]);
    for entry in releases_per_year(games) {
        report.push_row(vec![entry.year.to_string(), entry.count.to_string()]);
    }
    report
}

fn distribution_report(args: &Args, games: &[GameRecord]) -> Report {
    let years = all_years(games);
    let from = args.from_year.or_else(|| years.first().copied());
    let to = args.to_year.or_else(|| years.last().copied());

    let mut report = Report::new("Genre distribution", &["genre", "count"]);
    let (Some(from), Some(to)) = (from, to) else {
        return report;
    };
    report.title = format!("Genre distribution {from}-{to}");
    for entry in genre_distribution(games, from..=to) {
        report.push_row(vec![entry.genre, entry.count.to_string()]);
    }
    report
}

fn free_paid_report(games: &[GameRecord]) -> Report {
    let mut report = Report::new("Free-to-play vs paid per year", &["year", "free", "paid"]);
    for entry in free_paid_per_year(games) {
        report.push_row(vec![
            entry.year.to_string(),
            entry.free.to_string(),
            entry.paid.to_string(),
        ]);
    }
    report
}

/// Default genre-picker width, matching the chart's initial selection.
const DEFAULT_GENRE_SELECTION: usize = 3;

fn score_boxes_report(args: &Args, games: &[GameRecord]) -> Report {
    let selection = match &args.genres {
        Some(csv) => split_csv(csv),
        None => {
            let mut genres = main_genres(games);
            genres.truncate(DEFAULT_GENRE_SELECTION);
            genres
        }
    };

    let mut report = Report::new(
        "Review score box plot per genre",
        &["genre", "min", "q1", "median", "q3", "max"],
    );
    for bx in score_boxes(games, &selection) {
        report.push_row(vec![
            bx.genre,
            fmt_height(bx.min),
            fmt_height(bx.q1),
            fmt_height(bx.median),
            fmt_height(bx.q3),
            fmt_height(bx.max),
        ]);
    }
    report
}

fn surface_report(args: &Args, games: &[GameRecord]) -> Result<Report> {
    let aggregation = match args.aggregation {
        AggregationArg::PlatformYear => SurfaceAggregation::PlatformYearCount,
        AggregationArg::PlatformMonth => {
            let Some(year) = args.year else {
                bail!("--year is required with --aggregation platform-month");
            };
            SurfaceAggregation::PlatformMonthCount { year }
        }
        AggregationArg::GenreYear => SurfaceAggregation::GenreYearCount,
        AggregationArg::GenreScore => SurfaceAggregation::GenreAvgScore,
        AggregationArg::GenrePrice => SurfaceAggregation::GenreAvgPrice,
    };
    let mode = match args.surface_mode {
        ModeArg::Square => SurfaceMode::Square,
        ModeArg::Wave => SurfaceMode::Wave {
            window: args.window,
        },
        ModeArg::SmoothWaves => SurfaceMode::SmoothWaves {
            window_x: args.window_x.unwrap_or(args.window),
            window_z: args.window_z.unwrap_or(args.window),
        },
    };

    let sampler = SurfaceSampler::new(games, aggregation);
    let categories = sampler.category_labels();
    let times = sampler.time_labels();

    let mut report = Report::new(
        &format!("Surface: {}", args.aggregation.label()),
        &["x", "z", "category", "time", "height"],
    );
    for x in axis_samples(sampler.category_len(), args.resolution) {
        for z in axis_samples(sampler.time_len(), args.resolution) {
            let height = sampler.sample(x, z, mode);
            report.push_row(vec![
                format!("{x:.2}"),
                format!("{z:.2}"),
                nearest_label(&categories, x),
                nearest_label(&times, z),
                fmt_height(height),
            ]);
        }
    }
    Ok(report)
}

/// Evenly spaced sample coordinates over `[0, len - 1]`; without an
/// explicit resolution, one sample per grid cell.
fn axis_samples(len: usize, resolution: Option<usize>) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    match resolution {
        None => (0..len).map(usize_to_f64).collect(),
        Some(0 | 1) => vec![0.0],
        Some(r) => {
            let span = usize_to_f64(len - 1);
            (0..r)
                .map(|i| span * usize_to_f64(i) / usize_to_f64(r - 1))
                .collect()
        }
    }
}

fn nearest_label(labels: &[String], coord: f64) -> String {
    steamscope_core::numbers::round_to_index(coord, labels.len())
        .and_then(|idx| labels.get(idx).cloned())
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_height(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.4}")
    }
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn write_report(report: &Report, args: &Args) -> Result<()> {
    if let Some(path) = &args.output {
        let file =
            File::create(path).with_context(|| format!("creating report file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        emit(report, &args.report, &mut writer)
    } else {
        emit(report, &args.report, &mut stdout().lock())
    }
}
