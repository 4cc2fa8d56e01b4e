use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use kundali_base::dasha::DashaPeriod;
use kundali_engine::{
    ChartEngine, ChartError, ChartOptions, ChartPool, ChartReport, ChartRequest, EngineConfig,
    NodeMode, active_periods,
};
use kundali_time::{
    CivilDate, FixedOffsetResolver, GeoLocation, Instant, LocalMeanTimeResolver, TimeOfDay,
    TimezoneResolver, UtcOffset, calendar_to_jd,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kundali", about = "Sidereal birth-chart calculator", version)]
struct Cli {
    /// TOML engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Compact single-line JSON
    #[arg(long, global = true)]
    compact: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Positions, houses, divisional charts and aspects
    Chart {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        chart: ChartArgs,
        /// Also include dasha, strength and yogas
        #[arg(long)]
        full: bool,
    },
    /// Vimshottari dasha tree from birth
    Dasha {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        chart: ChartArgs,
        /// Levels to expand (1 = Maha only)
        #[arg(long)]
        depth: Option<u8>,
        /// Window length in years from birth
        #[arg(long)]
        years: Option<f64>,
        /// Only the periods running on this date (YYYY-MM-DD, UT noon)
        #[arg(long)]
        at: Option<String>,
    },
    /// Shadbala and ashtakavarga
    Strength {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Yoga catalog matches
    Yogas {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Compute many charts on the worker pool
    Batch {
        /// JSON array of birth records
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        chart: ChartArgs,
    },
}

#[derive(Args, Clone)]
struct BirthArgs {
    /// Civil date, YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// Local clock time, hh:mm or hh:mm:ss; omit when unknown
    #[arg(long)]
    time: Option<String>,
    /// UTC offset in hours, e.g. 5.5
    #[arg(long, allow_hyphen_values = true, conflicts_with = "lmt")]
    utc_offset: Option<f64>,
    /// Use local mean time for the place
    #[arg(long)]
    lmt: bool,
    /// Geodetic latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    /// Geodetic longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
}

/// Overrides for the `[chart]` config section.
#[derive(Args, Clone, Default)]
struct ChartArgs {
    /// Ayanamsha key, e.g. lahiri, raman, true_lahiri
    #[arg(long)]
    ayanamsha: Option<String>,
    /// whole_sign, equal, sripati or placidus
    #[arg(long)]
    houses: Option<String>,
    /// Comma-separated divisions, e.g. 1,9,10
    #[arg(long, value_delimiter = ',')]
    divisions: Option<Vec<u16>>,
    /// Use the true lunar node for Rahu
    #[arg(long)]
    true_node: bool,
}

/// One record of a batch input file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BirthRecord {
    #[serde(default)]
    label: Option<String>,
    date: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    utc_offset: Option<f64>,
    #[serde(default)]
    lmt: bool,
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct BatchEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ActiveDasha {
    query_jd: f64,
    periods: Vec<DashaPeriod>,
}

fn parse_date(s: &str) -> Result<CivilDate, ChartError> {
    let parts: Vec<&str> = s.trim().split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        return Err(ChartError::InvalidInstant(format!("expected YYYY-MM-DD, got {s}")));
    };
    let bad = |e: std::num::ParseIntError| ChartError::InvalidInstant(format!("{s}: {e}"));
    Ok(CivilDate::new(y.parse().map_err(bad)?, m.parse().map_err(bad)?, d.parse().map_err(bad)?)?)
}

fn parse_time(s: &str) -> Result<TimeOfDay, ChartError> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let (h, m, sec) = match parts.as_slice() {
        [h, m] => (*h, *m, "0"),
        [h, m, sec] => (*h, *m, *sec),
        _ => {
            return Err(ChartError::InvalidInstant(format!("expected hh:mm[:ss], got {s}")));
        }
    };
    let bad = |e: String| ChartError::InvalidInstant(format!("{s}: {e}"));
    let hour = h.parse().map_err(|e: std::num::ParseIntError| bad(e.to_string()))?;
    let minute = m.parse().map_err(|e: std::num::ParseIntError| bad(e.to_string()))?;
    let second = sec.parse().map_err(|e: std::num::ParseFloatError| bad(e.to_string()))?;
    Ok(TimeOfDay::new(hour, minute, second)?)
}

fn build_instant(
    date: &str,
    time: Option<&str>,
    utc_offset: Option<f64>,
    lmt: bool,
    lat: f64,
    lon: f64,
) -> Result<Instant, ChartError> {
    let date = parse_date(date)?;
    let time = time.map(parse_time).transpose()?;
    let location = GeoLocation::new(lat, lon)?;
    let resolver: Box<dyn TimezoneResolver> = match (utc_offset, lmt) {
        (_, true) => Box::new(LocalMeanTimeResolver),
        (Some(hours), false) => Box::new(FixedOffsetResolver(UtcOffset::from_hours(hours)?)),
        (None, false) => {
            return Err(ChartError::UnresolvedTimezone(
                "pass --utc-offset or --lmt".to_string(),
            ));
        }
    };
    Ok(Instant::resolve(date, time, location, resolver.as_ref())?)
}

impl BirthArgs {
    fn instant(&self) -> Result<Instant, ChartError> {
        build_instant(&self.date, self.time.as_deref(), self.utc_offset, self.lmt, self.lat, self.lon)
    }
}

impl BirthRecord {
    fn instant(&self) -> Result<Instant, ChartError> {
        build_instant(&self.date, self.time.as_deref(), self.utc_offset, self.lmt, self.lat, self.lon)
    }
}

fn load_config(path: Option<&Path>, overrides: &ChartArgs) -> Result<EngineConfig, ChartError> {
    let mut config = match path {
        Some(p) => EngineConfig::from_file(p)?,
        None => EngineConfig::default(),
    };
    if let Some(a) = &overrides.ayanamsha {
        config.chart.ayanamsha = a.clone();
    }
    if let Some(h) = &overrides.houses {
        config.chart.house_system = h.clone();
    }
    if let Some(d) = &overrides.divisions {
        config.chart.divisions = d.clone();
    }
    if overrides.true_node {
        config.chart.node_mode = NodeMode::True;
    }
    config.validate()?;
    Ok(config)
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String, ChartError> {
    let out = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    out.map_err(|e| ChartError::Serialization(e.to_string()))
}

fn run(cli: Cli) -> Result<String, ChartError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Chart { birth, chart, full } => {
            let config = load_config(config_path, &chart)?;
            let options = config.chart_options()?;
            let instant = birth.instant()?;
            let engine = ChartEngine::from_config(&config)?;
            let report = if full {
                engine.full_report(&instant, &options)?
            } else {
                ChartReport::new(&*engine.compute_chart(&instant, &options)?)
            };
            to_json(&report, cli.compact)
        }
        Commands::Dasha {
            birth,
            chart,
            depth,
            years,
            at,
        } => {
            let mut config = load_config(config_path, &chart)?;
            if let Some(d) = depth {
                config.dasha.max_depth = d;
            }
            if let Some(y) = years {
                config.dasha.window_years = y;
            }
            config.validate()?;
            let options = config.chart_options()?;
            let instant = birth.instant()?;
            let engine = ChartEngine::from_config(&config)?;
            let chart = engine.compute_chart(&instant, &options)?;
            match at {
                Some(day) => {
                    let d = parse_date(&day)?;
                    let query_jd = calendar_to_jd(d.year, d.month, f64::from(d.day) + 0.5);
                    let periods = active_periods(
                        chart.moon_sidereal_deg(),
                        &instant,
                        query_jd,
                        config.dasha.max_depth,
                    )?;
                    to_json(&ActiveDasha { query_jd, periods }, cli.compact)
                }
                None => {
                    let tree = engine.default_dasha(&chart)?;
                    let report = ChartReport::new(&chart).with_dasha(&tree);
                    to_json(&report.dasha, cli.compact)
                }
            }
        }
        Commands::Strength { birth, chart } => {
            let config = load_config(config_path, &chart)?;
            let options = config.chart_options()?;
            let engine = ChartEngine::from_config(&config)?;
            let chart = engine.compute_chart(&birth.instant()?, &options)?;
            let report = ChartReport::new(&chart).with_strength(&engine.strength(&chart));
            to_json(&report.strength, cli.compact)
        }
        Commands::Yogas { birth, chart } => {
            let config = load_config(config_path, &chart)?;
            let options = config.chart_options()?;
            let engine = ChartEngine::from_config(&config)?;
            let chart = engine.compute_chart(&birth.instant()?, &options)?;
            let strengths = engine.strength(&chart);
            let report = ChartReport::new(&chart).with_yogas(engine.yogas(&chart, &strengths));
            to_json(&report.yogas, cli.compact)
        }
        Commands::Batch { input, chart } => {
            let config = load_config(config_path, &chart)?;
            let options = config.chart_options()?;
            let text = std::fs::read_to_string(&input).map_err(|e| {
                ChartError::Config(format!("failed to read {}: {e}", input.display()))
            })?;
            let records: Vec<BirthRecord> = serde_json::from_str(&text)
                .map_err(|e| ChartError::Config(format!("{}: {e}", input.display())))?;
            debug!(records = records.len(), "batch loaded");
            run_batch(&config, &options, records, cli.compact)
        }
    }
}

fn run_batch(
    config: &EngineConfig,
    options: &ChartOptions,
    records: Vec<BirthRecord>,
    compact: bool,
) -> Result<String, ChartError> {
    let pool = ChartPool::from_config(config)?;
    let mut slots: Vec<Result<(), ChartError>> = Vec::with_capacity(records.len());
    let mut requests = Vec::new();
    for record in &records {
        match record.instant() {
            Ok(instant) => {
                requests.push(ChartRequest {
                    instant,
                    options: options.clone(),
                });
                slots.push(Ok(()));
            }
            Err(e) => slots.push(Err(e)),
        }
    }
    let mut replies = pool.run_batch(requests).into_iter();
    let engine = Arc::clone(pool.engine());
    let mut entries = Vec::with_capacity(records.len());
    for (record, slot) in records.into_iter().zip(slots) {
        let outcome = slot.and_then(|()| replies.next().unwrap_or(Err(ChartError::PoolClosed)));
        let entry = match outcome {
            Ok(chart) => {
                let strengths = engine.strength(&chart);
                let report = ChartReport::new(&chart)
                    .with_strength(&strengths)
                    .with_yogas(engine.yogas(&chart, &strengths));
                BatchEntry {
                    label: record.label,
                    chart: Some(report),
                    error: None,
                }
            }
            Err(e) => BatchEntry {
                label: record.label,
                chart: None,
                error: Some(e.to_string()),
            },
        };
        entries.push(entry);
    }
    to_json(&entries, compact)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,kundali_engine=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(request_error = e.is_request_error(), "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
