use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use fern::Dispatch;
use forecast_views::{ExportFormat, ForecastViews, RecordSource, View, DEFAULT_CACHE_MAX_AGE};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compute forecast analytics views over hourly weather CSV drops"
)]
struct Cli {
    /// CSV file (optionally .gz), directory of CSV files, or http(s) URL
    #[arg(short, long, env = "FORECAST_VIEWS_SOURCE")]
    source: String,

    /// View name (e.g. current_weather) or `all`
    #[arg(long, default_value = "all")]
    view: String,

    /// Instant trailing windows are measured from (RFC 3339); defaults to now
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// csv, parquet or json
    #[arg(short, long, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Write one file per view here instead of printing to stdout
    #[arg(short, long, env = "FORECAST_VIEWS_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Where downloaded objects are cached
    #[arg(long, env = "FORECAST_VIEWS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Seconds before a cached download is fetched again
    #[arg(
        long,
        env = "FORECAST_VIEWS_CACHE_MAX_AGE_SECS",
        default_value_t = DEFAULT_CACHE_MAX_AGE.as_secs()
    )]
    cache_max_age_secs: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn setup_logger(level: LevelFilter) -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(level)
        .chain(std::io::stderr())
}

fn selected_views(arg: &str) -> anyhow::Result<Vec<View>> {
    if arg.eq_ignore_ascii_case("all") {
        return Ok(View::ALL.to_vec());
    }
    arg.split(',')
        .map(|name| name.trim().parse::<View>().map_err(anyhow::Error::from))
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logger(log_level(cli.verbose))
        .apply()
        .context("Failed to install logger")?;

    let views = selected_views(&cli.view)?;
    let client = ForecastViews::configured()
        .maybe_cache_folder(cli.cache_dir)
        .cache_max_age(Duration::from_secs(cli.cache_max_age_secs))
        .call()
        .await?;

    let snapshot = client
        .snapshot()
        .source(RecordSource::parse(&cli.source))
        .maybe_as_of(cli.as_of)
        .call()
        .await?;
    info!("Snapshot as of {}: {}", snapshot.as_of(), snapshot.report());

    let results = snapshot.materialize().await?;
    for view in views {
        match &cli.output_dir {
            Some(dir) => {
                let path = results.export(view, cli.format, dir)?;
                println!("{}", path.display());
            }
            None => {
                let df = results.frame(view)?;
                println!("{}\n{}", view, df);
            }
        }
    }
    Ok(())
}
