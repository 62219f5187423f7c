//! CLI entry point for the bikeshare explorer.
//!
//! Runs the interactive session by default; `stats` and `rows` answer a
//! single query non-interactively.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare::city::{City, DayFilter, MonthFilter};
use bikeshare::config::Config;
use bikeshare::filter::FilterCriteria;
use bikeshare::loader::CsvDirectory;
use bikeshare::output::{export_view, to_json, write_page, write_report};
use bikeshare::prompt::{Pager, Session};
use bikeshare::query::Explorer;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding the city CSV files
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Rows per page when listing trips
    #[arg(short, long, global = true)]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively choose filters, view statistics and page through trips
    Explore,
    /// Print statistics for one city, month and day
    Stats {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print JSON instead of the text report
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write the matching trips to this CSV file
        #[arg(short, long, value_name = "CSV")]
        export: Option<PathBuf>,
    },
    /// Print one page of the matching trips
    Rows {
        #[command(flatten)]
        filters: FilterArgs,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// chicago, "new york city" or washington
    #[arg(short, long)]
    city: City,

    /// Month name, or "all"
    #[arg(short, long, default_value = "all")]
    month: MonthFilter,

    /// Day of the week, or "all"
    #[arg(short = 'w', long, default_value = "all")]
    day: DayFilter,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            city: self.city,
            month: self.month,
            day: self.day,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(size) = cli.page_size {
        config.page_size = size.max(1);
    }

    // Logging setup: stderr + JSON rolling log file
    let log_dir = config
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    info!(data_dir = %config.data_dir.display(), page_size = config.page_size, "Starting");

    let mut explorer = Explorer::new(CsvDirectory::new(&config.data_dir));
    let stdout = io::stdout();

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = io::stdin();
            Session::new(stdin.lock(), stdout.lock(), explorer)
                .with_page_size(config.page_size)
                .run()?;
        }
        Commands::Stats {
            filters,
            json,
            export,
        } => {
            let outcome = explorer
                .run_query(&filters.criteria())
                .with_context(|| format!("no statistics for {}", filters.city))?;
            let mut out = stdout.lock();
            if json {
                writeln!(out, "{}", to_json(&outcome.stats)?)?;
            } else {
                write_report(&mut out, &outcome.stats)?;
            }
            if let Some(path) = export {
                let written = export_view(&path, &outcome.view)?;
                writeln!(out, "Wrote {written} trips to {}", path.display())?;
            }
        }
        Commands::Rows { filters, page } => {
            let outcome = explorer
                .run_query(&filters.criteria())
                .with_context(|| format!("no trips for {}", filters.city))?;
            let range = Pager::new(config.page_size).page_range(page, outcome.trip_count());
            let mut out = stdout.lock();
            match range {
                Some(range) => {
                    write_page(&mut out, &outcome.view, range)?;
                }
                None => writeln!(
                    out,
                    "Page {page} is past the last of {} trips",
                    outcome.trip_count()
                )?,
            }
        }
    }

    Ok(())
}
