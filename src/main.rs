use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

mod aggregate;
mod anomaly;
mod cache;
mod config;
mod error;
mod filter;
mod ingest;
mod models;
mod records;
mod report;
mod sentiment;
mod shell;
mod summary;

use cache::DatasetCache;
use config::Settings;
use filter::EventFilter;
use models::Source;
use report::DashboardView;
use sentiment::LexiconScorer;

#[derive(Parser)]
#[command(name = "mood-analyzer")]
#[command(about = "Mood trends and anomalies from exported social-media activity", long_about = None)]
struct Cli {
    /// Directory holding the per-source JSON exports
    #[arg(long, global = true, env = "MOOD_DATA_DIR", default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Log filter, e.g. "info" or "social_mood_analyzer=debug"
    #[arg(long, global = true, env = "MOOD_LOG", default_value = config::DEFAULT_LOG_LEVEL)]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Restrict to these sources; repeat for several
    #[arg(long = "source", value_enum)]
    sources: Vec<Source>,
}

impl FilterArgs {
    fn into_filter(self) -> anyhow::Result<EventFilter> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            anyhow::ensure!(from <= to, "--from {from} is after --to {to}");
        }
        Ok(EventFilter::new(self.from, self.to, &self.sources))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write sample exports for every source into the data directory
    Seed,
    /// Write the markdown dashboard
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Print flagged dates grouped by anomaly rule
    Anomalies {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Export mood label counts per date and source as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = summary::EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Interactive dashboard reading commands from stdin
    Shell {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.data_dir, cli.log_level);
    config::init_logging(&settings.log_level);

    let missing = settings.missing_sources();
    if !missing.is_empty() && !matches!(cli.command, Commands::Seed) {
        tracing::warn!(
            data_dir = %settings.data_dir().display(),
            missing = ?missing,
            "some source exports are missing"
        );
    }

    let mut cache = DatasetCache::new(settings.data_dir(), LexiconScorer::new());

    match cli.command {
        Commands::Seed => {
            let written = ingest::seed(settings.data_dir())
                .with_context(|| format!("failed to seed {}", settings.data_dir().display()))?;
            println!(
                "Wrote {} sample exports to {}.",
                written.len(),
                settings.data_dir().display()
            );
        }
        Commands::Report { filter, out } => {
            let filter = filter.into_filter()?;
            let dataset = cache.get_or_load();
            let view = DashboardView::compute(&dataset, &filter);
            let report = report::build_report(&dataset, &view);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dashboard written to {}.", out.display());
        }
        Commands::Anomalies { filter } => {
            let filter = filter.into_filter()?;
            let dataset = cache.get_or_load();
            let view = DashboardView::compute(&dataset, &filter);

            for warning in &dataset.warnings {
                eprintln!("Warning: {} ({}): {}", warning.source, warning.path.display(), warning.message);
            }
            if view.events.is_empty() {
                println!("No events found for this window.");
                return Ok(());
            }

            let mut text = String::new();
            report::write_metrics(&mut text, &view.metrics);
            text.push('\n');
            report::write_anomalies(&mut text, &view.rows);
            print!("{text}");
        }
        Commands::Export { filter, out } => {
            let filter = filter.into_filter()?;
            let dataset = cache.get_or_load();
            let view = DashboardView::compute(&dataset, &filter);
            let rows = summary::summary_table(&view.events);
            let file = File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            summary::write_summary_csv(&rows, file)?;
            println!("Exported {} summary rows to {}.", rows.len(), out.display());
        }
        Commands::Shell { filter } => {
            let filter = filter.into_filter()?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            shell::run_shell(stdin.lock(), stdout.lock(), &mut cache, filter)?;
        }
    }

    Ok(())
}
