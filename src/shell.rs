//! Line-oriented interactive dashboard. Every command is one interaction: the
//! snapshot is fetched through the cache and the view recomputed from scratch.

use std::fs::File;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cache::DatasetCache;
use crate::filter::{self, EventFilter};
use crate::models::Event;
use crate::report::{self, DashboardView};
use crate::sentiment::SentimentScorer;
use crate::summary;

const HELP: &str = "\
commands:
  show                      summary metrics and daily trend
  anomalies                 flagged dates grouped by rule
  range <from> <to>         restrict dates (YYYY-MM-DD, inclusive)
  range all                 clear the date range
  sources <a,b,..>          restrict sources (likes, reels, messages, ads, videos)
  sources all               clear the source selection
  export [path]             write the mood summary CSV
  reload                    drop the cached snapshot
  help                      this text
  quit                      leave";

#[derive(Debug, PartialEq)]
enum Command {
    Show,
    Anomalies,
    Range(Option<(String, String)>),
    Sources(Option<String>),
    Export(Option<PathBuf>),
    Reload,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(String::new());
    };
    let rest: Vec<&str> = parts.collect();

    match (head.to_lowercase().as_str(), rest.as_slice()) {
        ("show", []) => Ok(Command::Show),
        ("anomalies", []) => Ok(Command::Anomalies),
        ("range", ["all"]) => Ok(Command::Range(None)),
        ("range", [from, to]) => Ok(Command::Range(Some((from.to_string(), to.to_string())))),
        ("sources", ["all"]) => Ok(Command::Sources(None)),
        ("sources", list) if !list.is_empty() => Ok(Command::Sources(Some(list.join(",")))),
        ("export", []) => Ok(Command::Export(None)),
        ("export", [path]) => Ok(Command::Export(Some(PathBuf::from(path)))),
        ("reload", []) => Ok(Command::Reload),
        ("help", []) => Ok(Command::Help),
        ("quit", []) | ("exit", []) => Ok(Command::Quit),
        _ => Err(format!("unrecognized command '{}', try 'help'", line.trim())),
    }
}

pub fn run_shell<R, W, S>(
    input: R,
    mut output: W,
    cache: &mut DatasetCache<S>,
    mut current: EventFilter,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    S: SentimentScorer,
{
    writeln!(output, "mood analyzer shell, data from {}", cache.data_dir().display())?;
    writeln!(output, "type 'help' for commands")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) if message.is_empty() => continue,
            Err(message) => {
                writeln!(output, "{message}")?;
                continue;
            }
        };
        tracing::debug!(?command, "shell command");

        match command {
            Command::Quit => break,
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Reload => {
                cache.invalidate();
                writeln!(output, "cache cleared")?;
            }
            Command::Range(None) => {
                current.start = None;
                current.end = None;
                writeln!(output, "date range cleared")?;
            }
            Command::Range(Some((from, to))) => {
                match (filter::parse_date(&from), filter::parse_date(&to)) {
                    (Ok(start), Ok(end)) if start <= end => {
                        current.start = Some(start);
                        current.end = Some(end);
                        writeln!(output, "date range {start} to {end}")?;
                    }
                    (Ok(_), Ok(_)) => writeln!(output, "range start must not be after its end")?,
                    (Err(err), _) | (_, Err(err)) => writeln!(output, "{err}")?,
                }
            }
            Command::Sources(None) => {
                current.sources.clear();
                writeln!(output, "all sources selected")?;
            }
            Command::Sources(Some(list)) => match filter::parse_sources(&list) {
                Ok(sources) => {
                    current.sources = sources.into_iter().collect();
                    writeln!(output, "sources: {}", current.describe())?;
                }
                Err(err) => writeln!(output, "{err}")?,
            },
            Command::Show => {
                let dataset = cache.get_or_load();
                let view = DashboardView::compute(&dataset, &current);
                let mut text = String::new();
                writeln!(output, "window: {}", view.filter.describe())?;
                for warning in &dataset.warnings {
                    writeln!(output, "warning: {}: {}", warning.source, warning.message)?;
                }
                report::write_metrics(&mut text, &view.metrics);
                write!(output, "{text}")?;
                for row in &view.rows {
                    writeln!(
                        output,
                        "{} {:>6.2} {:>6} `{}` {}",
                        row.date,
                        row.mean_mood_score,
                        report::format_optional(row.mood_change, true),
                        report::mood_bar(row.mean_mood_score),
                        report::markers(row)
                    )?;
                }
            }
            Command::Anomalies => {
                let dataset = cache.get_or_load();
                let view = DashboardView::compute(&dataset, &current);
                let mut text = String::new();
                report::write_anomalies(&mut text, &view.rows);
                write!(output, "{text}")?;
            }
            Command::Export(path) => {
                let dataset = cache.get_or_load();
                let view = DashboardView::compute(&dataset, &current);
                let path = path.unwrap_or_else(|| PathBuf::from(summary::EXPORT_FILE_NAME));
                match export_csv(&path, &view.events) {
                    Ok(count) => writeln!(output, "wrote {count} rows to {}", path.display())?,
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "export failed");
                        writeln!(output, "export failed: {err:#}")?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn export_csv(path: &Path, events: &[Event]) -> anyhow::Result<usize> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let rows = summary::summary_table(events);
    summary::write_summary_csv(&rows, file)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(rows.len())
}
