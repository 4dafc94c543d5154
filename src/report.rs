use std::fmt::Write;

use crate::anomaly::{self, AnomalyKind};
use crate::filter::EventFilter;
use crate::models::{DailyRow, Dataset, Event, Metrics, MoodLabel};
use crate::summary;

const BAR_WIDTH: usize = 20;

/// Everything one render needs, recomputed from a filtered snapshot.
pub struct DashboardView {
    pub filter: EventFilter,
    pub events: Vec<Event>,
    pub rows: Vec<DailyRow>,
    pub metrics: Metrics,
}

impl DashboardView {
    pub fn compute(dataset: &Dataset, filter: &EventFilter) -> Self {
        let filter = filter.resolve(dataset);
        let events = filter.apply(&dataset.events);
        let rows = anomaly::detect(&events);
        let metrics = summary::metrics(&events);
        tracing::debug!(
            events = events.len(),
            days = rows.len(),
            flagged = rows.iter().filter(|row| row.is_flagged()).count(),
            "dashboard view computed"
        );
        Self {
            filter,
            events,
            rows,
            metrics,
        }
    }
}

pub fn format_optional(value: Option<f64>, signed: bool) -> String {
    match value {
        Some(value) if signed => format!("{value:+.2}"),
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}

pub fn markers(row: &DailyRow) -> String {
    AnomalyKind::ALL
        .iter()
        .filter(|kind| kind.flagged(row))
        .map(AnomalyKind::marker)
        .collect()
}

/// Text bar placing `score` on the [-1, 1] axis with `|` at zero.
pub fn mood_bar(score: f64) -> String {
    let half = BAR_WIDTH / 2;
    let filled = ((score.abs().min(1.0) * half as f64).round() as usize).min(half);
    let mut bar = String::with_capacity(BAR_WIDTH + 1);
    if score < 0.0 {
        bar.push_str(&" ".repeat(half - filled));
        bar.push_str(&"-".repeat(filled));
        bar.push('|');
        bar.push_str(&" ".repeat(half));
    } else {
        bar.push_str(&" ".repeat(half));
        bar.push('|');
        bar.push_str(&"+".repeat(filled));
        bar.push_str(&" ".repeat(half - filled));
    }
    bar
}

pub fn write_metrics(output: &mut String, metrics: &Metrics) {
    let _ = writeln!(output, "- Total Posts Analyzed: {}", metrics.total_events);
    let _ = writeln!(
        output,
        "- Average Mood Score: {}",
        format_optional(metrics.mean_mood_score, false)
    );
    let _ = writeln!(
        output,
        "- Most Common Mood: {}",
        metrics
            .modal_label
            .map_or("n/a", |label| label.as_str())
    );
}

/// Flagged dates grouped by rule; returns whether anything was flagged.
pub fn write_anomalies(output: &mut String, rows: &[DailyRow]) -> bool {
    let mut any = false;
    for kind in AnomalyKind::ALL {
        let flagged = anomaly::flagged_by(rows, kind);
        if flagged.is_empty() {
            continue;
        }
        any = true;
        let _ = writeln!(output, "### {} Detected", kind.title());
        for row in flagged {
            let _ = writeln!(output, "- {}", kind.describe(row));
        }
        let _ = writeln!(output);
    }
    if !any {
        let _ = writeln!(output, "No anomalies detected for this window.");
        let _ = writeln!(output);
    }
    any
}

pub fn build_report(dataset: &Dataset, view: &DashboardView) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Social Mood Dashboard");
    let _ = writeln!(
        output,
        "Snapshot {} loaded {} ({})",
        dataset.snapshot_id,
        dataset.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        view.filter.describe()
    );
    let _ = writeln!(output);

    if !dataset.warnings.is_empty() {
        let _ = writeln!(output, "## Load Warnings");
        for warning in &dataset.warnings {
            let _ = writeln!(
                output,
                "- {} ({}): {}",
                warning.source,
                warning.path.display(),
                warning.message
            );
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "## Summary");
    write_metrics(&mut output, &view.metrics);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Mood Trends Over Time");
    if view.rows.is_empty() {
        let _ = writeln!(output, "No activity in this window.");
    } else {
        let _ = writeln!(
            output,
            "| date | mood | change | volatility | events | trend | flags |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|");
        for row in &view.rows {
            let _ = writeln!(
                output,
                "| {} | {:.2} | {} | {} | {} | `{}` | {} |",
                row.date,
                row.mean_mood_score,
                format_optional(row.mood_change, true),
                format_optional(row.volatility, false),
                row.activity_level,
                mood_bar(row.mean_mood_score),
                markers(row)
            );
        }
        let _ = writeln!(
            output,
            "\nFlags: D = sudden drop, V = high volatility, L = low activity with negative mood"
        );
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Detected Anomalies");
    write_anomalies(&mut output, &view.rows);

    let _ = writeln!(output, "## Mood Distribution by Source");
    let distribution = summary::label_distribution(&view.events);
    if distribution.is_empty() {
        let _ = writeln!(output, "No events recorded for this window.");
    } else {
        for (source, counts) in &distribution {
            let parts: Vec<String> = MoodLabel::ALL
                .iter()
                .map(|label| format!("{} {}", counts.get(label).copied().unwrap_or(0), label))
                .collect();
            let _ = writeln!(output, "- {}: {}", source, parts.join(", "));
        }
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Mood Summary Table");
    let table = summary::summary_table(&view.events);
    if table.is_empty() {
        let _ = writeln!(output, "No events recorded for this window.");
    } else {
        let _ = writeln!(output, "| date | source | negative | neutral | positive |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for row in &table {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                row.date, row.source, row.negative, row.neutral, row.positive
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoadWarning, Source};
    use chrono::{NaiveDate, Utc};
    use std::path::PathBuf;
    use uuid::Uuid;

    fn event(day: u32, source: Source, label: MoodLabel, score: f64) -> Event {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Event::new(timestamp, source, label, score)
    }

    fn dataset(events: Vec<Event>, warnings: Vec<LoadWarning>) -> Dataset {
        Dataset {
            snapshot_id: Uuid::new_v4(),
            fingerprint: "abc".to_string(),
            loaded_at: Utc::now(),
            events,
            warnings,
        }
    }

    #[test]
    fn bar_is_centered_on_zero() {
        assert_eq!(mood_bar(0.0), format!("{}|{}", " ".repeat(10), " ".repeat(10)));
        assert_eq!(mood_bar(1.0), format!("{}|{}", " ".repeat(10), "+".repeat(10)));
        assert_eq!(mood_bar(-0.5), format!("{}{}|{}", " ".repeat(5), "-".repeat(5), " ".repeat(10)));
    }

    #[test]
    fn report_lists_anomalies_and_warnings() {
        let data = dataset(
            vec![
                event(1, Source::Likes, MoodLabel::Positive, 0.5),
                event(1, Source::Likes, MoodLabel::Positive, 0.6),
                event(2, Source::Messages, MoodLabel::Negative, -0.1),
            ],
            vec![LoadWarning {
                source: Source::Reels,
                path: PathBuf::from("data/insta_mood_mock_reels.json"),
                message: "file not found".to_string(),
            }],
        );
        let view = DashboardView::compute(&data, &EventFilter::default());
        let report = build_report(&data, &view);

        assert!(report.contains("## Load Warnings"));
        assert!(report.contains("- reels (data/insta_mood_mock_reels.json): file not found"));
        assert!(report.contains("### Sudden Mood Drops Detected"));
        assert!(report.contains("- 2024-03-02: Mood dropped from 0.55 to -0.10"));
        assert!(report.contains("- Total Posts Analyzed: 3"));
        assert!(report.contains("- Most Common Mood: positive"));
        assert!(report.contains("| 2024-03-02 | messages | 1 | 0 | 0 |"));
    }

    #[test]
    fn empty_window_renders_placeholders() {
        let data = dataset(Vec::new(), Vec::new());
        let view = DashboardView::compute(&data, &EventFilter::default());
        let report = build_report(&data, &view);

        assert!(view.rows.is_empty());
        assert!(report.contains("- Average Mood Score: n/a"));
        assert!(report.contains("- Most Common Mood: n/a"));
        assert!(report.contains("No anomalies detected for this window."));
        assert!(!report.contains("## Load Warnings"));
    }

    #[test]
    fn markers_list_every_rule_that_fired() {
        let data = dataset(
            vec![
                event(1, Source::Ads, MoodLabel::Positive, 0.9),
                event(2, Source::Ads, MoodLabel::Positive, 0.3),
                event(2, Source::Ads, MoodLabel::Negative, -0.95),
            ],
            Vec::new(),
        );
        let view = DashboardView::compute(&data, &EventFilter::default());
        assert_eq!(markers(&view.rows[0]), "");
        assert_eq!(markers(&view.rows[1]), "DVL");
    }
}
