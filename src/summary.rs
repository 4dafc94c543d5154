use std::collections::BTreeMap;
use std::io::Write;

use crate::aggregate;
use crate::models::{Event, Metrics, MoodLabel, Source, SummaryRow};

pub const EXPORT_FILE_NAME: &str = "mood_summary.csv";

pub fn metrics(events: &[Event]) -> Metrics {
    let total_events = events.len();
    let mean_mood_score =
        aggregate::ordered_mean(events.iter().map(|event| event.mood_score).collect());

    let mut counts: BTreeMap<MoodLabel, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.mood_label).or_insert(0) += 1;
    }
    // Ties go to the label that sorts first.
    let modal_label = counts
        .iter()
        .fold(None, |best: Option<(MoodLabel, usize)>, (&label, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label);

    Metrics {
        total_events,
        mean_mood_score,
        modal_label,
    }
}

/// Mood label counts per source, only for sources with events.
pub fn label_distribution(events: &[Event]) -> BTreeMap<Source, BTreeMap<MoodLabel, usize>> {
    let mut distribution: BTreeMap<Source, BTreeMap<MoodLabel, usize>> = BTreeMap::new();
    for event in events {
        *distribution
            .entry(event.source)
            .or_default()
            .entry(event.mood_label)
            .or_insert(0) += 1;
    }
    distribution
}

/// Mood label counts per (date, source), ordered by date then source.
pub fn summary_table(events: &[Event]) -> Vec<SummaryRow> {
    let mut rows: BTreeMap<(chrono::NaiveDate, Source), SummaryRow> = BTreeMap::new();
    for event in events {
        rows.entry((event.date, event.source))
            .or_insert_with(|| SummaryRow {
                date: event.date,
                source: event.source,
                negative: 0,
                neutral: 0,
                positive: 0,
            })
            .increment(event.mood_label);
    }
    rows.into_values().collect()
}

pub fn write_summary_csv<W: Write>(rows: &[SummaryRow], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut header = vec!["date", "source"];
    header.extend(MoodLabel::ALL.iter().map(MoodLabel::as_str));
    csv_writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.date.to_string(), row.source.to_string()];
        record.extend(MoodLabel::ALL.iter().map(|label| row.count(*label).to_string()));
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
