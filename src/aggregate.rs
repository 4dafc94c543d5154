use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{DailyStats, Event};

/// Group events by calendar date, one row per date in ascending order.
///
/// `mood_change` compares against the previous row present, not the previous
/// calendar day; gaps are not filled.
pub fn daily_stats(events: &[Event]) -> Vec<DailyStats> {
    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for event in events {
        by_date.entry(event.date).or_default().push(event.mood_score);
    }

    let mut rows = Vec::with_capacity(by_date.len());
    let mut previous_mean: Option<f64> = None;

    for (date, mut scores) in by_date {
        // Fixed summation order keeps the output independent of input order.
        scores.sort_by(f64::total_cmp);
        let mean = mean(&scores);
        rows.push(DailyStats {
            date,
            mean_mood_score: mean,
            mood_change: previous_mean.map(|previous| mean - previous),
            volatility: sample_std_dev(&scores, mean),
            activity_level: scores.len(),
        });
        previous_mean = Some(mean);
    }

    rows
}

fn mean(scores: &[f64]) -> f64 {
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Mean summed in sorted order, so equal multisets give bit-identical results.
/// `None` for an empty input.
pub fn ordered_mean(mut scores: Vec<f64>) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    scores.sort_by(f64::total_cmp);
    Some(mean(&scores))
}

/// Sample standard deviation (n - 1); undefined below two observations.
fn sample_std_dev(scores: &[f64], mean: f64) -> Option<f64> {
    if scores.len() < 2 {
        return None;
    }
    let squared: f64 = scores.iter().map(|score| (score - mean).powi(2)).sum();
    Some((squared / (scores.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MoodLabel, Source};

    fn event(day: u32, score: f64) -> Event {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Event::new(timestamp, Source::Likes, MoodLabel::Neutral, score)
    }

    #[test]
    fn empty_input_gives_no_rows() {
        assert!(daily_stats(&[]).is_empty());
    }

    #[test]
    fn rows_sorted_without_duplicates() {
        let events = vec![event(3, 0.1), event(1, 0.2), event(3, 0.3), event(2, 0.0)];
        let rows = daily_stats(&events);
        let dates: Vec<u32> = rows.iter().map(|row| chrono::Datelike::day(&row.date)).collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert_eq!(rows[2].activity_level, 2);
    }

    #[test]
    fn first_row_has_no_change_and_rest_are_exact_differences() {
        let events = vec![event(1, 0.5), event(1, 0.6), event(2, -0.1), event(5, 0.4)];
        let rows = daily_stats(&events);
        assert_eq!(rows[0].mood_change, None);
        for pair in rows.windows(2) {
            assert_eq!(
                pair[1].mood_change,
                Some(pair[1].mean_mood_score - pair[0].mean_mood_score)
            );
        }
        // Day 5 compares to day 2, the previous row present.
        assert!((rows[2].mood_change.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn volatility_needs_two_events() {
        let rows = daily_stats(&[event(1, 0.9), event(1, -0.9), event(2, -0.5)]);
        let spread = rows[0].volatility.unwrap();
        assert!((spread - 1.8_f64 / 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(rows[1].volatility, None);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let forward = vec![event(1, 0.1), event(1, 0.7), event(1, -0.33), event(2, 0.05)];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(daily_stats(&forward), daily_stats(&reversed));
        assert_eq!(daily_stats(&forward), daily_stats(&forward));
    }
}
