use crate::aggregate;
use crate::models::{DailyRow, DailyStats, Event};

pub const SUDDEN_DROP_THRESHOLD: f64 = -0.3;
pub const HIGH_VOLATILITY_THRESHOLD: f64 = 0.4;
pub const LOW_ACTIVITY_MAX_EVENTS: usize = 3;
pub const LOW_ACTIVITY_MOOD_THRESHOLD: f64 = -0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    SuddenDrop,
    HighVolatility,
    LowActivity,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 3] = [
        AnomalyKind::SuddenDrop,
        AnomalyKind::HighVolatility,
        AnomalyKind::LowActivity,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AnomalyKind::SuddenDrop => "Sudden Mood Drops",
            AnomalyKind::HighVolatility => "High Mood Volatility",
            AnomalyKind::LowActivity => "Low Activity with Negative Mood",
        }
    }

    pub fn marker(&self) -> char {
        match self {
            AnomalyKind::SuddenDrop => 'D',
            AnomalyKind::HighVolatility => 'V',
            AnomalyKind::LowActivity => 'L',
        }
    }

    pub fn flagged(&self, row: &DailyRow) -> bool {
        match self {
            AnomalyKind::SuddenDrop => row.sudden_drop,
            AnomalyKind::HighVolatility => row.high_volatility,
            AnomalyKind::LowActivity => row.low_activity,
        }
    }

    /// One-line explanation of why `row` was flagged.
    pub fn describe(&self, row: &DailyRow) -> String {
        match self {
            AnomalyKind::SuddenDrop => format!(
                "{}: Mood dropped from {:.2} to {:.2}",
                row.date,
                row.previous_mean().unwrap_or(row.mean_mood_score),
                row.mean_mood_score
            ),
            AnomalyKind::HighVolatility => format!(
                "{}: Volatility = {:.2}",
                row.date,
                row.volatility.unwrap_or_default()
            ),
            AnomalyKind::LowActivity => format!(
                "{}: Activity Level = {}, Mood Score = {:.2}",
                row.date, row.activity_level, row.mean_mood_score
            ),
        }
    }
}

pub fn is_sudden_drop(stats: &DailyStats) -> bool {
    stats
        .mood_change
        .is_some_and(|change| change < SUDDEN_DROP_THRESHOLD)
}

pub fn is_high_volatility(stats: &DailyStats) -> bool {
    stats
        .volatility
        .is_some_and(|spread| spread > HIGH_VOLATILITY_THRESHOLD)
}

pub fn is_low_activity(stats: &DailyStats) -> bool {
    stats.activity_level < LOW_ACTIVITY_MAX_EVENTS
        && stats.mean_mood_score < LOW_ACTIVITY_MOOD_THRESHOLD
}

/// Apply the three independent rules to one day.
pub fn classify(stats: DailyStats) -> DailyRow {
    let sudden_drop = is_sudden_drop(&stats);
    let high_volatility = is_high_volatility(&stats);
    let low_activity = is_low_activity(&stats);
    DailyRow {
        date: stats.date,
        mean_mood_score: stats.mean_mood_score,
        mood_change: stats.mood_change,
        volatility: stats.volatility,
        activity_level: stats.activity_level,
        sudden_drop,
        high_volatility,
        low_activity,
    }
}

/// Aggregate and classify in one pass.
pub fn detect(events: &[Event]) -> Vec<DailyRow> {
    aggregate::daily_stats(events)
        .into_iter()
        .map(classify)
        .collect()
}

pub fn flagged_by(rows: &[DailyRow], kind: AnomalyKind) -> Vec<&DailyRow> {
    rows.iter().filter(|row| kind.flagged(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MoodLabel, Source};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn event(day: u32, score: f64) -> Event {
        let timestamp = date(day).and_hms_opt(12, 0, 0).unwrap();
        Event::new(timestamp, Source::Messages, MoodLabel::Neutral, score)
    }

    fn stats(
        mean: f64,
        change: Option<f64>,
        volatility: Option<f64>,
        activity_level: usize,
    ) -> DailyStats {
        DailyStats {
            date: date(1),
            mean_mood_score: mean,
            mood_change: change,
            volatility,
            activity_level,
        }
    }

    #[test]
    fn drop_after_positive_day() {
        let rows = detect(&[event(1, 0.5), event(1, 0.6), event(2, -0.1)]);
        assert!((rows[1].mood_change.unwrap() - (-0.65)).abs() < 1e-9);
        assert!(rows[1].sudden_drop);
        assert!(!rows[0].sudden_drop);
    }

    #[test]
    fn wide_swings_flag_volatility() {
        let rows = detect(&[event(1, 0.9), event(1, -0.9)]);
        assert_eq!(rows[0].mean_mood_score, 0.0);
        assert!((rows[0].volatility.unwrap() - 1.2728).abs() < 1e-3);
        assert!(rows[0].high_volatility);
        assert!(!rows[0].low_activity);
    }

    #[test]
    fn sparse_negative_day() {
        let rows = detect(&[event(1, -0.3), event(1, -0.4)]);
        assert!((rows[0].mean_mood_score - (-0.35)).abs() < 1e-12);
        assert_eq!(rows[0].activity_level, 2);
        assert!(rows[0].low_activity);
        assert!(!rows[0].high_volatility);
        assert!(!rows[0].sudden_drop);
    }

    #[test]
    fn single_event_never_volatile() {
        let rows = detect(&[event(1, 1.0), event(2, -1.0)]);
        assert!(rows.iter().all(|row| !row.high_volatility));
        assert!(rows[1].sudden_drop);
        assert!(rows[1].low_activity);
    }

    #[test]
    fn thresholds_are_strict() {
        assert!(!is_sudden_drop(&stats(0.0, Some(-0.3), None, 5)));
        assert!(is_sudden_drop(&stats(0.0, Some(-0.300_001), None, 5)));
        assert!(!is_high_volatility(&stats(0.0, None, Some(0.4), 5)));
        assert!(is_high_volatility(&stats(0.0, None, Some(0.400_001), 5)));
        assert!(!is_low_activity(&stats(-0.2, None, None, 1)));
        assert!(!is_low_activity(&stats(-0.9, None, None, 3)));
        assert!(is_low_activity(&stats(-0.21, None, None, 2)));
    }

    #[test]
    fn undefined_statistics_never_fire() {
        let row = classify(stats(-0.1, None, None, 10));
        assert!(!row.sudden_drop);
        assert!(!row.high_volatility);
        assert!(!row.is_flagged());
    }

    #[test]
    fn all_three_rules_can_co_fire() {
        let row = classify(stats(-0.5, Some(-0.8), Some(0.6), 2));
        assert!(row.sudden_drop && row.high_volatility && row.low_activity);
        assert_eq!(flagged_by(&[row.clone()], AnomalyKind::HighVolatility).len(), 1);
    }

    #[test]
    fn descriptions_use_previous_mean() {
        let row = classify(stats(-0.1, Some(-0.65), None, 1));
        assert_eq!(
            AnomalyKind::SuddenDrop.describe(&row),
            "2024-03-01: Mood dropped from 0.55 to -0.10"
        );
        assert_eq!(
            AnomalyKind::LowActivity.describe(&classify(stats(-0.35, None, Some(0.07), 2))),
            "2024-03-01: Activity Level = 2, Mood Score = -0.35"
        );
    }
}
