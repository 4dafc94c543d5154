use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Likes,
    Reels,
    Messages,
    Ads,
    Videos,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Likes,
        Source::Reels,
        Source::Messages,
        Source::Ads,
        Source::Videos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Likes => "likes",
            Source::Reels => "reels",
            Source::Messages => "messages",
            Source::Ads => "ads",
            Source::Videos => "videos",
        }
    }

    /// Export file name for this source inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Source::Likes => "insta_mood_mock_likes.json",
            Source::Reels => "insta_mood_mock_reels.json",
            Source::Messages => "insta_mood_mock_messages.json",
            Source::Ads => "insta_mood_mock_ads_and_interests.json",
            Source::Videos => "insta_mood_mock_watch_history.json",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown source '{value}'"))
    }
}

/// Declaration order is alphabetical; tables and mode tie-breaks rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Negative,
    Neutral,
    Positive,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 3] = [MoodLabel::Negative, MoodLabel::Neutral, MoodLabel::Positive];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Negative => "negative",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Positive => "positive",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub source: Source,
    pub mood_label: MoodLabel,
    pub mood_score: f64,
}

impl Event {
    pub fn new(timestamp: NaiveDateTime, source: Source, mood_label: MoodLabel, mood_score: f64) -> Self {
        Self {
            timestamp,
            date: timestamp.date(),
            source,
            mood_label,
            mood_score,
        }
    }
}

/// Per-date statistics before anomaly classification.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub mean_mood_score: f64,
    pub mood_change: Option<f64>,
    pub volatility: Option<f64>,
    pub activity_level: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub mean_mood_score: f64,
    pub mood_change: Option<f64>,
    pub volatility: Option<f64>,
    pub activity_level: usize,
    pub sudden_drop: bool,
    pub high_volatility: bool,
    pub low_activity: bool,
}

impl DailyRow {
    pub fn is_flagged(&self) -> bool {
        self.sudden_drop || self.high_volatility || self.low_activity
    }

    /// Mean of the row this one was compared against.
    pub fn previous_mean(&self) -> Option<f64> {
        self.mood_change.map(|change| self.mean_mood_score - change)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadWarning {
    pub source: Source,
    pub path: PathBuf,
    pub message: String,
}

/// One loaded snapshot of every source export.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub snapshot_id: Uuid,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub events: Vec<Event>,
    pub warnings: Vec<LoadWarning>,
}

impl Dataset {
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.events.iter().map(|event| event.date).min()?;
        let max = self.events.iter().map(|event| event.date).max()?;
        Some((min, max))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_events: usize,
    pub mean_mood_score: Option<f64>,
    pub modal_label: Option<MoodLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub source: Source,
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

impl SummaryRow {
    pub fn count(&self, label: MoodLabel) -> usize {
        match label {
            MoodLabel::Negative => self.negative,
            MoodLabel::Neutral => self.neutral,
            MoodLabel::Positive => self.positive,
        }
    }

    pub fn increment(&mut self, label: MoodLabel) {
        match label {
            MoodLabel::Negative => self.negative += 1,
            MoodLabel::Neutral => self.neutral += 1,
            MoodLabel::Positive => self.positive += 1,
        }
    }
}
