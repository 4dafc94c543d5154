//! Raw export shapes, one variant per source, and their mapping into [`Event`]s.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::LoadError;
use crate::models::{Event, Source};
use crate::sentiment::{Sentiment, SentimentScorer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeRecord {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelRecord {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRecord {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RawRecord {
    Like(LikeRecord),
    Reel(ReelRecord),
    Message(MessageRecord),
    Ad(AdRecord),
    Video(VideoRecord),
}

impl RawRecord {
    pub fn source(&self) -> Source {
        match self {
            RawRecord::Like(_) => Source::Likes,
            RawRecord::Reel(_) => Source::Reels,
            RawRecord::Message(_) => Source::Messages,
            RawRecord::Ad(_) => Source::Ads,
            RawRecord::Video(_) => Source::Videos,
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        match self {
            RawRecord::Like(record) => record.timestamp.as_deref(),
            RawRecord::Reel(record) => record.timestamp.as_deref(),
            RawRecord::Message(record) => record.timestamp.as_deref(),
            RawRecord::Ad(record) => record.timestamp.as_deref(),
            RawRecord::Video(record) => record.timestamp.as_deref(),
        }
    }

    /// Text handed to the scorer, or `None` when the source is not scored.
    pub fn scoring_text(&self) -> Option<&str> {
        match self {
            RawRecord::Like(record) => Some(caption_or_content(&record.caption, &record.content)),
            RawRecord::Reel(record) => Some(caption_or_content(&record.caption, &record.content)),
            RawRecord::Message(record) => Some(record.content.as_deref().unwrap_or("")),
            RawRecord::Ad(record) => Some(caption_or_content(&record.caption, &record.content)),
            RawRecord::Video(_) => None,
        }
    }
}

/// Accept any JSON value for a timestamp so a bad one fails the record, not the
/// whole file. Non-strings are kept in their JSON text form and rejected later.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| match value {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => Some(other.to_string()),
    }))
}

fn caption_or_content<'a>(caption: &'a Option<String>, content: &'a Option<String>) -> &'a str {
    match caption.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => content.as_deref().unwrap_or(""),
    }
}

/// Parse the ISO-8601 forms seen in exports. Offsets are dropped and the
/// wall-clock time is kept as written.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, LoadError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| LoadError::Timestamp(value.to_string()))
}

pub fn normalize(record: &RawRecord, scorer: &dyn SentimentScorer) -> Result<Event, LoadError> {
    let raw = record.timestamp().ok_or(LoadError::MissingTimestamp)?;
    let timestamp = parse_timestamp(raw)?;
    let sentiment = match record.scoring_text() {
        Some(text) => scorer.score(text),
        None => Sentiment::neutral(),
    };
    Ok(Event::new(
        timestamp,
        record.source(),
        sentiment.label,
        sentiment.compound,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MoodLabel;

    /// Scores by text length so tests can see which field was used.
    struct LengthScorer;

    impl SentimentScorer for LengthScorer {
        fn score(&self, text: &str) -> Sentiment {
            Sentiment::from_compound(text.len() as f64 / 10.0)
        }
    }

    fn like(caption: Option<&str>, content: Option<&str>) -> RawRecord {
        RawRecord::Like(LikeRecord {
            timestamp: Some("2024-03-01T10:15:00".to_string()),
            caption: caption.map(str::to_string),
            content: content.map(str::to_string),
            account: None,
        })
    }

    #[test]
    fn parses_supported_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-01T10:15:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01 10:15:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T10:15:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T10:15").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-03-01").unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn record_without_timestamp_fails_alone() {
        let record: ReelRecord = serde_json::from_str(r#"{"caption": "hi"}"#).unwrap();
        assert!(record.timestamp.is_none());
        assert!(matches!(
            normalize(&RawRecord::Reel(record), &LengthScorer),
            Err(LoadError::MissingTimestamp)
        ));

        let numeric: VideoRecord = serde_json::from_str(r#"{"timestamp": 42}"#).unwrap();
        assert_eq!(numeric.timestamp.as_deref(), Some("42"));
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(LoadError::Timestamp(_))
        ));
    }

    #[test]
    fn prefers_caption_then_content() {
        let scorer = LengthScorer;
        let from_caption = normalize(&like(Some("abc"), Some("abcdef")), &scorer).unwrap();
        assert!((from_caption.mood_score - 0.3).abs() < 1e-9);

        let empty_caption = normalize(&like(Some(""), Some("abcdef")), &scorer).unwrap();
        assert!((empty_caption.mood_score - 0.6).abs() < 1e-9);

        let nothing = normalize(&like(None, None), &scorer).unwrap();
        assert_eq!(nothing.mood_score, 0.0);
        assert_eq!(nothing.mood_label, MoodLabel::Neutral);
    }

    #[test]
    fn videos_skip_scoring() {
        let record = RawRecord::Video(VideoRecord {
            timestamp: Some("2024-03-02T08:00:00".to_string()),
            title: Some("a very long title that would score high".to_string()),
        });
        let event = normalize(&record, &LengthScorer).unwrap();
        assert_eq!(event.source, Source::Videos);
        assert_eq!(event.mood_label, MoodLabel::Neutral);
        assert_eq!(event.mood_score, 0.0);
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn messages_score_content() {
        let record = RawRecord::Message(MessageRecord {
            timestamp: Some("2024-03-02T08:00:00".to_string()),
            content: Some("abcd".to_string()),
            sender: Some("sam".to_string()),
        });
        let event = normalize(&record, &LengthScorer).unwrap();
        assert_eq!(event.source, Source::Messages);
        assert!((event.mood_score - 0.4).abs() < 1e-9);
    }
}
