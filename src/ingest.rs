use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::cache;
use crate::error::LoadError;
use crate::models::{Dataset, Event, LoadWarning, Source};
use crate::records::{
    normalize, AdRecord, Conversation, LikeRecord, MessageRecord, RawRecord, ReelRecord,
    VideoRecord,
};
use crate::sentiment::SentimentScorer;

/// Events for one source plus the records that had to be skipped.
#[derive(Debug, Default)]
pub struct SourceLoad {
    pub events: Vec<Event>,
    pub skipped: Vec<LoadWarning>,
}

/// Load every source export under `data_dir`. A missing or malformed file only
/// drops that source.
pub fn load_dataset(data_dir: &Path, scorer: &dyn SentimentScorer) -> Dataset {
    let fingerprint = cache::fingerprint(data_dir);
    let mut events = Vec::new();
    let mut warnings = Vec::new();

    for source in Source::ALL {
        let path = data_dir.join(source.file_name());
        match load_source(source, &path, scorer) {
            Ok(loaded) => {
                tracing::debug!(
                    source = %source,
                    events = loaded.events.len(),
                    skipped = loaded.skipped.len(),
                    "loaded source"
                );
                events.extend(loaded.events);
                warnings.extend(loaded.skipped);
            }
            Err(err) => {
                tracing::warn!(source = %source, error = %err, "skipping source");
                warnings.push(LoadWarning {
                    source,
                    path,
                    message: err.to_string(),
                });
            }
        }
    }

    let dataset = Dataset {
        snapshot_id: Uuid::new_v4(),
        fingerprint,
        loaded_at: Utc::now(),
        events,
        warnings,
    };
    tracing::info!(
        snapshot = %dataset.snapshot_id,
        events = dataset.events.len(),
        warnings = dataset.warnings.len(),
        "dataset loaded"
    );
    dataset
}

pub fn load_source(
    source: Source,
    path: &Path,
    scorer: &dyn SentimentScorer,
) -> Result<SourceLoad, LoadError> {
    let records = read_records(source, path)?;
    let mut loaded = SourceLoad::default();

    for (index, record) in records.iter().enumerate() {
        match normalize(record, scorer) {
            Ok(event) => loaded.events.push(event),
            Err(err) => {
                tracing::warn!(source = %source, index, error = %err, "skipping record");
                loaded.skipped.push(LoadWarning {
                    source,
                    path: path.to_path_buf(),
                    message: format!("record {index}: {err}"),
                });
            }
        }
    }

    Ok(loaded)
}

fn read_records(source: Source, path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let records = match source {
        Source::Likes => read_json::<Vec<LikeRecord>>(path)?
            .into_iter()
            .map(RawRecord::Like)
            .collect(),
        Source::Reels => read_json::<Vec<ReelRecord>>(path)?
            .into_iter()
            .map(RawRecord::Reel)
            .collect(),
        Source::Messages => read_json::<Vec<Conversation>>(path)?
            .into_iter()
            .flat_map(|conversation| conversation.messages)
            .map(RawRecord::Message)
            .collect(),
        Source::Ads => read_json::<Vec<AdRecord>>(path)?
            .into_iter()
            .map(RawRecord::Ad)
            .collect(),
        Source::Videos => read_json::<Vec<VideoRecord>>(path)?
            .into_iter()
            .map(RawRecord::Video)
            .collect(),
    };
    Ok(records)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = fs::read(path).map_err(|err| LoadError::io(path, err))?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a small, deterministic set of mock exports covering every source.
pub fn seed(data_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(data_dir)?;
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or_else(|| anyhow::anyhow!("invalid seed date"))?;
    let stamp = |day: i64, hour: u32| -> anyhow::Result<String> {
        let date = start + Duration::days(day);
        let moment = date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid seed time"))?;
        Ok(moment.format("%Y-%m-%dT%H:%M:%S").to_string())
    };

    let likes = vec![
        (0, 9, "Loved this sunset, so beautiful"),
        (0, 18, "Great coffee with friends"),
        (1, 12, "Happy birthday to my best friend!"),
        (2, 20, "Awesome concert tonight"),
        (4, 11, "Such a relaxing weekend"),
        (5, 21, "Terrible news today, really sad"),
        (6, 10, "Cute puppy pictures"),
    ]
    .into_iter()
    .map(|(day, hour, caption)| {
        Ok(LikeRecord {
            timestamp: Some(stamp(day, hour)?),
            caption: Some(caption.to_string()),
            content: None,
            account: Some("friend_account".to_string()),
        })
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

    let reels = vec![
        (0, 22, "Funny cat fails lol"),
        (1, 19, "Workout motivation, feeling great"),
        (3, 23, "Why does everything go wrong"),
        (5, 22, "I hate mondays"),
        (6, 20, "Best travel spots ever!"),
    ]
    .into_iter()
    .map(|(day, hour, caption)| {
        Ok(ReelRecord {
            timestamp: Some(stamp(day, hour)?),
            caption: Some(caption.to_string()),
            content: None,
        })
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

    let conversations = vec![
        Conversation {
            participant: Some("alex".to_string()),
            messages: vec![
                message(stamp(1, 8)?, "Good morning! Excited for today", "alex"),
                message(stamp(1, 9)?, "Me too, it will be fun", "me"),
                message(stamp(3, 22)?, "I feel so lonely and tired", "me"),
                message(stamp(3, 23)?, "Sorry to hear that, call me?", "alex"),
            ],
        },
        Conversation {
            participant: Some("jordan".to_string()),
            messages: vec![
                message(stamp(5, 13)?, "This is the worst, I'm so upset", "me"),
                message(stamp(5, 14)?, "That's awful, what happened?", "jordan"),
                message(stamp(6, 9)?, "Thanks for yesterday, you're wonderful", "me"),
            ],
        },
    ];

    let ads = vec![
        (0, 15, "Fitness", "Get fit this summer"),
        (2, 16, "Travel", "Amazing deals on flights"),
        (4, 17, "Finance", "Don't miss out on savings"),
        (6, 14, "Food", "Delicious meals delivered"),
    ]
    .into_iter()
    .map(|(day, hour, interest, content)| {
        Ok(AdRecord {
            timestamp: Some(stamp(day, hour)?),
            caption: None,
            content: Some(content.to_string()),
            interest: Some(interest.to_string()),
        })
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

    let videos = vec![
        (0, 21, "Cooking pasta at home"),
        (2, 21, "Documentary: deep sea"),
        (3, 1, "Late night compilation"),
        (5, 23, "Sad movie scenes"),
    ]
    .into_iter()
    .map(|(day, hour, title)| {
        Ok(VideoRecord {
            timestamp: Some(stamp(day, hour)?),
            title: Some(title.to_string()),
        })
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(vec![
        write_json(data_dir, Source::Likes, &likes)?,
        write_json(data_dir, Source::Reels, &reels)?,
        write_json(data_dir, Source::Messages, &conversations)?,
        write_json(data_dir, Source::Ads, &ads)?,
        write_json(data_dir, Source::Videos, &videos)?,
    ])
}

fn message(timestamp: String, content: &str, sender: &str) -> MessageRecord {
    MessageRecord {
        timestamp: Some(timestamp),
        content: Some(content.to_string()),
        sender: Some(sender.to_string()),
    }
}

fn write_json<T: Serialize>(data_dir: &Path, source: Source, value: &T) -> anyhow::Result<PathBuf> {
    let path = data_dir.join(source.file_name());
    let body = serde_json::to_string_pretty(value)?;
    fs::write(&path, body)?;
    Ok(path)
}
