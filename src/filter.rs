use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::FilterError;
use crate::models::{Dataset, Event, Source};

/// Date window (inclusive) and source selection. Absent bounds and an empty
/// source set both mean "everything".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub sources: BTreeSet<Source>,
}

impl EventFilter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>, sources: &[Source]) -> Self {
        Self {
            start,
            end,
            sources: sources.iter().copied().collect(),
        }
    }

    /// Pin open bounds to the dataset's first/last date. Explicit bounds are
    /// clamped into that range only when the window overlaps the data, so a
    /// window outside it stays empty.
    pub fn resolve(&self, dataset: &Dataset) -> EventFilter {
        let Some((min, max)) = dataset.date_bounds() else {
            return self.clone();
        };
        let start = self.start.unwrap_or(min);
        let end = self.end.unwrap_or(max);
        let (start, end) = if start > max || end < min {
            (start, end)
        } else {
            (start.clamp(min, max), end.clamp(min, max))
        };
        EventFilter {
            start: Some(start),
            end: Some(end),
            sources: self.sources.clone(),
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.start.map_or(true, |start| event.date >= start)
            && self.end.map_or(true, |end| event.date <= end)
            && (self.sources.is_empty() || self.sources.contains(&event.source))
    }

    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect()
    }

    pub fn active_sources(&self) -> Vec<Source> {
        if self.sources.is_empty() {
            Source::ALL.to_vec()
        } else {
            self.sources.iter().copied().collect()
        }
    }

    pub fn describe(&self) -> String {
        let start = self
            .start
            .map_or_else(|| "start".to_string(), |date| date.to_string());
        let end = self.end.map_or_else(|| "end".to_string(), |date| date.to_string());
        let sources: Vec<&str> = self.active_sources().iter().map(Source::as_str).collect();
        format!("{start} to {end}, sources: {}", sources.join(", "))
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FilterError::Date(value.to_string()))
}

/// Parse a comma-separated source list, e.g. `likes,reels`.
pub fn parse_sources(value: &str) -> Result<Vec<Source>, FilterError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<Source>().map_err(FilterError::Source))
        .collect()
}
