//! Content calendar: every item is either ready to schedule or scheduled on a
//! day. The two lists the UI shows are projections of one map, so an item can
//! never sit in both.

use crate::content::{self, ContentItem, Pillar};
use crate::error::{Result, StudioError};
use crate::paths;
use crate::types::ContentStatus;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentState {
    Ready,
    Scheduled { date: NaiveDate },
}

impl ContentState {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            ContentState::Ready => None,
            ContentState::Scheduled { date } => Some(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    item: ContentItem,
    state: ContentState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CalendarFile", into = "CalendarFile")]
pub struct Calendar {
    entries: Vec<Entry>,
}

/// On-disk shape: the two arrays the dashboard has always mirrored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CalendarFile {
    #[serde(default)]
    ready: Vec<ContentItem>,
    #[serde(default)]
    scheduled: Vec<ContentItem>,
}

impl From<CalendarFile> for Calendar {
    fn from(file: CalendarFile) -> Self {
        let mut cal = Calendar::default();
        for item in file.scheduled {
            match item.scheduled_date {
                Some(date) if cal.position(&item.id).is_none() => {
                    cal.entries.push(Entry {
                        item,
                        state: ContentState::Scheduled { date },
                    });
                }
                None if cal.position(&item.id).is_none() => cal.push_ready(item),
                _ => tracing::warn!(id = %item.id, "dropping duplicate scheduled calendar item"),
            }
        }
        for item in file.ready {
            if cal.position(&item.id).is_some() {
                tracing::warn!(id = %item.id, "item is both ready and scheduled; keeping scheduled");
                continue;
            }
            cal.push_ready(item);
        }
        cal
    }
}

impl From<Calendar> for CalendarFile {
    fn from(cal: Calendar) -> Self {
        let mut file = CalendarFile::default();
        for entry in cal.entries {
            match entry.state {
                ContentState::Ready => file.ready.push(entry.item),
                ContentState::Scheduled { .. } => file.scheduled.push(entry.item),
            }
        }
        file
    }
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self, id: &str) -> Option<ContentState> {
        self.position(id).map(|i| self.entries[i].state)
    }

    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.position(id).map(|i| &self.entries[i].item)
    }

    /// Items waiting for a date, in insertion order.
    pub fn ready(&self) -> Vec<&ContentItem> {
        self.entries
            .iter()
            .filter(|e| e.state == ContentState::Ready)
            .map(|e| &e.item)
            .collect()
    }

    /// Scheduled items, ordered by date (stable within a day).
    pub fn scheduled(&self) -> Vec<&ContentItem> {
        let mut items: Vec<(NaiveDate, &ContentItem)> = self
            .entries
            .iter()
            .filter_map(|e| e.state.date().map(|d| (d, &e.item)))
            .collect();
        items.sort_by_key(|(d, _)| *d);
        items.into_iter().map(|(_, item)| item).collect()
    }

    pub fn add_ready(&mut self, item: ContentItem) -> Result<()> {
        paths::validate_id(&item.id)?;
        if self.position(&item.id).is_some() {
            return Err(StudioError::ContentExists(item.id));
        }
        self.push_ready(item);
        Ok(())
    }

    /// Assign `date` to an item. Scheduling an already scheduled item moves it.
    pub fn schedule(&mut self, id: &str, date: NaiveDate) -> Result<&ContentItem> {
        let i = self.require(id)?;
        let entry = &mut self.entries[i];
        entry.state = ContentState::Scheduled { date };
        entry.item.scheduled_date = Some(date);
        entry.item.status = ContentStatus::Scheduled;
        tracing::debug!(id, %date, "scheduled content");
        Ok(&entry.item)
    }

    /// Return an item to the ready list. No-op when it is already ready.
    pub fn unschedule(&mut self, id: &str) -> Result<&ContentItem> {
        let i = self.require(id)?;
        let entry = &mut self.entries[i];
        if entry.state != ContentState::Ready {
            entry.state = ContentState::Ready;
            entry.item.scheduled_date = None;
            entry.item.status = ContentStatus::Ready;
            tracing::debug!(id, "unscheduled content");
        }
        Ok(&entry.item)
    }

    pub fn remove(&mut self, id: &str) -> Result<ContentItem> {
        let i = self.require(id)?;
        Ok(self.entries.remove(i).item)
    }

    pub fn on_day(&self, date: NaiveDate) -> Vec<&ContentItem> {
        self.entries
            .iter()
            .filter(|e| e.state.date() == Some(date))
            .map(|e| &e.item)
            .collect()
    }

    /// Scheduled items in a calendar month grouped by day.
    pub fn month(&self, year: i32, month: u32) -> Result<BTreeMap<NaiveDate, Vec<&ContentItem>>> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(StudioError::InvalidDate(format!("{year}-{month:02}")));
        }
        let mut days: BTreeMap<NaiveDate, Vec<&ContentItem>> = BTreeMap::new();
        for entry in &self.entries {
            if let Some(date) = entry.state.date() {
                if date.year() == year && date.month() == month {
                    days.entry(date).or_default().push(&entry.item);
                }
            }
        }
        Ok(days)
    }

    /// Scheduled items whose day has already passed.
    pub fn overdue(&self, today: NaiveDate) -> Vec<&ContentItem> {
        self.scheduled()
            .into_iter()
            .filter(|item| item.scheduled_date.is_some_and(|d| d < today))
            .collect()
    }

    fn push_ready(&mut self, mut item: ContentItem) {
        item.scheduled_date = None;
        if item.status == ContentStatus::Scheduled {
            item.status = ContentStatus::Ready;
        }
        self.entries.push(Entry {
            item,
            state: ContentState::Ready,
        });
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.item.id == id)
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| StudioError::ContentNotFound(id.to_string()))
    }
}

/// Copy a pillar's content item onto the calendar's ready list.
pub fn send_to_calendar(
    pillars: &[Pillar],
    calendar: &mut Calendar,
    pillar_id: &str,
    content_id: &str,
) -> Result<()> {
    let item = content::find_content(pillars, pillar_id, content_id)?.clone();
    calendar.add_ready(item)
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| StudioError::InvalidDate(s.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
