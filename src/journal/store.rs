// ABOUTME: In-memory journal store with ordered CRUD operations
// ABOUTME: Seeded with sample check-ins; shared across handlers behind an async RwLock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    Energy, EntryType, GoalProgress, JournalContent, JournalEntry, Mood, NewJournalEntry,
};
use crate::errors::{AppError, AppResult};

/// Ordered, in-memory journal
///
/// Insertion order is preserved; updates replace in place.
#[derive(Debug, Default)]
pub struct JournalStore {
    entries: RwLock<Vec<JournalEntry>>,
}

impl JournalStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the five sample check-ins
    #[must_use]
    pub fn seeded() -> Self {
        let entries = sample_entries();
        info!(count = entries.len(), "Journal store seeded");
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// All entries in insertion order
    pub async fn list(&self) -> Vec<JournalEntry> {
        self.entries.read().await.clone()
    }

    /// Look up one entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id.
    pub async fn get(&self, id: &str) -> AppResult<JournalEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Append an entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the content is invalid or the id is taken.
    pub async fn add(&self, new_entry: NewJournalEntry) -> AppResult<JournalEntry> {
        new_entry.content.validate()?;

        let id = match new_entry.id.map(|id| id.trim().to_owned()) {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        let mut entries = self.entries.write().await;
        if entries.iter().any(|entry| entry.id == id) {
            return Err(AppError::invalid_input(format!(
                "Journal entry {id} already exists"
            )));
        }

        let entry = JournalEntry {
            id,
            content: new_entry.content,
        };
        entries.push(entry.clone());
        debug!(id = %entry.id, "Journal entry added");
        Ok(entry)
    }

    /// Replace the content of an existing entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id, `InvalidInput` for invalid
    /// content.
    pub async fn update(&self, id: &str, content: JournalContent) -> AppResult<JournalEntry> {
        content.validate()?;

        let mut entries = self.entries.write().await;
        let slot = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| not_found(id))?;
        slot.content = content;
        debug!(id, "Journal entry updated");
        Ok(slot.clone())
    }

    /// Delete an entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id.
    pub async fn remove(&self, id: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let position = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| not_found(id))?;
        entries.remove(position);
        debug!(id, "Journal entry removed");
        Ok(())
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("Journal entry {id}"))
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    (year, month, day): (i32, u32, u32),
    time: &str,
    entry_type: EntryType,
    mood: Mood,
    energy: Energy,
    symptoms: &[&str],
    notes: &str,
    goal_progress: GoalProgress,
) -> Option<JournalEntry> {
    Some(JournalEntry {
        id: id.to_owned(),
        content: JournalContent {
            date: NaiveDate::from_ymd_opt(year, month, day)?,
            time: time.to_owned(),
            entry_type,
            mood,
            energy,
            symptoms: symptoms.iter().map(|s| (*s).to_owned()).collect(),
            notes: notes.to_owned(),
            goal_progress: Some(goal_progress),
        },
    })
}

const fn done() -> GoalProgress {
    GoalProgress {
        completed: true,
        notes: None,
    }
}

fn sample_entries() -> Vec<JournalEntry> {
    [
        sample(
            "1",
            (2025, 3, 28),
            "08:15 AM",
            EntryType::Morning,
            Mood::Happy,
            Energy::Medium,
            &[],
            "Woke up feeling refreshed after a good night's sleep. Looking forward to completing my goals today.",
            done(),
        ),
        sample(
            "2",
            (2025, 3, 27),
            "09:30 PM",
            EntryType::Evening,
            Mood::Neutral,
            Energy::Low,
            &["headache", "stress"],
            "Had a stressful day at work, which left me with a headache in the afternoon. Skipped the gym, but took a short walk in the evening which helped a bit.",
            GoalProgress {
                completed: false,
                notes: Some("Felt too busy to exercise".to_owned()),
            },
        ),
        sample(
            "3",
            (2025, 3, 27),
            "07:45 AM",
            EntryType::Morning,
            Mood::Neutral,
            Energy::Medium,
            &[],
            "Slept okay but woke up once during the night. Feeling a bit tired but ready for the day.",
            done(),
        ),
        sample(
            "4",
            (2025, 3, 26),
            "10:00 PM",
            EntryType::Evening,
            Mood::Happy,
            Energy::Medium,
            &[],
            "Had a productive day. Completed all my goals and had a good workout session. Feeling accomplished.",
            done(),
        ),
        sample(
            "5",
            (2025, 3, 26),
            "08:00 AM",
            EntryType::Morning,
            Mood::VeryHappy,
            Energy::High,
            &[],
            "Woke up energized after 8 hours of sleep. Ready to tackle the day!",
            done(),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
