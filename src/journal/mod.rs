// ABOUTME: Journal entry model shared by the journal store and the journal insight prompt
// ABOUTME: Mood, energy, and goal-progress types with camelCase JSON and field validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # Journal
//!
//! Daily check-ins written by the user. Entries are held by the in-memory
//! [`JournalStore`] and can be turned into a short insight.

mod store;

pub use store::JournalStore;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Wire format of the entry time
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Kind of check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    /// Morning check-in
    Morning,
    /// Evening reflection
    Evening,
    /// Free-form entry
    Custom,
}

/// Self-reported mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    /// Very happy
    VeryHappy,
    /// Happy
    Happy,
    /// Neutral
    Neutral,
    /// Sad
    Sad,
    /// Very sad
    VerySad,
}

impl Mood {
    /// Wire name, also used in prompts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryHappy => "very-happy",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::VerySad => "very-sad",
        }
    }
}

/// Self-reported energy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Energy {
    /// High
    High,
    /// Medium
    Medium,
    /// Low
    Low,
    /// Very low
    VeryLow,
}

impl Energy {
    /// Wire name, also used in prompts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very-low",
        }
    }
}

/// Whether the day's goal was met
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Goal completed
    pub completed: bool,
    /// Optional remark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Everything an entry says, without its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalContent {
    /// Calendar day, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Wall-clock time, `HH:MM AM/PM`
    pub time: String,
    /// Kind of check-in
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Mood
    pub mood: Mood,
    /// Energy
    pub energy: Energy,
    /// Reported symptoms
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Free text
    #[serde(default)]
    pub notes: String,
    /// Goal progress, if tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_progress: Option<GoalProgress>,
}

impl JournalContent {
    /// Check the fields serde cannot check on its own
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error if the time is not `HH:MM AM/PM` or a
    /// symptom is blank.
    pub fn validate(&self) -> AppResult<()> {
        NaiveTime::parse_from_str(self.time.trim(), TIME_FORMAT).map_err(|_| {
            AppError::invalid_input(format!(
                "time '{}' must use the HH:MM AM/PM format",
                self.time
            ))
        })?;

        if self.symptoms.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::invalid_input("symptoms must not contain blank values"));
        }

        Ok(())
    }
}

/// A stored journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: String,
    /// Entry body
    #[serde(flatten)]
    pub content: JournalContent,
}

/// Body of a create request; the id is generated when omitted
#[derive(Debug, Clone, Deserialize)]
pub struct NewJournalEntry {
    /// Caller-chosen identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Entry body
    #[serde(flatten)]
    pub content: JournalContent,
}
