// ABOUTME: Prompt templates for every insight endpoint plus the system prompt
// ABOUTME: Pure string builders; the system prompt is loaded at compile time from markdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # Prompts
//!
//! Prompts are plain functions of their inputs so they can be unit tested and
//! reviewed in one place. The system prompt lives in a markdown file for easy
//! maintenance.

use crate::insights::{ForecastMetrics, SummaryMetrics};
use crate::journal::JournalContent;

/// Wellness assistant system prompt
pub const WELLNESS_SYSTEM_PROMPT: &str = include_str!("wellness_system.md");

/// Get the system prompt sent with every request
#[must_use]
pub fn system_prompt() -> &'static str {
    WELLNESS_SYSTEM_PROMPT.trim()
}

/// System prompt for multi-turn chat, carrying the rendered health context
#[must_use]
pub fn chat_system_prompt(context: &str) -> String {
    format!(
        "{}\n\nThe user's current health data:\n{context}",
        system_prompt()
    )
}

/// Prefix a question with rendered health context
#[must_use]
pub fn with_context(prompt: &str, context: &str) -> String {
    format!("Context:\n{context}\n\nUser: {}", prompt.trim())
}

/// Journal check-in to short insight
#[must_use]
pub fn journal_insight(entry: &JournalContent) -> String {
    let symptoms = if entry.symptoms.is_empty() {
        "None".to_owned()
    } else {
        entry.symptoms.join(", ")
    };
    let goal_completed = entry
        .goal_progress
        .as_ref()
        .is_some_and(|goal| goal.completed);
    let goal_notes = entry
        .goal_progress
        .as_ref()
        .and_then(|goal| goal.notes.as_deref())
        .filter(|notes| !notes.trim().is_empty())
        .unwrap_or("None");

    format!(
        "Given this journal entry, generate a short health insight:\n\
         Date: {}\n\
         Time: {}\n\
         Mood: {}\n\
         Energy: {}\n\
         Symptoms: {symptoms}\n\
         Notes: {}\n\
         Goal Completed: {}\n\
         Goal Notes: {goal_notes}\n\
         \n\
         Return a single helpful paragraph.",
        entry.date.format("%Y-%m-%d"),
        entry.time.trim(),
        entry.mood.as_str(),
        entry.energy.as_str(),
        entry.notes.trim(),
        if goal_completed { "Yes" } else { "No" },
    )
}

/// Relationship between two metrics, answered as a JSON object
#[must_use]
pub fn correlation(x_label: &str, y_label: &str, description: Option<&str>) -> String {
    let context = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| format!("Context: {d}\n"))
        .unwrap_or_default();

    format!(
        "You're a health assistant reviewing data trends.\n\
         \n\
         Relationship: {x_label} and {y_label}\n\
         {context}\
         \n\
         1. Write a short key insight (1-2 sentences) explaining the relationship in plain terms. \
         If a correlation is implied, interpret it clearly.\n\
         2. Then, write a short recommendation (1-2 sentences) on how the user can improve or \
         maintain {y_label}, based on this relationship.\n\
         \n\
         Use clear, friendly language. Respond with only a JSON object of the form \
         {{\"insight\": \"...\", \"recommendation\": \"...\"}}."
    )
}

/// Forecasted metrics to a one or two sentence recommendation
#[must_use]
pub fn forecast(metrics: &ForecastMetrics) -> String {
    format!(
        "You're an AI assistant helping a user interpret health forecast metrics. Based on the \
         following projected values, offer a personalized, 1-2 sentence recommendation to guide \
         their next action. Avoid technical jargon.\n\
         \n\
         Forecasted Health Metrics:\n\
         - Sleep Score: {}\n\
         - HRV: {} ms\n\
         - Resting HR: {} bpm\n\
         - Steps: {}\n\
         - Hydration: {} L\n\
         \n\
         Only return a short, friendly health insight to help them optimize wellness.",
        metrics.sleep_score, metrics.hrv, metrics.resting_hr, metrics.steps, metrics.hydration,
    )
}

/// Current metrics to a brief summary with recommendations
#[must_use]
pub fn health_summary(metrics: &SummaryMetrics) -> String {
    format!(
        "Analyze this user's health and offer a brief summary and recommendations:\n\
         \n\
         - Sleep Score: {}\n\
         - HRV: {}\n\
         - Resting HR: {}\n\
         - Steps: {}\n\
         - Vitamin D: {}\n\
         - LDL: {}",
        metrics.sleep_score,
        metrics.hrv,
        metrics.resting_hr,
        metrics.steps,
        metrics.vitamin_d,
        metrics.ldl,
    )
}
