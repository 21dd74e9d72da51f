// ABOUTME: Health metrics snapshot and the prompt-prefix renderer
// ABOUTME: Pluggable source trait with the shipped mock profile used by every insight prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # Health Context
//!
//! A [`HealthContext`] is rendered into a fixed, line-per-metric block that
//! prefixes context-aware prompts. The data comes from a
//! [`HealthContextSource`]; the shipped [`MockHealthContextSource`] returns a
//! static profile.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

/// Current and target daily water intake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hydration {
    /// Litres consumed today
    pub current: f64,
    /// Daily goal in litres
    pub goal: f64,
}

/// Snapshot of the metrics the insight prompts reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthContext {
    /// Display name
    pub name: String,
    /// Sleep score in percent
    pub sleep_score: u8,
    /// Sleep duration, already formatted (`7h 15m`)
    pub sleep_duration: String,
    /// Heart rate variability in ms
    pub hrv: u32,
    /// Resting heart rate in bpm
    #[serde(rename = "restingHR")]
    pub resting_hr: u32,
    /// Water intake
    pub hydration: Hydration,
    /// Vitamin D in ng/mL
    pub vitamin_d: u32,
    /// LDL cholesterol in mg/dL
    pub ldl: u32,
    /// HDL cholesterol in mg/dL
    pub hdl: u32,
    /// Consecutive days the step goal was met
    pub step_streak: u32,
    /// Consecutive meditation days
    pub meditation_days: u32,
}

impl HealthContext {
    /// The sample profile shown on the dashboard
    #[must_use]
    pub fn sample() -> Self {
        Self {
            name: "Sarah Johnson".to_owned(),
            sleep_score: 89,
            sleep_duration: "7h 15m".to_owned(),
            hrv: 45,
            resting_hr: 75,
            hydration: Hydration {
                current: 1.5,
                goal: 3.0,
            },
            vitamin_d: 20,
            ldl: 145,
            hdl: 45,
            step_streak: 5,
            meditation_days: 5,
        }
    }
}

/// Render the context as one labelled line per metric
///
/// Field order is fixed and the output has no leading or trailing whitespace.
#[must_use]
pub fn build_context(ctx: &HealthContext) -> String {
    format!(
        "Name: {}\n\
         Sleep Score: {}%\n\
         Sleep Duration: {}\n\
         HRV: {} ms\n\
         Resting Heart Rate: {} bpm\n\
         Hydration: {}L (Goal: {}L)\n\
         Vitamin D: {} ng/mL\n\
         LDL Cholesterol: {} mg/dL\n\
         HDL Cholesterol: {} mg/dL\n\
         Step Streak: {} days\n\
         Meditation: {} consecutive days",
        ctx.name.trim(),
        ctx.sleep_score,
        ctx.sleep_duration.trim(),
        ctx.hrv,
        ctx.resting_hr,
        ctx.hydration.current,
        ctx.hydration.goal,
        ctx.vitamin_d,
        ctx.ldl,
        ctx.hdl,
        ctx.step_streak,
        ctx.meditation_days,
    )
}

/// Where health metrics come from
#[async_trait]
pub trait HealthContextSource: Send + Sync {
    /// Load the current snapshot for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot produce a snapshot.
    async fn load(&self, user_id: &str) -> AppResult<HealthContext>;
}

/// Static source returning the same profile for every user
#[derive(Debug, Clone)]
pub struct MockHealthContextSource {
    context: HealthContext,
}

impl MockHealthContextSource {
    /// Source returning `context`
    #[must_use]
    pub const fn new(context: HealthContext) -> Self {
        Self { context }
    }
}

impl Default for MockHealthContextSource {
    fn default() -> Self {
        Self::new(HealthContext::sample())
    }
}

#[async_trait]
impl HealthContextSource for MockHealthContextSource {
    async fn load(&self, _user_id: &str) -> AppResult<HealthContext> {
        Ok(self.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_litres_render_without_decimal() {
        let rendered = build_context(&HealthContext::sample());
        assert!(rendered.contains("Hydration: 1.5L (Goal: 3L)"));
    }
}
