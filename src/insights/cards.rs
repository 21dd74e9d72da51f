// ABOUTME: Catalog of dashboard insight cards, each a fixed question about the user's health
// ABOUTME: Cards are static data; the insight text is generated on demand through the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

use serde::Serialize;

/// What kind of observation a card presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// Potential health risk
    Risk,
    /// Direction of a metric over time
    Trend,
    /// Actionable suggestion
    Suggestion,
    /// Streak or milestone
    Achievement,
    /// Out-of-pattern reading
    Anomaly,
}

/// One dashboard card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsightCard {
    /// Stable URL key
    pub key: &'static str,
    /// Kind of card
    #[serde(rename = "type")]
    pub card_type: CardType,
    /// Display title
    pub title: &'static str,
    /// Question asked against the user's health context
    pub prompt: &'static str,
    /// Display confidence in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

const CARDS: &[InsightCard] = &[
    InsightCard {
        key: "stress-impact",
        card_type: CardType::Risk,
        title: "Stress Impact",
        prompt: "What is the stress impact? Tell me in 3 sentences.",
        confidence: Some(80),
    },
    InsightCard {
        key: "earlier-bedtime",
        card_type: CardType::Suggestion,
        title: "Earlier Bedtime",
        prompt: "Why should I go to bed earlier? Tell me in 3 sentences",
        confidence: None,
    },
    InsightCard {
        key: "hydration-trend",
        card_type: CardType::Trend,
        title: "Hydration Trend",
        prompt: "What is my hydration trend? Tell me in 3 sentences",
        confidence: None,
    },
    InsightCard {
        key: "step-goal-streak",
        card_type: CardType::Achievement,
        title: "Step Goal Streak",
        prompt: "What is my step goal streak? Tell me in 3 sentences",
        confidence: None,
    },
    InsightCard {
        key: "vitamin-d-alert",
        card_type: CardType::Risk,
        title: "Vitamin D Alert",
        prompt: "What is my vitamin D alert? Tell me in 3 sentences",
        confidence: Some(95),
    },
    InsightCard {
        key: "heart-rate-improving",
        card_type: CardType::Trend,
        title: "Heart Rate Improving",
        prompt: "What is my heart rate trend? Tell me in 3 sentences",
        confidence: None,
    },
    InsightCard {
        key: "increase-protein-intake",
        card_type: CardType::Suggestion,
        title: "Increase Protein Intake",
        prompt: "Why should I increase my protein intake? Tell me in 3 sentences",
        confidence: None,
    },
    InsightCard {
        key: "meditation-consistency",
        card_type: CardType::Achievement,
        title: "Meditation Consistency",
        prompt: "What is my meditation consistency? Tell me in 3 sentences",
        confidence: None,
    },
];

/// All cards in display order
#[must_use]
pub const fn catalog() -> &'static [InsightCard] {
    CARDS
}

/// Look up a card by key
#[must_use]
pub fn find(key: &str) -> Option<&'static InsightCard> {
    CARDS.iter().find(|card| card.key == key)
}
