use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::factors::HealthFactor;
use crate::error::{EngineError, EngineResult};

/// Calculated score plus the factors that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScore {
    pub score: u8,
    pub factors: Vec<HealthFactor>,
}

/// One audit entry in a client's health history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthHistoryEntry {
    pub date: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub factors: Vec<HealthFactor>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub is_manual_override: bool,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// Health data persisted with a client record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientHealthState {
    /// Manual score that supersedes the calculated one while set
    #[serde(default, deserialize_with = "deserialize_optional_score")]
    pub override_score: Option<u8>,
    /// Score from the last stored calculation
    #[serde(default, deserialize_with = "deserialize_optional_score")]
    pub last_score: Option<u8>,
    /// Factors from the last stored calculation
    #[serde(default)]
    pub factors: Vec<HealthFactor>,
    #[serde(default)]
    pub history: Vec<HealthHistoryEntry>,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthTrend {
    pub direction: TrendDirection,
    pub recent_mean: Option<f64>,
    pub previous_mean: Option<f64>,
}

impl HealthTrend {
    /// Points gained (positive) or lost between the two windows.
    pub fn change(&self) -> Option<f64> {
        Some(self.recent_mean? - self.previous_mean?)
    }
}

/// Check a requested override, returning it as a score.
pub fn validate_override(value: i64) -> EngineResult<u8> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or(EngineError::InvalidScore(value))
}

/// Stored scores go through the same 0-100 check as a requested override.
fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    validate_override(raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_score<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u8>, D::Error> {
    Option::<i64>::deserialize(deserializer)?
        .map(|raw| validate_override(raw).map_err(serde::de::Error::custom))
        .transpose()
}

impl ClientHealthState {
    /// The override if one is set, otherwise the calculated score.
    pub fn effective_score(&self, calculated: u8) -> u8 {
        self.override_score.unwrap_or(calculated)
    }

    /// Store the latest calculation as the snapshot. Returns false when it
    /// matches what was already stored.
    pub fn record_snapshot(&mut self, calculated: &HealthScore) -> bool {
        if self.last_score == Some(calculated.score) && self.factors == calculated.factors {
            return false;
        }
        self.last_score = Some(calculated.score);
        self.factors = calculated.factors.clone();
        true
    }

    /// Set (`Some`) or clear (`None`) the override and log one history entry.
    ///
    /// Nothing is mutated when the value is out of range.
    pub fn apply_override(
        &mut self,
        value: Option<i64>,
        calculated: &HealthScore,
        note: Option<String>,
        updated_by: Option<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<&HealthHistoryEntry> {
        let override_score = value.map(validate_override).transpose()?;

        self.override_score = override_score;
        self.record_snapshot(calculated);
        self.history.push(HealthHistoryEntry {
            date: at,
            score: override_score.unwrap_or(calculated.score),
            factors: calculated.factors.clone(),
            note,
            is_manual_override: override_score.is_some(),
            updated_by,
        });

        // Just pushed, so the history is non-empty
        Ok(&self.history[self.history.len() - 1])
    }

    /// Replace the notes (last write wins).
    pub fn set_notes(&mut self, text: impl Into<String>) {
        self.notes = text.into();
    }

    /// Append an alert; duplicates are kept.
    pub fn add_alert(&mut self, text: impl Into<String>) {
        self.alerts.push(text.into());
    }

    /// Remove every alert equal to `text`, returning how many were removed.
    pub fn remove_alert(&mut self, text: &str) -> usize {
        let before = self.alerts.len();
        self.alerts.retain(|a| a != text);
        before - self.alerts.len()
    }

    /// Compare the mean of the newest `window` entries with the `window` before them.
    pub fn trend(&self, window: usize, threshold: f64) -> HealthTrend {
        let mut scores: Vec<_> = self.history.iter().map(|e| (e.date, e.score)).collect();
        scores.sort_by_key(|(date, _)| *date);
        let scores: Vec<f64> = scores.into_iter().map(|(_, s)| f64::from(s)).collect();

        let window = window.max(1);
        let split = scores.len().saturating_sub(window);
        let recent = &scores[split..];
        let previous = &scores[split.saturating_sub(window)..split];

        let recent_mean = mean(recent);
        let previous_mean = mean(previous);

        let direction = match (recent_mean, previous_mean) {
            (Some(r), Some(p)) if r - p > threshold => TrendDirection::Up,
            (Some(r), Some(p)) if p - r > threshold => TrendDirection::Down,
            _ => TrendDirection::Stable,
        };

        HealthTrend {
            direction,
            recent_mean,
            previous_mean,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
