// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Nestguard Authors

//! Risk event records for the session timeline.
//!
//! Detections themselves are pure; when a host decides a detection is worth
//! remembering it builds a [`RiskEvent`] and appends it to the session
//! timeline. Events carry the clamped score, a severity derived from it, and
//! a truncated excerpt of the text that triggered the detection.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum excerpt length, in characters, kept on a risk event.
pub const EXCERPT_MAX_CHARS: usize = 70;

/// Severity bands for risk events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Map a clamped risk score onto a severity band.
    ///
    /// Zero means nothing matched (Info). Any single high-weight rule puts
    /// the score at 40 or above, which lands in Critical.
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => Severity::Info,
            1..=39 => Severity::Warning,
            _ => Severity::Critical,
        }
    }

    /// Numeric rank for ordering; higher is more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 3,
            Severity::Warning => 2,
            Severity::Info => 1,
        }
    }
}

/// One entry in the caller-owned risk timeline.
///
/// Immutable after creation. The excerpt is truncated to
/// [`EXCERPT_MAX_CHARS`] characters with a trailing ellipsis so the timeline
/// never stores a full chat message or lease document.
#[derive(Debug, Clone, Serialize)]
pub struct RiskEvent {
    pub event: String,
    pub score: u32,
    pub severity: Severity,
    pub excerpt: String,
    pub at: DateTime<Utc>,
}

impl RiskEvent {
    pub fn new(event: impl Into<String>, score: u32, source_text: &str, at: DateTime<Utc>) -> Self {
        Self {
            event: event.into(),
            score,
            severity: Severity::from_score(score),
            excerpt: excerpt_of(source_text),
            at,
        }
    }
}

/// Truncate source text to the excerpt limit, character-safe.
fn excerpt_of(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    out.push('…');
    out
}
