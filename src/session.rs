// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Nestguard Authors

//! Session-scoped context owned by the hosting layer.
//!
//! Everything a user session accumulates lives here as one explicit value:
//! the chat transcript, the bounded risk timeline, the incident pack and
//! the viewing checklist. The detection engine never touches this object —
//! it returns results, and the session is where the caller appends them.
//! Nothing is persisted beyond process memory.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detect::{ChatRisk, RiskEngine};
use crate::events::RiskEvent;

/// Resolved risk events kept per session before the oldest are dropped.
pub const DEFAULT_TIMELINE_HISTORY: usize = 100;

/// Timeline entry name for chat detections.
pub const SCAM_PATTERN_EVENT: &str = "Scam pattern detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChatSender {
    Student,
    Landlord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Bounded, append-only log of risk events.
///
/// Trims to `max_history` entries, oldest first, so a long demo session
/// cannot grow without bound.
#[derive(Debug)]
pub struct RiskTimeline {
    events: VecDeque<RiskEvent>,
    max_history: usize,
}

impl RiskTimeline {
    pub fn new(max_history: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_history,
        }
    }

    pub fn push(&mut self, event: RiskEvent) {
        self.events.push_back(event);
        while self.events.len() > self.max_history {
            self.events.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Up to `n` most recent events, newest first — what a sidebar renders.
    pub fn recent(&self, n: usize) -> Vec<&RiskEvent> {
        self.events.iter().rev().take(n).collect()
    }

    /// All events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RiskEvent> {
        self.events.iter()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub label: String,
    pub done: bool,
}

/// Fixed-item checklist with stable order.
#[derive(Debug, Clone, Serialize)]
pub struct Checklist {
    items: Vec<ChecklistItem>,
}

impl Checklist {
    fn from_labels(labels: &[&str]) -> Self {
        Self {
            items: labels
                .iter()
                .map(|l| ChecklistItem {
                    label: l.to_string(),
                    done: false,
                })
                .collect(),
        }
    }

    /// Tick or untick an item. Returns `false` for an unknown label.
    pub fn set(&mut self, label: &str, done: bool) -> bool {
        match self.items.iter_mut().find(|i| i.label == label) {
            Some(item) => {
                item.done = done;
                true
            }
            None => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|i| i.done)
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }
}

/// What a student verifies in person before renting.
pub fn viewing_checklist() -> Checklist {
    Checklist::from_labels(&[
        "Address matches listing",
        "Utilities confirmed",
        "Lease length confirmed",
        "Landlord identity confirmed",
    ])
}

/// Evidence checklist assembled after a risk event, for external
/// dispute/reporting use.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentPack {
    pub ready: bool,
    items: Checklist,
}

impl IncidentPack {
    pub fn new() -> Self {
        Self {
            ready: false,
            items: Checklist::from_labels(&[
                "Proof of payment (receipt/screenshot)",
                "All communication records",
                "Original listing screenshots",
                "Evidence of non-delivery / address mismatch",
            ]),
        }
    }

    /// Generated from the scam interrupt; unlocks the evidence checklist.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn set(&mut self, label: &str, done: bool) -> bool {
        self.items.set(label, done)
    }

    pub fn is_complete(&self) -> bool {
        self.ready && self.items.is_complete()
    }

    pub fn items(&self) -> &[ChecklistItem] {
        self.items.items()
    }

    /// JSON snapshot for export or sharing outside the session.
    pub fn export_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for IncidentPack {
    fn default() -> Self {
        Self::new()
    }
}

/// One user session's accumulated state.
#[derive(Debug)]
pub struct SessionContext {
    pub chat: Vec<ChatMessage>,
    pub timeline: RiskTimeline,
    pub incident_pack: IncidentPack,
    pub viewing_checklist: Checklist,
    pub selected_listing: Option<u64>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            chat: Vec::new(),
            timeline: RiskTimeline::new(DEFAULT_TIMELINE_HISTORY),
            incident_pack: IncidentPack::new(),
            viewing_checklist: viewing_checklist(),
            selected_listing: None,
        }
    }

    pub fn record_message(&mut self, sender: ChatSender, text: impl Into<String>, at: DateTime<Utc>) {
        self.chat.push(ChatMessage {
            sender,
            text: text.into(),
            at,
        });
    }

    /// Run the scam interrupt on the newest message, if it came from the
    /// landlord. On a hit, a [`RiskEvent`] is appended to the timeline and
    /// the detection is returned for the host to render.
    pub fn check_latest_landlord_message(
        &mut self,
        engine: &RiskEngine,
        at: DateTime<Utc>,
    ) -> Option<ChatRisk> {
        let text = match self.chat.last() {
            Some(m) if m.sender == ChatSender::Landlord => m.text.clone(),
            _ => return None,
        };

        let risk = engine.detect_chat_risk(&text);
        if !risk.is_risky() {
            return None;
        }

        self.timeline
            .push(RiskEvent::new(SCAM_PATTERN_EVENT, risk.score, &text, at));
        Some(risk)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
