//! Trust decay for listing verification timestamps.
//!
//! A listing's credibility label degrades automatically with time since the
//! landlord last confirmed availability: Verified for the first week, Stale
//! through day 14, Unverified after that. Nothing is stored — status is
//! recomputed from the timestamp on every call, comparing calendar dates
//! with time-of-day ignored.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Last day (inclusive) a listing still counts as Verified.
pub const STALE_AFTER_DAYS: i64 = 7;
/// Last day (inclusive) a listing still counts as Stale.
pub const UNVERIFIED_AFTER_DAYS: i64 = 14;

/// Badge text for listings that have never been verified at all.
pub const PENDING_LABEL: &str = "Pending verification";

/// Derived credibility label. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrustStatus {
    Verified,
    Stale,
    Unverified,
}

impl TrustStatus {
    /// Verified and Stale listings pass the visibility funnel; Unverified do not.
    pub fn is_trusted(&self) -> bool {
        matches!(self, TrustStatus::Verified | TrustStatus::Stale)
    }
}

impl fmt::Display for TrustStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrustStatus::Verified => "Verified",
            TrustStatus::Stale => "Stale",
            TrustStatus::Unverified => "Unverified",
        };
        f.write_str(s)
    }
}

/// Whole calendar days from the verification date to `today`.
///
/// Negative when the verification date is in the future.
pub fn days_since(last_verified: DateTime<Utc>, today: NaiveDate) -> i64 {
    (today - last_verified.date_naive()).num_days()
}

/// Classify a verification timestamp against an explicit `today`.
///
/// Day 7 is still Verified, day 14 is still Stale.
pub fn classify(last_verified: DateTime<Utc>, today: NaiveDate) -> (TrustStatus, i64) {
    let days = days_since(last_verified, today);
    let status = if days <= STALE_AFTER_DAYS {
        TrustStatus::Verified
    } else if days <= UNVERIFIED_AFTER_DAYS {
        TrustStatus::Stale
    } else {
        TrustStatus::Unverified
    };
    (status, days)
}

/// Classify against the current date.
pub fn classify_now(last_verified: DateTime<Utc>) -> (TrustStatus, i64) {
    classify(last_verified, Utc::now().date_naive())
}

/// Badge text for a classified listing, e.g. "Verified • today" or "Stale • 9d ago".
pub fn badge_label(status: TrustStatus, days_elapsed: i64) -> String {
    if days_elapsed <= 0 {
        format!("{} • today", status)
    } else {
        format!("{} • {}d ago", status, days_elapsed)
    }
}
