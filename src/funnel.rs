//! Listing visibility funnel and landlord verification.
//!
//! Students only ever see listings that passed every gate: not pending, a
//! verification timestamp on file, trust still Verified or Stale, and at
//! least one photo. Any missing piece hides the listing — absence of data
//! is treated as failure, never as an error.
//!
//! The landlord side of the funnel: a profile with verification flags, and
//! an eligibility rule for making listings visible at all.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::trust::{self, TrustStatus};

/// A marketplace listing. The funnel reads these fields; it never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub area: String,
    /// Monthly rent in whole dollars.
    pub price: i64,
    pub beds: u32,
    pub landlord: String,
    /// None until the landlord first confirms availability.
    pub verified_at: Option<DateTime<Utc>>,
    /// Awaiting platform verification; hidden from students while set.
    pub pending: bool,
    pub photo_count: u32,
    pub lease_draft_uploaded: bool,
}

impl Listing {
    /// Trust classification, if the listing has ever been verified.
    pub fn trust_on(&self, today: NaiveDate) -> Option<(TrustStatus, i64)> {
        self.verified_at.map(|ts| trust::classify(ts, today))
    }

    /// Badge text for listing cards.
    pub fn badge_label(&self, today: NaiveDate) -> String {
        if self.pending {
            return trust::PENDING_LABEL.to_string();
        }
        match self.trust_on(today) {
            Some((status, days)) => trust::badge_label(status, days),
            None => trust::PENDING_LABEL.to_string(),
        }
    }
}

/// The student-visibility predicate, against an explicit `today`.
///
/// Visible iff: not pending, verified at least once, trust Verified or
/// Stale, and at least one photo on file.
pub fn is_visible_on(listing: &Listing, today: NaiveDate) -> bool {
    if listing.pending {
        return false;
    }
    let ts = match listing.verified_at {
        Some(ts) => ts,
        None => return false,
    };
    let (status, _) = trust::classify(ts, today);
    if !status.is_trusted() {
        return false;
    }
    listing.photo_count >= 1
}

/// The student-visibility predicate against the current date.
pub fn is_visible_to_students(listing: &Listing) -> bool {
    is_visible_on(listing, Utc::now().date_naive())
}

/// Landlord profile with verification state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandlordProfile {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub card_on_file: bool,
    pub id_on_file: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl LandlordProfile {
    /// Onboarding is complete once a company/landlord name exists.
    pub fn has_profile(&self) -> bool {
        !self.company_name.trim().is_empty()
    }

    /// A landlord may make listings visible with email + phone verified and
    /// a card on file. ID is collected but not required for this gate.
    pub fn can_make_visible(&self) -> bool {
        self.email_verified && self.phone_verified && self.card_on_file
    }
}
