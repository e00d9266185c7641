//! In-memory listing store for a marketplace session.
//!
//! The hosting layer owns one store per session (seeded from whatever data
//! source it uses) and routes every listing mutation through it: landlords
//! create listings in pending state and later confirm availability, which
//! re-verifies them; students browse the subset that passes the visibility
//! funnel. The store never does I/O.

use chrono::{DateTime, NaiveDate, Utc};

use crate::funnel::{self, Listing};
use crate::pricing;

/// Bedroom selector used by the browse filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BedsFilter {
    #[default]
    Any,
    /// Studios are listed with zero bedrooms.
    Studio,
    Exactly(u32),
    ThreePlus,
}

impl BedsFilter {
    fn matches(&self, beds: u32) -> bool {
        match self {
            BedsFilter::Any => true,
            BedsFilter::Studio => beds == 0,
            BedsFilter::Exactly(n) => beds == *n,
            BedsFilter::ThreePlus => beds >= 3,
        }
    }
}

/// Student browse filter, applied on top of the visibility funnel.
#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    pub max_price: Option<i64>,
    /// Exact area name; None means all areas.
    pub area: Option<String>,
    pub beds: BedsFilter,
}

impl BrowseFilter {
    fn matches(&self, listing: &Listing) -> bool {
        if let Some(max) = self.max_price {
            if listing.price > max {
                return false;
            }
        }
        if let Some(ref area) = self.area {
            if listing.area != *area {
                return false;
            }
        }
        self.beds.matches(listing.beds)
    }
}

/// Input for creating a listing. Blank strings fall back to the same
/// placeholder values the seeded sample data uses.
#[derive(Debug, Clone, Default)]
pub struct NewListing {
    pub landlord: String,
    pub title: String,
    pub area: String,
    pub price: i64,
    pub beds: u32,
    pub photo_count: u32,
    pub lease_draft_uploaded: bool,
}

/// Ordered collection of listings with the funnel operations over them.
#[derive(Debug, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_listings(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter()
    }

    pub fn get(&self, id: u64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Create a listing in pending state. It has no verification timestamp
    /// and stays invisible to students until availability is confirmed.
    /// Returns the assigned id (max existing + 1).
    pub fn create_pending(&mut self, new: NewListing) -> u64 {
        let id = self.listings.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let listing = Listing {
            id,
            title: or_default(new.title, format!("Unit {}", id)),
            area: or_default(new.area, "Unknown".to_string()),
            price: new.price,
            beds: new.beds,
            landlord: or_default(new.landlord, "Private Landlord".to_string()),
            verified_at: None,
            pending: true,
            photo_count: new.photo_count,
            lease_draft_uploaded: new.lease_draft_uploaded,
        };
        self.listings.push(listing);
        id
    }

    /// Confirm availability: clears pending and stamps `verified_at`,
    /// restoring Verified trust. Returns `false` for an unknown id.
    pub fn mark_verified(&mut self, id: u64, now: DateTime<Utc>) -> bool {
        match self.listings.iter_mut().find(|l| l.id == id) {
            Some(listing) => {
                listing.pending = false;
                listing.verified_at = Some(now);
                true
            }
            None => false,
        }
    }

    /// Listings owned by a landlord, matched case-insensitively by name.
    pub fn owned_by(&self, landlord: &str) -> Vec<&Listing> {
        let wanted = landlord.trim().to_lowercase();
        self.listings
            .iter()
            .filter(|l| l.landlord.to_lowercase() == wanted)
            .collect()
    }

    /// Listings that pass the visibility funnel as of `today`.
    pub fn visible_on(&self, today: NaiveDate) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| funnel::is_visible_on(l, today))
            .collect()
    }

    /// Visible listings matching the browse filter, cheapest first.
    pub fn browse(&self, filter: &BrowseFilter, today: NaiveDate) -> Vec<&Listing> {
        let mut results: Vec<&Listing> = self
            .listings
            .iter()
            .filter(|l| funnel::is_visible_on(l, today) && filter.matches(l))
            .collect();
        results.sort_by_key(|l| l.price);
        results
    }

    /// Price band over every listing in `area`, visible or not — more
    /// comparables make a steadier band.
    pub fn price_band_for_area(&self, area: &str) -> (i64, i64) {
        let prices: Vec<i64> = self
            .listings
            .iter()
            .filter(|l| l.area == area)
            .map(|l| l.price)
            .collect();
        pricing::price_band(&prices)
    }
}

fn or_default(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
    }

    fn seeded_listing(id: u64, area: &str, price: i64, beds: u32) -> Listing {
        Listing {
            id,
            title: format!("Listing {}", id),
            area: area.to_string(),
            price,
            beds,
            landlord: "Private Landlord".to_string(),
            verified_at: Some(now()),
            pending: false,
            photo_count: 3,
            lease_draft_uploaded: false,
        }
    }

    fn seeded_store() -> ListingStore {
        ListingStore::from_listings(vec![
            seeded_listing(1, "Sandy Hill", 600, 1),
            seeded_listing(2, "Sandy Hill", 800, 2),
            seeded_listing(3, "Sandy Hill", 1000, 0),
            seeded_listing(4, "Sandy Hill", 1200, 3),
            seeded_listing(5, "Sandy Hill", 1400, 4),
            seeded_listing(6, "Glebe", 950, 2),
        ])
    }

    #[test]
    fn test_create_pending_is_invisible() {
        let mut store = seeded_store();
        let id = store.create_pending(NewListing {
            landlord: "Maple Rentals".to_string(),
            title: "New unit".to_string(),
            area: "Vanier".to_string(),
            price: 900,
            beds: 1,
            photo_count: 2,
            lease_draft_uploaded: true,
        });

        assert_eq!(id, 7, "id should be max existing + 1");
        let listing = store.get(id).unwrap();
        assert!(listing.pending);
        assert!(listing.verified_at.is_none());
        assert!(!store.visible_on(today()).iter().any(|l| l.id == id));
    }

    #[test]
    fn test_confirm_availability_makes_visible_and_verified() {
        let mut store = seeded_store();
        let id = store.create_pending(NewListing {
            landlord: "Maple Rentals".to_string(),
            price: 900,
            photo_count: 1,
            ..Default::default()
        });

        assert!(store.mark_verified(id, now()));
        let listing = store.get(id).unwrap();
        assert!(!listing.pending);
        assert!(store.visible_on(today()).iter().any(|l| l.id == id));

        let (status, days) = listing.trust_on(today()).unwrap();
        assert_eq!(status, crate::trust::TrustStatus::Verified);
        assert_eq!(days, 0);
    }

    #[test]
    fn test_reverify_refreshes_stale_listing() {
        let mut store = ListingStore::from_listings(vec![Listing {
            verified_at: Some(Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap()),
            ..seeded_listing(1, "Sandy Hill", 700, 1)
        }]);

        let (status, _) = store.get(1).unwrap().trust_on(today()).unwrap();
        assert_eq!(status, crate::trust::TrustStatus::Stale);

        assert!(store.mark_verified(1, now()));
        let (status, _) = store.get(1).unwrap().trust_on(today()).unwrap();
        assert_eq!(status, crate::trust::TrustStatus::Verified);
    }

    #[test]
    fn test_mark_verified_unknown_id() {
        let mut store = seeded_store();
        assert!(!store.mark_verified(999, now()));
    }

    #[test]
    fn test_create_pending_blank_fields_fall_back() {
        let mut store = ListingStore::new();
        let id = store.create_pending(NewListing {
            price: 750,
            photo_count: 1,
            ..Default::default()
        });
        assert_eq!(id, 1, "empty store starts ids at 1");

        let listing = store.get(id).unwrap();
        assert_eq!(listing.title, "Unit 1");
        assert_eq!(listing.area, "Unknown");
        assert_eq!(listing.landlord, "Private Landlord");
    }

    #[test]
    fn test_owned_by_is_case_insensitive() {
        let mut store = seeded_store();
        store.create_pending(NewListing {
            landlord: "Maple Rentals".to_string(),
            price: 900,
            ..Default::default()
        });

        assert_eq!(store.owned_by("maple rentals").len(), 1);
        assert_eq!(store.owned_by("  MAPLE RENTALS  ").len(), 1);
        assert_eq!(store.owned_by("private landlord").len(), 6);
    }

    #[test]
    fn test_browse_sorts_by_price() {
        let store = seeded_store();
        let results = store.browse(&BrowseFilter::default(), today());
        let prices: Vec<i64> = results.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![600, 800, 950, 1000, 1200, 1400]);
    }

    #[test]
    fn test_browse_filters_compose() {
        let store = seeded_store();
        let filter = BrowseFilter {
            max_price: Some(1000),
            area: Some("Sandy Hill".to_string()),
            beds: BedsFilter::Exactly(2),
        };
        let results = store.browse(&filter, today());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);
    }

    #[test]
    fn test_browse_beds_variants() {
        let store = seeded_store();
        let browse_beds = |beds: BedsFilter| {
            store
                .browse(
                    &BrowseFilter {
                        beds,
                        ..Default::default()
                    },
                    today(),
                )
                .len()
        };
        assert_eq!(browse_beds(BedsFilter::Any), 6);
        assert_eq!(browse_beds(BedsFilter::Studio), 1);
        assert_eq!(browse_beds(BedsFilter::Exactly(2)), 2);
        assert_eq!(browse_beds(BedsFilter::ThreePlus), 2);
    }

    #[test]
    fn test_browse_only_sees_funnel_survivors() {
        let mut store = seeded_store();
        store.create_pending(NewListing {
            price: 100, // would sort first if it leaked through
            photo_count: 5,
            ..Default::default()
        });
        let results = store.browse(&BrowseFilter::default(), today());
        assert!(results.iter().all(|l| !l.pending));
    }

    #[test]
    fn test_price_band_for_area() {
        let store = seeded_store();
        assert_eq!(store.price_band_for_area("Sandy Hill"), (800, 1200));
        // Glebe has a single comparable: fallback band.
        assert_eq!(store.price_band_for_area("Glebe"), pricing::FALLBACK_BAND);
        assert_eq!(store.price_band_for_area("Nowhere"), pricing::FALLBACK_BAND);
    }
}
