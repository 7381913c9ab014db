#![allow(missing_docs)]

//! In-progress filter selection owned by the criteria screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{OsTag, SpecTier};

/// Genre pills offered on the criteria screen, in display order.
pub const GENRE_TAGS: [&str; 8] = [
    "액션",
    "RPG",
    "전략",
    "시뮬레이션",
    "스토리 중심",
    "퍼즐",
    "온라인",
    "제작",
];

/// Price bucket facet. `None` on the owning field means "any price".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "<10000")]
    Under10k,
    #[serde(rename = "10000-30000")]
    Mid10kTo30k,
    #[serde(rename = ">=30000")]
    Over30k,
}

impl PriceBucket {
    /// All buckets, in UI order.
    pub const ALL: [PriceBucket; 3] = [
        PriceBucket::Under10k,
        PriceBucket::Mid10kTo30k,
        PriceBucket::Over30k,
    ];

    /// Label shown on filter pills.
    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::Under10k => "1만원 미만",
            PriceBucket::Mid10kTo30k => "1~3만원",
            PriceBucket::Over30k => "3만원 이상",
        }
    }

    /// Whether a won amount falls inside this bucket.
    pub fn contains(&self, price: u32) -> bool {
        match self {
            PriceBucket::Under10k => price < 10_000,
            PriceBucket::Mid10kTo30k => (10_000..30_000).contains(&price),
            PriceBucket::Over30k => price >= 30_000,
        }
    }
}

/// Minimum age facet. `None` on the owning field means all ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeRating {
    #[serde(rename = "7")]
    From7,
    #[serde(rename = "12")]
    From12,
    #[serde(rename = "15")]
    From15,
    #[serde(rename = "18")]
    From18,
}

impl AgeRating {
    /// All ratings, in UI order.
    pub const ALL: [AgeRating; 4] = [
        AgeRating::From7,
        AgeRating::From12,
        AgeRating::From15,
        AgeRating::From18,
    ];

    /// Numeric threshold for the rating.
    pub fn years(&self) -> u8 {
        match self {
            AgeRating::From7 => 7,
            AgeRating::From12 => 12,
            AgeRating::From15 => 15,
            AgeRating::From18 => 18,
        }
    }

    /// Label shown on filter pills.
    pub fn label(&self) -> String {
        format!("{}세 이상", self.years())
    }
}

/// Mutable selection state edited on the criteria screen.
///
/// `genres` is the only multi-select field; every other facet replaces its
/// previous value on set. Nothing here is persisted anywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free-text description of the desired experience.
    pub prompt: String,
    /// Selected genre tags, kept in first-selection order.
    pub genres: Vec<String>,
    pub price: Option<PriceBucket>,
    pub age: Option<AgeRating>,
    pub os: Option<OsTag>,
    pub spec: Option<SpecTier>,
    /// Whether the os/spec section is currently revealed.
    pub advanced_visible: bool,
}

/// Immutable submit payload handed to the recommendation engine.
///
/// Advanced facets chosen while the section was revealed and then hidden
/// are deliberately omitted: hidden values stay stored on the criteria but
/// are inert for filtering until the section is shown again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaSnapshot {
    pub prompt: String,
    pub genres: Vec<String>,
    pub price: Option<PriceBucket>,
    pub age: Option<AgeRating>,
    pub os: Option<OsTag>,
    pub spec: Option<SpecTier>,
}

impl FilterCriteria {
    /// Add `tag` if absent, remove it if present.
    pub fn toggle_genre(&mut self, tag: &str) {
        if let Some(pos) = self.genres.iter().position(|g| g == tag) {
            self.genres.remove(pos);
        } else {
            self.genres.push(tag.to_string());
        }
    }

    /// Whether `tag` is currently selected.
    pub fn is_selected(&self, tag: &str) -> bool {
        self.genres.iter().any(|g| g == tag)
    }

    /// Number of selected genres.
    pub fn genre_count(&self) -> usize {
        self.genres.len()
    }

    pub fn set_price(&mut self, value: Option<PriceBucket>) {
        self.price = value;
    }

    pub fn set_age(&mut self, value: Option<AgeRating>) {
        self.age = value;
    }

    pub fn set_os(&mut self, value: Option<OsTag>) {
        self.os = value;
    }

    pub fn set_spec(&mut self, value: Option<SpecTier>) {
        self.spec = value;
    }

    /// Show the os/spec section.
    pub fn reveal_advanced(&mut self) {
        self.advanced_visible = true;
    }

    /// Hide the os/spec section. Chosen values are kept, not cleared.
    pub fn hide_advanced(&mut self) {
        self.advanced_visible = false;
    }

    /// Whether anything beyond the prompt has been selected. Submitting
    /// with nothing set is allowed; this only feeds the status line.
    pub fn has_any_filter(&self) -> bool {
        !self.genres.is_empty()
            || self.price.is_some()
            || self.age.is_some()
            || (self.advanced_visible && (self.os.is_some() || self.spec.is_some()))
    }

    /// Freeze the current selection for submission.
    pub fn snapshot(&self) -> CriteriaSnapshot {
        let snapshot = CriteriaSnapshot {
            prompt: self.prompt.clone(),
            genres: self.genres.clone(),
            price: self.price,
            age: self.age,
            os: self.os.clone().filter(|_| self.advanced_visible),
            spec: self.spec.filter(|_| self.advanced_visible),
        };
        debug!(
            genres = snapshot.genres.len(),
            price = ?snapshot.price,
            age = ?snapshot.age,
            "Criteria snapshot taken"
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_toggle_follows_call_parity() {
        let mut criteria = FilterCriteria::default();
        for round in 1..=5 {
            criteria.toggle_genre("퍼즐");
            assert_eq!(criteria.is_selected("퍼즐"), round % 2 == 1);
        }
    }

    #[test]
    fn genres_keep_selection_order() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_genre("온라인");
        criteria.toggle_genre("액션");
        criteria.toggle_genre("RPG");
        criteria.toggle_genre("액션");
        assert_eq!(criteria.genres, vec!["온라인", "RPG"]);
        assert_eq!(criteria.genre_count(), 2);
    }

    #[test]
    fn single_select_replaces_previous_value() {
        let mut criteria = FilterCriteria::default();
        criteria.set_price(Some(PriceBucket::Under10k));
        criteria.set_price(Some(PriceBucket::Over30k));
        assert_eq!(criteria.price, Some(PriceBucket::Over30k));
        criteria.set_price(None);
        assert_eq!(criteria.price, None);

        criteria.set_age(Some(AgeRating::From12));
        criteria.set_age(Some(AgeRating::From18));
        assert_eq!(criteria.age, Some(AgeRating::From18));
    }

    #[test]
    fn hidden_advanced_values_survive_but_stay_out_of_snapshot() {
        let mut criteria = FilterCriteria::default();
        criteria.reveal_advanced();
        criteria.set_os(Some(OsTag::Linux));
        criteria.set_spec(Some(SpecTier::Low));
        assert_eq!(criteria.snapshot().os, Some(OsTag::Linux));

        criteria.hide_advanced();
        let hidden = criteria.snapshot();
        assert_eq!(hidden.os, None);
        assert_eq!(hidden.spec, None);
        assert_eq!(criteria.os, Some(OsTag::Linux));

        criteria.reveal_advanced();
        assert_eq!(criteria.snapshot().spec, Some(SpecTier::Low));
    }

    #[test]
    fn price_buckets_partition_amounts() {
        assert!(PriceBucket::Under10k.contains(0));
        assert!(PriceBucket::Under10k.contains(9_999));
        assert!(!PriceBucket::Under10k.contains(10_000));
        assert!(PriceBucket::Mid10kTo30k.contains(10_000));
        assert!(!PriceBucket::Mid10kTo30k.contains(30_000));
        assert!(PriceBucket::Over30k.contains(30_000));
    }

    #[test]
    fn price_bucket_wire_codes() {
        let json = serde_json::to_string(&PriceBucket::Mid10kTo30k).unwrap();
        assert_eq!(json, "\"10000-30000\"");
        let back: PriceBucket = serde_json::from_str("\"<10000\"").unwrap();
        assert_eq!(back, PriceBucket::Under10k);
    }
}
