//! Shared domain models.

use serde::{Deserialize, Serialize};

/// Store page used when a game carries no link of its own.
pub const DEFAULT_STORE_URL: &str = "https://store.steampowered.com/";

/// Operating system tag attached to a catalog entry.
///
/// The three named variants participate in filtering; anything else found
/// in catalog data is preserved verbatim for display only.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OsTag {
    Windows,
    Mac,
    Linux,
    Other(String),
}

impl OsTag {
    /// The filterable variants, in UI order.
    pub const ALL: [OsTag; 3] = [OsTag::Windows, OsTag::Mac, OsTag::Linux];

    /// Label shown on filter pills and meta rows.
    pub fn label(&self) -> &str {
        match self {
            OsTag::Windows => "windows",
            OsTag::Mac => "mac",
            OsTag::Linux => "linux",
            OsTag::Other(raw) => raw,
        }
    }
}

impl From<String> for OsTag {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "windows" => OsTag::Windows,
            "mac" => OsTag::Mac,
            "linux" => OsTag::Linux,
            _ => OsTag::Other(raw),
        }
    }
}

impl From<OsTag> for String {
    fn from(tag: OsTag) -> Self {
        tag.label().to_string()
    }
}

/// Hardware demand bucket.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecTier {
    Low,
    Mid,
    High,
}

impl SpecTier {
    /// All tiers, in UI order.
    pub const ALL: [SpecTier; 3] = [SpecTier::Low, SpecTier::Mid, SpecTier::High];

    /// Label shown on filter pills.
    pub fn label(&self) -> &'static str {
        match self {
            SpecTier::Low => "저사양",
            SpecTier::Mid => "중사양",
            SpecTier::High => "고사양",
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Positive, unique within the catalog; used for routing and resolution.
    pub id: u32,
    /// Display title.
    pub name: String,
    /// Opaque asset reference; never interpreted by the core.
    pub image: String,
    /// Ordered genre tags; non-empty. The UI shows at most the first two.
    pub genres: Vec<String>,
    /// Price in won. `0` means free.
    pub price: u32,
    /// Operating system, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsTag>,
    /// Hardware demand tier, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<SpecTier>,
    /// External store link; [`DEFAULT_STORE_URL`] substitutes when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_url: Option<String>,
}

impl Game {
    /// First two genres joined for card display.
    pub fn genre_label(&self) -> String {
        self.genres
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" · ")
    }

    /// Formatted price for display.
    pub fn price_label(&self) -> String {
        format_price(self.price)
    }

    /// Link opened when the user acts on this entry.
    pub fn store_url(&self) -> &str {
        self.steam_url.as_deref().unwrap_or(DEFAULT_STORE_URL)
    }
}

/// Render a won amount: `0` is the free label, everything else is grouped
/// with thousands separators ("₩ 9,900").
pub fn format_price(price: u32) -> String {
    if price == 0 {
        return "무료".to_string();
    }
    format!("₩ {}", group_thousands(price))
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Enforce the catalog invariant: an ordered sequence without repeated ids.
/// The first occurrence of each id wins.
pub fn dedup_by_id(games: Vec<Game>) -> Vec<Game> {
    let mut seen = std::collections::HashSet::new();
    games
        .into_iter()
        .filter(|game| seen.insert(game.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: u32) -> Game {
        Game {
            id,
            name: format!("게임 {id}"),
            image: format!("/images/sample{id}.jpg"),
            genres: vec!["RPG".to_string(), "스토리".to_string(), "온라인".to_string()],
            price: 9900,
            os: Some(OsTag::Windows),
            spec: Some(SpecTier::Mid),
            steam_url: None,
        }
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(0), "무료");
        assert_eq!(format_price(900), "₩ 900");
        assert_eq!(format_price(9900), "₩ 9,900");
        assert_eq!(format_price(35000), "₩ 35,000");
        assert_eq!(format_price(1_234_567), "₩ 1,234,567");
    }

    #[test]
    fn genre_label_shows_first_two() {
        assert_eq!(game(1).genre_label(), "RPG · 스토리");
        let mut single = game(2);
        single.genres.truncate(1);
        assert_eq!(single.genre_label(), "RPG");
    }

    #[test]
    fn store_url_falls_back_to_default() {
        let mut linked = game(1);
        assert_eq!(linked.store_url(), DEFAULT_STORE_URL);
        linked.steam_url = Some("https://store.steampowered.com/app/413150".to_string());
        assert_eq!(
            linked.store_url(),
            "https://store.steampowered.com/app/413150"
        );
    }

    #[test]
    fn os_tag_round_trips_unknown_values() {
        let known: OsTag = "Windows".to_string().into();
        assert_eq!(known, OsTag::Windows);
        let odd: OsTag = "SteamOS".to_string().into();
        assert_eq!(odd.label(), "SteamOS");
        let json = serde_json::to_string(&odd).unwrap();
        assert_eq!(json, "\"SteamOS\"");
    }

    #[test]
    fn dedup_keeps_first_occurrence_and_order() {
        let games = vec![game(1), game(2), game(1), game(3), game(2)];
        let deduped = dedup_by_id(games);
        let ids: Vec<u32> = deduped.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
