//! Identifier-to-entity resolution for the detail screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Game;

/// Related suggestions shown beside the active game.
pub const RELATED_LIMIT: usize = 2;

/// Route id used when the requested value is missing or non-numeric.
pub const FALLBACK_ROUTE_ID: u32 = 1;

/// Find the game with `requested_id`.
///
/// A miss (stale link, bad id) deliberately falls back to the first
/// catalog entry; that substitution is a stable contract, not an error.
/// Only an empty catalog yields `None`.
pub fn resolve_active(requested_id: u32, catalog: &[Game]) -> Option<&Game> {
    catalog
        .iter()
        .find(|game| game.id == requested_id)
        .or_else(|| catalog.first())
}

/// The first `limit` catalog entries other than `active`, in catalog
/// order. Fewer come back when fewer exist; there is no padding.
pub fn related_games<'a>(active: &Game, catalog: &'a [Game], limit: usize) -> Vec<&'a Game> {
    catalog
        .iter()
        .filter(|game| game.id != active.id)
        .take(limit)
        .collect()
}

/// Coerce a raw route parameter into a game id. Anything that does not
/// parse as a positive integer becomes [`FALLBACK_ROUTE_ID`]; resolution
/// then applies its own fallback on a miss.
pub fn parse_route_id(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(FALLBACK_ROUTE_ID)
}

/// Detail-screen state, recomputed whenever the requested id changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Resolution {
    /// An active game with its related suggestions.
    #[allow(missing_docs)]
    Resolved { active: Game, related: Vec<Game> },
    /// The catalog had no entries at all. Terminal; rendered as a defined
    /// empty state rather than an error.
    Empty,
}

impl Resolution {
    /// Resolve `requested_id` against `catalog`.
    pub fn resolve(requested_id: u32, catalog: &[Game], limit: usize) -> Self {
        let Some(active) = resolve_active(requested_id, catalog) else {
            debug!(requested_id, "Resolution over empty catalog");
            return Resolution::Empty;
        };
        if active.id != requested_id {
            debug!(requested_id, actual = active.id, "Lookup miss, using first entry");
        }
        let related = related_games(active, catalog, limit)
            .into_iter()
            .cloned()
            .collect();
        Resolution::Resolved {
            active: active.clone(),
            related,
        }
    }

    /// The active game, if resolved.
    pub fn active(&self) -> Option<&Game> {
        match self {
            Resolution::Resolved { active, .. } => Some(active),
            Resolution::Empty => None,
        }
    }

    /// Related suggestions (empty for [`Resolution::Empty`]).
    pub fn related(&self) -> &[Game] {
        match self {
            Resolution::Resolved { related, .. } => related,
            Resolution::Empty => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogProvider, SampleCatalog};

    fn catalog() -> Vec<Game> {
        SampleCatalog.fetch_catalog().unwrap()
    }

    #[test]
    fn exact_match_wins() {
        let games = catalog();
        let active = resolve_active(7, &games).unwrap();
        assert_eq!(active.id, 7);
    }

    #[test]
    fn miss_falls_back_to_first_entry() {
        let games = catalog();
        let active = resolve_active(999, &games).unwrap();
        assert_eq!(active.id, 1);
    }

    #[test]
    fn empty_catalog_resolves_to_empty_state() {
        assert!(resolve_active(1, &[]).is_none());
        let resolution = Resolution::resolve(1, &[], RELATED_LIMIT);
        assert!(matches!(resolution, Resolution::Empty));
        assert!(resolution.active().is_none());
        assert!(resolution.related().is_empty());
    }

    #[test]
    fn related_excludes_active_and_keeps_order() {
        let games = catalog();
        let active = resolve_active(3, &games).unwrap();
        let related = related_games(active, &games, RELATED_LIMIT);
        let ids: Vec<u32> = related.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn related_truncates_without_padding() {
        let games: Vec<Game> = catalog().into_iter().take(2).collect();
        let related = related_games(&games[0], &games, RELATED_LIMIT);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, 2);

        let alone: Vec<Game> = catalog().into_iter().take(1).collect();
        assert!(related_games(&alone[0], &alone, RELATED_LIMIT).is_empty());
    }

    #[test]
    fn resolution_bundles_active_and_related() {
        let games = catalog();
        let resolution = Resolution::resolve(3, &games, RELATED_LIMIT);
        let active = resolution.active().unwrap();
        assert_eq!(active.id, 3);
        let ids: Vec<u32> = resolution.related().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn route_ids_coerce_instead_of_failing() {
        assert_eq!(parse_route_id(Some("12")), 12);
        assert_eq!(parse_route_id(Some(" 4 ")), 4);
        assert_eq!(parse_route_id(Some("abc")), FALLBACK_ROUTE_ID);
        assert_eq!(parse_route_id(Some("-3")), FALLBACK_ROUTE_ID);
        assert_eq!(parse_route_id(None), FALLBACK_ROUTE_ID);
    }
}
