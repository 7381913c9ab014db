//! Catalog acquisition and caching.

/// Page slicing and navigation bounds.
pub mod pager;

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::info;

use crate::models::{dedup_by_id, Game, OsTag, SpecTier};

pub use pager::{page_slice, total_pages, PageState, PAGE_SIZE};

/// Source of catalog entries. The core never fetches anything itself; a
/// provider hands it an ordered sequence of games and that is the whole
/// data boundary.
pub trait CatalogProvider: Send + Sync {
    /// Produce the full ordered catalog.
    fn fetch_catalog(&self) -> Result<Vec<Game>>;
}

/// Built-in sample catalog used when no catalog file is configured.
pub struct SampleCatalog;

static SAMPLE_GAMES: Lazy<Vec<Game>> = Lazy::new(|| {
    (0u32..30)
        .map(|i| {
            let genres: Vec<String> = match i % 3 {
                0 => vec!["RPG", "스토리"],
                1 => vec!["액션", "어드벤처"],
                _ => vec!["시뮬레이션", "캐주얼"],
            }
            .into_iter()
            .map(str::to_string)
            .collect();
            Game {
                id: i + 1,
                name: format!("추천 게임 {}", i + 1),
                image: format!("/images/sample{}.jpg", (i % 5) + 1),
                genres,
                price: if i % 4 == 0 { 0 } else { 9_900 + (i % 5) * 5_000 },
                os: Some(OsTag::Windows),
                spec: Some(match i % 3 {
                    0 => SpecTier::Low,
                    1 => SpecTier::Mid,
                    _ => SpecTier::High,
                }),
                steam_url: None,
            }
        })
        .collect()
});

impl CatalogProvider for SampleCatalog {
    fn fetch_catalog(&self) -> Result<Vec<Game>> {
        Ok(SAMPLE_GAMES.clone())
    }
}

/// Catalog read from a JSON file containing an array of games.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    /// Provider reading from the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for JsonCatalog {
    fn fetch_catalog(&self) -> Result<Vec<Game>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read catalog {}", self.path.display()))?;
        let games: Vec<Game> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse catalog {}", self.path.display()))?;
        Ok(games)
    }
}

/// Thread-safe store holding the catalog for the lifetime of a session.
///
/// Entries are deduplicated by id on load (first occurrence wins) so the
/// ordered-unique catalog invariant holds no matter what the provider
/// returned.
pub struct CatalogStore {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    provider: Box<dyn CatalogProvider>,
    cache: Vec<Game>,
    loaded_at: Option<DateTime<Utc>>,
}

impl CatalogStore {
    /// Build a store over the given provider. Nothing is fetched until the
    /// first [`CatalogStore::games`] call.
    pub fn new(provider: Box<dyn CatalogProvider>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                provider,
                cache: Vec::new(),
                loaded_at: None,
            })),
        }
    }

    /// Return all games, populating the cache on first use.
    pub fn games(&self) -> Result<Vec<Game>> {
        let mut inner = self.inner.write();
        if inner.loaded_at.is_none() {
            let raw = inner.provider.fetch_catalog()?;
            let fetched = raw.len();
            inner.cache = dedup_by_id(raw);
            inner.loaded_at = Some(Utc::now());
            if fetched != inner.cache.len() {
                info!(
                    fetched,
                    kept = inner.cache.len(),
                    "Dropped duplicate catalog ids"
                );
            }
        }
        Ok(inner.cache.clone())
    }

    /// Number of catalog entries (0 before the first load).
    pub fn len(&self) -> usize {
        self.inner.read().cache.len()
    }

    /// Whether the cached catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().cache.is_empty()
    }

    /// When the catalog was last fetched, if it has been.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().loaded_at
    }

    /// Drop the cache so the next [`CatalogStore::games`] refetches.
    pub fn refresh(&self) {
        let mut inner = self.inner.write();
        inner.cache.clear();
        inner.loaded_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sample_catalog_matches_expected_shape() -> Result<()> {
        let games = SampleCatalog.fetch_catalog()?;
        assert_eq!(games.len(), 30);
        assert_eq!(games[0].id, 1);
        assert_eq!(games[0].price, 0);
        assert_eq!(games[0].genres, vec!["RPG", "스토리"]);
        assert_eq!(games[1].price, 14_900);
        assert_eq!(games[29].id, 30);
        Ok(())
    }

    #[test]
    fn store_caches_and_dedups() -> Result<()> {
        struct Doubled;
        impl CatalogProvider for Doubled {
            fn fetch_catalog(&self) -> Result<Vec<Game>> {
                let mut games = SampleCatalog.fetch_catalog()?;
                games.extend(SampleCatalog.fetch_catalog()?);
                Ok(games)
            }
        }

        let store = CatalogStore::new(Box::new(Doubled));
        assert!(store.is_empty());
        assert!(store.loaded_at().is_none());

        let games = store.games()?;
        assert_eq!(games.len(), 30);
        assert_eq!(store.len(), 30);
        assert!(store.loaded_at().is_some());

        store.refresh();
        assert!(store.loaded_at().is_none());
        assert_eq!(store.games()?.len(), 30);
        Ok(())
    }

    #[test]
    fn empty_provider_yields_empty_catalog() -> Result<()> {
        struct Nothing;
        impl CatalogProvider for Nothing {
            fn fetch_catalog(&self) -> Result<Vec<Game>> {
                Ok(Vec::new())
            }
        }

        let store = CatalogStore::new(Box::new(Nothing));
        assert!(store.games()?.is_empty());
        // Loaded and empty is a valid state, not an error.
        assert!(store.loaded_at().is_some());
        Ok(())
    }

    #[test]
    fn json_catalog_round_trips() -> Result<()> {
        let games = SampleCatalog.fetch_catalog()?;
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(serde_json::to_string(&games)?.as_bytes())?;

        let loaded = JsonCatalog::new(file.path()).fetch_catalog()?;
        assert_eq!(loaded.len(), games.len());
        assert_eq!(loaded[4].name, games[4].name);
        assert_eq!(loaded[4].price, games[4].price);
        Ok(())
    }

    #[test]
    fn json_catalog_reports_missing_file() {
        let err = JsonCatalog::new("/definitely/not/here.json")
            .fetch_catalog()
            .unwrap_err();
        assert!(err.to_string().contains("failed to read catalog"));
    }
}
