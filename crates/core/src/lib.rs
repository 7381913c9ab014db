#![warn(clippy::all, missing_docs)]

//! Core domain logic for the gamepick recommendation flow.
//!
//! This crate hosts the catalog models, filter criteria, pagination,
//! detail resolution, the staged-progress sequence, and configuration
//! used by the terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod criteria;
pub mod models;
pub mod progress;
pub mod resolve;

pub use catalog::{
    page_slice, total_pages, CatalogProvider, CatalogStore, JsonCatalog, PageState, SampleCatalog,
    PAGE_SIZE,
};
pub use config::AppConfig;
pub use criteria::{AgeRating, CriteriaSnapshot, FilterCriteria, PriceBucket, GENRE_TAGS};
pub use models::{format_price, Game, OsTag, SpecTier, DEFAULT_STORE_URL};
pub use progress::{
    recommendation_stages, ProgressEvent, ProgressHandle, ProgressSequence, Stage,
};
pub use resolve::{parse_route_id, related_games, resolve_active, Resolution, RELATED_LIMIT};
