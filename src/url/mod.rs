//! URL handling module
//!
//! This module provides link resolution, the configurable URL equality policy
//! used for deduplication, network-location extraction, and the scope rule
//! that decides which discovered URLs are eligible for crawling.

mod domain;
mod normalize;
mod scope;

// Re-export main types and functions
pub use domain::extract_authority;
pub use normalize::{resolve_link, UrlEquality};
pub use scope::{matches_pattern, ScopeRule};
