//! Symbol lookup infrastructure for generated API documentation.
//!
//! This module provides the sorted symbol index, candidate matching by substring
//! and camel-case initials, and tiered ranking of the matches.

// Module declarations
pub mod index;
pub mod matcher;
pub mod scoring;
pub mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{BuildReport, IndexSnapshot, SymbolIndex};
pub use matcher::match_query;
pub use scoring::{MatchTier, RankedMatch, match_tier, rank, rank_matches};
pub use tokenize::normalize_text;
