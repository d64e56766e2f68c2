//! Market data feeds.
//!
//! Defines the `MarketFeed` trait and provides implementations for:
//! - Cricket (RapidAPI cricbuzz-style) — live and upcoming fixtures
//! - Sample — fixed in-memory catalog for offline runs

pub mod cricket;
pub mod sample;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::MatchMarket;

/// Abstraction over match-market data sources.
///
/// Implementors supply the markets the betting grid displays. Feeds
/// are read-only; bet placement never goes through a feed.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Fetch the current set of match markets.
    async fn fetch_markets(&self) -> Result<Vec<MatchMarket>>;

    /// Feed name for logging and identification.
    fn name(&self) -> &str;
}
