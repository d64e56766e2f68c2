//! In-memory sample feed.
//!
//! Fixed catalog of matches used when no live feed is configured or a
//! live fetch returns nothing. Prices here are the reference quotes
//! the ladder brackets.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal_macros::dec;

use super::MarketFeed;
use crate::types::MatchMarket;

const FEED_NAME: &str = "sample";

/// Offline match catalog.
#[derive(Debug, Default)]
pub struct SampleFeed;

impl SampleFeed {
    pub fn new() -> Self {
        Self
    }

    /// The full catalog: cricket, soccer, tennis.
    pub fn catalog() -> Vec<MatchMarket> {
        vec![
            MatchMarket {
                id: "c1".to_string(),
                competition: "Test Match".to_string(),
                home_team: "India".to_string(),
                away_team: "Australia".to_string(),
                home_price: dec!(2.1),
                away_price: dec!(1.8),
                draw_price: None,
                is_live: true,
                start_note: "2nd Innings".to_string(),
            },
            MatchMarket {
                id: "c2".to_string(),
                competition: "ODI".to_string(),
                home_team: "England".to_string(),
                away_team: "Pakistan".to_string(),
                home_price: dec!(1.9),
                away_price: dec!(2.2),
                draw_price: None,
                is_live: false,
                start_note: "Starts in 2h".to_string(),
            },
            MatchMarket {
                id: "s1".to_string(),
                competition: "Premier League".to_string(),
                home_team: "Chelsea".to_string(),
                away_team: "Arsenal".to_string(),
                home_price: dec!(2.5),
                away_price: dec!(2.8),
                draw_price: Some(dec!(3.2)),
                is_live: true,
                start_note: "67'".to_string(),
            },
            MatchMarket {
                id: "s2".to_string(),
                competition: "La Liga".to_string(),
                home_team: "Barcelona".to_string(),
                away_team: "Real Madrid".to_string(),
                home_price: dec!(2.1),
                away_price: dec!(3.1),
                draw_price: Some(dec!(3.5)),
                is_live: false,
                start_note: "Tomorrow 8:00 PM".to_string(),
            },
            MatchMarket {
                id: "t1".to_string(),
                competition: "ATP Masters".to_string(),
                home_team: "Novak Djokovic".to_string(),
                away_team: "Rafael Nadal".to_string(),
                home_price: dec!(1.7),
                away_price: dec!(2.3),
                draw_price: None,
                is_live: true,
                start_note: "Set 2".to_string(),
            },
        ]
    }
}

#[async_trait]
impl MarketFeed for SampleFeed {
    async fn fetch_markets(&self) -> Result<Vec<MatchMarket>> {
        Ok(Self::catalog())
    }

    fn name(&self) -> &str {
        FEED_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
