//! Cricket fixtures feed (RapidAPI, cricbuzz-style endpoints).
//!
//! Supplies live and upcoming match markets for the betting grid.
//! Free-tier endpoint shapes vary between providers, so parsing is
//! defensive: records missing an id or a team are skipped instead of
//! failing the whole fetch.
//!
//! Auth: `x-rapidapi-key` / `x-rapidapi-host` headers on every request.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join;
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::MarketFeed;
use crate::types::MatchMarket;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const FEED_NAME: &str = "cricket";

/// The scoreboard payload carries no odds; both outcomes open at this
/// reference quote and the ladder brackets it.
const DEFAULT_REFERENCE_PRICE: Decimal = dec!(1.90);

// ---------------------------------------------------------------------------
// API response types (cricbuzz JSON → Rust)
// ---------------------------------------------------------------------------

/// Shape returned by `/matches/list`. Only the fields we need.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchesListResponse {
    #[serde(default)]
    type_matches: Vec<TypeMatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeMatch {
    #[serde(default)]
    series_matches: Vec<SeriesMatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesMatch {
    #[serde(default)]
    series_ad_wrapper: Option<SeriesWrapper>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesWrapper {
    #[serde(default)]
    matches: Vec<ApiMatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMatch {
    #[serde(default)]
    match_info: Option<MatchInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchInfo {
    /// A number in some API variants, a string in others.
    #[serde(default)]
    match_id: Option<serde_json::Value>,
    #[serde(default)]
    series_name: Option<String>,
    #[serde(default)]
    team1: Option<ApiTeam>,
    #[serde(default)]
    team2: Option<ApiTeam>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTeam {
    /// Short name, e.g. "IND".
    #[serde(default)]
    team_s_name: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Cricket scoreboard feed client.
pub struct CricketFeed {
    http: Client,
    api_key: String,
    host: String,
}

impl CricketFeed {
    pub fn new(api_key: String, host: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("ARENA/0.1.0 (betting-grid)")
            .build()
            .context("Failed to build HTTP client for cricket feed")?;

        Ok(Self {
            http,
            api_key,
            host,
        })
    }

    // -- Internal helpers ------------------------------------------------

    async fn matches_list(&self, match_state: &str) -> Result<MatchesListResponse> {
        let url = format!(
            "https://{}/matches/list?matchState={}",
            self.host, match_state,
        );

        debug!(url = %url, "Fetching cricket fixtures");

        let resp = self
            .http
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
            .context("Cricket API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Cricket API error {status}: {body}");
        }

        resp.json()
            .await
            .context("Failed to parse cricket matches response")
    }

    /// Render a match id that may arrive as a JSON number or string.
    fn id_string(value: &serde_json::Value) -> Option<String> {
        match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Convert an API match record to a `MatchMarket`. Returns `None`
    /// when an id or a team name is missing.
    fn to_market(m: ApiMatch, live: bool) -> Option<MatchMarket> {
        let info = m.match_info?;
        let id = info.match_id.as_ref().and_then(Self::id_string)?;
        let home_team = team_name(info.team1.as_ref())?;
        let away_team = team_name(info.team2.as_ref())?;

        Some(MatchMarket {
            id,
            competition: info.series_name.unwrap_or_default(),
            home_team,
            away_team,
            home_price: DEFAULT_REFERENCE_PRICE,
            away_price: DEFAULT_REFERENCE_PRICE,
            draw_price: None,
            is_live: live,
            start_note: info.status.or(info.state).unwrap_or_default(),
        })
    }

    fn flatten(resp: MatchesListResponse, live: bool) -> Vec<MatchMarket> {
        resp.type_matches
            .into_iter()
            .flat_map(|tm| tm.series_matches)
            .filter_map(|sm| sm.series_ad_wrapper)
            .flat_map(|w| w.matches)
            .filter_map(|m| Self::to_market(m, live))
            .collect()
    }
}

fn team_name(team: Option<&ApiTeam>) -> Option<String> {
    let t = team?;
    t.team_s_name
        .clone()
        .or_else(|| t.team_name.clone())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// MarketFeed trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl MarketFeed for CricketFeed {
    /// Fetch live and upcoming fixtures concurrently, deduplicated by
    /// match id. A failing state query is logged and skipped, never
    /// fatal.
    async fn fetch_markets(&self) -> Result<Vec<MatchMarket>> {
        info!("Scanning cricket fixtures...");

        let (live_resp, upcoming_resp) =
            join(self.matches_list("live"), self.matches_list("upcoming")).await;

        let mut seen = std::collections::HashSet::new();
        let mut markets = Vec::new();

        for (state, live, resp) in [("live", true, live_resp), ("upcoming", false, upcoming_resp)] {
            match resp {
                Ok(resp) => {
                    for market in Self::flatten(resp, live) {
                        if seen.insert(market.id.clone()) {
                            markets.push(market);
                        }
                    }
                    debug!(state, total = markets.len(), "Cricket batch fetched");
                }
                Err(e) => {
                    warn!(state, error = %e, "Cricket fixtures query failed, continuing");
                }
            }
        }

        info!(total = markets.len(), "Cricket scan complete");

        Ok(markets)
    }

    fn name(&self) -> &str {
        FEED_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
