//! Shared types for the ARENA betting engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that feed, slip, and engine
//! modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Offer
// ---------------------------------------------------------------------------

/// One selectable price level on a back/lay grid.
///
/// Immutable once built: the ladder source creates offers, the UI
/// displays them, and they are discarded when the ladder regenerates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Quoted decimal odds, always > 0.
    pub price: Decimal,
    /// Opaque display size, e.g. "2.5K". Never used in arithmetic.
    pub display_size: String,
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ({})", self.price, self.display_size)
    }
}

// ---------------------------------------------------------------------------
// Match market
// ---------------------------------------------------------------------------

/// A match market as delivered by a data feed: two or three outcomes,
/// each with a reference price the ladder is built around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMarket {
    pub id: String,
    /// Competition or series name, e.g. "Premier League".
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    /// Reference decimal odds for the home outcome.
    pub home_price: Decimal,
    /// Reference decimal odds for the away outcome.
    pub away_price: Decimal,
    /// Present only for three-outcome markets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_price: Option<Decimal>,
    pub is_live: bool,
    /// Free-form scheduling note, e.g. "Starts in 2h" or "2nd Innings".
    pub start_note: String,
}

impl fmt::Display for MatchMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} v {} ({:.2}",
            self.id, self.home_team, self.away_team, self.home_price,
        )?;
        if let Some(draw) = self.draw_price {
            write!(f, " | {draw:.2}")?;
        }
        write!(f, " | {:.2})", self.away_price)?;
        if self.is_live {
            write!(f, " LIVE")?;
        }
        Ok(())
    }
}

impl MatchMarket {
    /// Reference price for an outcome side; `None` for exchange sides
    /// and for `Draw` on two-outcome markets.
    pub fn outcome_price(&self, side: BetSide) -> Option<Decimal> {
        match side {
            BetSide::Home => Some(self.home_price),
            BetSide::Away => Some(self.away_price),
            BetSide::Draw => self.draw_price,
            BetSide::Back | BetSide::Lay => None,
        }
    }

    /// All selectable outcomes in display order: home, draw (if any),
    /// away.
    pub fn outcomes(&self) -> Vec<(BetSide, String, Decimal)> {
        let mut out = vec![(BetSide::Home, self.home_team.clone(), self.home_price)];
        if let Some(draw) = self.draw_price {
            out.push((BetSide::Draw, "Draw".to_string(), draw));
        }
        out.push((BetSide::Away, self.away_team.clone(), self.away_price));
        out
    }

    /// Build the selection event for activating an outcome directly.
    pub fn outcome_event(&self, side: BetSide) -> Option<BetSelectionEvent> {
        let price = self.outcome_price(side)?;
        let label = match side {
            BetSide::Home => self.home_team.clone(),
            BetSide::Away => self.away_team.clone(),
            BetSide::Draw => "Draw".to_string(),
            BetSide::Back | BetSide::Lay => return None,
        };
        Some(BetSelectionEvent {
            market_id: self.id.clone(),
            side,
            price,
            label,
            display_size: None,
        })
    }

    /// Helper to build a test/sample market with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        MatchMarket {
            id: "c1".to_string(),
            competition: "Test Match".to_string(),
            home_team: "India".to_string(),
            away_team: "Australia".to_string(),
            home_price: rust_decimal_macros::dec!(2.1),
            away_price: rust_decimal_macros::dec!(1.8),
            draw_price: None,
            is_live: true,
            start_note: "2nd Innings".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which side of a market a selection is on.
///
/// Exchange-style grids emit `Back`/`Lay`; plain match-odds rows emit
/// the outcome labels `Home`/`Away`/`Draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetSide {
    Back,
    Lay,
    Home,
    Away,
    Draw,
}

impl BetSide {
    /// Whether this side came from an exchange back/lay grid rather
    /// than a plain outcome row.
    pub fn is_exchange(&self) -> bool {
        matches!(self, BetSide::Back | BetSide::Lay)
    }
}

impl fmt::Display for BetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSide::Back => write!(f, "BACK"),
            BetSide::Lay => write!(f, "LAY"),
            BetSide::Home => write!(f, "HOME"),
            BetSide::Away => write!(f, "AWAY"),
            BetSide::Draw => write!(f, "DRAW"),
        }
    }
}

/// Attempt to parse a string into a BetSide (case-insensitive).
impl std::str::FromStr for BetSide {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "back" => Ok(BetSide::Back),
            "lay" => Ok(BetSide::Lay),
            "home" => Ok(BetSide::Home),
            "away" => Ok(BetSide::Away),
            "draw" => Ok(BetSide::Draw),
            _ => Err(anyhow::anyhow!("Unknown bet side: {s}")),
        }
    }
}

/// Wagering mode for a slip with two or more selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlipMode {
    /// Each selection settles independently at its own stake.
    Single,
    /// One chained wager: odds multiply, the combined stake rides the
    /// whole chain.
    Accumulator,
}

impl fmt::Display for SlipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlipMode::Single => write!(f, "Single"),
            SlipMode::Accumulator => write!(f, "Accumulator"),
        }
    }
}

impl std::str::FromStr for SlipMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "singles" => Ok(SlipMode::Single),
            "accumulator" | "acca" | "multi" => Ok(SlipMode::Accumulator),
            _ => Err(anyhow::anyhow!("Unknown slip mode: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A user's chosen bet, owned exclusively by the slip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    /// Unique within the slip for its lifetime.
    pub id: String,
    pub market_id: String,
    pub side: BetSide,
    /// Quoted decimal odds, always > 0.
    pub price: Decimal,
    /// Display label, e.g. "Back India".
    pub label: String,
    /// Always >= 0. Mutated by the user; 0 contributes no exposure.
    pub stake: Decimal,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} @ {:.2} × ${:.2}",
            self.market_id, self.side, self.label, self.price, self.stake,
        )
    }
}

impl Selection {
    /// Gross return if this selection wins: stake × price.
    pub fn potential_return(&self) -> Decimal {
        self.stake * self.price
    }

    /// Whether the user has put any money on this selection.
    pub fn is_staked(&self) -> bool {
        self.stake > Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Boundary events
// ---------------------------------------------------------------------------

/// Inbound event from the market-data / UI collaborator when the user
/// activates an offer. Validated before it may enter the slip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetSelectionEvent {
    pub market_id: String,
    pub side: BetSide,
    pub price: Decimal,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_size: Option<String>,
}

impl BetSelectionEvent {
    /// Boundary check: price must be strictly positive.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.price <= Decimal::ZERO {
            return Err(ArenaError::InvalidPrice {
                market_id: self.market_id.clone(),
                price: self.price,
            });
        }
        Ok(())
    }
}

impl fmt::Display for BetSelectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} @ {:.2}",
            self.market_id, self.side, self.label, self.price,
        )
    }
}

/// Outbound request to the placement collaborator. Only emitted when
/// the slip's placement precondition holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBetsRequest {
    pub selections: Vec<PlacedSelection>,
    pub total_stake: Decimal,
    pub mode: SlipMode,
}

/// One leg of a placement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedSelection {
    pub market_id: String,
    pub side: BetSide,
    pub price: Decimal,
    pub stake: Decimal,
}

// ---------------------------------------------------------------------------
// Bet records
// ---------------------------------------------------------------------------

/// Lifecycle of a bet as shown in the my-bets view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    /// Still on the slip, cancellable.
    Unmatched,
    /// Committed: stake debited, recorded in the session ledger.
    Matched,
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Unmatched => write!(f, "UNMATCHED"),
            BetStatus::Matched => write!(f, "MATCHED"),
        }
    }
}

/// A committed bet in the session ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetRecord {
    pub order_id: String,
    pub market_id: String,
    /// Runner / outcome label as shown to the user.
    pub runner: String,
    pub side: BetSide,
    pub price: Decimal,
    pub size: Decimal,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
}

impl fmt::Display for BetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} @ {:.2} × ${:.2} ({}) [{}]",
            self.market_id, self.side, self.runner, self.price, self.size, self.status, self.order_id,
        )
    }
}

impl BetRecord {
    /// Gross return if this bet wins.
    pub fn potential_return(&self) -> Decimal {
        self.size * self.price
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ARENA.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("Invalid price {price} for market {market_id}: prices must be > 0")]
    InvalidPrice { market_id: String, price: Decimal },

    #[error("Nothing to place: total stake is zero")]
    ZeroStake,

    #[error("Insufficient balance: need ${needed:.2}, have ${available:.2}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    #[error("Feed error ({feed}): {message}")]
    Feed { feed: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
