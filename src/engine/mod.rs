//! Betting engine — slip, wallet, and placement.
//!
//! `BettingSession` ties the bet slip to the session wallet. Selections
//! accumulate in the slip as unmatched picks; `place_bets` debits the
//! wallet, converts every staked pick into a matched ledger record, and
//! clears the slip. Any failure along the way leaves both the slip and
//! the wallet exactly as they were.

pub mod wallet;

use chrono::Utc;
use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::slip::{Slip, SlipTotals};
use crate::types::{
    ArenaError, BetRecord, BetSelectionEvent, BetStatus, PlaceBetsRequest, Selection, SlipMode,
};
use wallet::Wallet;

// ---------------------------------------------------------------------------
// Placement receipt
// ---------------------------------------------------------------------------

/// Result of a successful `place_bets` call.
#[derive(Debug, Clone)]
pub struct PlacementReceipt {
    pub order_ids: Vec<String>,
    pub total_staked: Decimal,
    pub mode: SlipMode,
    pub balance_after: Decimal,
    pub request: PlaceBetsRequest,
}

impl fmt::Display for PlacementReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} bet(s) staked=${:.2} balance=${:.2}",
            self.order_ids.len(),
            self.mode,
            self.total_staked,
            self.balance_after,
        )
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's betting session: slip, wallet, and matched-bet ledger.
pub struct BettingSession {
    slip: Slip,
    wallet: Wallet,
    matched: Vec<BetRecord>,
}

impl BettingSession {
    pub fn new(starting_balance: Decimal) -> Self {
        Self {
            slip: Slip::new(),
            wallet: Wallet::new(starting_balance),
            matched: Vec::new(),
        }
    }

    // -- Selection management --------------------------------------------

    /// Validate an outcome pick and add it to the slip. Returns the new
    /// selection id.
    pub fn select(&mut self, event: BetSelectionEvent) -> Result<String, ArenaError> {
        event.validate()?;
        let id = self.slip.add(event);
        info!(
            selection = %id,
            picks = self.slip.len(),
            "Selection added to slip"
        );
        Ok(id)
    }

    /// Remove one selection. Unknown ids are a no-op.
    pub fn remove(&mut self, selection_id: &str) -> bool {
        let removed = self.slip.remove(selection_id);
        if removed {
            debug!(selection = %selection_id, "Selection removed from slip");
        }
        removed
    }

    /// Drop every selection without placing anything.
    pub fn cancel_all(&mut self) {
        let count = self.slip.len();
        self.slip.clear();
        info!(cancelled = count, "All unmatched selections cancelled");
    }

    pub fn set_stake(&mut self, selection_id: &str, amount: Decimal) -> bool {
        self.slip.set_stake(selection_id, amount)
    }

    /// Set a stake from raw text input; unparseable input means zero.
    pub fn set_stake_input(&mut self, selection_id: &str, input: &str) -> bool {
        self.slip.set_stake_input(selection_id, input)
    }

    /// Spread `total` evenly across every selection on the slip.
    pub fn set_total_stake(&mut self, total: Decimal) {
        self.slip.set_total_stake(total);
    }

    pub fn set_mode(&mut self, mode: SlipMode) {
        self.slip.set_mode(mode);
    }

    // -- Views ------------------------------------------------------------

    /// Picks currently on the slip. These are the session's unmatched
    /// bets; removing a pick removes it here too.
    pub fn unmatched_bets(&self) -> &[Selection] {
        self.slip.selections()
    }

    /// Ledger of placed bets, oldest first.
    pub fn matched_bets(&self) -> &[BetRecord] {
        &self.matched
    }

    pub fn balance(&self) -> Decimal {
        self.wallet.balance()
    }

    pub fn slip(&self) -> &Slip {
        &self.slip
    }

    pub fn totals(&self) -> SlipTotals {
        self.slip.totals()
    }

    // -- Placement ---------------------------------------------------------

    /// Place everything on the slip.
    ///
    /// Fails with `ZeroStake` when nothing is staked and with
    /// `InsufficientBalance` when the wallet cannot cover the total; in
    /// both cases the slip and wallet are untouched.
    pub fn place_bets(&mut self) -> Result<PlacementReceipt, ArenaError> {
        if !self.slip.is_placeable() {
            return Err(ArenaError::ZeroStake);
        }

        let request = self.slip.to_request();
        let total = request.total_stake;
        let mode = request.mode;

        self.wallet.debit(total)?;

        let placed_at = Utc::now();
        let mut order_ids = Vec::with_capacity(self.slip.len());
        for pick in self.slip.selections() {
            let record = BetRecord {
                order_id: Uuid::new_v4().to_string(),
                market_id: pick.market_id.clone(),
                runner: pick.label.clone(),
                side: pick.side,
                price: pick.price,
                size: pick.stake,
                status: BetStatus::Matched,
                placed_at,
            };
            order_ids.push(record.order_id.clone());
            self.matched.push(record);
        }

        self.slip.clear();

        let receipt = PlacementReceipt {
            order_ids,
            total_staked: total,
            mode,
            balance_after: self.wallet.balance(),
            request,
        };

        info!(
            bets = receipt.order_ids.len(),
            mode = %receipt.mode,
            staked = format!("${:.2}", receipt.total_staked),
            balance = format!("${:.2}", receipt.balance_after),
            "Bets placed"
        );

        Ok(receipt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
