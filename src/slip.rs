//! The bet slip: an ordered collection of selections plus the
//! wagering mode, with all aggregate figures derived on read.
//!
//! Mutations are plain CRUD. Every derived quantity is recomputed on
//! each call so the slip can never hold a stale total. The slip is
//! exclusively owned; one writer, no shared mutation.

use rust_decimal::Decimal;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use crate::types::{BetSelectionEvent, PlaceBetsRequest, PlacedSelection, Selection, SlipMode};

// ---------------------------------------------------------------------------
// Slip
// ---------------------------------------------------------------------------

/// Ordered collection of current selections plus the chosen mode.
///
/// The stored mode is only meaningful with two or more selections;
/// `effective_mode` collapses to `Single` below that.
#[derive(Debug, Clone)]
pub struct Slip {
    selections: Vec<Selection>,
    mode: SlipMode,
}

impl Default for Slip {
    fn default() -> Self {
        Self::new()
    }
}

impl Slip {
    pub fn new() -> Self {
        Self {
            selections: Vec::new(),
            mode: SlipMode::Single,
        }
    }

    // -- CRUD ---------------------------------------------------------------

    /// Append a selection for the given offer event with stake 0.
    /// Returns the new selection's id.
    pub fn add(&mut self, event: BetSelectionEvent) -> String {
        let id = Uuid::new_v4().to_string();
        debug!(id = %id, market_id = %event.market_id, side = %event.side, price = %event.price, "Selection added");
        self.selections.push(Selection {
            id: id.clone(),
            market_id: event.market_id,
            side: event.side,
            price: event.price,
            label: event.label,
            stake: Decimal::ZERO,
        });
        id
    }

    /// Delete the matching selection. No-op when absent; returns
    /// whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.selections.len();
        self.selections.retain(|s| s.id != id);
        let removed = self.selections.len() < before;
        if removed {
            debug!(id, "Selection removed");
        }
        removed
    }

    /// Cancel all: drop every selection at once.
    pub fn clear(&mut self) {
        let count = self.selections.len();
        self.selections.clear();
        if count > 0 {
            debug!(count, "Slip cleared");
        }
    }

    /// Set a selection's stake. Negative amounts coerce to 0; never
    /// fails, never leaves a stale stake. Returns whether the id was
    /// found.
    pub fn set_stake(&mut self, id: &str, amount: Decimal) -> bool {
        let stake = amount.max(Decimal::ZERO);
        match self.selections.iter_mut().find(|s| s.id == id) {
            Some(sel) => {
                sel.stake = stake;
                true
            }
            None => false,
        }
    }

    /// Set a stake from free-text entry. Unparseable input degrades to
    /// 0, matching the entry field's behavior.
    pub fn set_stake_input(&mut self, id: &str, input: &str) -> bool {
        let amount = input.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO);
        self.set_stake(id, amount)
    }

    /// Distribute an entered total evenly across all selections
    /// (each gets `total / n`). Negative totals coerce to 0; no-op on
    /// an empty slip.
    pub fn set_total_stake(&mut self, total: Decimal) {
        let n = self.selections.len();
        if n == 0 {
            return;
        }
        let total = total.max(Decimal::ZERO);
        let per_leg = total / Decimal::from(n as u64);
        for sel in &mut self.selections {
            sel.stake = per_leg;
        }
        debug!(total = %total, per_leg = %per_leg, legs = n, "Total stake distributed");
    }

    /// Store the wagering mode. Only takes effect once the slip holds
    /// two or more selections; see `effective_mode`.
    pub fn set_mode(&mut self, mode: SlipMode) {
        self.mode = mode;
    }

    // -- Accessors ----------------------------------------------------------

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn get(&self, id: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// The stored mode, regardless of selection count.
    pub fn mode(&self) -> SlipMode {
        self.mode
    }

    /// The mode that actually governs settlement math: `Single`
    /// whenever the slip holds fewer than two selections.
    pub fn effective_mode(&self) -> SlipMode {
        if self.selections.len() <= 1 {
            SlipMode::Single
        } else {
            self.mode
        }
    }

    // -- Derived quantities -------------------------------------------------

    /// Sum of all stakes.
    pub fn total_stake(&self) -> Decimal {
        self.selections.iter().map(|s| s.stake).sum()
    }

    /// Product of all prices; the empty product is 1.
    pub fn combined_odds(&self) -> Decimal {
        self.selections
            .iter()
            .fold(Decimal::ONE, |acc, s| acc * s.price)
    }

    /// Gross return if everything wins, under the effective mode.
    pub fn potential_return(&self) -> Decimal {
        if self.effective_mode() == SlipMode::Accumulator && !self.selections.is_empty() {
            self.total_stake() * self.combined_odds()
        } else {
            self.selections.iter().map(Selection::potential_return).sum()
        }
    }

    /// Net profit if everything wins, floored at zero.
    pub fn potential_profit(&self) -> Decimal {
        (self.potential_return() - self.total_stake()).max(Decimal::ZERO)
    }

    /// Snapshot of every derived figure in one pass.
    pub fn totals(&self) -> SlipTotals {
        SlipTotals {
            total_stake: self.total_stake(),
            combined_odds: self.combined_odds(),
            potential_return: self.potential_return(),
            potential_profit: self.potential_profit(),
        }
    }

    /// Placement precondition: there must be money on the slip.
    pub fn is_placeable(&self) -> bool {
        self.total_stake() > Decimal::ZERO
    }

    /// Build the outbound placement request from the current state.
    /// Callers check `is_placeable` first.
    pub fn to_request(&self) -> PlaceBetsRequest {
        PlaceBetsRequest {
            selections: self
                .selections
                .iter()
                .map(|s| PlacedSelection {
                    market_id: s.market_id.clone(),
                    side: s.side,
                    price: s.price,
                    stake: s.stake,
                })
                .collect(),
            total_stake: self.total_stake(),
            mode: self.effective_mode(),
        }
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Derived aggregate figures for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SlipTotals {
    pub total_stake: Decimal,
    pub combined_odds: Decimal,
    pub potential_return: Decimal,
    pub potential_profit: Decimal,
}

impl fmt::Display for SlipTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stake=${:.2} odds={:.2} return=${:.2} profit=${:.2}",
            self.total_stake, self.combined_odds, self.potential_return, self.potential_profit,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BetSide;
    use rust_decimal_macros::dec;

    fn make_event(market_id: &str, side: BetSide, price: Decimal, label: &str) -> BetSelectionEvent {
        BetSelectionEvent {
            market_id: market_id.to_string(),
            side,
            price,
            label: label.to_string(),
            display_size: None,
        }
    }

    /// Two-selection slip at prices 2.00 and 1.50, no stakes yet.
    fn make_pair() -> (Slip, String, String) {
        let mut slip = Slip::new();
        let a = slip.add(make_event("m1", BetSide::Back, dec!(2.00), "Back India"));
        let b = slip.add(make_event("m2", BetSide::Home, dec!(1.50), "England"));
        (slip, a, b)
    }

    // -- CRUD --

    #[test]
    fn test_add_starts_at_zero_stake() {
        let mut slip = Slip::new();
        let id = slip.add(make_event("m1", BetSide::Back, dec!(2.10), "Back India"));
        let sel = slip.get(&id).unwrap();
        assert_eq!(sel.stake, Decimal::ZERO);
        assert_eq!(sel.price, dec!(2.10));
        assert_eq!(slip.len(), 1);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let (slip, a, b) = make_pair();
        assert_eq!(slip.selections()[0].id, a);
        assert_eq!(slip.selections()[1].id, b);
    }

    #[test]
    fn test_ids_unique() {
        let (slip, a, b) = make_pair();
        assert_ne!(a, b);
        assert_eq!(slip.len(), 2);
    }

    #[test]
    fn test_remove_existing() {
        let (mut slip, a, _) = make_pair();
        assert!(slip.remove(&a));
        assert_eq!(slip.len(), 1);
        assert!(slip.get(&a).is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut slip, _, _) = make_pair();
        assert!(!slip.remove("no-such-id"));
        assert_eq!(slip.len(), 2);
    }

    #[test]
    fn test_remove_then_readd_resets_stake() {
        let mut slip = Slip::new();
        let id = slip.add(make_event("m1", BetSide::Back, dec!(2.00), "Back India"));
        slip.set_stake(&id, dec!(25));
        slip.remove(&id);

        let id2 = slip.add(make_event("m1", BetSide::Back, dec!(2.00), "Back India"));
        assert_ne!(id, id2);
        assert_eq!(slip.get(&id2).unwrap().stake, Decimal::ZERO);
    }

    #[test]
    fn test_clear_cancels_all() {
        let (mut slip, _, _) = make_pair();
        slip.set_total_stake(dec!(50));
        slip.clear();
        assert!(slip.is_empty());
        assert_eq!(slip.total_stake(), Decimal::ZERO);
    }

    // -- Stakes --

    #[test]
    fn test_set_stake() {
        let (mut slip, a, _) = make_pair();
        assert!(slip.set_stake(&a, dec!(10)));
        assert_eq!(slip.get(&a).unwrap().stake, dec!(10));
    }

    #[test]
    fn test_set_stake_negative_coerces_to_zero() {
        let (mut slip, a, _) = make_pair();
        slip.set_stake(&a, dec!(10));
        slip.set_stake(&a, dec!(-5));
        assert_eq!(slip.get(&a).unwrap().stake, Decimal::ZERO);
    }

    #[test]
    fn test_set_stake_unknown_id() {
        let (mut slip, _, _) = make_pair();
        assert!(!slip.set_stake("no-such-id", dec!(10)));
        assert_eq!(slip.total_stake(), Decimal::ZERO);
    }

    #[test]
    fn test_set_stake_idempotent() {
        let (mut slip, a, b) = make_pair();
        slip.set_stake(&a, dec!(10));
        slip.set_stake(&b, dec!(20));
        let once = slip.totals();
        slip.set_stake(&a, dec!(10));
        assert_eq!(slip.totals(), once);
    }

    #[test]
    fn test_set_stake_input_parses() {
        let (mut slip, a, _) = make_pair();
        slip.set_stake_input(&a, " 12.50 ");
        assert_eq!(slip.get(&a).unwrap().stake, dec!(12.50));
    }

    #[test]
    fn test_set_stake_input_garbage_degrades_to_zero() {
        let (mut slip, a, _) = make_pair();
        slip.set_stake(&a, dec!(10));
        slip.set_stake_input(&a, "abc");
        assert_eq!(slip.get(&a).unwrap().stake, Decimal::ZERO);

        slip.set_stake_input(&a, "");
        assert_eq!(slip.get(&a).unwrap().stake, Decimal::ZERO);

        slip.set_stake_input(&a, "-7");
        assert_eq!(slip.get(&a).unwrap().stake, Decimal::ZERO);
    }

    #[test]
    fn test_set_total_stake_splits_evenly() {
        let (mut slip, a, b) = make_pair();
        slip.set_total_stake(dec!(30));
        assert_eq!(slip.get(&a).unwrap().stake, dec!(15));
        assert_eq!(slip.get(&b).unwrap().stake, dec!(15));
        assert_eq!(slip.total_stake(), dec!(30));
    }

    #[test]
    fn test_set_total_stake_empty_slip_noop() {
        let mut slip = Slip::new();
        slip.set_total_stake(dec!(30));
        assert_eq!(slip.total_stake(), Decimal::ZERO);
    }

    #[test]
    fn test_set_total_stake_negative_coerces_to_zero() {
        let (mut slip, a, _) = make_pair();
        slip.set_total_stake(dec!(-30));
        assert_eq!(slip.get(&a).unwrap().stake, Decimal::ZERO);
    }

    // -- Mode --

    #[test]
    fn test_effective_mode_collapses_below_two() {
        let mut slip = Slip::new();
        slip.set_mode(SlipMode::Accumulator);
        assert_eq!(slip.effective_mode(), SlipMode::Single);

        slip.add(make_event("m1", BetSide::Back, dec!(2.00), "Back India"));
        assert_eq!(slip.effective_mode(), SlipMode::Single);

        slip.add(make_event("m2", BetSide::Home, dec!(1.50), "England"));
        assert_eq!(slip.effective_mode(), SlipMode::Accumulator);
    }

    #[test]
    fn test_single_selection_modes_coincide() {
        let mut slip = Slip::new();
        let id = slip.add(make_event("m1", BetSide::Back, dec!(2.00), "Back India"));
        slip.set_stake(&id, dec!(10));

        slip.set_mode(SlipMode::Single);
        let single = slip.potential_return();
        slip.set_mode(SlipMode::Accumulator);
        let acca = slip.potential_return();
        assert_eq!(single, acca);
        assert_eq!(single, dec!(20.00));
    }

    // -- Derived quantities --

    #[test]
    fn test_single_mode_scenario() {
        let (mut slip, a, b) = make_pair();
        slip.set_stake(&a, dec!(10));
        slip.set_stake(&b, dec!(20));

        let totals = slip.totals();
        assert_eq!(totals.total_stake, dec!(30));
        assert_eq!(totals.potential_return, dec!(50.00));
        assert_eq!(totals.potential_profit, dec!(20.00));
    }

    #[test]
    fn test_accumulator_scenario() {
        let (mut slip, a, b) = make_pair();
        slip.set_mode(SlipMode::Accumulator);
        slip.set_total_stake(dec!(30));

        assert_eq!(slip.get(&a).unwrap().stake, dec!(15));
        assert_eq!(slip.get(&b).unwrap().stake, dec!(15));

        let totals = slip.totals();
        assert_eq!(totals.combined_odds, dec!(3.0000));
        assert_eq!(totals.total_stake, dec!(30));
        assert_eq!(totals.potential_return, dec!(90.0000));
        assert_eq!(totals.potential_profit, dec!(60.0000));
    }

    #[test]
    fn test_empty_slip_totals() {
        let slip = Slip::new();
        let totals = slip.totals();
        assert_eq!(totals.total_stake, Decimal::ZERO);
        assert_eq!(totals.combined_odds, Decimal::ONE);
        assert_eq!(totals.potential_return, Decimal::ZERO);
        assert_eq!(totals.potential_profit, Decimal::ZERO);
        assert!(!slip.is_placeable());
    }

    #[test]
    fn test_zero_stake_selection_stays_but_contributes_nothing() {
        let (mut slip, a, _) = make_pair();
        slip.set_stake(&a, dec!(10));
        // b left at stake 0

        assert_eq!(slip.len(), 2);
        assert_eq!(slip.total_stake(), dec!(10));
        assert_eq!(slip.potential_return(), dec!(20.00)); // only a contributes
    }

    #[test]
    fn test_profit_floored_at_zero() {
        let mut slip = Slip::new();
        // Sub-evens price: return below stake
        let id = slip.add(make_event("m1", BetSide::Lay, dec!(0.50), "Lay India"));
        slip.set_stake(&id, dec!(10));
        assert_eq!(slip.potential_return(), dec!(5.00));
        assert_eq!(slip.potential_profit(), Decimal::ZERO);
    }

    #[test]
    fn test_is_placeable() {
        let (mut slip, a, _) = make_pair();
        assert!(!slip.is_placeable());
        slip.set_stake(&a, dec!(5));
        assert!(slip.is_placeable());
        slip.set_stake(&a, Decimal::ZERO);
        assert!(!slip.is_placeable());
    }

    #[test]
    fn test_to_request() {
        let (mut slip, a, b) = make_pair();
        slip.set_mode(SlipMode::Accumulator);
        slip.set_stake(&a, dec!(10));
        slip.set_stake(&b, dec!(20));

        let req = slip.to_request();
        assert_eq!(req.selections.len(), 2);
        assert_eq!(req.total_stake, dec!(30));
        assert_eq!(req.mode, SlipMode::Accumulator);
        assert_eq!(req.selections[0].market_id, "m1");
        assert_eq!(req.selections[1].price, dec!(1.50));
    }

    #[test]
    fn test_totals_display() {
        let (mut slip, a, b) = make_pair();
        slip.set_stake(&a, dec!(10));
        slip.set_stake(&b, dec!(20));
        let display = format!("{}", slip.totals());
        assert!(display.contains("$30.00"));
        assert!(display.contains("$50.00"));
    }
}
