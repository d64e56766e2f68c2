//! Odds-ladder derivation.
//!
//! Synthesizes a fixed-size grid of back/lay price levels around a
//! single reference quote, mimicking an exchange order book. Pure
//! functions only: no state, safe to call from anywhere.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::Offer;

/// Price increment between adjacent ladder levels.
pub const TICK: Decimal = dec!(0.02);

/// Number of price levels on each side.
pub const DEPTH: usize = 3;

// ---------------------------------------------------------------------------
// Ladder
// ---------------------------------------------------------------------------

/// A derived set of back/lay price levels around a reference quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Ladder {
    /// Ascending toward the reference price; the last entry is the
    /// reference itself (best available back from the bettor's view).
    pub back: [Decimal; DEPTH],
    /// Ascending away from the reference price.
    pub lay: [Decimal; DEPTH],
}

impl Ladder {
    /// Best back price: the reference quote itself.
    pub fn best_back(&self) -> Decimal {
        self.back[DEPTH - 1]
    }

    /// Best lay price: one tick above the reference quote.
    pub fn best_lay(&self) -> Decimal {
        self.lay[0]
    }

    /// Pair each level with a display size, producing offer rows ready
    /// for a back/lay grid. Sizes apply positionally; a missing size
    /// renders empty.
    pub fn offers(&self, back_sizes: &[&str], lay_sizes: &[&str]) -> LadderOffers {
        LadderOffers {
            back: pair(&self.back, back_sizes),
            lay: pair(&self.lay, lay_sizes),
        }
    }
}

/// Ladder levels paired with display sizes.
#[derive(Debug, Clone)]
pub struct LadderOffers {
    pub back: Vec<Offer>,
    pub lay: Vec<Offer>,
}

fn pair(prices: &[Decimal; DEPTH], sizes: &[&str]) -> Vec<Offer> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| Offer {
            price: *price,
            display_size: sizes.get(i).copied().unwrap_or("").to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the ladder for a reference price.
///
/// `back = [p-0.04, p-0.02, p]`, `lay = [p+0.02, p+0.04, p+0.06]`,
/// each level rounded to 2 decimal places, half away from zero.
///
/// A very low reference price can push a computed back level to zero
/// or below; the value is returned untouched and left to the caller.
pub fn build(base_price: Decimal) -> Ladder {
    let level = |offset: i64| round2(base_price + TICK * Decimal::from(offset));
    Ladder {
        back: [level(-2), level(-1), level(0)],
        lay: [level(1), level(2), level(3)],
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
