//! # Reconciliation Arithmetic
//!
//! The authoritative definition of the stock/scheme/claim counters.
//!
//! ## Where This Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Bill / Claim Reconciliation                            │
//! │                                                                         │
//! │  Bill line (qty)                    Claim line (qty)                   │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  deplete_stock(stock, sold, qty)    absorb_claim(stock, sold,          │
//! │  ├── newStock = max(stock-qty, 0)                claimed, qty)         │
//! │  └── newSold  = sold + qty          ├── newClaimed = claimed + qty     │
//! │       │                             └── newRemaining =                 │
//! │       ▼                                  max(stock - sold              │
//! │  evaluate_scheme(...)                        - newClaimed, 0)          │
//! │  └── flat rebate once per                                              │
//! │      qualifying line                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Notes
//! - Every function here is total: excess demand is clamped at zero, never
//!   rejected. Whether a line should instead be refused is a presentation
//!   concern.
//! - The scheme discount is a flat per-line rebate. A line with twice the
//!   threshold quantity still earns the discount exactly once.
//! - Counters are plain `i64` - no saturating tricks needed at realistic
//!   shop volumes, but clamps keep them from going negative.

use serde::{Deserialize, Serialize};

// =============================================================================
// Stock Depletion (bill side)
// =============================================================================

/// Result of depleting stock for one bill line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDepletion {
    /// `max(stock - qty, 0)` - stock never goes negative; excess demand is
    /// silently clamped, not rejected.
    pub new_stock: i64,
    /// `sold + qty` - sold counts demand, not shelf movement, so it is not
    /// clamped with the stock.
    pub new_sold: i64,
}

/// Depletes stock for a sold quantity.
pub fn deplete_stock(stock: i64, sold: i64, qty: i64) -> StockDepletion {
    StockDepletion {
        new_stock: (stock - qty).max(0),
        new_sold: sold + qty,
    }
}

// =============================================================================
// Scheme Evaluation
// =============================================================================

/// Outcome of evaluating an item's promotional scheme against a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeOutcome {
    pub applied: bool,
    /// Flat rebate in rupees; 0 when not applied.
    pub amount: i64,
}

impl SchemeOutcome {
    /// No scheme applied.
    #[inline]
    pub const fn none() -> Self {
        SchemeOutcome {
            applied: false,
            amount: 0,
        }
    }
}

/// Evaluates scheme eligibility for one bill line.
///
/// The scheme applies when the item has `schemeActive` and the line quantity
/// meets the threshold. A qualifying line earns the flat `schemeDiscount`
/// exactly once - the rebate does not scale with multiples of the threshold.
pub fn evaluate_scheme(
    scheme_active: bool,
    scheme_qty: i64,
    scheme_discount: i64,
    qty: i64,
) -> SchemeOutcome {
    if scheme_active && qty >= scheme_qty {
        SchemeOutcome {
            applied: true,
            amount: scheme_discount,
        }
    } else {
        SchemeOutcome::none()
    }
}

// =============================================================================
// Claim Absorption (claim side)
// =============================================================================

/// Result of absorbing a claimed quantity into an item's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimAdjustment {
    /// `claimed + qty`.
    pub new_claimed: i64,
    /// `max(stock - sold - newClaimed, 0)`.
    pub new_remaining: i64,
}

/// Absorbs a claimed quantity against the item's current counters.
pub fn absorb_claim(stock: i64, sold: i64, claimed: i64, qty: i64) -> ClaimAdjustment {
    let new_claimed = claimed + qty;
    ClaimAdjustment {
        new_claimed,
        new_remaining: remaining_after_claim(stock, sold, new_claimed),
    }
}

/// Available-to-sell quantity after accounting for claims, clamped at zero.
#[inline]
pub fn remaining_after_claim(stock: i64, sold: i64, claimed: i64) -> i64 {
    (stock - sold - claimed).max(0)
}

// =============================================================================
// Unit Tests
// =============================================================================
