//! # Domain Types
//!
//! Core domain types used throughout Dukaan POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Bill       │   │      Claim      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name, price    │   │  customerId     │   │  customerName   │       │
//! │  │  stock, sold    │   │  items[]        │   │  items[]        │       │
//! │  │  claimed        │   │  totalDiscount  │   │  billRefs[]     │       │
//! │  │  scheme fields  │   │  finalTotal     │   │  totalClaim     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │    BillLine     │   │   PaymentType   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name, phone    │   │  qty, price     │   │  Credit         │       │
//! │  │  (natural key)  │   │  stock snapshot │   │  Debit          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Shapes
//! Entities serialize with `rename_all = "camelCase"` so the JSON bodies in
//! the document store carry exactly the field names the collections use
//! (`schemeActive`, `totalDiscount`, `createdAt`, ...).
//!
//! ## Integer Money
//! All monetary amounts are whole rupees as `i64`. Never floats: the only
//! arithmetic here is add/subtract/multiply, and integers keep it exact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reconcile::SchemeOutcome;

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
///
/// Identity is the (name, phone) pair, looked up by exact case-sensitive
/// equality. No uniqueness is enforced: concurrent resolvers with the same
/// pair can race and create duplicates (documented, not fixed). Created once
/// on first bill, never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Item
// =============================================================================

/// A catalog item with stock and claim counters plus scheme fields.
///
/// Intended (not enforced) invariants: `stock >= 0`; `remaining` conceptually
/// equals `stock - sold + claimed`, with the [`crate::reconcile`] arithmetic
/// authoritative when they disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,

    /// Unit price in whole rupees.
    pub price: i64,

    /// Units currently on the shelf.
    #[serde(default)]
    pub stock: i64,

    /// Units sold across all bills.
    #[serde(default)]
    pub sold: i64,

    /// Units returned via claims.
    #[serde(default)]
    pub claimed: i64,

    /// Reported available-to-sell quantity after accounting for claims.
    #[serde(default)]
    pub remaining: i64,

    /// Whether the promotional scheme is active.
    #[serde(default)]
    pub scheme_active: bool,

    /// Minimum quantity on a single bill line to qualify for the scheme.
    #[serde(default)]
    pub scheme_qty: i64,

    /// Flat discount in rupees granted per qualifying line.
    #[serde(default)]
    pub scheme_discount: i64,

    pub created_at: DateTime<Utc>,

    /// Absent until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a catalog item.
///
/// Counters are not accepted from the caller: `sold`/`claimed` start at zero
/// and `remaining` starts at `stock`. Scheme fields default to inactive/zero
/// when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub scheme_active: bool,
    #[serde(default)]
    pub scheme_qty: i64,
    #[serde(default)]
    pub scheme_discount: i64,
}

impl Item {
    /// Builds a fresh item document from creation input.
    pub fn from_new(new: NewItem, created_at: DateTime<Utc>) -> Self {
        Item {
            name: new.name,
            price: new.price,
            stock: new.stock,
            sold: 0,
            claimed: 0,
            remaining: new.stock,
            scheme_active: new.scheme_active,
            scheme_qty: new.scheme_qty,
            scheme_discount: new.scheme_discount,
            created_at,
            updated_at: None,
        }
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a bill was paid at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Paid in full at the counter; `paidAmount` is forced to the bill total.
    Credit,
    /// Partial payment (udhaar); the caller supplies `paidAmount`.
    Debit,
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Credit
    }
}

// =============================================================================
// Bill
// =============================================================================

/// One line on a bill.
///
/// Uses the snapshot pattern: the stock level before and after depletion is
/// frozen onto the line at billing time. Lines whose name matched no catalog
/// item carry no snapshot fields at all - they are persisted as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    pub name: String,
    pub qty: i64,
    /// Unit price in rupees at billing time.
    pub price: i64,
    /// Raw line total (`qty * price`), before any scheme discount.
    pub total: i64,

    /// Stock level before this line depleted it. Absent for unmatched lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_stock: Option<i64>,

    /// Stock level after depletion. Absent for unmatched lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_stock: Option<i64>,

    #[serde(default)]
    pub scheme_applied: bool,

    /// Flat scheme discount this line contributed (0 when not applied).
    #[serde(default)]
    pub scheme_amount: i64,
}

/// Input for one bill line: what the counter typed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLineInput {
    pub name: String,
    pub qty: i64,
    pub price: i64,
}

impl BillLine {
    /// Line for an input whose name matched no catalog item.
    ///
    /// The line contributes its raw total to the bill but touches no
    /// inventory and never qualifies for a scheme.
    pub fn unmatched(input: &BillLineInput) -> Self {
        BillLine {
            name: input.name.clone(),
            qty: input.qty,
            price: input.price,
            total: input.qty * input.price,
            original_stock: None,
            remaining_stock: None,
            scheme_applied: false,
            scheme_amount: 0,
        }
    }

    /// Line for a matched catalog item, with the stock snapshot frozen on.
    pub fn matched(
        input: &BillLineInput,
        original_stock: i64,
        remaining_stock: i64,
        scheme: SchemeOutcome,
    ) -> Self {
        BillLine {
            name: input.name.clone(),
            qty: input.qty,
            price: input.price,
            total: input.qty * input.price,
            original_stock: Some(original_stock),
            remaining_stock: Some(remaining_stock),
            scheme_applied: scheme.applied,
            scheme_amount: scheme.amount,
        }
    }
}

/// A recorded sale. Immutable once created; no update/delete path exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub customer_id: String,
    pub customer_name: String,
    pub phone: String,
    pub items: Vec<BillLine>,
    pub payment_type: PaymentType,
    /// What was actually paid at the counter (see [`PaymentType`]).
    pub paid_amount: i64,
    /// Caller-supplied grand total. Trust boundary: not recomputed from
    /// line totals server-side.
    pub total: i64,
    /// Sum of flat scheme discounts across qualifying lines.
    pub total_discount: i64,
    /// `total - totalDiscount`.
    pub final_total: i64,
    pub scheme_applied: bool,
    pub scheme_amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRequest {
    pub customer_name: String,
    pub phone: String,
    /// Possibly empty; processed strictly in list order.
    #[serde(default)]
    pub items: Vec<BillLineInput>,
    #[serde(default)]
    pub payment_type: PaymentType,
    /// Only meaningful for `debit` bills.
    #[serde(default)]
    pub paid_amount: i64,
    /// Caller-supplied; see [`Bill::total`].
    pub grand_total: i64,
}

impl Bill {
    /// Assembles the bill document from the request and the reconciled lines.
    ///
    /// `finalTotal = grandTotal - totalDiscount`; a credit bill is paid in
    /// full, a debit bill carries the caller-supplied paid amount.
    pub fn assemble(
        request: &BillRequest,
        customer_id: String,
        items: Vec<BillLine>,
        total_discount: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let paid_amount = match request.payment_type {
            PaymentType::Credit => request.grand_total,
            PaymentType::Debit => request.paid_amount,
        };

        Bill {
            customer_id,
            customer_name: request.customer_name.clone(),
            phone: request.phone.clone(),
            items,
            payment_type: request.payment_type,
            paid_amount,
            total: request.grand_total,
            total_discount,
            final_total: request.grand_total - total_discount,
            scheme_applied: total_discount > 0,
            scheme_amount: total_discount,
            created_at,
        }
    }

    /// Amount still owed on this bill.
    #[inline]
    pub fn due(&self) -> i64 {
        self.total - self.paid_amount
    }
}

// =============================================================================
// Claim
// =============================================================================

/// One returned item on a claim, referencing the bill it was sold on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimLine {
    pub name: String,
    pub qty: i64,
    pub price: i64,
    pub bill_id: String,
    #[serde(default)]
    pub note: String,
}

/// A customer return/refund request. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub customer_name: String,
    pub phone: String,
    pub items: Vec<ClaimLine>,
    /// Distinct bills the claimed items came from.
    pub bill_refs: Vec<String>,
    /// Caller-supplied claim total in rupees.
    pub total_claim: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub items: Vec<ClaimLine>,
    #[serde(default)]
    pub bill_refs: Vec<String>,
    #[serde(default)]
    pub total_claim: i64,
}

impl Claim {
    /// Builds the claim document from the request.
    pub fn assemble(request: ClaimRequest, created_at: DateTime<Utc>) -> Self {
        Claim {
            customer_name: request.customer_name,
            phone: request.phone,
            items: request.items,
            bill_refs: request.bill_refs,
            total_claim: request.total_claim,
            created_at,
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Summary statistics folded over the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of `bill.total` across all bills.
    pub total_sales: i64,
    /// Sum of `bill.totalDiscount` across bills with `schemeApplied`.
    pub total_discount: i64,
    /// Sum of `price * qty` across all claim lines.
    pub total_claims: i64,
    /// `totalSales - totalClaims - totalDiscount`.
    pub profit: i64,
    /// Number of customer documents.
    pub customers: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
