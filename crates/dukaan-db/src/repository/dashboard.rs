//! # Dashboard Aggregator
//!
//! Read-only summary fold over the whole store.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        summarize()                                      │
//! │                                                                         │
//! │  bills      ──► totalSales    = Σ bill.total                           │
//! │             ──► totalDiscount = Σ bill.totalDiscount                   │
//! │                                 (only bills with schemeApplied)        │
//! │  claims     ──► totalClaims   = Σ line.price * line.qty                │
//! │                                 (per line, NOT claim.totalClaim)       │
//! │  customers  ──► customers     = document count                         │
//! │                                                                         │
//! │  profit = totalSales - totalClaims - totalDiscount                     │
//! │                                                                         │
//! │  No caching, no incremental counters: every call re-reads every bill   │
//! │  and claim document. Fine at shop scale, and always consistent with    │
//! │  whatever is in the store at read time.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Profit" is gross margin by this house definition, not accounting profit:
//! cost of goods never enters the fold.

use tracing::{debug, warn};

use crate::error::DbResult;
use crate::repository::item::ItemRepository;
use crate::store::{DocumentStore, Stored, BILLS, CLAIMS, CUSTOMERS};
use dukaan_core::{Bill, Claim, DashboardSummary, Item};

/// Aggregates store-wide totals for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardAggregator {
    store: DocumentStore,
    items: ItemRepository,
}

impl DashboardAggregator {
    /// Creates a new DashboardAggregator.
    pub fn new(store: DocumentStore) -> Self {
        DashboardAggregator {
            items: ItemRepository::new(store.clone()),
            store,
        }
    }

    /// Folds every bill, claim and customer into a [`DashboardSummary`].
    ///
    /// Documents that fail to parse are skipped with a warning so one bad
    /// record can't blank the whole dashboard. `profit` can go negative
    /// when claims outweigh sales; it is reported as-is.
    pub async fn summarize(&self) -> DbResult<DashboardSummary> {
        let mut total_sales = 0i64;
        let mut total_discount = 0i64;

        for doc in self.store.scan(BILLS).await? {
            let id = doc.id.clone();
            let bill: Bill = match doc.parse() {
                Ok(bill) => bill,
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping unparsable bill in summary");
                    continue;
                }
            };

            total_sales += bill.total;
            if bill.scheme_applied {
                total_discount += bill.total_discount;
            }
        }

        let mut total_claims = 0i64;
        for doc in self.store.scan(CLAIMS).await? {
            let id = doc.id.clone();
            let claim: Claim = match doc.parse() {
                Ok(claim) => claim,
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping unparsable claim in summary");
                    continue;
                }
            };

            // Claim value is recomputed from the lines; the caller-supplied
            // totalClaim field is not trusted here.
            for line in &claim.items {
                total_claims += line.price * line.qty;
            }
        }

        let customers = self.store.count(CUSTOMERS).await?;

        let summary = DashboardSummary {
            total_sales,
            total_discount,
            total_claims,
            profit: total_sales - total_claims - total_discount,
            customers,
        };

        debug!(
            total_sales = summary.total_sales,
            total_claims = summary.total_claims,
            profit = summary.profit,
            "Dashboard summary computed"
        );
        Ok(summary)
    }

    /// Every catalog item with its live counters, for the stock table.
    pub async fn stock_overview(&self) -> Vec<Stored<Item>> {
        self.items.list_all().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
