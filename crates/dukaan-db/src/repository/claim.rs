//! # Claim Writer
//!
//! Customer return/refund recording with per-item claimed counters.
//!
//! ## Creation Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     create_claim(request)                               │
//! │                                                                         │
//! │  1. Validate name/phone/line quantities                                │
//! │  2. Insert the claim document  ◄── FIRST, before any item update       │
//! │  3. For each line, in order:                                           │
//! │       find_by_name(line.name)                                          │
//! │         ├── None ──► warn, skip (claim line stands unadjusted)         │
//! │         └── Some(item)                                                 │
//! │               ├── newClaimed   = claimed + qty                         │
//! │               ├── newRemaining = max(stock - sold - newClaimed, 0)     │
//! │               └── write {claimed, remaining} onto the item document    │
//! │                                                                         │
//! │  Write order is the opposite of the bill writer: the claim document    │
//! │  lands before the counters move. An item update failure propagates     │
//! │  after a warning, and the already-persisted claim stands - the claim   │
//! │  is the customer-facing record, the counters are bookkeeping.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that bills do not touch `remaining` and claims do not touch `stock`:
//! an item that sells and is then claimed against shows `remaining` computed
//! from all three counters only after its first claim.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::DbResult;
use crate::repository::item::ItemRepository;
use crate::store::{DocumentStore, CLAIMS};
use dukaan_core::reconcile::absorb_claim;
use dukaan_core::validation::{validate_customer_name, validate_phone, validate_quantity};
use dukaan_core::{Claim, ClaimRequest};

/// Writer for claim creation.
#[derive(Debug, Clone)]
pub struct ClaimWriter {
    store: DocumentStore,
    items: ItemRepository,
}

impl ClaimWriter {
    /// Creates a new ClaimWriter.
    pub fn new(store: DocumentStore) -> Self {
        ClaimWriter {
            items: ItemRepository::new(store.clone()),
            store,
        }
    }

    /// Records a claim, then absorbs each returned quantity into the
    /// matching item's `claimed`/`remaining` counters.
    ///
    /// ## Line Semantics
    /// - The claim document is persisted before any counter moves.
    /// - A line whose name matches no catalog item is skipped with a
    ///   warning; the claim still lists it.
    /// - A counter update failure propagates after the claim document has
    ///   already landed - callers see an error for a claim that exists.
    ///
    /// ## Returns
    /// The new claim document id.
    pub async fn create_claim(&self, request: ClaimRequest) -> DbResult<String> {
        validate_customer_name(&request.customer_name)?;
        validate_phone(&request.phone)?;
        for line in &request.items {
            validate_quantity(line.qty)?;
        }

        let claim = Claim::assemble(request, Utc::now());
        let id = self.store.insert_as(CLAIMS, &claim).await?;

        info!(
            id = %id,
            customer = %claim.customer_name,
            total_claim = claim.total_claim,
            lines = claim.items.len(),
            "Claim created"
        );

        for line in &claim.items {
            let stored = match self.items.find_by_name(&line.name).await? {
                Some(stored) => stored,
                None => {
                    warn!(name = %line.name, "Claim line matched no catalog item; counters unchanged");
                    continue;
                }
            };

            let item = &stored.data;
            let adjustment = absorb_claim(item.stock, item.sold, item.claimed, line.qty);

            if let Err(e) = self
                .items
                .update(
                    &stored.id,
                    &serde_json::json!({
                        "claimed": adjustment.new_claimed,
                        "remaining": adjustment.new_remaining,
                    }),
                )
                .await
            {
                warn!(
                    claim_id = %id,
                    item = %line.name,
                    error = %e,
                    "Item counter update failed; claim document stands"
                );
                return Err(e);
            }
        }

        Ok(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use dukaan_core::{BillLineInput, BillRequest, ClaimLine, NewItem, PaymentType};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_soap(db: &Database) -> String {
        db.items()
            .create(NewItem {
                name: "Soap".to_string(),
                price: 50,
                stock: 10,
                scheme_active: false,
                scheme_qty: 0,
                scheme_discount: 0,
            })
            .await
            .unwrap()
    }

    fn claim_request(lines: Vec<ClaimLine>, total_claim: i64) -> ClaimRequest {
        let bill_refs = {
            let mut refs: Vec<String> = lines.iter().map(|l| l.bill_id.clone()).collect();
            refs.dedup();
            refs
        };
        ClaimRequest {
            customer_name: "Ahmed".to_string(),
            phone: "0300-1234567".to_string(),
            items: lines,
            bill_refs,
            total_claim,
        }
    }

    fn claim_line(name: &str, qty: i64, price: i64) -> ClaimLine {
        ClaimLine {
            name: name.to_string(),
            qty,
            price,
            bill_id: "b1".to_string(),
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn test_claim_adjusts_counters() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        // Sell 6 first so the counters have history
        db.bills()
            .create_bill(BillRequest {
                customer_name: "Ahmed".to_string(),
                phone: "0300-1234567".to_string(),
                items: vec![BillLineInput {
                    name: "Soap".to_string(),
                    qty: 6,
                    price: 50,
                }],
                payment_type: PaymentType::Credit,
                paid_amount: 0,
                grand_total: 300,
            })
            .await
            .unwrap();

        db.claims()
            .create_claim(claim_request(vec![claim_line("Soap", 2, 50)], 100))
            .await
            .unwrap();

        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        // stock untouched by the claim side
        assert_eq!(item.stock, 4);
        assert_eq!(item.sold, 6);
        assert_eq!(item.claimed, 2);
        // remaining = max(stock - sold - claimed, 0) over post-sale counters:
        // max(4 - 6 - 2, 0) = 0
        assert_eq!(item.remaining, 0);
    }

    #[tokio::test]
    async fn test_claim_remaining_formula_without_prior_sale() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        db.claims()
            .create_claim(claim_request(vec![claim_line("Soap", 2, 50)], 100))
            .await
            .unwrap();

        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.stock, 10);
        assert_eq!(item.claimed, 2);
        // max(10 - 0 - 2, 0)
        assert_eq!(item.remaining, 8);
    }

    #[tokio::test]
    async fn test_claim_remaining_clamps_at_zero() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        db.claims()
            .create_claim(claim_request(vec![claim_line("Soap", 15, 50)], 750))
            .await
            .unwrap();

        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.claimed, 15);
        assert_eq!(item.remaining, 0);
    }

    #[tokio::test]
    async fn test_unmatched_claim_line_is_skipped() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        let claim_id = db
            .claims()
            .create_claim(claim_request(
                vec![claim_line("Ghost", 3, 40), claim_line("Soap", 1, 50)],
                170,
            ))
            .await
            .unwrap();

        // Claim document lists both lines
        let claim: Claim = db
            .store()
            .get(CLAIMS, &claim_id)
            .await
            .unwrap()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(claim.items.len(), 2);

        // Only the matched line moved counters
        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.claimed, 1);
    }

    #[tokio::test]
    async fn test_claim_rejects_invalid_input() {
        let db = test_db().await;
        seed_soap(&db).await;

        let mut bad = claim_request(vec![claim_line("Soap", 0, 50)], 0);
        bad.items[0].qty = 0;
        assert!(matches!(
            db.claims().create_claim(bad).await.unwrap_err(),
            DbError::Validation(_)
        ));

        // Rejected before the claim document was written
        assert_eq!(db.store().count(CLAIMS).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_claim_document_shape() {
        let db = test_db().await;
        seed_soap(&db).await;

        let claim_id = db
            .claims()
            .create_claim(claim_request(vec![claim_line("Soap", 2, 50)], 100))
            .await
            .unwrap();

        let doc = db.store().get(CLAIMS, &claim_id).await.unwrap().unwrap();
        assert!(doc.body.get("customerName").is_some());
        assert!(doc.body.get("billRefs").is_some());
        assert!(doc.body.get("totalClaim").is_some());
        assert!(doc.body.get("createdAt").is_some());
    }
}
