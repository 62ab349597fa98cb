//! # Bill Writer
//!
//! Bill creation with per-line stock depletion and scheme evaluation.
//!
//! ## Creation Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     create_bill(request)                                │
//! │                                                                         │
//! │  1. Validate name/phone/line count/paid amount                         │
//! │  2. Resolve customer (find-or-create)                                  │
//! │  3. For each line, in order:                                           │
//! │       find_by_name(line.name)                                          │
//! │         ├── None ──► warn, record line as-is, touch nothing            │
//! │         └── Some(item)                                                 │
//! │               ├── deplete stock  (new_stock = max(stock - qty, 0))     │
//! │               ├── evaluate scheme (flat discount when qty qualifies)   │
//! │               └── write {stock, sold} back onto the item document      │
//! │  4. Assemble and insert the bill document                              │
//! │                                                                         │
//! │  Steps 3 and 4 are separate round trips with no transaction: a crash   │
//! │  after step 3 leaves stock depleted with no bill recorded. A crash     │
//! │  mid-step-3 leaves earlier lines depleted and later ones untouched.    │
//! │  Partial-failure behavior is part of the contract, not a bug to fix    │
//! │  here.                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Example
//! Soap: price 50, stock 10, scheme active at qty >= 5 for flat 20 rupees.
//! Bill line: 6 x Soap @ 50, grand total 300.
//!
//! - Stock: 10 -> 4, sold: 0 -> 6
//! - Scheme: 6 >= 5, so totalDiscount = 20 (flat, NOT 20 per unit)
//! - Bill: total 300, totalDiscount 20, finalTotal 280, schemeApplied true

use chrono::Utc;
use tracing::{info, warn};

use crate::error::DbResult;
use crate::repository::customer::CustomerResolver;
use crate::repository::item::ItemRepository;
use crate::store::{DocumentStore, Stored, BILLS};
use dukaan_core::reconcile::{deplete_stock, evaluate_scheme};
use dukaan_core::validation::{
    validate_bill_lines, validate_customer_name, validate_paid_amount, validate_phone,
    validate_price, validate_quantity,
};
use dukaan_core::{Bill, BillLine, BillRequest};

/// Writer for bill creation and customer bill history.
#[derive(Debug, Clone)]
pub struct BillWriter {
    store: DocumentStore,
    customers: CustomerResolver,
    items: ItemRepository,
}

impl BillWriter {
    /// Creates a new BillWriter.
    pub fn new(store: DocumentStore) -> Self {
        BillWriter {
            customers: CustomerResolver::new(store.clone()),
            items: ItemRepository::new(store.clone()),
            store,
        }
    }

    /// Records a sale: resolves the customer, reconciles inventory line by
    /// line, then persists the bill document.
    ///
    /// ## Line Semantics
    /// - Lines are processed strictly in list order.
    /// - A line whose name matches no catalog item is recorded on the bill
    ///   as received (warning path) and touches no inventory.
    /// - Duplicate lines for the same item each run the full read-write
    ///   cycle, so both depletions land.
    ///
    /// ## Returns
    /// The new bill document id.
    ///
    /// ## Errors
    /// Validation failures reject the whole request before any write. A
    /// store failure partway through leaves earlier line updates in place.
    pub async fn create_bill(&self, request: BillRequest) -> DbResult<String> {
        validate_customer_name(&request.customer_name)?;
        validate_phone(&request.phone)?;
        validate_bill_lines(request.items.len())?;
        validate_paid_amount(request.payment_type, request.paid_amount)?;
        for line in &request.items {
            validate_quantity(line.qty)?;
            validate_price(line.price)?;
        }

        let customer_id = self
            .customers
            .resolve(&request.customer_name, &request.phone)
            .await?;

        let mut lines = Vec::with_capacity(request.items.len());
        let mut total_discount = 0i64;

        for input in &request.items {
            let stored = match self.items.find_by_name(&input.name).await? {
                Some(stored) => stored,
                None => {
                    warn!(name = %input.name, "Bill line matched no catalog item; recording as-is");
                    lines.push(BillLine::unmatched(input));
                    continue;
                }
            };

            let item = &stored.data;
            let depletion = deplete_stock(item.stock, item.sold, input.qty);
            let scheme = evaluate_scheme(
                item.scheme_active,
                item.scheme_qty,
                item.scheme_discount,
                input.qty,
            );
            total_discount += scheme.amount;

            self.items
                .update(
                    &stored.id,
                    &serde_json::json!({
                        "stock": depletion.new_stock,
                        "sold": depletion.new_sold,
                    }),
                )
                .await?;

            lines.push(BillLine::matched(
                input,
                item.stock,
                depletion.new_stock,
                scheme,
            ));
        }

        let bill = Bill::assemble(&request, customer_id, lines, total_discount, Utc::now());
        let id = self.store.insert_as(BILLS, &bill).await?;

        info!(
            id = %id,
            customer = %bill.customer_name,
            total = bill.total,
            final_total = bill.final_total,
            scheme_applied = bill.scheme_applied,
            "Bill created"
        );
        Ok(id)
    }

    /// Returns every bill for the customer with this exact (name, phone)
    /// pair, in insertion order.
    ///
    /// Lenient read contract: an unknown customer or a store failure both
    /// degrade to an empty history.
    pub async fn bills_for_customer(&self, name: &str, phone: &str) -> Vec<Stored<Bill>> {
        let customer_id = match self.customers.find(name, phone).await {
            Ok(Some(id)) => id,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Customer lookup failed; returning empty bill history");
                return Vec::new();
            }
        };

        let docs = match self
            .store
            .find_all(BILLS, &[("customerId", &customer_id)])
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                warn!(error = %e, "Bill history query failed; returning empty list");
                return Vec::new();
            }
        };

        let mut bills = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.id.clone();
            match doc.into_stored() {
                Ok(stored) => bills.push(stored),
                Err(e) => warn!(id = %id, error = %e, "Skipping unparsable bill document"),
            }
        }

        bills
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
    use dukaan_core::{BillLineInput, NewItem, PaymentType};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_soap(db: &Database) -> String {
        db.items()
            .create(NewItem {
                name: "Soap".to_string(),
                price: 50,
                stock: 10,
                scheme_active: true,
                scheme_qty: 5,
                scheme_discount: 20,
            })
            .await
            .unwrap()
    }

    fn request(lines: Vec<BillLineInput>, grand_total: i64) -> BillRequest {
        BillRequest {
            customer_name: "Ahmed".to_string(),
            phone: "0300-1234567".to_string(),
            items: lines,
            payment_type: PaymentType::Credit,
            paid_amount: 0,
            grand_total,
        }
    }

    fn line(name: &str, qty: i64, price: i64) -> BillLineInput {
        BillLineInput {
            name: name.to_string(),
            qty,
            price,
        }
    }

    #[tokio::test]
    async fn test_create_bill_depletes_stock_and_applies_scheme() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        let bill_id = db
            .bills()
            .create_bill(request(vec![line("Soap", 6, 50)], 300))
            .await
            .unwrap();

        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.stock, 4);
        assert_eq!(item.sold, 6);
        assert!(item.updated_at.is_some());

        let doc = db.store().get(BILLS, &bill_id).await.unwrap().unwrap();
        let bill: Bill = doc.parse().unwrap();
        assert_eq!(bill.total, 300);
        assert_eq!(bill.total_discount, 20);
        assert_eq!(bill.final_total, 280);
        assert!(bill.scheme_applied);

        let bill_line = &bill.items[0];
        assert_eq!(bill_line.original_stock, Some(10));
        assert_eq!(bill_line.remaining_stock, Some(4));
        assert!(bill_line.scheme_applied);
        assert_eq!(bill_line.scheme_amount, 20);
    }

    #[tokio::test]
    async fn test_scheme_discount_is_flat_not_per_unit() {
        let db = test_db().await;
        seed_soap(&db).await;

        // qty 8 >= schemeQty 5: still flat 20, never 8 * 20
        db.bills()
            .create_bill(request(vec![line("Soap", 8, 50)], 400))
            .await
            .unwrap();

        let bills = db.bills().bills_for_customer("Ahmed", "0300-1234567").await;
        assert_eq!(bills[0].data.total_discount, 20);
    }

    #[tokio::test]
    async fn test_below_threshold_no_discount() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        db.bills()
            .create_bill(request(vec![line("Soap", 4, 50)], 200))
            .await
            .unwrap();

        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.stock, 6);

        let bills = db.bills().bills_for_customer("Ahmed", "0300-1234567").await;
        let bill = &bills[0].data;
        assert_eq!(bill.total_discount, 0);
        assert_eq!(bill.final_total, 200);
        assert!(!bill.scheme_applied);
    }

    #[tokio::test]
    async fn test_unmatched_line_recorded_without_inventory_touch() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        let bill_id = db
            .bills()
            .create_bill(request(vec![line("Ghost Item", 3, 40)], 120))
            .await
            .unwrap();

        // Catalog untouched
        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.stock, 10);
        assert_eq!(item.sold, 0);

        // Line persisted as received, no snapshot
        let bill: Bill = db
            .store()
            .get(BILLS, &bill_id)
            .await
            .unwrap()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(bill.items.len(), 1);
        assert!(bill.items[0].original_stock.is_none());
        assert_eq!(bill.final_total, 120);
    }

    #[tokio::test]
    async fn test_oversell_clamps_stock_at_zero() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        db.bills()
            .create_bill(request(vec![line("Soap", 15, 50)], 750))
            .await
            .unwrap();

        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.stock, 0);
        // sold keeps the full quantity even when stock clamps
        assert_eq!(item.sold, 15);
    }

    #[tokio::test]
    async fn test_two_qualifying_lines_accumulate_flat_discounts() {
        let db = test_db().await;
        seed_soap(&db).await;
        db.items()
            .create(NewItem {
                name: "Surf".to_string(),
                price: 100,
                stock: 20,
                scheme_active: true,
                scheme_qty: 3,
                scheme_discount: 30,
            })
            .await
            .unwrap();

        db.bills()
            .create_bill(request(
                vec![line("Soap", 6, 50), line("Surf", 4, 100)],
                700,
            ))
            .await
            .unwrap();

        let bills = db.bills().bills_for_customer("Ahmed", "0300-1234567").await;
        let bill = &bills[0].data;
        assert_eq!(bill.total_discount, 50); // 20 + 30
        assert_eq!(bill.final_total, 650);
    }

    #[tokio::test]
    async fn test_duplicate_lines_each_deplete() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        db.bills()
            .create_bill(request(
                vec![line("Soap", 3, 50), line("Soap", 4, 50)],
                350,
            ))
            .await
            .unwrap();

        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.stock, 3); // 10 - 3 - 4
        assert_eq!(item.sold, 7);
    }

    #[tokio::test]
    async fn test_credit_pays_in_full_debit_keeps_paid_amount() {
        let db = test_db().await;
        seed_soap(&db).await;

        db.bills()
            .create_bill(request(vec![line("Soap", 2, 50)], 100))
            .await
            .unwrap();

        let mut debit = request(vec![line("Soap", 2, 50)], 100);
        debit.payment_type = PaymentType::Debit;
        debit.paid_amount = 60;
        db.bills().create_bill(debit).await.unwrap();

        let bills = db.bills().bills_for_customer("Ahmed", "0300-1234567").await;
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].data.paid_amount, 100);
        assert_eq!(bills[0].data.due(), 0);
        assert_eq!(bills[1].data.paid_amount, 60);
        assert_eq!(bills[1].data.due(), 40);
    }

    #[tokio::test]
    async fn test_debit_without_paid_amount_is_rejected() {
        let db = test_db().await;
        let item_id = seed_soap(&db).await;

        let mut debit = request(vec![line("Soap", 2, 50)], 100);
        debit.payment_type = PaymentType::Debit;
        debit.paid_amount = 0;

        let err = db.bills().create_bill(debit).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        // Rejected before any write
        let item = db.items().get(&item_id).await.unwrap().unwrap().data;
        assert_eq!(item.stock, 10);
    }

    #[tokio::test]
    async fn test_customer_created_once_across_bills() {
        let db = test_db().await;
        seed_soap(&db).await;

        db.bills()
            .create_bill(request(vec![line("Soap", 1, 50)], 50))
            .await
            .unwrap();
        db.bills()
            .create_bill(request(vec![line("Soap", 1, 50)], 50))
            .await
            .unwrap();

        assert_eq!(db.customers().count().await.unwrap(), 1);

        let bills = db.bills().bills_for_customer("Ahmed", "0300-1234567").await;
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].data.customer_id, bills[1].data.customer_id);
    }

    #[tokio::test]
    async fn test_empty_bill_is_allowed() {
        let db = test_db().await;

        let bill_id = db.bills().create_bill(request(vec![], 0)).await.unwrap();

        let bill: Bill = db
            .store()
            .get(BILLS, &bill_id)
            .await
            .unwrap()
            .unwrap()
            .parse()
            .unwrap();
        assert!(bill.items.is_empty());
        assert_eq!(bill.final_total, 0);
    }

    #[tokio::test]
    async fn test_bill_history_unknown_customer_is_empty() {
        let db = test_db().await;
        assert!(db
            .bills()
            .bills_for_customer("Nobody", "0399-0000000")
            .await
            .is_empty());
        // No customer was created by the read
        assert_eq!(db.customers().count().await.unwrap(), 0);
    }
}
