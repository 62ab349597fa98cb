//! # Customer Resolver
//!
//! Find-or-create resolution of customers by their natural key.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  resolve("Ahmed", "0300-1234567")                       │
//! │                                                                         │
//! │  find_first(customers, name = ?, phone = ?)                            │
//! │       │                                                                 │
//! │       ├── Some(doc) ──► return doc.id (existing customer)              │
//! │       │                                                                 │
//! │       └── None ──► insert {name, phone, createdAt} ──► return new id   │
//! │                                                                         │
//! │  The find and the insert are two separate round trips with no unique   │
//! │  constraint between them: two concurrent resolves of the same pair     │
//! │  can both miss and both insert. The duplicate persists; later           │
//! │  resolves deterministically pick the older document (insertion order). │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Matching is exact and case-sensitive on both fields. `"Ahmed"` and
//! `"ahmed"` are different customers.

use chrono::Utc;
use tracing::debug;

use crate::error::DbResult;
use crate::store::{DocumentStore, CUSTOMERS};
use dukaan_core::validation::{validate_customer_name, validate_phone};
use dukaan_core::Customer;

/// Resolves (name, phone) pairs to customer document ids, creating the
/// customer on first sight.
#[derive(Debug, Clone)]
pub struct CustomerResolver {
    store: DocumentStore,
}

impl CustomerResolver {
    /// Creates a new CustomerResolver.
    pub fn new(store: DocumentStore) -> Self {
        CustomerResolver { store }
    }

    /// Returns the id of the customer with this exact (name, phone) pair,
    /// creating the document if none exists.
    ///
    /// Customers are never updated or deleted through this path; the record
    /// written here is the one every later bill for the pair points at.
    pub async fn resolve(&self, name: &str, phone: &str) -> DbResult<String> {
        validate_customer_name(name)?;
        validate_phone(phone)?;

        if let Some(doc) = self
            .store
            .find_first(CUSTOMERS, &[("name", name), ("phone", phone)])
            .await?
        {
            debug!(id = %doc.id, name = %name, "Customer resolved to existing record");
            return Ok(doc.id);
        }

        let customer = Customer {
            name: name.to_string(),
            phone: phone.to_string(),
            created_at: Utc::now(),
        };
        let id = self.store.insert_as(CUSTOMERS, &customer).await?;

        debug!(id = %id, name = %name, "Customer created");
        Ok(id)
    }

    /// Looks up the customer id without creating one.
    ///
    /// Used by read paths (bill history) where an unknown pair should mean
    /// "no bills", not a new customer record.
    pub async fn find(&self, name: &str, phone: &str) -> DbResult<Option<String>> {
        let doc = self
            .store
            .find_first(CUSTOMERS, &[("name", name), ("phone", phone)])
            .await?;
        Ok(doc.map(|d| d.id))
    }

    /// Counts customer documents (the dashboard's `customers` figure).
    pub async fn count(&self) -> DbResult<i64> {
        self.store.count(CUSTOMERS).await
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

    async fn test_resolver() -> CustomerResolver {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
    }

    #[tokio::test]
    async fn test_resolve_creates_once() {
        let resolver = test_resolver().await;

        let first = resolver.resolve("Ahmed", "0300-1234567").await.unwrap();
        let second = resolver.resolve("Ahmed", "0300-1234567").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let resolver = test_resolver().await;

        let a = resolver.resolve("Ahmed", "0300-1234567").await.unwrap();
        let b = resolver.resolve("ahmed", "0300-1234567").await.unwrap();

        assert_ne!(a, b);
        assert_eq!(resolver.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_resolve_distinguishes_phone() {
        let resolver = test_resolver().await;

        let a = resolver.resolve("Ahmed", "0300-1234567").await.unwrap();
        let b = resolver.resolve("Ahmed", "0301-7654321").await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_resolve_rejects_invalid_input() {
        let resolver = test_resolver().await;

        assert!(matches!(
            resolver.resolve("", "0300-1234567").await.unwrap_err(),
            DbError::Validation(_)
        ));
        assert!(resolver.resolve("Ahmed", "   ").await.is_err());
        assert_eq!(resolver.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resolve_accepts_any_nonempty_phone() {
        let resolver = test_resolver().await;

        // The phone is a natural-key component matched verbatim; punctuation
        // the counter typed must resolve on later visits
        let first = resolver.resolve("Ahmed", "(0300) 1234567").await.unwrap();
        let second = resolver.resolve("Ahmed", "(0300) 1234567").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(resolver.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_does_not_create() {
        let resolver = test_resolver().await;

        assert!(resolver
            .find("Ahmed", "0300-1234567")
            .await
            .unwrap()
            .is_none());
        assert_eq!(resolver.count().await.unwrap(), 0);

        let id = resolver.resolve("Ahmed", "0300-1234567").await.unwrap();
        assert_eq!(
            resolver.find("Ahmed", "0300-1234567").await.unwrap(),
            Some(id)
        );
    }
}
