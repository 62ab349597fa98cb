//! # Item Repository
//!
//! Document operations for catalog items.
//!
//! ## Key Operations
//! - CRUD over item documents
//! - Exact-match name lookup (the reconciliation entry point)
//! - Lenient read-all for the dashboard/stock views
//!
//! ## Name Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    find_by_name("Soap")                                 │
//! │                                                                         │
//! │  Exact, case-sensitive string match - nothing is normalized.           │
//! │                                                                         │
//! │  items collection:                                                     │
//! │    {"name":"Soap",  price:50, ...}   ← MATCH (first by insertion)      │
//! │    {"name":"Soap",  price:60, ...}   (shadowed duplicate)              │
//! │    {"name":"soap",  price:45, ...}   (different case - no match)       │
//! │                                                                         │
//! │  A bill/claim line whose name misses here takes the warning path:      │
//! │  the line is recorded but inventory is left untouched.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::store::{DocumentStore, Stored, ITEMS};
use dukaan_core::validation::{validate_item_name, validate_price};
use dukaan_core::{Item, NewItem};

/// Repository for item document operations.
///
/// ## Usage
/// ```rust,ignore
/// let items = db.items();
///
/// let id = items.create(new_item).await?;
/// let soap = items.find_by_name("Soap").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    store: DocumentStore,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(store: DocumentStore) -> Self {
        ItemRepository { store }
    }

    /// Creates a catalog item.
    ///
    /// Counters are initialized here, not taken from the caller:
    /// `sold = 0`, `claimed = 0`, `remaining = stock`. Scheme fields default
    /// to inactive/zero when the input leaves them out.
    ///
    /// ## Returns
    /// The new document id.
    pub async fn create(&self, new_item: NewItem) -> DbResult<String> {
        validate_item_name(&new_item.name)?;
        validate_price(new_item.price)?;

        let item = Item::from_new(new_item, Utc::now());
        let id = self.store.insert_as(ITEMS, &item).await?;

        debug!(id = %id, name = %item.name, stock = item.stock, "Item created");
        Ok(id)
    }

    /// Gets an item by its document id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Stored<Item>>> {
        match self.store.get(ITEMS, id).await? {
            Some(doc) => Ok(Some(doc.into_stored()?)),
            None => Ok(None),
        }
    }

    /// Merges patch fields onto an existing item and stamps `updatedAt`.
    ///
    /// The merge is shallow: each top-level field in the patch replaces the
    /// stored field of the same name. Read-modify-write, not atomic - a
    /// concurrent update can be lost (documented store-wide hazard).
    ///
    /// ## Returns
    /// * `Ok(())` - Update applied
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: &str, patch: &Value) -> DbResult<()> {
        let doc = self
            .store
            .get(ITEMS, id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))?;

        let mut body = doc.body;
        if let (Some(fields), Some(patch_fields)) = (body.as_object_mut(), patch.as_object()) {
            for (key, value) in patch_fields {
                fields.insert(key.clone(), value.clone());
            }
            fields.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);
        }

        self.store.put(ITEMS, id, &body).await?;

        debug!(id = %id, "Item updated");
        Ok(())
    }

    /// Deletes an item unconditionally.
    ///
    /// Succeeds silently when the id is absent.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        self.store.delete(ITEMS, id).await?;
        debug!(id = %id, "Item deleted");
        Ok(())
    }

    /// Lists every item document.
    ///
    /// Lenient read contract: a store failure degrades to an empty list
    /// instead of propagating, so callers cannot distinguish "no items"
    /// from "store unreachable". Individual documents that fail to parse
    /// are skipped with a warning rather than failing the whole read.
    pub async fn list_all(&self) -> Vec<Stored<Item>> {
        let docs = match self.store.scan(ITEMS).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(error = %e, "Item scan failed; returning empty list");
                return Vec::new();
            }
        };

        let mut items = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.id.clone();
            match doc.into_stored() {
                Ok(stored) => items.push(stored),
                Err(e) => warn!(id = %id, error = %e, "Skipping unparsable item document"),
            }
        }

        items
    }

    /// Finds the first item whose `name` equals the argument.
    ///
    /// Exact string match, case-sensitive, insertion order on duplicates.
    /// This is the lookup behind the "item not found" warning path in the
    /// bill and claim writers.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Stored<Item>>> {
        match self.store.find_first(ITEMS, &[("name", name)]).await? {
            Some(doc) => Ok(Some(doc.into_stored()?)),
            None => Ok(None),
        }
    }

    /// Counts item documents (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        self.store.count(ITEMS).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde_json::json;

    fn soap(stock: i64) -> NewItem {
        NewItem {
            name: "Soap".to_string(),
            price: 50,
            stock,
            scheme_active: false,
            scheme_qty: 0,
            scheme_discount: 0,
        }
    }

    async fn test_repo() -> ItemRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items()
    }

    #[tokio::test]
    async fn test_create_initializes_counters() {
        let repo = test_repo().await;

        let id = repo.create(soap(10)).await.unwrap();
        let stored = repo.get(&id).await.unwrap().unwrap();

        assert_eq!(stored.data.sold, 0);
        assert_eq!(stored.data.claimed, 0);
        assert_eq!(stored.data.remaining, 10);
        assert!(stored.data.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let repo = test_repo().await;

        let mut bad = soap(10);
        bad.name = "".to_string();
        assert!(matches!(
            repo.create(bad).await.unwrap_err(),
            DbError::Validation(_)
        ));

        let mut bad = soap(10);
        bad.price = -5;
        assert!(repo.create(bad).await.is_err());
    }

    #[tokio::test]
    async fn test_update_merges_and_stamps() {
        let repo = test_repo().await;

        let id = repo.create(soap(10)).await.unwrap();
        repo.update(&id, &json!({"stock": 4, "sold": 6}))
            .await
            .unwrap();

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.data.stock, 4);
        assert_eq!(stored.data.sold, 6);
        // Untouched fields survive the shallow merge
        assert_eq!(stored.data.price, 50);
        assert!(stored.data.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = test_repo().await;

        let err = repo
            .update("no-such-id", &json!({"stock": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_silent_when_absent() {
        let repo = test_repo().await;

        let id = repo.create(soap(10)).await.unwrap();
        repo.delete(&id).await.unwrap();
        assert!(repo.get(&id).await.unwrap().is_none());

        repo.delete(&id).await.unwrap();
        repo.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_name_exact_and_case_sensitive() {
        let repo = test_repo().await;
        repo.create(soap(10)).await.unwrap();

        assert!(repo.find_by_name("Soap").await.unwrap().is_some());
        assert!(repo.find_by_name("soap").await.unwrap().is_none());
        assert!(repo.find_by_name("Soap ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_first_match_wins() {
        let repo = test_repo().await;

        let first = repo.create(soap(10)).await.unwrap();
        let mut dup = soap(99);
        dup.price = 60;
        repo.create(dup).await.unwrap();

        let stored = repo.find_by_name("Soap").await.unwrap().unwrap();
        assert_eq!(stored.id, first);
        assert_eq!(stored.data.price, 50);
    }

    #[tokio::test]
    async fn test_list_all() {
        let repo = test_repo().await;
        assert!(repo.list_all().await.is_empty());

        repo.create(soap(10)).await.unwrap();
        let mut surf = soap(5);
        surf.name = "Surf".to_string();
        repo.create(surf).await.unwrap();

        assert_eq!(repo.list_all().await.len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
