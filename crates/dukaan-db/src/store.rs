//! # Document Store
//!
//! Generic document CRUD over a single SQLite table.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     documents table                                     │
//! │                                                                         │
//! │  collection │ id (UUID v4) │ body (JSON text)                          │
//! │  ───────────┼──────────────┼──────────────────────────────────────     │
//! │  customers  │ 7f3a…        │ {"name":"Ahmed","phone":"0300…",…}        │
//! │  items      │ 91c2…        │ {"name":"Soap","price":50,"stock":10,…}   │
//! │  bills      │ 04d8…        │ {"customerId":"7f3a…","items":[…],…}      │
//! │  claims     │ be11…        │ {"customerName":"Ahmed","items":[…],…}    │
//! │                                                                         │
//! │  Equality filters: json_extract(body, '$.field') = value               │
//! │  First-match-wins: ORDER BY rowid LIMIT 1 (insertion order)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//! Exactly the generic surface the persisted-state interface defines:
//! create, query-by-equality-filter (with optional limit 1), update-by-id,
//! delete-by-id, full-collection scan. No multi-document transaction is ever
//! used: every call is an independent round trip, and callers that chain
//! them inherit the documented partial-failure hazards.
//!
//! ## Why Runtime Queries
//! The table is schemaless and the filter set varies per call, so queries
//! are assembled at runtime with positional binds instead of the
//! compile-time macros used on fixed relational schemas.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

// =============================================================================
// Collection Names
// =============================================================================

/// Customer documents (written by the customer resolver).
pub const CUSTOMERS: &str = "customers";
/// Item documents (written by the item repository).
pub const ITEMS: &str = "items";
/// Bill documents (written by the bill writer, immutable).
pub const BILLS: &str = "bills";
/// Claim documents (written by the claim writer, immutable).
pub const CLAIMS: &str = "claims";

// =============================================================================
// Document
// =============================================================================

/// A raw document: its store-assigned id plus the JSON body.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

impl Document {
    /// Deserializes the body into a typed entity.
    pub fn parse<T: DeserializeOwned>(&self) -> DbResult<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Parses the body and pairs it with the id.
    pub fn into_stored<T: DeserializeOwned>(self) -> DbResult<Stored<T>> {
        let data = serde_json::from_value(self.body)?;
        Ok(Stored { id: self.id, data })
    }
}

/// A typed document: id plus parsed entity data.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub id: String,
    pub data: T,
}

// =============================================================================
// Document Store
// =============================================================================

/// The document store handle. Cheap to clone (wraps the pool).
///
/// ## Usage
/// ```rust,ignore
/// let store = db.store();
/// let id = store.insert_as(store::ITEMS, &item).await?;
/// let doc = store.find_first(store::ITEMS, &[("name", "Soap")]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    /// Creates a new DocumentStore over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentStore { pool }
    }

    /// Inserts a new document and returns its generated id.
    pub async fn insert(&self, collection: &str, body: &Value) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();

        debug!(collection = %collection, id = %id, "Inserting document");

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)")
            .bind(collection)
            .bind(&id)
            .bind(body.to_string())
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// Serializes an entity and inserts it as a new document.
    pub async fn insert_as<T: Serialize>(&self, collection: &str, entity: &T) -> DbResult<String> {
        let body = serde_json::to_value(entity)?;
        self.insert(collection, &body).await
    }

    /// Gets a document by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Document))` - Document found
    /// * `Ok(None)` - Document not found
    pub async fn get(&self, collection: &str, id: &str) -> DbResult<Option<Document>> {
        let row = sqlx::query("SELECT id, body FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_document).transpose()
    }

    /// Finds the first document matching all equality filters, in insertion
    /// order (first-match-wins - this is the tie-break duplicate names get).
    ///
    /// ## Arguments
    /// * `filters` - (top-level field, expected string value) pairs, ANDed.
    ///   Matching is exact and case-sensitive.
    pub async fn find_first(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
    ) -> DbResult<Option<Document>> {
        let sql = build_filter_query(filters, true);

        let mut query = sqlx::query(&sql).bind(collection);
        for (field, value) in filters {
            query = query.bind(format!("$.{field}")).bind(*value);
        }

        let row = query.fetch_optional(&self.pool).await?;
        row.map(row_to_document).transpose()
    }

    /// Finds every document matching all equality filters, in insertion order.
    pub async fn find_all(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
    ) -> DbResult<Vec<Document>> {
        let sql = build_filter_query(filters, false);

        let mut query = sqlx::query(&sql).bind(collection);
        for (field, value) in filters {
            query = query.bind(format!("$.{field}")).bind(*value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(row_to_document).collect()
    }

    /// Scans a whole collection, in insertion order.
    pub async fn scan(&self, collection: &str) -> DbResult<Vec<Document>> {
        let rows =
            sqlx::query("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY rowid")
                .bind(collection)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(row_to_document).collect()
    }

    /// Counts documents in a collection.
    pub async fn count(&self, collection: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?1")
                .bind(collection)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Replaces a document body.
    ///
    /// ## Returns
    /// * `Ok(())` - Replaced
    /// * `Err(DbError::NotFound)` - No document with this id
    pub async fn put(&self, collection: &str, id: &str, body: &Value) -> DbResult<()> {
        debug!(collection = %collection, id = %id, "Updating document");

        let result =
            sqlx::query("UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2")
                .bind(collection)
                .bind(id)
                .bind(body.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(entity_name(collection), id));
        }

        Ok(())
    }

    /// Deletes a document unconditionally.
    ///
    /// Succeeds silently when the id is absent - delete is idempotent here,
    /// there is no missing-id error path.
    pub async fn delete(&self, collection: &str, id: &str) -> DbResult<()> {
        debug!(collection = %collection, id = %id, "Deleting document");

        sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Builds the filtered SELECT for `find_first`/`find_all`.
///
/// The SQL shape is fixed; only the number of `json_extract` clauses varies.
/// Field names travel as bound JSON paths, never spliced into the SQL.
fn build_filter_query(filters: &[(&str, &str)], limit_one: bool) -> String {
    let mut sql = String::from("SELECT id, body FROM documents WHERE collection = ?");
    for _ in filters {
        sql.push_str(" AND json_extract(body, ?) = ?");
    }
    sql.push_str(" ORDER BY rowid");
    if limit_one {
        sql.push_str(" LIMIT 1");
    }
    sql
}

/// Maps a (id, body) row to a Document, parsing the JSON body.
fn row_to_document(row: sqlx::sqlite::SqliteRow) -> DbResult<Document> {
    let id: String = row.try_get("id")?;
    let body_text: String = row.try_get("body")?;
    let body = serde_json::from_str(&body_text)?;

    Ok(Document { id, body })
}

/// Human-readable entity name for NotFound messages.
fn entity_name(collection: &str) -> &'static str {
    match collection {
        CUSTOMERS => "Customer",
        ITEMS => "Item",
        BILLS => "Bill",
        CLAIMS => "Claim",
        _ => "Document",
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

    async fn test_store() -> DocumentStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.store()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = test_store().await;

        let id = store
            .insert(ITEMS, &json!({"name": "Soap", "price": 50}))
            .await
            .unwrap();

        let doc = store.get(ITEMS, &id).await.unwrap().unwrap();
        assert_eq!(doc.body["name"], "Soap");
        assert_eq!(doc.body["price"], 50);

        // Same id in another collection is a miss
        assert!(store.get(BILLS, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_first_is_insertion_order() {
        let store = test_store().await;

        let first = store
            .insert(ITEMS, &json!({"name": "Soap", "price": 50}))
            .await
            .unwrap();
        store
            .insert(ITEMS, &json!({"name": "Soap", "price": 60}))
            .await
            .unwrap();

        let doc = store
            .find_first(ITEMS, &[("name", "Soap")])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.id, first);
        assert_eq!(doc.body["price"], 50);
    }

    #[tokio::test]
    async fn test_find_first_is_case_sensitive() {
        let store = test_store().await;

        store
            .insert(ITEMS, &json!({"name": "Soap"}))
            .await
            .unwrap();

        assert!(store
            .find_first(ITEMS, &[("name", "soap")])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_first_conjunctive_filters() {
        let store = test_store().await;

        store
            .insert(CUSTOMERS, &json!({"name": "Ahmed", "phone": "111"}))
            .await
            .unwrap();
        let wanted = store
            .insert(CUSTOMERS, &json!({"name": "Ahmed", "phone": "222"}))
            .await
            .unwrap();

        let doc = store
            .find_first(CUSTOMERS, &[("name", "Ahmed"), ("phone", "222")])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.id, wanted);
    }

    #[tokio::test]
    async fn test_put_replaces_and_reports_missing() {
        let store = test_store().await;

        let id = store
            .insert(ITEMS, &json!({"name": "Soap", "stock": 10}))
            .await
            .unwrap();

        store
            .put(ITEMS, &id, &json!({"name": "Soap", "stock": 4}))
            .await
            .unwrap();
        let doc = store.get(ITEMS, &id).await.unwrap().unwrap();
        assert_eq!(doc.body["stock"], 4);

        let err = store
            .put(ITEMS, "no-such-id", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_silent_when_absent() {
        let store = test_store().await;

        let id = store.insert(ITEMS, &json!({"name": "Soap"})).await.unwrap();
        store.delete(ITEMS, &id).await.unwrap();
        assert!(store.get(ITEMS, &id).await.unwrap().is_none());

        // Deleting again is not an error
        store.delete(ITEMS, &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_and_count() {
        let store = test_store().await;

        store.insert(ITEMS, &json!({"name": "Soap"})).await.unwrap();
        store.insert(ITEMS, &json!({"name": "Surf"})).await.unwrap();
        store
            .insert(CUSTOMERS, &json!({"name": "Ahmed"}))
            .await
            .unwrap();

        assert_eq!(store.scan(ITEMS).await.unwrap().len(), 2);
        assert_eq!(store.count(ITEMS).await.unwrap(), 2);
        assert_eq!(store.count(CUSTOMERS).await.unwrap(), 1);
        assert_eq!(store.count(BILLS).await.unwrap(), 0);
    }
}
