//! # Dukaan DB
//!
//! Persistence layer for Dukaan POS: a schemaless document store over
//! SQLite, with the repositories and writers that run the shop on top of it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         dukaan-db Crate                                 │
//! │                                                                         │
//! │  ┌──────────────┐                                                       │
//! │  │   pool.rs    │  Database handle + DbConfig (WAL SQLite pool)        │
//! │  └──────┬───────┘                                                       │
//! │         │ hands out                                                     │
//! │         ▼                                                               │
//! │  ┌──────────────┐      ┌──────────────────────────────────────────┐     │
//! │  │   store.rs   │◄─────│  repository/                             │     │
//! │  │  documents   │      │    item       Item Repository            │     │
//! │  │  table, JSON │      │    customer   Customer Resolver          │     │
//! │  │  bodies      │      │    bill       Bill Writer                │     │
//! │  └──────┬───────┘      │    claim      Claim Writer               │     │
//! │         │              │    dashboard  Dashboard Aggregator       │     │
//! │         ▼              └──────────────────────────────────────────┘     │
//! │  ┌──────────────┐                                                       │
//! │  │migrations.rs │  Embedded SQL migrations (documents table)           │
//! │  └──────────────┘                                                       │
//! │                                                                         │
//! │  Domain arithmetic and validation live in dukaan-core; this crate      │
//! │  owns everything that touches SQLite.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use dukaan_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./dukaan.db")).await?;
//!
//! let bill_id = db.bills().create_bill(request).await?;
//! let summary = db.dashboard().summarize().await?;
//! ```
//!
//! ## Consistency Model
//! There are no multi-document transactions anywhere in this crate. Every
//! write is a single-document round trip, and the multi-step writers (bills,
//! claims) can fail partway. See the module docs in [`repository`] for the
//! exact hazards each writer carries.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// Re-export the surface most callers need.
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::bill::BillWriter;
pub use repository::claim::ClaimWriter;
pub use repository::customer::CustomerResolver;
pub use repository::dashboard::DashboardAggregator;
pub use repository::item::ItemRepository;
pub use store::{Document, DocumentStore, Stored};
