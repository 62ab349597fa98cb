//! # Repository Module
//!
//! Repositories and writers over the document store.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Components over the Store                            │
//! │                                                                         │
//! │  Presentation layer (external)                                         │
//! │       │                                                                 │
//! │       │  db.bills().create_bill(request)                               │
//! │       ▼                                                                 │
//! │  BillWriter ──► CustomerResolver ──► DocumentStore                     │
//! │      │    └───► ItemRepository  ───► DocumentStore                     │
//! │      └────────► DocumentStore (bill document)                          │
//! │                                                                         │
//! │  Every arrow is an independent async round trip. Nothing is batched,   │
//! │  nothing is transactional: a failure mid-sequence leaves earlier       │
//! │  writes in place (documented partial-failure hazard).                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Components
//!
//! - [`item::ItemRepository`] - Item CRUD and name lookup
//! - [`customer::CustomerResolver`] - Find-or-create customers
//! - [`bill::BillWriter`] - Bill creation with stock/scheme reconciliation
//! - [`claim::ClaimWriter`] - Claim creation with claimed/remaining counters
//! - [`dashboard::DashboardAggregator`] - Read-only summary fold

pub mod bill;
pub mod claim;
pub mod customer;
pub mod dashboard;
pub mod item;
