//! # Seed Data Generator
//!
//! Populates the database with a kiryana-shop catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p dukaan-db --bin seed
//!
//! # Specify database path
//! cargo run -p dukaan-db --bin seed -- --db ./data/dukaan.db
//!
//! # Skip the sample bill/claim, catalog only
//! cargo run -p dukaan-db --bin seed -- --catalog-only
//! ```
//!
//! ## Generated Data
//! - A small catalog of everyday items (soap, surf, ghee, rice, ...) with
//!   realistic rupee prices, a few of them carrying active schemes
//! - One sample customer with a scheme-qualifying bill
//! - One sample claim against that customer
//! - A dashboard summary printed at the end as a sanity check

use std::env;

use dukaan_core::{BillLineInput, BillRequest, ClaimLine, ClaimRequest, NewItem, PaymentType};
use dukaan_db::{Database, DbConfig};

/// Catalog entries: (name, price, stock, scheme_qty, scheme_discount).
/// A zero scheme_qty means no scheme.
const CATALOG: &[(&str, i64, i64, i64, i64)] = &[
    ("Lifebuoy Soap", 90, 60, 5, 40),
    ("Safeguard Soap", 110, 40, 0, 0),
    ("Surf Excel 1kg", 380, 25, 3, 100),
    ("Ariel 1kg", 360, 30, 0, 0),
    ("Dalda Ghee 1kg", 560, 20, 0, 0),
    ("Super Basmati Rice 5kg", 1950, 15, 2, 150),
    ("Tapal Danedar 190g", 340, 50, 0, 0),
    ("Lipton Yellow Label 190g", 360, 35, 0, 0),
    ("Nestle Milkpak 1L", 290, 80, 6, 60),
    ("Olpers 1L", 300, 70, 0, 0),
    ("Colgate 100g", 190, 45, 0, 0),
    ("Sufi Cooking Oil 1L", 520, 30, 4, 80),
    ("National Salt 800g", 60, 100, 0, 0),
    ("Shan Biryani Masala", 120, 90, 0, 0),
    ("Rooh Afza 800ml", 420, 25, 0, 0),
    ("Tang Orange 375g", 480, 20, 0, 0),
    ("Peek Freans Sooper", 50, 150, 10, 30),
    ("Candi Biscuit", 50, 120, 0, 0),
    ("K&N's Nuggets 1kg", 1150, 10, 0, 0),
    ("Everyday Whitener 400g", 650, 18, 0, 0),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug surfaces per-document store activity during seeding
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./dukaan_dev.db");
    let mut catalog_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--catalog-only" => {
                catalog_only = true;
            }
            "--help" | "-h" => {
                println!("Dukaan POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./dukaan_dev.db)");
                println!("      --catalog-only Seed items only, no sample bill/claim");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Dukaan POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut seeded = 0;
    for (name, price, stock, scheme_qty, scheme_discount) in CATALOG {
        let item = NewItem {
            name: name.to_string(),
            price: *price,
            stock: *stock,
            scheme_active: *scheme_qty > 0,
            scheme_qty: *scheme_qty,
            scheme_discount: *scheme_discount,
        };

        if let Err(e) = db.items().create(item).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        seeded += 1;
    }

    println!("✓ Seeded {} items", seeded);

    if !catalog_only {
        println!();
        println!("Creating sample bill and claim...");

        // Scheme-qualifying bill: 5 x Lifebuoy Soap hits the qty-5 scheme
        let bill_id = db
            .bills()
            .create_bill(BillRequest {
                customer_name: "Ahmed Khan".to_string(),
                phone: "0300-1234567".to_string(),
                items: vec![
                    BillLineInput {
                        name: "Lifebuoy Soap".to_string(),
                        qty: 5,
                        price: 90,
                    },
                    BillLineInput {
                        name: "Surf Excel 1kg".to_string(),
                        qty: 1,
                        price: 380,
                    },
                ],
                payment_type: PaymentType::Credit,
                paid_amount: 0,
                grand_total: 830,
            })
            .await?;
        println!("  Bill {} created", bill_id);

        let claim_id = db
            .claims()
            .create_claim(ClaimRequest {
                customer_name: "Ahmed Khan".to_string(),
                phone: "0300-1234567".to_string(),
                items: vec![ClaimLine {
                    name: "Lifebuoy Soap".to_string(),
                    qty: 1,
                    price: 90,
                    bill_id: bill_id.clone(),
                    note: "Damaged wrapper".to_string(),
                }],
                bill_refs: vec![bill_id],
                total_claim: 90,
            })
            .await?;
        println!("  Claim {} created", claim_id);
    }

    println!();
    println!("Dashboard summary:");
    let summary = db.dashboard().summarize().await?;
    println!("  Total sales:    Rs {}", summary.total_sales);
    println!("  Total discount: Rs {}", summary.total_discount);
    println!("  Total claims:   Rs {}", summary.total_claims);
    println!("  Profit:         Rs {}", summary.profit);
    println!("  Customers:      {}", summary.customers);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
