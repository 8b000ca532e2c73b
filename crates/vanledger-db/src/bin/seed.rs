//! # Seed Data Generator
//!
//! Populates the database with a demo seller for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./vanledger_dev.db with the default demo account
//! cargo run -p vanledger-db --bin seed
//!
//! # Specify database path and login phone
//! cargo run -p vanledger-db --bin seed -- --db ./data/vanledger.db --phone 9000000000
//! ```
//!
//! ## Generated Data
//! - One user (password `demo-pass`)
//! - A round of shops across a few areas
//! - The daily dairy and bakery catalog with opening stock

use anyhow::Context;
use std::env;
use vanledger_core::{Money, NewProduct, NewShop, TenantId};
use vanledger_db::{Database, DbConfig};

/// Shops on the demo round: (name, area)
const SHOPS: &[(&str, &str)] = &[
    ("Anand Stores", "Market Road"),
    ("Balaji Kirana", "Station Road"),
    ("Sai General Store", "Station Road"),
    ("Krishna Dairy Point", "Gandhi Nagar"),
    ("New Laxmi Provisions", "Gandhi Nagar"),
    ("Sharma Tea Stall", "Bus Stand"),
];

/// Catalog: (name, unit, price in paise, opening stock)
const PRODUCTS: &[(&str, &str, i64, i64)] = &[
    ("Toned Milk 500ml", "packet", 2_700, 120),
    ("Full Cream Milk 500ml", "packet", 3_300, 80),
    ("Curd 400g", "cup", 3_500, 40),
    ("Paneer 200g", "packet", 9_000, 25),
    ("Butter 100g", "packet", 5_600, 30),
    ("White Bread", "loaf", 4_000, 50),
    ("Brown Bread", "loaf", 5_000, 30),
    ("Pav (6 pcs)", "packet", 3_000, 40),
    ("Rusk 300g", "packet", 6_000, 20),
    ("Buttermilk 200ml", "pouch", 1_200, 60),
];

const DEMO_PASSWORD: &str = "demo-pass";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./vanledger_dev.db");
    let mut phone = String::from("9000000000");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--phone" | "-p" => {
                if i + 1 < args.len() {
                    phone = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("VanLedger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./vanledger_dev.db)");
                println!("  -p, --phone <PHONE>  Demo login phone (default: 9000000000)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 VanLedger Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Phone:    {}", phone);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.users().find_by_phone(&phone).await?.is_some() {
        println!("⚠ Phone {} is already registered", phone);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file or pass --phone to regenerate.");
        return Ok(());
    }

    let user = db
        .users()
        .register("Demo Seller", &phone, DEMO_PASSWORD)
        .await
        .context("registering demo user")?;
    let tenant = db.tenant(TenantId::new(user.id));

    println!();
    println!("Creating shops...");
    for (name, area) in SHOPS {
        tenant
            .shops()
            .create(&NewShop {
                name: name.to_string(),
                area: area.to_string(),
            })
            .await
            .with_context(|| format!("creating shop {name}"))?;
    }

    println!("Creating products...");
    for (name, unit, price, stock) in PRODUCTS {
        tenant
            .products()
            .create(&NewProduct {
                name: name.to_string(),
                unit: unit.to_string(),
                price: Money::from_paise(*price),
                stock: *stock,
            })
            .await
            .with_context(|| format!("creating product {name}"))?;
    }

    println!();
    println!("✓ {} shops, {} products", SHOPS.len(), tenant.products().count().await?);
    println!("✓ Seed complete! Log in with {} / {}", phone, DEMO_PASSWORD);

    Ok(())
}
