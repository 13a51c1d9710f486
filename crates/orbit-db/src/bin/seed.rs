//! # Seed Data Generator
//!
//! Populates a development database with branches, a small catalog and a few
//! combo packs.
//!
//! ## Usage
//! ```bash
//! cargo run -p orbit-db --bin seed
//! cargo run -p orbit-db --bin seed -- --db ./data/orbit.db
//! ```
//!
//! ## Generated Data
//! - 2 branches (Downtown, Airport)
//! - 3 categories and 2 brands
//! - Products across the categories, assigned to one or both branches
//! - Combo packs built from 2–3 of those products

use chrono::Utc;
use std::env;
use uuid::Uuid;

use orbit_core::{Branch, Brand, Category, Combo, Product};
use orbit_db::{Database, DbConfig};

const DOWNTOWN: &str = "branch-downtown";
const AIRPORT: &str = "branch-airport";

/// (category, name, barcode, price cents, offer cents, stock, airport too?)
const PRODUCTS: &[(&str, &str, &str, i64, Option<i64>, i64, bool)] = &[
    ("cat-bev", "Masala Tea", "8901000000011", 1000, None, 40, true),
    ("cat-bev", "Cold Coffee", "8901000000028", 1800, Some(1500), 25, true),
    ("cat-bev", "Fresh Lime Soda", "8901000000035", 900, None, 30, false),
    ("cat-bak", "Butter Croissant", "8901000000042", 1500, None, 12, true),
    ("cat-bak", "Banana Bread", "8901000000059", 1200, Some(1000), 8, false),
    ("cat-bak", "Chocolate Muffin", "8901000000066", 1300, None, 0, true),
    ("cat-snk", "Salted Chips", "8901000000073", 500, None, 60, true),
    ("cat-snk", "Trail Mix", "8901000000080", 1100, None, 20, false),
];

/// (name, description, product names, price, offer)
const COMBOS: &[(&str, &str, &[&str], i64, Option<i64>)] = &[
    (
        "Tea Time",
        "Masala tea with a croissant",
        &["Masala Tea", "Butter Croissant"],
        2400,
        Some(2000),
    ),
    (
        "Morning Rush",
        "Cold coffee, banana bread and chips",
        &["Cold Coffee", "Banana Bread", "Salted Chips"],
        3200,
        None,
    ),
    (
        "Sweet Tooth",
        "Muffin and tea",
        &["Chocolate Muffin", "Masala Tea"],
        2100,
        Some(1900),
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./orbit_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Orbit POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./orbit_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Orbit POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Reference data
    for (id, name, address, phone) in [
        (DOWNTOWN, "Downtown", "12 Main St", "555-0100"),
        (AIRPORT, "Airport Kiosk", "Terminal 2, Gate 14", "555-0199"),
    ] {
        db.branches()
            .insert(&Branch {
                id: id.to_string(),
                name: name.to_string(),
                address: Some(address.to_string()),
                phone: Some(phone.to_string()),
            })
            .await?;
    }

    for (id, name) in [
        ("cat-bev", "Beverages"),
        ("cat-bak", "Bakery"),
        ("cat-snk", "Snacks"),
    ] {
        db.categories()
            .insert(&Category {
                id: id.to_string(),
                name: name.to_string(),
                description: None,
            })
            .await?;
    }

    for (id, name) in [("brand-house", "Orbit House"), ("brand-farm", "Green Farm")] {
        db.brands()
            .insert(&Brand {
                id: id.to_string(),
                name: name.to_string(),
                description: None,
            })
            .await?;
    }
    println!("✓ Branches, categories and brands");

    // Products
    let now = Utc::now();
    let mut ids_by_name = std::collections::HashMap::new();

    for (index, (category, name, barcode, price, offer, stock, airport)) in
        PRODUCTS.iter().enumerate()
    {
        let mut branch_ids = vec![DOWNTOWN.to_string()];
        if *airport {
            branch_ids.push(AIRPORT.to_string());
        }

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            barcode: Some(barcode.to_string()),
            description: None,
            brand_id: Some(if index % 2 == 0 { "brand-house" } else { "brand-farm" }.to_string()),
            category_id: Some(category.to_string()),
            price_cents: *price,
            offer_price_cents: *offer,
            stock: *stock,
            branch_ids,
            image_url: None,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }
        ids_by_name.insert(*name, product.id);
    }
    println!("✓ {} products", ids_by_name.len());

    // Combos
    let mut combos = 0;
    for (name, description, members, price, offer) in COMBOS {
        let product_ids: Vec<String> = members
            .iter()
            .filter_map(|m| ids_by_name.get(m).cloned())
            .collect();
        if product_ids.len() != members.len() {
            eprintln!("Skipping combo {}: missing constituents", name);
            continue;
        }

        db.combos()
            .save(&Combo {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                description: description.to_string(),
                product_ids,
                price_cents: *price,
                offer_price_cents: *offer,
                branch_ids: vec![DOWNTOWN.to_string(), AIRPORT.to_string()],
                created_at: now,
                updated_at: now,
            })
            .await?;
        combos += 1;
    }
    println!("✓ {} combo packs", combos);

    println!();
    println!("Seeding complete!");
    println!("Run the terminal with: ORBIT_DATABASE_PATH={} orbit-terminal items", db_path);

    Ok(())
}
