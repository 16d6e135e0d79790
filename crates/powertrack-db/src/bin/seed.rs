//! # Seed Data Generator
//!
//! Populates a development database with a small wash catalog.
//!
//! ## Usage
//! ```bash
//! cargo run -p powertrack-db --bin seed
//!
//! # Specify database path
//! cargo run -p powertrack-db --bin seed -- --db ./data/powertrack.db
//! ```
//!
//! ## Generated Data
//! - Vehicle categories: Sedan, SUV, Truck
//! - Services with a pricing matrix (Interior Clean has no Truck price, so
//!   the 0.00 configuration gap can be seen on the worksheet)
//! - One admin and two washers
//! - Three vehicles, one of them on an active monthly plan

use std::env;

use powertrack_core::{BillingCycle, Money};
use powertrack_db::{Database, DbConfig, NewClientPlan};

/// Categories, in pricing-matrix column order.
const CATEGORIES: &[&str] = &["Sedan", "SUV", "Truck"];

/// (service, description, price in cents per category; `None` = not priced)
const SERVICES: &[(&str, &str, [Option<i64>; 3])] = &[
    ("Exterior Wash", "Foam, rinse and hand dry", [Some(1000), Some(1200), Some(1500)]),
    ("Interior Clean", "Vacuum, dash and windows", [Some(1500), Some(1800), None]),
    ("Wax", "Hand-applied carnauba", [Some(2000), Some(2500), Some(3000)]),
    ("Tire Shine", "Wheels and tire dressing", [Some(500), Some(600), Some(800)]),
];

/// (full name, username, role)
const STAFF: &[(&str, &str, &str)] = &[
    ("Site Admin", "admin", "admin"),
    ("Dana Reyes", "dana", "employee"),
    ("Sam Okafor", "sam", "employee"),
];

/// (plate as typed, category index, make/model)
const VEHICLES: &[(&str, usize, &str)] = &[
    ("AB-12 34", 0, "Toyota Corolla"),
    ("XYZ 987", 1, "Honda CR-V"),
    ("TRK-001", 2, "Ford F-150"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./powertrack_dev.db");

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
                println!("PowerTrack Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./powertrack_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 PowerTrack Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !db.catalog().list_categories().await?.is_empty() {
        println!("⚠ Database already has a catalog");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        category_ids.push(db.catalog().insert_category(name).await?.id);
    }

    let mut priced = 0;
    for (name, description, prices) in SERVICES {
        let service = db.catalog().insert_service(name, Some(*description)).await?;
        for (category_id, price) in category_ids.iter().zip(prices.iter()) {
            if let Some(cents) = price {
                db.catalog()
                    .set_price(&service.id, category_id, Money::from_cents(*cents))
                    .await?;
                priced += 1;
            }
        }
    }
    println!("✓ {} categories, {} services, {} prices", CATEGORIES.len(), SERVICES.len(), priced);

    // Staff
    for (full_name, username, role) in STAFF {
        let member = db.staff().insert(full_name, username, role).await?;
        println!("  staff {:<8} {}", member.username, member.id);
    }

    // Vehicles
    for (plate, category_idx, make_model) in VEHICLES {
        let vehicle = db
            .vehicles()
            .insert(plate, &category_ids[*category_idx], Some(*make_model))
            .await?;
        println!("  vehicle {:<8} {}", vehicle.license_plate, make_model);
    }

    // One active plan covering the sedan
    let plan = db
        .plans()
        .insert_plan(NewClientPlan {
            client_name: "Acme Fleet Services".to_string(),
            billing_cycle_type: BillingCycle::Monthly,
            contact_email: Some("fleet@acme.example".to_string()),
            contact_phone: Some("555-0100".to_string()),
            client_signature: b"signed-at-counter".to_vec(),
        })
        .await?;
    db.plans()
        .link_vehicle(&plan.id, VEHICLES[0].0, &category_ids[VEHICLES[0].1], None)
        .await?;
    println!("✓ Plan '{}' covers {}", plan.client_name, VEHICLES[0].0);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
