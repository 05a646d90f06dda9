//! # Seed Data Loader
//!
//! Loads the demo catalog and accounts for local development.
//!
//! ## Usage
//! ```bash
//! # Seed ./teslo_dev.db (skipped when products already exist)
//! cargo run -p teslo-db --bin seed
//!
//! # Wipe and reseed a specific database
//! cargo run -p teslo-db --bin seed -- --db ./data/teslo.db --reset
//! ```

use std::env;

use teslo_db::seed::{reset_and_seed, DEMO_PASSWORD};
use teslo_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./teslo_dev.db");
    let mut reset = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--reset" | "-r" => reset = true,
            "--help" | "-h" => {
                println!("Teslo Shop Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./teslo_dev.db)");
                println!("  -r, --reset        Delete existing orders, users and products first");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Teslo Shop Seed Data Loader");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 && !reset {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Pass --reset to wipe and reseed.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let report = reset_and_seed(&db).await?;

    println!();
    println!(
        "✓ Seeded {} products and {} users in {:?}",
        report.products,
        report.users,
        start.elapsed()
    );
    println!("  Accounts: admin@teslo.com / client@teslo.com (password {})", DEMO_PASSWORD);

    let tees = db.products().search("tee").await?;
    println!("  Search 'tee': {} results", tees.len());

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
