//! # Seed Data Generator
//!
//! Populates the database with a sample catalog and customers for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p till-db --bin seed
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```

use chrono::Utc;
use std::env;
use till_core::Product;
use till_db::{Database, DbConfig};
use uuid::Uuid;

/// (name, price_cents, stock)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Coca-Cola 330ml", 199, 120),
    ("Pepsi 330ml", 189, 80),
    ("Sparkling Water 500ml", 129, 200),
    ("Orange Juice 1L", 349, 40),
    ("Lays Classic", 249, 60),
    ("Doritos Nacho", 279, 45),
    ("Snickers Bar", 149, 150),
    ("Whole Milk 1L", 159, 30),
    ("Cheddar Cheese 200g", 449, 25),
    ("White Bread", 219, 35),
    ("Spaghetti 500g", 179, 90),
    ("Peanut Butter 340g", 389, 20),
];

const CUSTOMERS: &[&str] = &["Ada Lovelace", "Grace Hopper", "Alan Turing", "Walk-in"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./till_dev.db");

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
                println!("Till Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Till Seed Data Generator");
    println!("========================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    for (name, price_cents, stock) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            price_cents: *price_cents,
            stock_quantity: *stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
        println!("  + {} ({}) x{}", product.name, product.price_cents, product.stock_quantity);
    }

    for name in CUSTOMERS {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO customers (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(name)
            .bind(now)
            .execute(db.pool())
            .await?;
        println!("  + customer {} ({})", name, id);
    }

    println!();
    println!("✓ Seed complete: {} products, {} customers", PRODUCTS.len(), CUSTOMERS.len());

    Ok(())
}
