//! # Seed Data Generator
//!
//! Populates a local database with a demo catalog and customer list.
//!
//! ## Usage
//! ```bash
//! cargo run -p karu-db --bin seed
//! cargo run -p karu-db --bin seed -- --db ./data/karu.db
//! ```
//!
//! A handful of products start below their minimum stock level so the
//! dashboard's low-stock alert has something to show.

use clap::Parser;
use karu_core::{Customer, Product, DEFAULT_MIN_STOCK_LEVEL};
use karu_db::{Database, DbConfig};
use uuid::Uuid;

/// (name, price in cents, stock, barcode)
const PRODUCTS: &[(&str, i64, i64, &str)] = &[
    ("Bread White 400g", 6_500, 40, "6161100110011"),
    ("Bread Brown 400g", 7_000, 25, "6161100110028"),
    ("Milk Fresh 500ml", 6_000, 60, "6161100220017"),
    ("Milk Long Life 1L", 14_000, 8, "6161100220024"),
    ("Eggs Tray (30)", 45_000, 12, "6161100330012"),
    ("Sugar 1kg", 18_000, 30, "6161100440019"),
    ("Maize Flour 2kg", 21_000, 4, "6161100550016"),
    ("Wheat Flour 2kg", 23_000, 18, "6161100550023"),
    ("Rice Pishori 1kg", 25_000, 22, "6161100660013"),
    ("Cooking Oil 1L", 38_000, 6, "6161100770010"),
    ("Tea Leaves 250g", 15_000, 35, "6161100880017"),
    ("Drinking Water 500ml", 5_000, 100, "6161100990014"),
    ("Soda 500ml", 8_000, 48, "6161101000019"),
    ("Exercise Book A4", 12_000, 3, "6161101110015"),
    ("Ballpoint Pen Blue", 2_000, 150, "6161101220012"),
    ("Toothpaste 100ml", 16_000, 9, "6161101330019"),
    ("Bar Soap 175g", 9_000, 27, "6161101440016"),
    ("Washing Powder 1kg", 32_000, 2, "6161101550013"),
];

/// (name, phone, is_student)
const CUSTOMERS: &[(&str, &str, bool)] = &[
    ("Amina Wanjiru", "0712000001", true),
    ("Brian Otieno", "0712000002", false),
    ("Cynthia Njeri", "0712000003", true),
    ("David Kiprono", "0712000004", false),
    ("Esther Achieng", "0712000005", false),
    ("Felix Mwangi", "0712000006", true),
];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "KarU POS seed data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./karu_dev.db")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("KarU POS Seed Data Generator");
    println!("============================");
    println!("Database: {}", args.db);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (name, price_cents, stock, barcode) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price_cents: *price_cents,
            stock_quantity: *stock,
            min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
            barcode: Some(barcode.to_string()),
            is_active: true,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
        }
    }
    println!("✓ Inserted {} products", db.products().count().await?);

    for (name, phone, is_student) in CUSTOMERS {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            loyalty_points: 0,
            is_student: *is_student,
            total_spent_cents: 0,
        };

        if let Err(e) = db.customers().insert(&customer).await {
            eprintln!("Failed to insert {}: {}", customer.name, e);
        }
    }
    println!("✓ Inserted {} customers", db.customers().count().await?);

    let low = db.products().low_stock().await?;
    println!("  {} products start below minimum stock", low.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
