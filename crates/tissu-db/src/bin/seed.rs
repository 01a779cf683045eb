//! # Seed Data Generator
//!
//! Populates the database with fabric products for development.
//!
//! ## Usage
//! ```bash
//! # Seed every catalog fabric in every colorway (default)
//! cargo run -p tissu-db --bin seed
//!
//! # Specify database path
//! cargo run -p tissu-db --bin seed -- --db ./data/tissu.db
//! ```
//!
//! ## Generated Products
//! One product per (fabric type, subtype, colorway) combination, driven by
//! the catalog registry so seed data never drifts from the fabric taxonomy.
//! Each product gets a deterministic price and stock level derived from its
//! position, so reseeding a fresh database always produces the same data.

use chrono::Utc;
use std::env;
use tissu_core::catalog;
use tissu_core::Product;
use tissu_db::{Database, DbConfig};
use uuid::Uuid;

/// Colorways applied to every fabric, with a price bump in cents.
const COLORWAYS: &[(&str, i64)] = &[
    ("Blanc", 0),
    ("Or", 500),
    ("Bleu Nuit", 200),
    ("Bordeaux", 200),
    ("Vert Émeraude", 300),
    ("Indigo", 400),
];

/// Base prices per fabric type, in cents per unit.
const BASE_PRICES: &[(&str, i64)] = &[
    ("bazin", 4500),
    ("wax", 2500),
    ("dentelle", 6000),
    ("soie", 8000),
    ("coton", 1500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tissu_dev.db");

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
                println!("Tissu Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tissu_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tissu Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");

    let (total, applied) = tissu_db::migrations::migration_status(db.pool()).await?;
    println!("✓ Migrations applied ({applied}/{total})");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products from the catalog registry
    println!();
    println!("Generating fabrics...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for key in catalog::list_types() {
        let def = catalog::definition(key)?;
        for subtype in def.subtypes {
            for (colorway, price_bump) in COLORWAYS {
                let product = generate_product(def, subtype, colorway, *price_bump, generated);

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;
            }
        }
        println!("  {} done ({} so far)", def.display_name, generated);
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} fabrics in {:?}", generated, elapsed);

    // Verify search
    println!();
    println!("Verifying search...");
    let search_results = db.products().search("bazin", 10).await?;
    println!("  Search 'bazin': {} results", search_results.len());

    let search_results = db.products().search("Indigo", 10).await?;
    println!("  Search 'Indigo': {} results", search_results.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single fabric product with deterministic data.
fn generate_product(
    def: &catalog::FabricTypeDef,
    subtype: &str,
    colorway: &str,
    price_bump: i64,
    seed: usize,
) -> Product {
    let now = Utc::now();

    let base_price = BASE_PRICES
        .iter()
        .find(|(key, _)| *key == def.key)
        .map(|(_, p)| *p)
        .unwrap_or(2000);

    // Deterministic stock: 0-60 units, a few fabrics intentionally sold out
    let available_stock = ((seed * 13) % 61) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {} {}", def.display_name, subtype, colorway),
        description: Some(format!(
            "{} {}, coloris {}.",
            def.display_name, subtype, colorway
        )),
        price_cents: base_price + price_bump,
        fabric_type: def.key.to_string(),
        fabric_subtype: subtype.to_string(),
        unit: def.default_unit,
        available_stock,
        image_path: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
