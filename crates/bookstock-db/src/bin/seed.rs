//! # Seed Data Generator
//!
//! Populates a database with sample books for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 books (default) in the configured database
//! cargo run -p bookstock-db --bin seed
//!
//! # Generate a custom amount
//! cargo run -p bookstock-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p bookstock-db --bin seed -- --db ./data/books.db
//! ```
//!
//! Without `--db` the path comes from `bookstock.toml` / `BOOKSTOCK_DB_PATH`.
//!
//! ## Generated Books
//! Each book has:
//! - Title: `{title}` or `{title} (Vol. N)` once titles repeat
//! - Price: $4.99 - $24.99
//! - Stock: 0 - 12
//! - Supplier name and a 10-digit phone number

use std::env;
use std::path::PathBuf;

use bookstock_core::{BookUri, FieldSet, Money};
use bookstock_db::{init_tracing, BookFilter, BookQuery, Database, StoreSettings};

const TITLES: &[&str] = &[
    "Dune",
    "Emma",
    "Middlemarch",
    "Beloved",
    "Ulysses",
    "Persuasion",
    "The Left Hand of Darkness",
    "Neuromancer",
    "Things Fall Apart",
    "The Name of the Rose",
    "Solaris",
    "Kindred",
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Ace Distribution", "5551234567"),
    ("Northwind Books", "5559876543"),
    ("Harbor Wholesale", "5550112233"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bookstock Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of books to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: from settings)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut settings = StoreSettings::load(None)?;
    if let Some(path) = db_path {
        settings.database.path = path;
    }

    println!("🌱 Bookstock Seed Data Generator");
    println!("================================");
    println!("Database: {}", settings.database.path.display());
    println!("Books:    {}", count);
    println!();

    if let Some(parent) = settings.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(settings.to_db_config()).await?;
    let (total, applied) = db.migration_status().await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let books = db.books();

    let existing = books.count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating books...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let fields = generate_book(seed);

        if let Err(e) = books.insert(&fields).await {
            eprintln!("Failed to insert book #{}: {}", seed, e);
            continue;
        }

        generated += 1;
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} books in {:?}", generated, elapsed);

    // Exercise the sale protocol against the first book in stock
    println!();
    println!("Selling one copy of the first book in stock...");

    let in_stock = books
        .query(BookQuery::new().filter(BookFilter::all().in_stock()).limit(1))
        .fetch_all()
        .await?;

    match in_stock.first() {
        Some(book) => {
            let outcome = books.sell_one(book.id, book.quantity).await?;
            println!(
                "  {} ({}): {:?}",
                book.name,
                BookUri::for_book(book.id),
                outcome
            );
        }
        None => println!("  Nothing in stock."),
    }

    let all = books.query(BookQuery::new()).fetch_all().await?;
    let stock_value = all.iter().try_fold(Money::zero(), |total, book| {
        book.stock_value().and_then(|value| total.checked_add(value))
    });

    println!();
    println!("  Titles:      {}", all.len());
    println!("  In stock:    {}", all.iter().filter(|b| b.in_stock()).count());
    match stock_value {
        Some(value) => println!("  Stock value: {}", value),
        None => println!("  Stock value: too large to show"),
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds the field-set for one sample book.
fn generate_book(seed: usize) -> FieldSet {
    let title = TITLES[seed % TITLES.len()];
    let volume = seed / TITLES.len();
    let name = if volume == 0 {
        title.to_string()
    } else {
        format!("{} (Vol. {})", title, volume + 1)
    };

    // $4.99 - $24.99
    let cents = 499 + ((seed * 37) % 2001) as i64;
    let quantity = ((seed * 7) % 13) as i64;
    let (supplier, phone) = SUPPLIERS[seed % SUPPLIERS.len()];

    FieldSet::new()
        .with_name(name)
        .with_price(cents as f64 / 100.0)
        .with_quantity(quantity)
        .with_supplier_name(supplier)
        .with_supplier_phone(phone)
}
