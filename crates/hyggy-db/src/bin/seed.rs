//! # Seed Data Generator
//!
//! Populates the database with a small linked catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by DATABASE_URL (or ./hyggy_dev.db); .env is read first
//! cargo run -p hyggy-db --bin seed
//!
//! # Specify the connection string
//! cargo run -p hyggy-db --bin seed -- --db sqlite://./data/hyggy.db?mode=rwc
//!
//! # More products per subcategory
//! cargo run -p hyggy-db --bin seed -- --per-subcategory 8
//! ```
//!
//! ## Generated Data
//! - Brands, product categories and subcategories
//! - Products (every third one discounted) with specifications and reviews
//! - Stores with warehouse stock for every product
//! - Image assets, blog categories, subcategories and posts

use chrono::{Duration, Utc};
use hyggy_core::{
    Asset, Blog, BlogCategory, BlogSubcategory, Brand, DiscountType, Money, Product,
    ProductCategory, ProductSpecification, ProductSubcategory, Review, Store, Warehouse,
};
use hyggy_db::{schema, Database, DbConfig};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "sqlite://./hyggy_dev.db?mode=rwc";

const BRANDS: &[&str] = &["Nordlys", "Skov", "Hygge Home", "Fjord"];

/// Product categories and their subcategories
const CATEGORIES: &[(&str, &[&str])] = &[
    ("Living Room", &["Sofas", "Armchairs", "Coffee Tables"]),
    ("Bedroom", &["Beds", "Mattresses", "Wardrobes"]),
    ("Lighting", &["Floor Lamps", "Pendants"]),
    ("Textiles", &["Rugs", "Cushions", "Throws"]),
];

const STORES: &[(&str, &str, &str)] = &[
    ("Hyggy Aarhus", "Søndergade 12", "Aarhus"),
    ("Hyggy Copenhagen", "Strøget 40", "Copenhagen"),
    ("Hyggy Odense", "Vestergade 3", "Odense"),
];

const BLOG_CATEGORIES: &[(&str, &[&str])] = &[
    ("Inspiration", &["Small Spaces", "Seasonal"]),
    ("Guides", &["Care", "Buying Guides"]),
];

const REVIEWERS: &[&str] = &["Freja", "Mads", "Ida", "Lukas", "Sofie"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Load .env if present
    dotenv::dotenv().ok();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let mut per_subcategory: usize = 4;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--per-subcategory" | "-n" => {
                if i + 1 < args.len() {
                    per_subcategory = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Hyggy Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <URL>               Connection string (default: $DATABASE_URL or {DEFAULT_URL})");
                println!("  -n, --per-subcategory <N>    Products per subcategory (default: 4)");
                println!("  -h, --help                   Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Hyggy Catalog Seed Data Generator");
    println!("====================================");
    println!("Database: {url}");
    println!();

    let db = Database::new(&DbConfig::new(&url));
    schema::bootstrap(&db).await?;
    println!("✓ Schema applied");

    // Check existing data
    let existing = db.brands().get_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {existing} brands");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let brand_ids = seed_brands(&db).await?;
    let subcategory_ids = seed_taxonomy(&db).await?;
    let store_ids = seed_stores(&db).await?;
    let products = seed_products(&db, &brand_ids, &subcategory_ids, per_subcategory).await?;
    seed_product_details(&db, &products, &store_ids).await?;
    let posts = seed_blog(&db).await?;

    println!();
    println!(
        "✓ Seeded {} products and {} blog posts in {:?}",
        products.len(),
        posts,
        start.elapsed()
    );

    db.close().await;
    Ok(())
}

/// Logs to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyggy_db=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn seed_brands(db: &Database) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let mut ids = Vec::with_capacity(BRANDS.len());
    for name in BRANDS {
        ids.push(db.brands().create(&Brand::new(*name)).await?);
    }
    println!("✓ {} brands", ids.len());
    Ok(ids)
}

async fn seed_taxonomy(db: &Database) -> Result<Vec<(i64, &'static str)>, Box<dyn std::error::Error>> {
    let mut subcategories = Vec::new();
    for (category, subs) in CATEGORIES {
        let category_id = db
            .product_categories()
            .create(&ProductCategory::new(*category))
            .await?;

        for sub in subs.iter() {
            let id = db
                .product_subcategories()
                .create(&ProductSubcategory::new(category_id, *sub))
                .await?;
            subcategories.push((id, *sub));
        }
    }
    println!("✓ {} categories, {} subcategories", CATEGORIES.len(), subcategories.len());
    Ok(subcategories)
}

async fn seed_stores(db: &Database) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let mut ids = Vec::with_capacity(STORES.len());
    for (name, address, city) in STORES {
        let mut store = Store::new(*name);
        store.address = Some(address.to_string());
        store.city = Some(city.to_string());
        ids.push(db.stores().create(&store).await?);
    }
    println!("✓ {} stores", ids.len());
    Ok(ids)
}

async fn seed_products(
    db: &Database,
    brand_ids: &[i64],
    subcategories: &[(i64, &str)],
    per_subcategory: usize,
) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    let mut products = Vec::new();

    for (sub_idx, (subcategory_id, sub_name)) in subcategories.iter().enumerate() {
        for n in 0..per_subcategory {
            let seed = sub_idx * 100 + n;

            let image = db
                .assets()
                .insert(Asset {
                    id: Asset::generate_id(),
                    path: format!("/media/products/{seed}.jpg"),
                    alt: Some(format!("{sub_name} {}", n + 1)),
                    asset_type: Some("image/jpeg".to_string()),
                })
                .await?;

            let product = generate_product(
                sub_name,
                n,
                seed,
                brand_ids[seed % brand_ids.len()],
                *subcategory_id,
                image.id,
            );

            products.push(db.products().insert(product).await?);
        }
    }

    println!("✓ {} products", products.len());
    Ok(products)
}

/// Generates a single product with deterministic data.
fn generate_product(
    sub_name: &str,
    n: usize,
    seed: usize,
    brand_id: i64,
    subcategory_id: i64,
    image_asset_id: String,
) -> Product {
    // Price: 199.00 - 4189.00 in whole kroner plus .00/.95
    let kroner = 199 + ((seed * 37) % 3991) as i64;
    let ore = if seed % 2 == 0 { 0 } else { 95 };
    let price = Money::new(kroner * 100 + ore, 2);

    let mut product = Product::new(
        format!("{sub_name} No. {}", n + 1),
        format!("A {} from the {sub_name} range", sub_name.to_lowercase()),
        price,
        brand_id,
        subcategory_id,
    );
    product.image_asset_id = Some(image_asset_id);
    product.full_description_html = Some(format!("<p>{sub_name} made to last.</p>"));

    // Every third product is on sale, alternating discount kinds
    if seed % 3 == 0 {
        product.is_discount = true;
        product.discount_time = Some(Utc::now() - Duration::days((seed % 10) as i64));
        if seed % 2 == 0 {
            product.discount_type = Some(DiscountType::Percentage);
            product.discount_amount = Some(Money::new(20, 0));
        } else {
            product.discount_type = Some(DiscountType::Fixed);
            product.discount_amount = Some(Money::new(10_000, 2));
        }
    }

    product
}

async fn seed_product_details(
    db: &Database,
    products: &[Product],
    store_ids: &[i64],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reviews = 0;

    for (idx, product) in products.iter().enumerate() {
        db.product_specifications()
            .create(&ProductSpecification::new(product.id, "Width", format!("{} cm", 40 + idx % 200)))
            .await?;
        db.product_specifications()
            .create(&ProductSpecification::new(product.id, "Material", ["Oak", "Pine", "Wool", "Linen"][idx % 4]))
            .await?;

        for r in 0..(idx % 3) {
            let author = REVIEWERS[(idx + r) % REVIEWERS.len()];
            let rating = (3 + (idx + r) % 3) as u8;
            db.reviews()
                .create(&Review::new(product.id, author, "Lovely quality, would buy again.", rating))
                .await?;
            reviews += 1;
        }

        for (s, store_id) in store_ids.iter().enumerate() {
            let amount = ((idx * 7 + s * 13) % 40) as i32;
            db.warehouse()
                .create(&Warehouse::new(product.id, *store_id, amount))
                .await?;
        }
    }

    info!(reviews, stock_rows = products.len() * store_ids.len(), "Product details seeded");
    println!("✓ specifications, {reviews} reviews, warehouse stock");
    Ok(())
}

async fn seed_blog(db: &Database) -> Result<usize, Box<dyn std::error::Error>> {
    let mut posts = 0;

    for (category, subs) in BLOG_CATEGORIES {
        let category_id = db.blog_categories().create(&BlogCategory::new(*category)).await?;

        for sub in subs.iter() {
            let sub_id = db
                .blog_subcategories()
                .create(&BlogSubcategory::new(category_id, *sub))
                .await?;

            let cover = db
                .assets()
                .insert(Asset::new(Asset::generate_id(), format!("/media/blog/{sub_id}.jpg")))
                .await?;

            let mut post = Blog::new(
                format!("{sub}: five ideas"),
                format!("Our {} picks", sub.to_lowercase()),
                sub_id,
                format!("<h1>{sub}</h1><p>Five ideas for a cosier home.</p>"),
            );
            post.image_asset_id = Some(cover.id);
            db.blogs().create(&post).await?;
            posts += 1;
        }
    }

    println!("✓ {posts} blog posts");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_products_propagates_insert_failure() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        {
            let mut conn = db.acquire().await.unwrap();
            sqlx::raw_sql("DROP TABLE products").execute(&mut *conn).await.unwrap();
        }

        let result = seed_products(&db, &[1], &[(1, "Sofas")], 2).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_seed_products_generates_linked_rows() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let brands = seed_brands(&db).await.unwrap();
        let subcategories = seed_taxonomy(&db).await.unwrap();

        let products = seed_products(&db, &brands, &subcategories[..1], 3).await.unwrap();
        assert_eq!(products.len(), 3);
        assert!(products[0].is_discount);
        assert!(products.iter().all(|p| p.image_asset_id.is_some()));
        assert_eq!(db.products().get_all().await.unwrap(), products);
    }
}
