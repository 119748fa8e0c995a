//! # Product Descriptors
//!
//! Products and their specification lines.
//!
//! ## Product Row Layout
//! ```text
//! ┌──────────────────────────┬─────────────┬───────────────────────────────┐
//! │ column                   │ SQLite type │ domain                        │
//! ├──────────────────────────┼─────────────┼───────────────────────────────┤
//! │ name                     │ TEXT        │ String                        │
//! │ image_asset_id           │ TEXT NULL   │ Option<String>  (Asset key)   │
//! │ short_description        │ TEXT        │ String                        │
//! │ price                    │ TEXT        │ Money  ("1299.00", exact)     │
//! │ brand_id, subcategory_id │ INTEGER     │ i64                           │
//! │ is_discount              │ INTEGER 0/1 │ bool                          │
//! │ discount_type            │ INTEGER NULL│ Option<DiscountType> (0 / 1)  │
//! │ discount_amount          │ TEXT NULL   │ Option<Money>                 │
//! │ discount_time            │ TEXT NULL   │ Option<DateTime<Utc>>         │
//! │ full_description_html    │ TEXT NULL   │ Option<String>                │
//! │ added_at                 │ TEXT        │ DateTime<Utc> (write-once)    │
//! └──────────────────────────┴─────────────┴───────────────────────────────┘
//! ```
//!
//! The discount fields are stored independently. A row flagged
//! `is_discount = 1` with every discount field NULL is valid.

use hyggy_core::{DiscountType, Product, ProductSpecification};

use crate::entity::{Column, Entity, RowReader, Value};
use crate::error::StoreResult;

// Column indexes into `Product::COLUMNS`
const NAME: usize = 0;
const IMAGE_ASSET_ID: usize = 1;
const SHORT_DESCRIPTION: usize = 2;
const PRICE: usize = 3;
const BRAND_ID: usize = 4;
const SUBCATEGORY_ID: usize = 5;
const IS_DISCOUNT: usize = 6;
const DISCOUNT_TYPE: usize = 7;
const DISCOUNT_AMOUNT: usize = 8;
const DISCOUNT_TIME: usize = 9;
const FULL_DESCRIPTION_HTML: usize = 10;
const ADDED_AT: usize = 11;

impl Entity for Product {
    type Key = i64;

    const NAME: &'static str = "Product";
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [Column] = &[
        Column::required("name"),
        Column::nullable("image_asset_id"),
        Column::required("short_description"),
        Column::required("price"),
        Column::required("brand_id"),
        Column::required("subcategory_id"),
        Column::required("is_discount"),
        Column::nullable("discount_type"),
        Column::nullable("discount_amount"),
        Column::nullable("discount_time"),
        Column::nullable("full_description_html"),
        Column::required("added_at").write_once(),
    ];

    fn key(&self) -> i64 {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = key;
    }

    fn values(&self) -> Vec<Value<'_>> {
        vec![
            Value::text(&self.name),
            Value::opt_text(self.image_asset_id.as_deref()),
            Value::text(&self.short_description),
            Value::Money(Some(self.price)),
            Value::int(self.brand_id),
            Value::int(self.subcategory_id),
            Value::Bool(self.is_discount),
            Value::opt_int(self.discount_type.map(DiscountType::code)),
            Value::Money(self.discount_amount),
            Value::Timestamp(self.discount_time),
            Value::opt_text(self.full_description_html.as_deref()),
            Value::Timestamp(Some(self.added_at)),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        let discount_type = row
            .opt_int::<i64>(DISCOUNT_TYPE)?
            .map(DiscountType::try_from)
            .transpose()?;

        Ok(Product {
            id: row.key()?,
            name: row.text(NAME)?,
            image_asset_id: row.opt_text(IMAGE_ASSET_ID)?,
            short_description: row.text(SHORT_DESCRIPTION)?,
            price: row.money(PRICE)?,
            brand_id: row.int(BRAND_ID)?,
            subcategory_id: row.int(SUBCATEGORY_ID)?,
            is_discount: row.flag(IS_DISCOUNT)?,
            discount_type,
            discount_amount: row.opt_money(DISCOUNT_AMOUNT)?,
            discount_time: row.opt_timestamp(DISCOUNT_TIME)?,
            full_description_html: row.opt_text(FULL_DESCRIPTION_HTML)?,
            added_at: row.timestamp(ADDED_AT)?,
        })
    }
}

// =============================================================================
// Product Specification
// =============================================================================

impl Entity for ProductSpecification {
    type Key = i64;

    const NAME: &'static str = "ProductSpecification";
    const TABLE: &'static str = "product_specifications";
    const COLUMNS: &'static [Column] = &[
        Column::required("product_id"),
        Column::required("name"),
        Column::required("description"),
    ];

    fn key(&self) -> i64 {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = key;
    }

    fn values(&self) -> Vec<Value<'_>> {
        vec![
            Value::int(self.product_id),
            Value::text(&self.name),
            Value::text(&self.description),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(ProductSpecification {
            id: row.key()?,
            product_id: row.int(0)?,
            name: row.text(1)?,
            description: row.text(2)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};
    use hyggy_core::{Brand, Money, ProductCategory, ProductSubcategory};

    async fn setup() -> Database {
        Database::open(&DbConfig::in_memory()).await.unwrap()
    }

    /// Creates Acme and a subcategory, returning their ids.
    async fn seed_refs(db: &Database) -> (i64, i64) {
        let brand = db.brands().create(&Brand::new("Acme")).await.unwrap();
        let category = db
            .product_categories()
            .create(&ProductCategory::new("Furniture"))
            .await
            .unwrap();
        let sub = db
            .product_subcategories()
            .create(&ProductSubcategory::new(category, "Chairs"))
            .await
            .unwrap();
        (brand, sub)
    }

    async fn raw(db: &Database, sql: &str) {
        let mut conn = db.acquire().await.unwrap();
        sqlx::raw_sql(sql).execute(&mut *conn).await.unwrap();
    }

    #[tokio::test]
    async fn test_partially_specified_discount_round_trips() {
        let db = setup().await;
        let (brand, sub) = seed_refs(&db).await;

        let mut widget = Product::new("Widget", "A widget", Money::new(1000, 2), brand, sub);
        widget.is_discount = true;

        let id = db.products().create(&widget).await.unwrap();
        let stored = db.products().get_by_id(&id).await.unwrap().unwrap();

        assert!(stored.is_discount);
        assert_eq!(stored.discount_type, None);
        assert_eq!(stored.discount_amount, None);
        assert_eq!(stored.discount_time, None);
        assert_eq!(stored.brand_id, brand);
        assert_eq!(stored.discounted_price(Utc::now()), stored.price);
    }

    #[tokio::test]
    async fn test_update_to_partial_discount() {
        let db = setup().await;
        let (brand, sub) = seed_refs(&db).await;

        let widget = db
            .products()
            .insert(Product::new("Widget", "A widget", Money::new(1000, 2), brand, sub))
            .await
            .unwrap();
        assert!(!widget.is_discount);

        let mut on_sale = widget.clone();
        on_sale.is_discount = true;
        on_sale.discount_amount = Some(Money::new(200, 2));
        assert_eq!(db.products().update(&on_sale).await.unwrap(), 1);

        let stored = db.products().get_by_id(&widget.id).await.unwrap().unwrap();
        assert!(stored.is_discount);
        assert_eq!(stored.discount_type, None);
        assert_eq!(stored.discount_amount.map(|m| m.to_string()).as_deref(), Some("2.00"));
        assert_eq!(stored.discount_time, None);
        assert_eq!(stored.name, "Widget");
        assert_eq!(stored.price, widget.price);
    }

    #[tokio::test]
    async fn test_full_product_round_trip() {
        let db = setup().await;
        let (brand, sub) = seed_refs(&db).await;

        let mut sofa = Product::new("Sofa", "Three seats", Money::new(129_999, 2), brand, sub);
        sofa.image_asset_id = Some("sofa-main".to_string());
        sofa.is_discount = true;
        sofa.discount_type = Some(DiscountType::Percentage);
        sofa.discount_amount = Some(Money::new(15, 0));
        sofa.discount_time = Some(Utc::now() - Duration::days(1));
        sofa.full_description_html = Some("<p>Deep seats</p>".to_string());

        let sofa = db.products().insert(sofa).await.unwrap();
        let stored = db.products().get_by_id(&sofa.id).await.unwrap().unwrap();

        assert_eq!(stored, sofa);
        assert_eq!(stored.price.to_string(), "1299.99");
        assert_eq!(stored.discounted_price(Utc::now()).to_string(), "1104.99");
    }

    #[tokio::test]
    async fn test_update_isolates_fields_and_keeps_added_at() {
        let db = setup().await;
        let (brand, sub) = seed_refs(&db).await;

        let original = db
            .products()
            .insert(Product::new("Lamp", "Floor lamp", Money::new(49_900, 2), brand, sub))
            .await
            .unwrap();

        let mut changed = original.clone();
        changed.price = Money::new(39_900, 2);
        changed.added_at = original.added_at + Duration::days(30);
        assert_eq!(db.products().update(&changed).await.unwrap(), 1);

        let stored = db.products().get_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.price, Money::new(39_900, 2));
        assert_eq!(stored.added_at, original.added_at);
        assert_eq!(stored.name, original.name);
        assert_eq!(stored.short_description, original.short_description);
    }

    #[tokio::test]
    async fn test_dangling_reference_is_representable() {
        let db = setup().await;

        let orphan = Product::new("Orphan", "No brand", Money::new(100, 2), 404, 404);
        let id = db.products().create(&orphan).await.unwrap();

        let stored = db.products().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.brand_id, 404);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced_when_enabled() {
        let db = Database::open(&DbConfig::in_memory().foreign_keys(true))
            .await
            .unwrap();

        let orphan = Product::new("Orphan", "No brand", Money::new(100, 2), 404, 404);
        let err = db.products().create(&orphan).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_unknown_discount_code_is_integrity_error() {
        let db = setup().await;
        let (brand, sub) = seed_refs(&db).await;
        let id = db
            .products()
            .create(&Product::new("Chair", "Oak", Money::new(5000, 2), brand, sub))
            .await
            .unwrap();

        raw(&db, &format!("UPDATE products SET discount_type = 7 WHERE id = {id}")).await;

        let err = db.products().get_by_id(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::DataIntegrity(_)));
    }

    #[tokio::test]
    async fn test_unparseable_price_is_integrity_error() {
        let db = setup().await;
        let (brand, sub) = seed_refs(&db).await;
        let id = db
            .products()
            .create(&Product::new("Table", "Pine", Money::new(20_000, 2), brand, sub))
            .await
            .unwrap();

        raw(&db, &format!("UPDATE products SET price = 'cheap' WHERE id = {id}")).await;

        let err = db.products().get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::DataIntegrity(_)));
        assert!(err.to_string().contains("Product.price"));
    }

    #[tokio::test]
    async fn test_specifications_follow_product() {
        let db = setup().await;
        let (brand, sub) = seed_refs(&db).await;
        let product = db
            .products()
            .create(&Product::new("Bed", "Queen", Money::new(300_000, 2), brand, sub))
            .await
            .unwrap();

        let specs = db.product_specifications();
        let width = specs
            .insert(ProductSpecification::new(product, "Width", "160 cm"))
            .await
            .unwrap();
        specs
            .create(&ProductSpecification::new(product, "Material", "Oak"))
            .await
            .unwrap();

        assert_eq!(specs.get_all().await.unwrap().len(), 2);

        // Deleting the product does not cascade.
        db.products().delete(&product).await.unwrap();
        assert_eq!(specs.get_by_id(&width.id).await.unwrap(), Some(width));
    }
}
