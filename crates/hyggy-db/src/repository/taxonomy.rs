//! # Taxonomy Descriptors
//!
//! Brands plus the two-level product and blog category trees.
//!
//! ```text
//! ProductCategory ◄── ProductSubcategory.category_id
//! BlogCategory    ◄── BlogSubcategory.blog_category_id
//! ```
//!
//! Parent ids are plain values. Deleting a category leaves its subcategories
//! in place.

use hyggy_core::{BlogCategory, BlogSubcategory, Brand, ProductCategory, ProductSubcategory};

use crate::entity::{Column, Entity, RowReader, Value};
use crate::error::StoreResult;

const NAME_ONLY: &[Column] = &[Column::required("name")];

/// Descriptor for `{ id, name }` tables.
macro_rules! named_entity {
    ($ty:ident, $label:literal, $table:literal) => {
        impl Entity for $ty {
            type Key = i64;

            const NAME: &'static str = $label;
            const TABLE: &'static str = $table;
            const COLUMNS: &'static [Column] = NAME_ONLY;

            fn key(&self) -> i64 {
                self.id
            }

            fn set_key(&mut self, key: i64) {
                self.id = key;
            }

            fn values(&self) -> Vec<Value<'_>> {
                vec![Value::text(&self.name)]
            }

            fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
                Ok($ty {
                    id: row.key()?,
                    name: row.text(0)?,
                })
            }
        }
    };
}

named_entity!(Brand, "Brand", "brands");
named_entity!(ProductCategory, "ProductCategory", "product_categories");
named_entity!(BlogCategory, "BlogCategory", "blog_categories");

// =============================================================================
// Subcategories
// =============================================================================

const PARENT: usize = 0;
const NAME: usize = 1;

impl Entity for ProductSubcategory {
    type Key = i64;

    const NAME: &'static str = "ProductSubcategory";
    const TABLE: &'static str = "product_subcategories";
    const COLUMNS: &'static [Column] = &[Column::required("category_id"), Column::required("name")];

    fn key(&self) -> i64 {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = key;
    }

    fn values(&self) -> Vec<Value<'_>> {
        vec![Value::int(self.category_id), Value::text(&self.name)]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(ProductSubcategory {
            id: row.key()?,
            category_id: row.int(PARENT)?,
            name: row.text(NAME)?,
        })
    }
}

impl Entity for BlogSubcategory {
    type Key = i64;

    const NAME: &'static str = "BlogSubcategory";
    const TABLE: &'static str = "blog_subcategories";
    const COLUMNS: &'static [Column] = &[
        Column::required("blog_category_id"),
        Column::required("name"),
    ];

    fn key(&self) -> i64 {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = key;
    }

    fn values(&self) -> Vec<Value<'_>> {
        vec![Value::int(self.blog_category_id), Value::text(&self.name)]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(BlogSubcategory {
            id: row.key()?,
            blog_category_id: row.int(PARENT)?,
            name: row.text(NAME)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> Database {
        Database::open(&DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_brand_lifecycle() {
        let db = setup().await;
        let brands = db.brands();

        let id = brands.create(&Brand::new("Acme")).await.unwrap();
        assert!(id > 0);

        let mut brand = brands.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(brand, Brand { id, name: "Acme".to_string() });

        brand.name = "Acme Nordic".to_string();
        assert_eq!(brands.update(&brand).await.unwrap(), 1);
        assert_eq!(brands.get_by_id(&id).await.unwrap().unwrap().name, "Acme Nordic");

        assert_eq!(brands.delete(&id).await.unwrap(), 1);
        assert_eq!(brands.get_by_id(&id).await.unwrap(), None);
        assert_eq!(brands.delete(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_keys_are_not_reused_after_delete() {
        let db = setup().await;
        let first = db.brands().create(&Brand::new("One")).await.unwrap();
        db.brands().delete(&first).await.unwrap();

        let second = db.brands().create(&Brand::new("Two")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_id() {
        let db = setup().await;
        let brand = Brand {
            id: 999,
            name: "Ignored id".to_string(),
        };

        let id = db.brands().create(&brand).await.unwrap();
        assert_ne!(id, 999);
        assert_eq!(db.brands().get_by_id(&999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_all_returns_each_category_once() {
        let db = setup().await;
        for name in ["Sofas", "Lamps", "Rugs"] {
            db.product_categories()
                .create(&ProductCategory::new(name))
                .await
                .unwrap();
        }

        let all = db.product_categories().get_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Sofas", "Lamps", "Rugs"]);
    }

    #[tokio::test]
    async fn test_subcategories_keep_parent_ids() {
        let db = setup().await;
        let category = db.product_categories().create(&ProductCategory::new("Sofas")).await.unwrap();
        let blog_category = db.blog_categories().create(&BlogCategory::new("Inspiration")).await.unwrap();

        let sub = db
            .product_subcategories()
            .insert(ProductSubcategory::new(category, "Corner sofas"))
            .await
            .unwrap();
        let blog_sub = db
            .blog_subcategories()
            .insert(BlogSubcategory::new(blog_category, "Small spaces"))
            .await
            .unwrap();

        assert_eq!(db.product_subcategories().get_by_id(&sub.id).await.unwrap(), Some(sub));
        assert_eq!(db.blog_subcategories().get_by_id(&blog_sub.id).await.unwrap(), Some(blog_sub));
    }

    #[tokio::test]
    async fn test_deleting_parent_leaves_children() {
        let db = setup().await;
        let category = db.blog_categories().create(&BlogCategory::new("News")).await.unwrap();
        let sub = db
            .blog_subcategories()
            .create(&BlogSubcategory::new(category, "Openings"))
            .await
            .unwrap();

        assert_eq!(db.blog_categories().delete(&category).await.unwrap(), 1);

        let orphan = db.blog_subcategories().get_by_id(&sub).await.unwrap().unwrap();
        assert_eq!(orphan.blog_category_id, category);
    }
}
