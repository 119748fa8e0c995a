//! # Domain Types
//!
//! Catalog and content entities stored by hyggy-db.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ProductCategory ◄── ProductSubcategory ◄── Product ──► Brand          │
//! │                                               ▲  │                      │
//! │                        ProductSpecification ──┤  └──► Asset (image)     │
//! │                        Review ────────────────┤                         │
//! │                        Warehouse ─────────────┘──► Store                │
//! │                                                                         │
//! │  BlogCategory ◄── BlogSubcategory ◄── Blog ──► Asset (image)           │
//! │                                                                         │
//! │  ──► = foreign key held as a plain id value (no navigation objects)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - Every entity except [`Asset`] carries a store-assigned `i64` id. It is
//!   ignored on create (leave it `0`) and immutable afterwards.
//! - [`Asset`] ids are opaque strings chosen by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Asset
// =============================================================================

/// Metadata for a binary asset (image, document) kept outside the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Asset {
    /// Caller-assigned key.
    pub id: String,
    /// Storage path or URL of the binary.
    pub path: String,
    /// Alternative text for images.
    pub alt: Option<String>,
    /// Free-form type tag ("image/png", "banner", ...).
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
}

impl Asset {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Asset {
            id: id.into(),
            path: path.into(),
            alt: None,
            asset_type: None,
        }
    }

    /// Generates a fresh asset key for callers that do not have one.
    ///
    /// The store never invents asset keys itself.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

// =============================================================================
// Taxonomy
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Brand {
    #[serde(default)]
    pub id: i64,
    pub name: String,
}

impl Brand {
    pub fn new(name: impl Into<String>) -> Self {
        Brand {
            id: 0,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCategory {
    #[serde(default)]
    pub id: i64,
    pub name: String,
}

impl ProductCategory {
    pub fn new(name: impl Into<String>) -> Self {
        ProductCategory {
            id: 0,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSubcategory {
    #[serde(default)]
    pub id: i64,
    /// Parent [`ProductCategory`].
    pub category_id: i64,
    pub name: String,
}

impl ProductSubcategory {
    pub fn new(category_id: i64, name: impl Into<String>) -> Self {
        ProductSubcategory {
            id: 0,
            category_id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BlogCategory {
    #[serde(default)]
    pub id: i64,
    pub name: String,
}

impl BlogCategory {
    pub fn new(name: impl Into<String>) -> Self {
        BlogCategory {
            id: 0,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BlogSubcategory {
    #[serde(default)]
    pub id: i64,
    /// Parent [`BlogCategory`].
    pub blog_category_id: i64,
    pub name: String,
}

impl BlogSubcategory {
    pub fn new(blog_category_id: i64, name: impl Into<String>) -> Self {
        BlogSubcategory {
            id: 0,
            blog_category_id,
            name: name.into(),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// A physical shop holding warehouse stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Store {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl Store {
    pub fn new(name: impl Into<String>) -> Self {
        Store {
            id: 0,
            name: name.into(),
            address: None,
            city: None,
        }
    }
}

// =============================================================================
// Discount Type
// =============================================================================

/// How `Product::discount_amount` is interpreted.
///
/// ## Storage
/// Persisted as an integer code:
/// ```text
/// 0 → Percentage   (amount is a percent of the price, 0..=100)
/// 1 → Fixed        (amount is subtracted from the price)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    /// Integer code written to the `discount_type` column.
    pub const fn code(self) -> i64 {
        match self {
            DiscountType::Percentage => 0,
            DiscountType::Fixed => 1,
        }
    }
}

impl TryFrom<i64> for DiscountType {
    type Error = CoreError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DiscountType::Percentage),
            1 => Ok(DiscountType::Fixed),
            other => Err(CoreError::UnknownDiscountType(other)),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// ## Discount Triad
/// `is_discount` plus the three optional fields `discount_type`,
/// `discount_amount` and `discount_time` describe a discount. They are
/// independent nullable values: a product may be flagged as discounted while
/// any of the three is still unset. Consumers must tolerate that state;
/// [`Product::discounted_price`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    #[serde(default)]
    pub id: i64,

    pub name: String,

    /// Main image ([`Asset`] key).
    pub image_asset_id: Option<String>,

    /// Teaser text shown on listing cards.
    pub short_description: String,

    pub price: Money,

    pub brand_id: i64,

    pub subcategory_id: i64,

    pub is_discount: bool,

    pub discount_type: Option<DiscountType>,

    pub discount_amount: Option<Money>,

    /// When the discount becomes active.
    #[ts(as = "Option<String>")]
    pub discount_time: Option<DateTime<Utc>>,

    /// Long HTML description for the product page.
    #[serde(rename = "fullDescriptionHTML")]
    pub full_description_html: Option<String>,

    /// When the product was added. Written once on create.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl Product {
    /// Creates an undiscounted product stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        short_description: impl Into<String>,
        price: Money,
        brand_id: i64,
        subcategory_id: i64,
    ) -> Self {
        Product {
            id: 0,
            name: name.into(),
            image_asset_id: None,
            short_description: short_description.into(),
            price,
            brand_id,
            subcategory_id,
            is_discount: false,
            discount_type: None,
            discount_amount: None,
            discount_time: None,
            full_description_html: None,
            added_at: Utc::now(),
        }
    }

    /// Price after the discount in effect at `now`.
    ///
    /// ## Rules
    /// ```text
    /// is_discount = false                      → price
    /// discount_type or discount_amount unset   → price (partial triad)
    /// discount_time set and still in future    → price
    /// Percentage(p)                            → price − p% (p clamped 0..=100)
    /// Fixed(a)                                 → price − a (never below 0)
    /// ```
    pub fn discounted_price(&self, now: DateTime<Utc>) -> Money {
        if !self.is_discount {
            return self.price;
        }

        let (Some(kind), Some(amount)) = (self.discount_type, self.discount_amount) else {
            return self.price;
        };

        if matches!(self.discount_time, Some(starts) if starts > now) {
            return self.price;
        }

        match kind {
            DiscountType::Percentage => self.price.apply_percentage_discount(amount.amount()),
            DiscountType::Fixed => self.price.saturating_sub(amount),
        }
    }
}

/// A name/value specification line on a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSpecification {
    #[serde(default)]
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub description: String,
}

impl ProductSpecification {
    pub fn new(product_id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        ProductSpecification {
            id: 0,
            product_id,
            name: name.into(),
            description: description.into(),
        }
    }
}

// =============================================================================
// Review
// =============================================================================

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Review {
    #[serde(default)]
    pub id: i64,
    pub product_id: i64,
    pub author_name: String,
    pub text: String,
    /// 0..=255 scale; `u8` makes an out-of-range rating unrepresentable.
    pub rating: u8,
    /// Written once on create.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        product_id: i64,
        author_name: impl Into<String>,
        text: impl Into<String>,
        rating: u8,
    ) -> Self {
        Review {
            id: 0,
            product_id,
            author_name: author_name.into(),
            text: text.into(),
            rating,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Warehouse
// =============================================================================

/// Stock of one product at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Warehouse {
    #[serde(default)]
    pub id: i64,
    pub product_id: i64,
    pub store_id: i64,
    pub amount: i32,
}

impl Warehouse {
    pub fn new(product_id: i64, store_id: i64, amount: i32) -> Self {
        Warehouse {
            id: 0,
            product_id,
            store_id,
            amount,
        }
    }
}

// =============================================================================
// Blog
// =============================================================================

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Blog {
    #[serde(default)]
    pub id: i64,
    pub image_asset_id: Option<String>,
    pub name: String,
    pub description: String,
    pub subcategory_id: i64,
    #[serde(rename = "fullTextHTML")]
    pub full_text_html: String,
    /// Written once on create.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub edited_at: Option<DateTime<Utc>>,
}

impl Blog {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        subcategory_id: i64,
        full_text_html: impl Into<String>,
    ) -> Self {
        Blog {
            id: 0,
            image_asset_id: None,
            name: name.into(),
            description: description.into(),
            subcategory_id,
            full_text_html: full_text_html.into(),
            created_at: Utc::now(),
            edited_at: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
