//! # Blog Descriptor
//!
//! `created_at` is written once by `create`. `edited_at` is an ordinary
//! nullable column: `update` writes whatever the caller set, the store does
//! not stamp it.

use hyggy_core::Blog;

use crate::entity::{Column, Entity, RowReader, Value};
use crate::error::StoreResult;

const IMAGE_ASSET_ID: usize = 0;
const NAME: usize = 1;
const DESCRIPTION: usize = 2;
const SUBCATEGORY_ID: usize = 3;
const FULL_TEXT_HTML: usize = 4;
const CREATED_AT: usize = 5;
const EDITED_AT: usize = 6;

impl Entity for Blog {
    type Key = i64;

    const NAME: &'static str = "Blog";
    const TABLE: &'static str = "blogs";
    const COLUMNS: &'static [Column] = &[
        Column::nullable("image_asset_id"),
        Column::required("name"),
        Column::required("description"),
        Column::required("subcategory_id"),
        Column::required("full_text_html"),
        Column::required("created_at").write_once(),
        Column::nullable("edited_at"),
    ];

    fn key(&self) -> i64 {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = key;
    }

    fn values(&self) -> Vec<Value<'_>> {
        vec![
            Value::opt_text(self.image_asset_id.as_deref()),
            Value::text(&self.name),
            Value::text(&self.description),
            Value::int(self.subcategory_id),
            Value::text(&self.full_text_html),
            Value::Timestamp(Some(self.created_at)),
            Value::Timestamp(self.edited_at),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(Blog {
            id: row.key()?,
            image_asset_id: row.opt_text(IMAGE_ASSET_ID)?,
            name: row.text(NAME)?,
            description: row.text(DESCRIPTION)?,
            subcategory_id: row.int(SUBCATEGORY_ID)?,
            full_text_html: row.text(FULL_TEXT_HTML)?,
            created_at: row.timestamp(CREATED_AT)?,
            edited_at: row.opt_timestamp(EDITED_AT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_blog_edit_keeps_created_at() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();

        let post = db
            .blogs()
            .insert(Blog::new("Hygge at home", "Ten ideas", 1, "<h1>Hygge</h1>"))
            .await
            .unwrap();
        let stored = db.blogs().get_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(stored, post);
        assert_eq!(stored.edited_at, None);

        let mut edited = stored.clone();
        edited.full_text_html = "<h1>Hygge, revised</h1>".to_string();
        edited.edited_at = Some(Utc::now());
        edited.created_at = stored.created_at + Duration::hours(5);
        assert_eq!(db.blogs().update(&edited).await.unwrap(), 1);

        let after = db.blogs().get_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(after.full_text_html, "<h1>Hygge, revised</h1>");
        assert_eq!(after.edited_at, edited.edited_at);
        assert_eq!(after.created_at, post.created_at);
        assert_eq!(after.name, post.name);
    }

    #[tokio::test]
    async fn test_large_html_is_stored_verbatim() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let html = "<p>æøå &amp; \"quotes\"</p>".repeat(2_000);

        let id = db
            .blogs()
            .create(&Blog::new("Long read", "Very long", 1, html.clone()))
            .await
            .unwrap();

        let stored = db.blogs().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.full_text_html, html);
    }
}
