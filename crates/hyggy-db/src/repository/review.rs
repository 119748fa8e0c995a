//! Review descriptor.
//!
//! `rating` is stored as INTEGER and read back into `u8`; `created_at` is
//! written once.

use hyggy_core::Review;

use crate::entity::{Column, Entity, RowReader, Value};
use crate::error::StoreResult;

const PRODUCT_ID: usize = 0;
const AUTHOR_NAME: usize = 1;
const TEXT: usize = 2;
const RATING: usize = 3;
const CREATED_AT: usize = 4;

impl Entity for Review {
    type Key = i64;

    const NAME: &'static str = "Review";
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [Column] = &[
        Column::required("product_id"),
        Column::required("author_name"),
        Column::required("text"),
        Column::required("rating"),
        Column::required("created_at").write_once(),
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
            Value::text(&self.author_name),
            Value::text(&self.text),
            Value::int(self.rating),
            Value::Timestamp(Some(self.created_at)),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(Review {
            id: row.key()?,
            product_id: row.int(PRODUCT_ID)?,
            author_name: row.text(AUTHOR_NAME)?,
            text: row.text(TEXT)?,
            rating: row.int(RATING)?,
            created_at: row.timestamp(CREATED_AT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    #[tokio::test]
    async fn test_review_round_trip_and_write_once_timestamp() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();

        let review = db
            .reviews()
            .insert(Review::new(1, "Freja", "Comfortable and sturdy", 255))
            .await
            .unwrap();
        assert_eq!(db.reviews().get_by_id(&review.id).await.unwrap(), Some(review.clone()));

        let mut edited = review.clone();
        edited.rating = 4;
        edited.created_at = review.created_at - Duration::days(365);
        assert_eq!(db.reviews().update(&edited).await.unwrap(), 1);

        let stored = db.reviews().get_by_id(&review.id).await.unwrap().unwrap();
        assert_eq!(stored.rating, 4);
        assert_eq!(stored.created_at, review.created_at);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_integrity_error() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let id = db
            .reviews()
            .create(&Review::new(1, "Mads", "Fine", 3))
            .await
            .unwrap();

        // Bypass the CHECK constraint the way a legacy table would.
        {
            let mut conn = db.acquire().await.unwrap();
            sqlx::raw_sql(&format!(
                "PRAGMA ignore_check_constraints = ON;
                 UPDATE reviews SET rating = 300 WHERE id = {id};
                 PRAGMA ignore_check_constraints = OFF;"
            ))
            .execute(&mut *conn)
            .await
            .unwrap();
        }

        let err = db.reviews().get_by_id(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::DataIntegrity(_)));
        assert!(err.to_string().contains("Review.rating"));
    }
}
