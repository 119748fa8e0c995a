//! Warehouse descriptor: stock of one product at one store.

use hyggy_core::Warehouse;

use crate::entity::{Column, Entity, RowReader, Value};
use crate::error::StoreResult;

impl Entity for Warehouse {
    type Key = i64;

    const NAME: &'static str = "Warehouse";
    const TABLE: &'static str = "warehouse";
    const COLUMNS: &'static [Column] = &[
        Column::required("product_id"),
        Column::required("store_id"),
        Column::required("amount"),
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
            Value::int(self.store_id),
            Value::int(self.amount),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(Warehouse {
            id: row.key()?,
            product_id: row.int(0)?,
            store_id: row.int(1)?,
            amount: row.int(2)?,
        })
    }
}
