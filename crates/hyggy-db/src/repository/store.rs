//! Store descriptor.

use hyggy_core::Store;

use crate::entity::{Column, Entity, RowReader, Value};
use crate::error::StoreResult;

const NAME: usize = 0;
const ADDRESS: usize = 1;
const CITY: usize = 2;

impl Entity for Store {
    type Key = i64;

    const NAME: &'static str = "Store";
    const TABLE: &'static str = "stores";
    const COLUMNS: &'static [Column] = &[
        Column::required("name"),
        Column::nullable("address"),
        Column::nullable("city"),
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
            Value::opt_text(self.address.as_deref()),
            Value::opt_text(self.city.as_deref()),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(Store {
            id: row.key()?,
            name: row.text(NAME)?,
            address: row.opt_text(ADDRESS)?,
            city: row.opt_text(CITY)?,
        })
    }
}
