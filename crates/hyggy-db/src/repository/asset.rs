//! # Asset Descriptor
//!
//! Assets are the only entity whose key is chosen by the caller. The store
//! never generates one; [`Asset::generate_id`] exists for callers that need a
//! fresh key.

use hyggy_core::Asset;

use crate::entity::{Column, Entity, KeyStrategy, RowReader, Value};
use crate::error::StoreResult;

const PATH: usize = 0;
const ALT: usize = 1;
const TYPE: usize = 2;

impl Entity for Asset {
    type Key = String;

    const NAME: &'static str = "Asset";
    const TABLE: &'static str = "assets";
    const KEY_STRATEGY: KeyStrategy = KeyStrategy::ExternallyAssigned;
    const COLUMNS: &'static [Column] = &[
        Column::required("path"),
        Column::nullable("alt"),
        Column::nullable("type"),
    ];

    fn key(&self) -> String {
        self.id.clone()
    }

    fn set_key(&mut self, key: String) {
        self.id = key;
    }

    fn values(&self) -> Vec<Value<'_>> {
        vec![
            Value::text(&self.path),
            Value::opt_text(self.alt.as_deref()),
            Value::opt_text(self.asset_type.as_deref()),
        ]
    }

    fn from_row(row: &RowReader<'_>) -> StoreResult<Self> {
        Ok(Asset {
            id: row.key()?,
            path: row.text(PATH)?,
            alt: row.opt_text(ALT)?,
            asset_type: row.opt_text(TYPE)?,
        })
    }
}
