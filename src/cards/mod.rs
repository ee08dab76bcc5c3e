//! Built-in card sets

pub mod base;
pub mod intrigue;

use crate::loader::{CardCatalog, CatalogBuilder};
use crate::Result;

/// Every built-in card: the base set plus the Intrigue cards
pub fn standard_catalog() -> Result<CardCatalog> {
    CatalogBuilder::new()
        .add_set(base::set())
        .add_set(intrigue::set())
        .build()
}
