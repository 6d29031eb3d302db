//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (prodotto)
///
/// Menu administration lives outside the engine; the core only reads prices
/// and categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
}
