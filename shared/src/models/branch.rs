//! Branch Model

use serde::{Deserialize, Serialize};

/// Restaurant branch entity (filiale)
///
/// Managed by administrative CRUD outside the engine; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub town: String,
    pub address: String,
    /// Physical table units the branch owns. Always ≥ 1.
    pub table_count: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
