//! Order Item Model

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Preparation status of one ordered line item (stato ord_prod).
///
/// `non-in-lavorazione → preparazione → in-consegna → consegnato`, with a
/// send-back edge from `in-consegna` to `non-in-lavorazione`. `consegnato`
/// is terminal. New items always start in `non-in-lavorazione`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "non-in-lavorazione")]
    NotStarted,
    #[serde(rename = "preparazione")]
    InPreparation,
    #[serde(rename = "in-consegna")]
    InDelivery,
    #[serde(rename = "consegnato")]
    Delivered,
}

impl ItemStatus {
    /// The per-item transition table. Everything not listed is invalid.
    pub fn can_transition_to(self, target: ItemStatus) -> bool {
        use ItemStatus::*;
        matches!(
            (self, target),
            (NotStarted, InPreparation)
                | (InPreparation, InDelivery)
                | (InDelivery, Delivered)
                | (InDelivery, NotStarted)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == ItemStatus::Delivered
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::NotStarted => "non-in-lavorazione",
            ItemStatus::InPreparation => "preparazione",
            ItemStatus::InDelivery => "in-consegna",
            ItemStatus::Delivered => "consegnato",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered line item entity (ord_prod)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Split-the-bill item ("alla romana"): divided across the whole party.
    pub shared: bool,
    pub status: ItemStatus,
}

/// One entry of a batch line-item creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    #[serde(default)]
    pub shared: bool,
}

/// Line item joined with its product, for dashboards and billing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    pub id: i64,
    pub order_id: i64,
    pub shared: bool,
    pub status: ItemStatus,
    pub product: Product,
}
