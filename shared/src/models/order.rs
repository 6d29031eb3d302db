//! Order Model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Order entity (ordine), one per diner under a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Ordering person's display name, `name.surname.birthyear`.
    pub placed_by: String,
    pub reservation_id: i64,
    /// Registered customer, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    /// Set once the order has been billed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<i64>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_id.is_some()
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub reservation_id: i64,
    #[validate(custom(function = validate_display_name))]
    pub placed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

/// Display names follow `name.surname.birthyear`: ASCII letters, a dot,
/// ASCII letters, a dot, exactly four digits. Case-insensitive.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let mut parts = name.split('.');
    let (Some(first), Some(last), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ValidationError::new("display_name"));
    };
    let alpha = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic());
    if alpha(first) && alpha(last) && year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("display_name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_create(placed_by: &str) -> OrderCreate {
        OrderCreate {
            reservation_id: 1,
            placed_by: placed_by.to_string(),
            customer_id: None,
        }
    }

    #[test]
    fn accepts_name_surname_birthyear() {
        assert!(order_create("mario.rossi.1990").validate().is_ok());
        // Case-insensitive.
        assert!(order_create("Mario.Rossi.1985").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_display_names() {
        for bad in [
            "mario.rossi",
            "mario.rossi.90",
            "mario..1990",
            ".rossi.1990",
            "mario.rossi.199O",
            "mario.rossi.1990.jr",
            "mario rossi 1990",
            "",
        ] {
            assert!(order_create(bad).validate().is_err(), "accepted {bad:?}");
        }
    }
}
