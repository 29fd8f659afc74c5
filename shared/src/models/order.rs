//! Order ("encargo") Model
//!
//! Custom-order tracking. Status transitions drive the fulfillment side
//! effects (stock, notification, invoicing); the legal transitions form a
//! closed table on [`OrderStatus`].

use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    InProduction,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Legal transition table:
    /// pending -> in_production -> ready -> delivered, with cancelled
    /// reachable from any non-terminal state. Forward jumps (e.g. pending ->
    /// delivered) are allowed; moving backwards is not.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, InProduction | Ready | Delivered | Cancelled) => true,
            (InProduction, Ready | Delivered | Cancelled) => true,
            (Ready, Delivered | Cancelled) => true,
            _ => false,
        }
    }
}

/// Delivery method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum DeliveryMethod {
    Pickup,
    Shipping,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    pub delivery_method: DeliveryMethod,
    /// Agreed delivery date (unix millis)
    pub delivery_date: Option<i64>,
    pub total: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item (persisted; authoritative for invoicing)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Product name snapshot at order time
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub notes: Option<String>,
}

/// Line item input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub notes: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub delivery_method: DeliveryMethod,
    pub delivery_date: Option<i64>,
    /// Client-computed total; the server recomputes from the lines and
    /// rejects a mismatch
    pub total: f64,
    pub notes: Option<String>,
    pub items: Vec<OrderItemInput>,
}

/// Update order payload; `items`, when present, replaces all line items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_method: Option<DeliveryMethod>,
    pub delivery_date: Option<i64>,
    pub notes: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
}

/// Order with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_accept_no_transitions() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::InProduction,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn cancel_reachable_from_any_non_terminal_state() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn no_backwards_transitions() {
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::InProduction.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::InProduction));
    }

    #[test]
    fn forward_jumps_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Delivered));
    }
}
