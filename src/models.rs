use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{customers, order_items, orders, products};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub date_ordered: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An order together with the customer that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLabel {
    pub order: Order,
    pub customer: Customer,
}

impl fmt::Display for OrderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{} - {}", self.order.id, self.customer)
    }
}

/// An order line joined with the product it references, as read from the
/// store. `total` uses the product's price at the time of the read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemLine {
    pub item: OrderItem,
    pub product: Product,
}

impl OrderItemLine {
    pub fn total(&self) -> Decimal {
        line_total(self.product.price, self.item.quantity)
    }
}

impl fmt::Display for OrderItemLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.item.quantity, self.product.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub customer: Customer,
    pub items: Vec<OrderItemLine>,
    pub total: Decimal,
}

pub fn line_total(price: Decimal, quantity: i32) -> Decimal {
    to_cents(price * Decimal::from(quantity))
}

/// Fixes the scale at two fractional digits, rounding if needed.
pub fn to_cents(mut amount: Decimal) -> Decimal {
    amount.rescale(2);
    amount
}

impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Customer {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            date_joined: model.date_joined.with_timezone(&Utc),
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Product {
            id: model.id,
            name: model.name,
            description: model.description,
            // sqlite hands decimals back through f64
            price: to_cents(model.price),
            stock: model.stock,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Order {
            id: model.id,
            customer_id: model.customer_id,
            date_ordered: model.date_ordered.with_timezone(&Utc),
            completed: model.completed,
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        OrderItem {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
        }
    }
}
