use serde::Deserialize;

use crate::{error::AppResult, validation::require_id};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Option<i32>,
    pub completed: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<i32>,
    pub completed: Option<bool>,
}

#[derive(Debug)]
pub struct NewOrder {
    pub customer_id: i32,
    pub completed: bool,
}

impl CreateOrderRequest {
    pub fn validate(self) -> AppResult<NewOrder> {
        Ok(NewOrder {
            customer_id: require_id("customer_id", self.customer_id)?,
            completed: self.completed.unwrap_or(false),
        })
    }
}
