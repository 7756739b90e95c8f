use serde::Deserialize;

use crate::{
    error::AppResult,
    validation::{parse_quantity, require_id},
};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateOrderItemRequest {
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateOrderItemRequest {
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
}

#[derive(Debug)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl CreateOrderItemRequest {
    pub fn validate(self) -> AppResult<NewOrderItem> {
        Ok(NewOrderItem {
            order_id: require_id("order_id", self.order_id)?,
            product_id: require_id("product_id", self.product_id)?,
            quantity: parse_quantity(self.quantity)?,
        })
    }
}

impl UpdateOrderItemRequest {
    /// Returns the validated quantity, if one was given.
    pub fn validated_quantity(&self) -> AppResult<Option<i32>> {
        match self.quantity {
            Some(v) => parse_quantity(Some(v)).map(Some),
            None => Ok(None),
        }
    }
}
