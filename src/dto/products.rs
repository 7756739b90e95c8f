use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    error::AppResult,
    validation::{MAX_PRODUCT_NAME, Name, parse_price, parse_stock},
};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

#[derive(Debug)]
pub struct NewProduct {
    pub name: Name,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

#[derive(Debug, Default)]
pub struct ProductChanges {
    pub name: Option<Name>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
}

impl CreateProductRequest {
    pub fn validate(self) -> AppResult<NewProduct> {
        Ok(NewProduct {
            name: Name::parse("name", self.name, MAX_PRODUCT_NAME)?,
            description: self.description.unwrap_or_default(),
            price: parse_price(self.price)?,
            stock: parse_stock(self.stock)?,
        })
    }
}

impl UpdateProductRequest {
    pub fn validate(self) -> AppResult<ProductChanges> {
        let name = match self.name {
            Some(v) => Some(Name::parse("name", Some(v), MAX_PRODUCT_NAME)?),
            None => None,
        };
        let price = match self.price {
            Some(v) => Some(parse_price(Some(v))?),
            None => None,
        };
        let stock = match self.stock {
            Some(v) => Some(parse_stock(Some(v))?),
            None => None,
        };
        Ok(ProductChanges {
            name,
            description: self.description,
            price,
            stock,
        })
    }
}
