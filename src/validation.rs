use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AppError, AppResult};

// Dot-atom local part over the RFC 5322 atext set; the domain is either
// `localhost` or dotted labels ending in an alphabetic TLD.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(localhost|([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,})$",
    )
    .expect("email regex compiles")
});

pub const MAX_PERSON_NAME: usize = 100;
pub const MAX_PRODUCT_NAME: usize = 200;
pub const MAX_EMAIL: usize = 254;
pub const MAX_PHONE: usize = 15;

/// decimal(10, 2): eight integer digits, two fractional.
const MAX_PRICE_INTEGER_DIGITS: u32 = 8;

/// A non-blank display name bounded in graphemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    pub fn parse(field: &'static str, value: Option<String>, max_len: usize) -> AppResult<Name> {
        let value = value.ok_or_else(|| AppError::missing(field))?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::missing(field));
        }
        if trimmed.graphemes(true).count() > max_len {
            return Err(AppError::invalid(
                field,
                format!("must be at most {max_len} characters"),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn parse(value: Option<String>) -> AppResult<Email> {
        let value = value.ok_or_else(|| AppError::missing("email"))?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::missing("email"));
        }
        if trimmed.len() > MAX_EMAIL || !EMAIL_RE.is_match(trimmed) {
            return Err(AppError::invalid(
                "email",
                format!("{trimmed} is not a valid email address"),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Blank phones are stored as NULL.
pub fn parse_phone(value: Option<String>) -> AppResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_PHONE {
        return Err(AppError::invalid(
            "phone",
            format!("must be at most {MAX_PHONE} characters"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

pub fn parse_price(value: Option<Decimal>) -> AppResult<Decimal> {
    let mut price = value.ok_or_else(|| AppError::missing("price"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::invalid("price", "must not be negative"));
    }
    price.rescale(2);
    if price.trunc() >= Decimal::from(10_i64.pow(MAX_PRICE_INTEGER_DIGITS)) {
        return Err(AppError::invalid(
            "price",
            "must fit in 10 digits with 2 decimal places",
        ));
    }
    Ok(price)
}

/// Stock defaults to zero when omitted.
pub fn parse_stock(value: Option<i32>) -> AppResult<i32> {
    match value {
        None => Ok(0),
        Some(stock) if stock < 0 => Err(AppError::invalid("stock", "must not be negative")),
        Some(stock) => Ok(stock),
    }
}

/// Quantity defaults to one when omitted; an explicit value must be positive.
pub fn parse_quantity(value: Option<i32>) -> AppResult<i32> {
    match value {
        None => Ok(1),
        Some(quantity) if quantity <= 0 => {
            Err(AppError::invalid("quantity", "must be a positive integer"))
        }
        Some(quantity) => Ok(quantity),
    }
}

pub fn require_id(field: &'static str, value: Option<i32>) -> AppResult<i32> {
    value.ok_or_else(|| AppError::missing(field))
}
