use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Meta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl Meta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
        }
    }
}

/// One page of a filtered scan.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, meta: Meta) -> Self {
        Self { items, meta }
    }
}
