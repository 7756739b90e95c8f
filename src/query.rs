use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Pagination {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl Pagination {
    /// Returns `(page, per_page, offset)` with page >= 1 and per_page in 1..=100.
    pub fn normalize(&self) -> (u64, u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CustomerQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    /// Matches first name, last name or email.
    pub q: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub in_stock: bool,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub customer_id: Option<i32>,
    pub completed: Option<bool>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderItemQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: None,
        };
        assert_eq!(p.normalize(), (3, 20, 40));
    }

    #[test]
    fn product_query_reads_flattened_pagination() {
        let q: ProductQuery = serde_json::from_value(serde_json::json!({
            "page": 2,
            "per_page": 5,
            "q": "pod",
            "sort_by": "price",
            "sort_order": "asc"
        }))
        .unwrap();
        assert_eq!(q.pagination.normalize(), (2, 5, 5));
        assert!(matches!(q.sort_by, Some(ProductSortBy::Price)));
        assert!(!q.in_stock);
    }
}
