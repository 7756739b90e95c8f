#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use vape_shop_store::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        customers::CreateCustomerRequest, order_items::CreateOrderItemRequest,
        orders::CreateOrderRequest, products::CreateProductRequest,
    },
    models::{Customer, Order, OrderItem, Product},
    services::{customer_service, order_item_service, order_service, product_service},
    state::AppState,
};

/// Each call gets a fresh in-memory sqlite database unless TEST_DATABASE_URL
/// points somewhere else, in which case the tables are emptied first
/// (run with `--test-threads=1` against a shared database).
pub async fn setup_state() -> anyhow::Result<AppState> {
    let database_url =
        std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let orm = create_orm_conn(&AppConfig::with_url(database_url)).await?;
    run_migrations(&orm).await?;

    if orm.get_database_backend() == DbBackend::Postgres {
        orm.execute(Statement::from_string(
            DbBackend::Postgres,
            "TRUNCATE TABLE order_items, orders, products, customers RESTART IDENTITY CASCADE",
        ))
        .await?;
    }

    Ok(AppState::new(orm))
}

pub async fn customer(state: &AppState, first: &str, last: &str, email: &str) -> Customer {
    customer_service::create_customer(
        state,
        CreateCustomerRequest {
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            email: Some(email.into()),
            phone: None,
        },
    )
    .await
    .expect("customer is created")
}

pub async fn product(state: &AppState, name: &str, price: Decimal, stock: i32) -> Product {
    product_service::create_product(
        state,
        CreateProductRequest {
            name: Some(name.into()),
            description: None,
            price: Some(price),
            stock: Some(stock),
        },
    )
    .await
    .expect("product is created")
}

pub async fn order(state: &AppState, customer_id: i32) -> Order {
    order_service::create_order(
        state,
        CreateOrderRequest {
            customer_id: Some(customer_id),
            completed: None,
        },
    )
    .await
    .expect("order is created")
}

pub async fn item(state: &AppState, order_id: i32, product_id: i32, quantity: i32) -> OrderItem {
    order_item_service::create_order_item(
        state,
        CreateOrderItemRequest {
            order_id: Some(order_id),
            product_id: Some(product_id),
            quantity: Some(quantity),
        },
    )
    .await
    .expect("order item is created")
}

/// Cents to a two-place decimal.
pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
