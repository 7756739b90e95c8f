use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vape_shop_store::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{customers::CreateCustomerRequest, products::CreateProductRequest},
    services::{customer_service, product_service},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vape_shop_store=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let state = AppState::new(orm);
    let customer_id = ensure_customer(&state, "Ana", "Diaz", "ana@x.com").await?;
    seed_products(&state).await?;

    tracing::info!(customer_id, "seed completed");
    Ok(())
}

async fn ensure_customer(
    state: &AppState,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> anyhow::Result<i32> {
    if let Some(existing) = customer_service::find_by_email(state, email).await? {
        return Ok(existing.id);
    }

    let customer = customer_service::create_customer(
        state,
        CreateCustomerRequest {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            phone: None,
        },
    )
    .await?;
    Ok(customer.id)
}

async fn seed_products(state: &AppState) -> anyhow::Result<()> {
    let products = vec![
        ("Vape Pod", "Refillable pod, 2ml", Decimal::new(999, 2), 50),
        ("Mint Salt 30mg", "Nicotine salt e-liquid, 10ml", Decimal::new(1250, 2), 80),
        ("Mesh Coil 0.8", "Replacement coil, pack of 5", Decimal::new(1499, 2), 40),
        ("Starter Kit", "Battery, pod and USB-C cable", Decimal::new(3500, 2), 15),
    ];

    for (name, description, price, stock) in products {
        if product_service::find_by_name(state, name).await?.is_some() {
            continue;
        }
        product_service::create_product(
            state,
            CreateProductRequest {
                name: Some(name.into()),
                description: Some(description.into()),
                price: Some(price),
                stock: Some(stock),
            },
        )
        .await?;
    }

    tracing::info!("seeded products");
    Ok(())
}
