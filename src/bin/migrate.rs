use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vape_shop_store::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
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
    run_migrations(&orm).await?;
    tracing::info!("migrations applied");
    Ok(())
}
