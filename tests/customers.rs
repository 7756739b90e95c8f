mod common;

use common::{customer, order, setup_state};
use vape_shop_store::{
    dto::customers::{CreateCustomerRequest, UpdateCustomerRequest},
    error::AppError,
    query::{CustomerQuery, Pagination},
    services::customer_service,
};

#[tokio::test]
async fn duplicate_email_is_rejected_without_inserting() -> anyhow::Result<()> {
    let state = setup_state().await?;
    customer(&state, "Ana", "Diaz", "ana@x.com").await;

    let err = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            first_name: Some("Other".into()),
            last_name: Some("Person".into()),
            email: Some("ana@x.com".into()),
            phone: Some("555-0100".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(
        matches!(err, AppError::Uniqueness { field: "email", .. }),
        "unexpected error: {err:?}"
    );

    let all = customer_service::list_customers(&state, CustomerQuery::default()).await?;
    assert_eq!(all.meta.total, 1);
    assert_eq!(all.items[0].first_name, "Ana");
    Ok(())
}

#[tokio::test]
async fn emails_stay_unique_across_creates_and_updates() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;
    let luis = customer(&state, "Luis", "Mora", "luis@x.com").await;

    let err = customer_service::update_customer(
        &state,
        luis.id,
        UpdateCustomerRequest {
            email: Some("ana@x.com".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Uniqueness { .. }));

    // Re-saving your own email is not a conflict.
    let same = customer_service::update_customer(
        &state,
        ana.id,
        UpdateCustomerRequest {
            email: Some("ana@x.com".into()),
            phone: Some(Some("555-0101".into())),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(same.phone.as_deref(), Some("555-0101"));

    let all = customer_service::list_customers(&state, CustomerQuery::default()).await?;
    let mut emails: Vec<_> = all.items.iter().map(|c| c.email.clone()).collect();
    emails.sort();
    emails.dedup();
    assert_eq!(emails.len(), all.items.len());
    Ok(())
}

#[tokio::test]
async fn missing_required_field_is_named() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let err = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            first_name: Some("Ana".into()),
            last_name: Some("Diaz".into()),
            email: None,
            phone: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "email", .. }));

    let err = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            first_name: None,
            last_name: Some("Diaz".into()),
            email: Some("ana@x.com".into()),
            phone: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "first_name", .. }));

    assert!(customer_service::find_by_email(&state, "ana@x.com").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn date_joined_survives_updates() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;

    let renamed = customer_service::update_customer(
        &state,
        ana.id,
        UpdateCustomerRequest {
            last_name: Some("Díaz".into()),
            ..Default::default()
        },
    )
    .await?;

    assert_eq!(renamed.last_name, "Díaz");
    assert_eq!(renamed.date_joined, ana.date_joined);
    assert_eq!(customer_service::label(&state, ana.id).await?, "Ana Díaz");
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;

    assert!(matches!(
        customer_service::get_customer(&state, 42).await,
        Err(AppError::NotFound { entity: "customer", id: 42 })
    ));
    assert!(matches!(
        customer_service::delete_customer(&state, 42).await,
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        customer_service::update_customer(&state, 42, UpdateCustomerRequest::default()).await,
        Err(AppError::NotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn list_searches_name_and_email() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;
    customer(&state, "Luis", "Mora", "luis@shop.net").await;
    customer(&state, "Marta", "Ruiz", "marta@shop.net").await;

    let by_name = customer_service::list_customers(
        &state,
        CustomerQuery {
            q: Some("Diaz".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_name.meta.total, 1);
    assert_eq!(by_name.items[0].id, ana.id);

    let by_email = customer_service::list_customers(
        &state,
        CustomerQuery {
            q: Some("shop.net".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(by_email.meta.total, 2);
    assert!(by_email.items.iter().all(|c| c.id != ana.id));

    let second_page = customer_service::list_customers(
        &state,
        CustomerQuery {
            pagination: Pagination {
                page: Some(2),
                per_page: Some(2),
            },
            q: None,
        },
    )
    .await?;
    assert_eq!(second_page.meta.total, 3);
    assert_eq!(second_page.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn customer_with_orders_can_still_be_read() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;
    order(&state, ana.id).await;

    let found = customer_service::find_by_email(&state, " ana@x.com ").await?;
    assert_eq!(found.map(|c| c.id), Some(ana.id));
    Ok(())
}

#[tokio::test]
async fn apostrophe_and_localhost_emails_are_accepted() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let oneil = customer(&state, "Sean", "O'Neil", "o'neil@x.com").await;
    let admin = customer(&state, "Shop", "Admin", "admin@localhost").await;

    assert_eq!(oneil.email, "o'neil@x.com");
    assert_eq!(
        customer_service::find_by_email(&state, "admin@localhost").await?.map(|c| c.id),
        Some(admin.id)
    );
    Ok(())
}
