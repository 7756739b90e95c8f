mod common;

use common::{customer, item, money, order, product, setup_state};
use vape_shop_store::{
    error::AppError,
    query::{OrderItemQuery, OrderListQuery},
    services::{customer_service, order_item_service, order_service, product_service},
};

#[tokio::test]
async fn deleting_a_customer_removes_its_orders_and_their_lines() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;
    let luis = customer(&state, "Luis", "Mora", "luis@x.com").await;
    let pod = product(&state, "Vape Pod", money(999), 50).await;

    let first = order(&state, ana.id).await;
    let second = order(&state, ana.id).await;
    let kept = order(&state, luis.id).await;
    item(&state, first.id, pod.id, 1).await;
    item(&state, second.id, pod.id, 2).await;
    let kept_item = item(&state, kept.id, pod.id, 4).await;

    customer_service::delete_customer(&state, ana.id).await?;

    let orders = order_service::list_orders(&state, OrderListQuery::default()).await?;
    assert_eq!(orders.meta.total, 1);
    assert_eq!(orders.items[0].id, kept.id);

    let items = order_item_service::list_order_items(&state, OrderItemQuery::default()).await?;
    assert_eq!(items.meta.total, 1);
    assert_eq!(items.items[0].id, kept_item.id);

    assert!(matches!(
        order_service::get_order(&state, first.id).await,
        Err(AppError::NotFound { .. })
    ));
    assert_eq!(customer_service::get_customer(&state, luis.id).await?.id, luis.id);
    Ok(())
}

#[tokio::test]
async fn deleting_a_product_removes_only_lines_that_reference_it() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;
    let pod = product(&state, "Vape Pod", money(999), 50).await;
    let coil = product(&state, "Mesh Coil", money(1499), 40).await;

    let basket = order(&state, ana.id).await;
    item(&state, basket.id, pod.id, 1).await;
    let coil_line = item(&state, basket.id, coil.id, 2).await;

    product_service::delete_product(&state, pod.id).await?;

    let remaining = order_item_service::list_order_items(
        &state,
        OrderItemQuery {
            order_id: Some(basket.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(remaining.items.len(), 1);
    assert_eq!(remaining.items[0].id, coil_line.id);

    // The order outlives the product.
    assert_eq!(order_service::get_order(&state, basket.id).await?.id, basket.id);
    assert_eq!(order_service::total(&state, basket.id).await?, money(2998));
    Ok(())
}

#[tokio::test]
async fn deleting_an_order_removes_its_lines_but_not_products() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;
    let pod = product(&state, "Vape Pod", money(999), 50).await;

    let gone = order(&state, ana.id).await;
    let other = order(&state, ana.id).await;
    item(&state, gone.id, pod.id, 3).await;
    let other_line = item(&state, other.id, pod.id, 1).await;

    order_service::delete_order(&state, gone.id).await?;

    let items = order_item_service::list_order_items(
        &state,
        OrderItemQuery {
            product_id: Some(pod.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(items.items.len(), 1);
    assert_eq!(items.items[0].id, other_line.id);

    let pod_after = product_service::get_product(&state, pod.id).await?;
    assert_eq!(pod_after.stock, 50);
    assert_eq!(customer_service::get_customer(&state, ana.id).await?.id, ana.id);
    Ok(())
}

#[tokio::test]
async fn deleting_twice_reports_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ana = customer(&state, "Ana", "Diaz", "ana@x.com").await;
    let pod = product(&state, "Vape Pod", money(999), 50).await;
    let basket = order(&state, ana.id).await;
    let line = item(&state, basket.id, pod.id, 1).await;

    order_item_service::delete_order_item(&state, line.id).await?;
    assert!(matches!(
        order_item_service::delete_order_item(&state, line.id).await,
        Err(AppError::NotFound { entity: "order item", .. })
    ));

    product_service::delete_product(&state, pod.id).await?;
    assert!(matches!(
        product_service::delete_product(&state, pod.id).await,
        Err(AppError::NotFound { entity: "product", .. })
    ));

    order_service::delete_order(&state, basket.id).await?;
    assert!(matches!(
        order_service::delete_order(&state, basket.id).await,
        Err(AppError::NotFound { entity: "order", .. })
    ));
    Ok(())
}
