use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::order_items::{CreateOrderItemRequest, UpdateOrderItemRequest},
    entity::{
        order_items::{ActiveModel, Column, Entity as OrderItems},
        orders::Entity as Orders,
        products::Entity as Products,
    },
    error::{AppError, AppResult, map_reference},
    models::{OrderItem, OrderItemLine},
    query::OrderItemQuery,
    response::{Meta, Page},
    state::AppState,
};

pub async fn create_order_item(
    state: &AppState,
    payload: CreateOrderItemRequest,
) -> AppResult<OrderItem> {
    let new = payload.validate()?;

    let txn = state.orm.begin().await?;

    if Orders::find_by_id(new.order_id).one(&txn).await?.is_none() {
        return Err(AppError::Reference {
            field: "order_id",
            id: new.order_id,
        });
    }
    ensure_product(&txn, new.product_id).await?;

    let item = ActiveModel {
        id: NotSet,
        order_id: Set(new.order_id),
        product_id: Set(new.product_id),
        quantity: Set(new.quantity),
    }
    .insert(&txn)
    .await
    .map_err(|err| map_reference(err, "order_id", new.order_id))?;

    txn.commit().await?;

    tracing::info!(
        order_item_id = item.id,
        order_id = item.order_id,
        product_id = item.product_id,
        quantity = item.quantity,
        "order item created"
    );
    Ok(item.into())
}

pub async fn get_order_item(state: &AppState, id: i32) -> AppResult<OrderItem> {
    OrderItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(OrderItem::from)
        .ok_or(AppError::not_found("order item", id))
}

/// The line joined with its product as currently stored.
pub async fn get_line(state: &AppState, id: i32) -> AppResult<OrderItemLine> {
    let (item, product) = OrderItems::find_by_id(id)
        .find_also_related(Products)
        .one(&state.orm)
        .await?
        .ok_or(AppError::not_found("order item", id))?;
    let product = product.ok_or(AppError::Reference {
        field: "product_id",
        id: item.product_id,
    })?;

    Ok(OrderItemLine {
        item: item.into(),
        product: product.into(),
    })
}

/// `price * quantity`, reading the product's price on every call.
pub async fn total(state: &AppState, id: i32) -> AppResult<Decimal> {
    Ok(get_line(state, id).await?.total())
}

/// `"{quantity} x {product name}"`
pub async fn label(state: &AppState, id: i32) -> AppResult<String> {
    Ok(get_line(state, id).await?.to_string())
}

pub async fn list_order_items(
    state: &AppState,
    query: OrderItemQuery,
) -> AppResult<Page<OrderItem>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(order_id) = query.order_id {
        condition = condition.add(Column::OrderId.eq(order_id));
    }
    if let Some(product_id) = query.product_id {
        condition = condition.add(Column::ProductId.eq(product_id));
    }

    let finder = OrderItems::find()
        .filter(condition)
        .order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(Page::new(items, Meta::new(page, limit, total)))
}

/// The owning order cannot change; the product and quantity can.
pub async fn update_order_item(
    state: &AppState,
    id: i32,
    payload: UpdateOrderItemRequest,
) -> AppResult<OrderItem> {
    let quantity = payload.validated_quantity()?;

    let txn = state.orm.begin().await?;

    let existing = OrderItems::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::not_found("order item", id))?;

    let mut active: ActiveModel = existing.into();
    if let Some(product_id) = payload.product_id {
        ensure_product(&txn, product_id).await?;
        active.product_id = Set(product_id);
    }
    if let Some(quantity) = quantity {
        active.quantity = Set(quantity);
    }

    let item = active.update(&txn).await.map_err(|err| {
        map_reference(err, "product_id", payload.product_id.unwrap_or_default())
    })?;

    txn.commit().await?;

    tracing::info!(order_item_id = item.id, quantity = item.quantity, "order item updated");
    Ok(item.into())
}

pub async fn delete_order_item(state: &AppState, id: i32) -> AppResult<()> {
    let result = OrderItems::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("order item", id));
    }

    tracing::info!(order_item_id = id, "order item deleted");
    Ok(())
}

async fn ensure_product<C: ConnectionTrait>(conn: &C, product_id: i32) -> AppResult<()> {
    match Products::find_by_id(product_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Reference {
            field: "product_id",
            id: product_id,
        }),
    }
}
