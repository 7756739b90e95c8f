use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::orders::{CreateOrderRequest, UpdateOrderRequest},
    entity::{
        customers::Entity as Customers,
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::Entity as Products,
    },
    error::{AppError, AppResult, map_reference},
    models::{Customer, Order, OrderItemLine, OrderLabel, OrderWithItems, to_cents},
    query::{OrderListQuery, SortOrder},
    response::{Meta, Page},
    state::AppState,
};

pub async fn create_order(state: &AppState, payload: CreateOrderRequest) -> AppResult<Order> {
    let new = payload.validate()?;

    let txn = state.orm.begin().await?;

    ensure_customer(&txn, new.customer_id).await?;

    let order = OrderActive {
        id: NotSet,
        customer_id: Set(new.customer_id),
        date_ordered: Set(Utc::now().into()),
        completed: Set(new.completed),
    }
    .insert(&txn)
    .await
    .map_err(|err| map_reference(err, "customer_id", new.customer_id))?;

    txn.commit().await?;

    tracing::info!(order_id = order.id, customer_id = order.customer_id, "order created");
    Ok(order.into())
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<Order> {
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Order::from)
        .ok_or(AppError::not_found("order", id))
}

pub async fn list_orders(state: &AppState, query: OrderListQuery) -> AppResult<Page<Order>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(customer_id) = query.customer_id {
        condition = condition.add(OrderCol::CustomerId.eq(customer_id));
    }
    if let Some(completed) = query.completed {
        condition = condition.add(OrderCol::Completed.eq(completed));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder
            .order_by_asc(OrderCol::DateOrdered)
            .order_by_asc(OrderCol::Id),
        SortOrder::Desc => finder
            .order_by_desc(OrderCol::DateOrdered)
            .order_by_desc(OrderCol::Id),
    };

    let total = finder.clone().count(&state.orm).await?;

    let orders = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(Page::new(orders, Meta::new(page, limit, total)))
}

/// `date_ordered` is never touched.
pub async fn update_order(
    state: &AppState,
    id: i32,
    payload: UpdateOrderRequest,
) -> AppResult<Order> {
    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::not_found("order", id))?;

    let mut active: OrderActive = existing.into();
    if let Some(customer_id) = payload.customer_id {
        ensure_customer(&txn, customer_id).await?;
        active.customer_id = Set(customer_id);
    }
    if let Some(completed) = payload.completed {
        active.completed = Set(completed);
    }

    let order = active.update(&txn).await.map_err(|err| {
        map_reference(err, "customer_id", payload.customer_id.unwrap_or_default())
    })?;

    txn.commit().await?;

    tracing::info!(order_id = order.id, completed = order.completed, "order updated");
    Ok(order.into())
}

pub async fn mark_completed(state: &AppState, id: i32) -> AppResult<Order> {
    update_order(
        state,
        id,
        UpdateOrderRequest {
            customer_id: None,
            completed: Some(true),
        },
    )
    .await
}

/// Removes the order and all of its lines in one transaction.
pub async fn delete_order(state: &AppState, id: i32) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    if Orders::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::not_found("order", id));
    }

    let items = delete_items_of_orders(&txn, vec![id]).await?;
    Orders::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = id, items_removed = items, "order deleted");
    Ok(())
}

/// The order joined with its customer; its `Display` is
/// `"Order #{id} - {first} {last}"`.
pub async fn order_label(state: &AppState, id: i32) -> AppResult<OrderLabel> {
    let (order, customer) = Orders::find_by_id(id)
        .find_also_related(Customers)
        .one(&state.orm)
        .await?
        .ok_or(AppError::not_found("order", id))?;
    let customer = customer.ok_or(AppError::Reference {
        field: "customer_id",
        id: order.customer_id,
    })?;

    Ok(OrderLabel {
        order: order.into(),
        customer: customer.into(),
    })
}

pub async fn label(state: &AppState, id: i32) -> AppResult<String> {
    Ok(order_label(state, id).await?.to_string())
}

/// The order, its customer and every line priced at the current product price.
pub async fn get_order_with_items(state: &AppState, id: i32) -> AppResult<OrderWithItems> {
    let txn = state.orm.begin().await?;

    let (order, customer) = Orders::find_by_id(id)
        .find_also_related(Customers)
        .one(&txn)
        .await?
        .ok_or(AppError::not_found("order", id))?;
    let customer: Customer = customer
        .ok_or(AppError::Reference {
            field: "customer_id",
            id: order.customer_id,
        })?
        .into();

    let items = load_lines(&txn, id).await?;

    txn.commit().await?;

    let total = to_cents(items.iter().map(OrderItemLine::total).sum());
    Ok(OrderWithItems {
        order: order.into(),
        customer,
        items,
        total,
    })
}

/// Sum of the order's line totals at current product prices.
pub async fn total(state: &AppState, id: i32) -> AppResult<Decimal> {
    if Orders::find_by_id(id).one(&state.orm).await?.is_none() {
        return Err(AppError::not_found("order", id));
    }
    let lines = load_lines(&state.orm, id).await?;
    Ok(to_cents(lines.iter().map(OrderItemLine::total).sum()))
}

async fn load_lines<C: ConnectionTrait>(conn: &C, order_id: i32) -> AppResult<Vec<OrderItemLine>> {
    let rows = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::Id)
        .find_also_related(Products)
        .all(conn)
        .await?;

    rows.into_iter()
        .map(|(item, product)| -> AppResult<OrderItemLine> {
            let product = product.ok_or(AppError::Reference {
                field: "product_id",
                id: item.product_id,
            })?;
            Ok(OrderItemLine {
                item: item.into(),
                product: product.into(),
            })
        })
        .collect()
}

async fn ensure_customer<C: ConnectionTrait>(conn: &C, customer_id: i32) -> AppResult<()> {
    match Customers::find_by_id(customer_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Reference {
            field: "customer_id",
            id: customer_id,
        }),
    }
}

/// Deletes every line belonging to `order_ids`. Returns the number of lines removed.
pub(crate) async fn delete_items_of_orders<C: ConnectionTrait>(
    conn: &C,
    order_ids: Vec<i32>,
) -> Result<u64, DbErr> {
    if order_ids.is_empty() {
        return Ok(0);
    }
    let result = OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Deletes every order owned by the customer and their lines.
/// Returns `(orders_removed, items_removed)`.
pub(crate) async fn delete_orders_of_customer<C: ConnectionTrait>(
    conn: &C,
    customer_id: i32,
) -> Result<(u64, u64), DbErr> {
    let order_ids: Vec<i32> = Orders::find()
        .select_only()
        .column(OrderCol::Id)
        .filter(OrderCol::CustomerId.eq(customer_id))
        .into_tuple()
        .all(conn)
        .await?;

    let items = delete_items_of_orders(conn, order_ids).await?;
    let orders = Orders::delete_many()
        .filter(OrderCol::CustomerId.eq(customer_id))
        .exec(conn)
        .await?;

    tracing::debug!(
        customer_id,
        orders = orders.rows_affected,
        items,
        "cascaded customer delete"
    );
    Ok((orders.rows_affected, items))
}
