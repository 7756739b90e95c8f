use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::customers::{CreateCustomerRequest, UpdateCustomerRequest},
    entity::customers::{ActiveModel, Column, Entity as Customers},
    error::{AppError, AppResult, map_unique},
    models::Customer,
    query::CustomerQuery,
    response::{Meta, Page},
    services::order_service,
    state::AppState,
};

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<Customer> {
    let new = payload.validate()?;
    let email = new.email.into_inner();

    let txn = state.orm.begin().await?;

    let taken = Customers::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(AppError::Uniqueness {
            field: "email",
            value: email,
        });
    }

    let customer = ActiveModel {
        id: NotSet,
        first_name: Set(new.first_name.into_inner()),
        last_name: Set(new.last_name.into_inner()),
        email: Set(email.clone()),
        phone: Set(new.phone),
        date_joined: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await
    .map_err(|err| map_unique(err, "email", &email))?;

    txn.commit().await?;

    tracing::info!(customer_id = customer.id, "customer created");
    Ok(customer.into())
}

pub async fn get_customer(state: &AppState, id: i32) -> AppResult<Customer> {
    Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Customer::from)
        .ok_or(AppError::not_found("customer", id))
}

pub async fn find_by_email(state: &AppState, email: &str) -> AppResult<Option<Customer>> {
    let customer = Customers::find()
        .filter(Column::Email.eq(email.trim()))
        .one(&state.orm)
        .await?;
    Ok(customer.map(Customer::from))
}

pub async fn list_customers(state: &AppState, query: CustomerQuery) -> AppResult<Page<Customer>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(Column::FirstName.contains(search))
                .add(Column::LastName.contains(search))
                .add(Column::Email.contains(search)),
        );
    }

    let finder = Customers::find()
        .filter(condition)
        .order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Customer::from)
        .collect();

    Ok(Page::new(items, Meta::new(page, limit, total)))
}

/// `date_joined` is never touched.
pub async fn update_customer(
    state: &AppState,
    id: i32,
    payload: UpdateCustomerRequest,
) -> AppResult<Customer> {
    let changes = payload.validate()?;

    let txn = state.orm.begin().await?;

    let existing = Customers::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::not_found("customer", id))?;

    let mut active: ActiveModel = existing.into();
    if let Some(first_name) = changes.first_name {
        active.first_name = Set(first_name.into_inner());
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(last_name.into_inner());
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(phone);
    }

    let mut new_email = None;
    if let Some(email) = changes.email {
        let email = email.into_inner();
        let taken = Customers::find()
            .filter(Column::Email.eq(email.as_str()))
            .filter(Column::Id.ne(id))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(AppError::Uniqueness {
                field: "email",
                value: email,
            });
        }
        active.email = Set(email.clone());
        new_email = Some(email);
    }

    let customer = active.update(&txn).await.map_err(|err| {
        map_unique(err, "email", new_email.as_deref().unwrap_or_default())
    })?;

    txn.commit().await?;

    tracing::info!(customer_id = customer.id, "customer updated");
    Ok(customer.into())
}

/// Removes the customer together with every order it owns and the lines of
/// those orders, in one transaction.
pub async fn delete_customer(state: &AppState, id: i32) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    if Customers::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::not_found("customer", id));
    }

    let (orders, items) = order_service::delete_orders_of_customer(&txn, id).await?;
    Customers::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        customer_id = id,
        orders_removed = orders,
        items_removed = items,
        "customer deleted"
    );
    Ok(())
}

/// `"{first} {last}"`
pub async fn label(state: &AppState, id: i32) -> AppResult<String> {
    Ok(get_customer(state, id).await?.to_string())
}
