use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        products::{ActiveModel, Column, Entity as Products},
    },
    error::{AppError, AppResult},
    models::Product,
    query::{ProductQuery, ProductSortBy, SortOrder},
    response::{Meta, Page},
    state::AppState,
};

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    let new = payload.validate()?;
    let active = ActiveModel {
        id: NotSet,
        name: Set(new.name.into_inner()),
        description: Set(new.description),
        price: Set(new.price),
        stock: Set(new.stock),
        created_at: Set(Utc::now().into()),
    };
    let product = active.insert(&state.orm).await?;

    tracing::info!(product_id = product.id, name = %product.name, "product created");
    Ok(product.into())
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<Product> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Product::from)
        .ok_or(AppError::not_found("product", id))
}

/// First product with exactly this name, if any.
pub async fn find_by_name(state: &AppState, name: &str) -> AppResult<Option<Product>> {
    let product = Products::find()
        .filter(Column::Name.eq(name))
        .order_by_asc(Column::Id)
        .one(&state.orm)
        .await?;
    Ok(product.map(Product::from))
}

pub async fn list_products(state: &AppState, query: ProductQuery) -> AppResult<Page<Product>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(Column::Name.contains(search))
                .add(Column::Description.contains(search)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if query.in_stock {
        condition = condition.add(Column::Stock.gt(0));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col).order_by_asc(Column::Id),
        SortOrder::Desc => finder.order_by_desc(sort_col).order_by_desc(Column::Id),
    };

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(Page::new(items, Meta::new(page, limit, total)))
}

/// `created_at` is never touched. Existing order lines pick up a new price
/// on their next read.
pub async fn update_product(
    state: &AppState,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let changes = payload.validate()?;

    let txn = state.orm.begin().await?;

    let existing = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::not_found("product", id))?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name.into_inner());
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(price) = changes.price {
        active.price = Set(price);
    }
    if let Some(stock) = changes.stock {
        active.stock = Set(stock);
    }

    let product = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(product_id = product.id, "product updated");
    Ok(product.into())
}

/// Removes the product and every order line that references it, in one
/// transaction. Orders themselves are left in place.
pub async fn delete_product(state: &AppState, id: i32) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    if Products::find_by_id(id).one(&txn).await?.is_none() {
        return Err(AppError::not_found("product", id));
    }

    let items = OrderItems::delete_many()
        .filter(OrderItemCol::ProductId.eq(id))
        .exec(&txn)
        .await?;
    Products::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        product_id = id,
        items_removed = items.rows_affected,
        "product deleted"
    );
    Ok(())
}

/// `"{name}"`
pub async fn label(state: &AppState, id: i32) -> AppResult<String> {
    Ok(get_product(state, id).await?.to_string())
}
