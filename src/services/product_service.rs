use uuid::Uuid;

use crate::{
    dto::products::{
        BatchFailure, BatchReport, ChangeMultiRequest, ChangeMultiType, CreateProductRequest,
        FilterStatusTally, ProductIndex, UpdateProductRequest,
    },
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{
        PAGE_SIZE, ProductQuery, ProductSortKey, SearchTerm, SortOrder, paginate, resolve_sort,
    },
    state::AppState,
};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

// Soft-deleted rows are always excluded. The status value is not validated;
// an unknown status matches nothing.
pub fn build_filter(status: Option<&str>, search: Option<&SearchTerm>) -> Condition {
    let mut condition = Condition::all().add(Column::Deleted.eq(false));

    if let Some(status) = status.filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Status.eq(status));
    }

    if let Some(term) = search {
        condition = condition.add(Expr::col(Column::Title).ilike(term.pattern()));
    }

    condition
}

fn sort_column(key: ProductSortKey) -> Column {
    match key {
        ProductSortKey::Position => Column::Position,
        ProductSortKey::Title => Column::Title,
        ProductSortKey::Price => Column::Price,
        ProductSortKey::Stock => Column::Stock,
        ProductSortKey::CreatedAt => Column::CreatedAt,
    }
}

pub async fn index(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductIndex>> {
    let search = SearchTerm::parse(query.keyword.as_deref());
    let condition = build_filter(query.status.as_deref(), search.as_ref());
    let (sort_key, sort_order) = resolve_sort(query.sort_by, query.sort_order);

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_column(sort_key)),
        SortOrder::Desc => finder.order_by_desc(sort_column(sort_key)),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let page = paginate(query.page, total, PAGE_SIZE);

    let items = finder
        .limit(page.limit_items as u64)
        .offset(page.skip as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let filter_status = status_tally(state).await?;

    let data = ProductIndex {
        items,
        filter_status,
        keyword: search.map(|term| term.keyword().to_owned()),
    };
    let meta = Meta::new(page.current_page, page.limit_items, total, page.page_count);
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

// Always global; the active keyword or status filter does not change these.
async fn status_tally(state: &AppState) -> AppResult<FilterStatusTally> {
    let visible = Products::find().filter(Column::Deleted.eq(false));
    let total = visible.clone().count(&state.orm).await? as i64;
    let active = visible
        .clone()
        .filter(Column::Status.eq(STATUS_ACTIVE))
        .count(&state.orm)
        .await? as i64;
    let inactive = visible
        .filter(Column::Status.eq(STATUS_INACTIVE))
        .count(&state.orm)
        .await? as i64;
    Ok(FilterStatusTally {
        total,
        active,
        inactive,
    })
}

async fn find_visible(state: &AppState, id: Uuid) -> AppResult<Product> {
    let product = Products::find_by_id(id)
        .filter(Column::Deleted.eq(false))
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    match product {
        Some(product) => Ok(product),
        None => Err(AppError::NotFound),
    }
}

pub async fn detail(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = find_visible(state, id).await?;
    Ok(ApiResponse::success(
        "Product detail",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn edit_form(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = find_visible(state, id).await?;
    Ok(ApiResponse::success(
        "Edit product",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn create(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let position = match payload.position {
        Some(position) => position,
        None => {
            // Count every row including soft-deleted ones so freed slots are
            // not reused.
            let count_all = Products::find().count(&state.orm).await?;
            count_all as i32 + 1
        }
    };
    let status = payload
        .status
        .unwrap_or_else(|| STATUS_INACTIVE.to_string());

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        description: Set(payload.description),
        price: Set(payload.price),
        discount_percentage: Set(payload.discount_percentage),
        stock: Set(payload.stock),
        thumbnail: Set(payload.thumbnail),
        status: Set(status),
        position: Set(position),
        deleted: NotSet,
        deleted_at: NotSet,
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn edit(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .filter(Column::Deleted.eq(false))
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(product) => product,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(discount) = payload.discount_percentage {
        active.discount_percentage = Set(discount);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(thumbnail) = payload.thumbnail {
        active.thumbnail = Set(Some(thumbnail));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Product updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

// The new status is applied verbatim, with no validation of the value.
pub async fn change_status(
    state: &AppState,
    status: String,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(product) => product,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Status updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn change_multi(
    state: &AppState,
    payload: ChangeMultiRequest,
) -> AppResult<ApiResponse<BatchReport>> {
    let report = match payload.kind {
        ChangeMultiType::Activate => set_status_many(state, &payload.ids, STATUS_ACTIVE).await?,
        ChangeMultiType::Deactivate => {
            set_status_many(state, &payload.ids, STATUS_INACTIVE).await?
        }
        ChangeMultiType::DeleteAll => delete_many(state, &payload.ids).await?,
        ChangeMultiType::Reposition => reposition(state, &payload.ids).await?,
    };

    let message = match payload.kind {
        ChangeMultiType::Activate | ChangeMultiType::Deactivate => {
            format!("Updated status of {} products", report.updated)
        }
        ChangeMultiType::DeleteAll => format!("Deleted {} products", report.updated),
        ChangeMultiType::Reposition => format!("Repositioned {} products", report.updated),
    };

    Ok(ApiResponse::success(message, report, Some(Meta::empty())))
}

pub async fn delete_item(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::update_many()
        .col_expr(Column::Deleted, Expr::value(true))
        .col_expr(Column::DeletedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn parse_ids(entries: &[String], failures: &mut Vec<BatchFailure>) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.trim().parse::<Uuid>() {
            Ok(id) => ids.push(id),
            Err(_) => {
                tracing::debug!(entry = %entry, "skipping unparseable batch entry");
                failures.push(BatchFailure {
                    entry: entry.clone(),
                    reason: "not a valid product id".to_string(),
                });
            }
        }
    }
    ids
}

async fn set_status_many(
    state: &AppState,
    entries: &[String],
    status: &str,
) -> AppResult<BatchReport> {
    let mut failures = Vec::new();
    let ids = parse_ids(entries, &mut failures);

    let mut updated = 0;
    if !ids.is_empty() {
        let result = Products::update_many()
            .col_expr(Column::Status, Expr::value(status))
            .filter(Column::Id.is_in(ids))
            .exec(&state.orm)
            .await?;
        updated = result.rows_affected;
    }

    Ok(BatchReport {
        requested: entries.len(),
        updated,
        failures,
    })
}

async fn delete_many(state: &AppState, entries: &[String]) -> AppResult<BatchReport> {
    let mut failures = Vec::new();
    let ids = parse_ids(entries, &mut failures);

    let mut updated = 0;
    if !ids.is_empty() {
        let result = Products::update_many()
            .col_expr(Column::Deleted, Expr::value(true))
            .col_expr(Column::DeletedAt, Expr::value(Utc::now()))
            .filter(Column::Id.is_in(ids))
            .exec(&state.orm)
            .await?;
        updated = result.rows_affected;
    }

    Ok(BatchReport {
        requested: entries.len(),
        updated,
        failures,
    })
}

// A bad entry or failed update is recorded; the rest of the batch still runs.
async fn reposition(state: &AppState, entries: &[String]) -> AppResult<BatchReport> {
    let mut failures = Vec::new();
    let mut updated = 0u64;

    for entry in entries {
        let (id, position) = match parse_reposition(entry) {
            Ok(pair) => pair,
            Err(reason) => {
                tracing::debug!(entry = %entry, reason = %reason, "skipping reposition entry");
                failures.push(BatchFailure {
                    entry: entry.clone(),
                    reason,
                });
                continue;
            }
        };

        let result = Products::update_many()
            .col_expr(Column::Position, Expr::value(position))
            .filter(Column::Id.eq(id))
            .exec(&state.orm)
            .await;

        match result {
            Ok(done) if done.rows_affected > 0 => updated += 1,
            Ok(_) => failures.push(BatchFailure {
                entry: entry.clone(),
                reason: "no matching product".to_string(),
            }),
            Err(err) => {
                tracing::warn!(entry = %entry, error = %err, "reposition update failed");
                failures.push(BatchFailure {
                    entry: entry.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(BatchReport {
        requested: entries.len(),
        updated,
        failures,
    })
}

// Split on the last hyphen; the id itself contains hyphens.
fn parse_reposition(entry: &str) -> Result<(Uuid, i32), String> {
    let (id, position) = entry
        .trim()
        .rsplit_once('-')
        .ok_or_else(|| "expected an <id>-<position> pair".to_string())?;
    let id = id
        .parse::<Uuid>()
        .map_err(|_| "not a valid product id".to_string())?;
    let position = position
        .parse::<i32>()
        .map_err(|_| "position is not an integer".to_string())?;
    Ok((id, position))
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        title: model.title,
        description: model.description,
        price: model.price,
        discount_percentage: model.discount_percentage,
        stock: model.stock,
        thumbnail: model.thumbnail,
        status: model.status,
        position: model.position,
        deleted: model.deleted,
        deleted_at: model.deleted_at.map(|at| at.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    }
}
