use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::products::{
        BatchReport, ChangeMultiRequest, CreateProductRequest, ProductIndex, UpdateProductRequest,
    },
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/detail/{id}", get(detail))
        .route("/create", get(create_form).post(create))
        .route("/edit/{id}", get(edit_form).post(edit))
        .route("/change-status/{status}/{id}", patch(change_status))
        .route("/change-multi", patch(change_multi))
        .route("/delete/{id}", delete(delete_item))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1; garbage values land on page 1"),
        ("status" = Option<String>, Query, description = "Filter by status, applied verbatim"),
        ("keyword" = Option<String>, Query, description = "Case-insensitive title search"),
        ("sort_by" = Option<String>, Query, description = "Sort key: position, title, price, stock, created_at"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc"),
    ),
    responses(
        (status = 200, description = "List products with status tally", body = ApiResponse<ProductIndex>),
        (status = 400, description = "Unknown sort key or order"),
    ),
    tag = "Products"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductIndex>>> {
    let resp = product_service::index(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/detail/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::detail(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/create",
    responses(
        (status = 200, description = "Blank create form payload"),
    ),
    tag = "Products"
)]
pub async fn create_form() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        "Create product",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/products/create",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Create product", body = ApiResponse<Product>),
        (status = 422, description = "Non-numeric value in a numeric field"),
    ),
    tag = "Products"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::create(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/edit/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Current values for the edit form", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::edit_form(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/edit/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Non-numeric value in a numeric field"),
    ),
    tag = "Products"
)]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::edit(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/products/change-status/{status}/{id}",
    params(
        ("status" = String, Path, description = "New status, applied verbatim"),
        ("id" = Uuid, Path, description = "Product ID"),
    ),
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn change_status(
    State(state): State<AppState>,
    Path((status, id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::change_status(&state, status, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/products/change-multi",
    request_body = ChangeMultiRequest,
    responses(
        (status = 200, description = "Per-entry batch report", body = ApiResponse<BatchReport>),
        (status = 422, description = "Unknown bulk operation type"),
    ),
    tag = "Products"
)]
pub async fn change_multi(
    State(state): State<AppState>,
    Json(payload): Json<ChangeMultiRequest>,
) -> AppResult<Json<ApiResponse<BatchReport>>> {
    let resp = product_service::change_multi(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/delete/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product soft-deleted"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_item(&state, id).await?;
    Ok(Json(resp))
}
