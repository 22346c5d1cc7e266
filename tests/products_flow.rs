use chrono::Utc;
use product_admin_api::{
    db::{create_orm_conn, run_migrations},
    dto::products::{ChangeMultiRequest, ChangeMultiType, CreateProductRequest, UpdateProductRequest},
    entity::products::Entity as Products,
    error::AppError,
    models::Product,
    routes::params::{ProductQuery, ProductSortKey, SortOrder},
    services::product_service,
    state::AppState,
};
use sea_orm::{ConnectionTrait, EntityTrait, Statement};
use serde_json::json;
use uuid::Uuid;

// Integration flow: an admin fills the catalog, filters and searches the
// listing, runs bulk updates, and soft-deletes products.
#[tokio::test]
async fn product_admin_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let started = Utc::now();

    // Create from a form-shaped payload: numerics arrive as strings, status
    // and position are omitted.
    let payload: CreateProductRequest = serde_json::from_value(json!({
        "title": "Classic Tee",
        "description": "Soft cotton tee",
        "price": "24900",
        "discount_percentage": "5",
        "stock": "100",
    }))?;
    let tee = product_service::create(&state, payload)
        .await?
        .data
        .expect("created product");
    assert_eq!(tee.price, 24900);
    assert_eq!(tee.discount_percentage, 5);
    assert_eq!(tee.status, "inactive");
    assert_eq!(tee.position, 1);
    assert!(!tee.deleted);

    let shoe = create_product(&state, "Running Shoe", 150_000, "active", Some(2)).await?;
    let suede = create_product(&state, "Blue Suede Shoe", 220_000, "active", Some(3)).await?;
    let scarf = create_product(&state, "50% Wool Scarf", 30_000, "inactive", Some(4)).await?;

    // Default listing: newest position first, tally counts every visible row.
    let resp = product_service::index(&state, query(None, None, None)).await?;
    let meta = resp.meta.expect("meta");
    assert_eq!(meta.page, Some(1));
    assert_eq!(meta.per_page, Some(20));
    assert_eq!(meta.total, Some(4));
    assert_eq!(meta.page_count, Some(1));
    let data = resp.data.expect("index payload");
    let positions: Vec<i32> = data.items.iter().map(|p| p.position).collect();
    assert_eq!(positions, vec![4, 3, 2, 1]);
    assert_eq!(data.filter_status.total, 4);
    assert_eq!(data.filter_status.active, 2);
    assert_eq!(data.filter_status.inactive, 2);
    assert_eq!(data.keyword, None);

    // Status filter narrows items but not the tally.
    let resp = product_service::index(&state, query(None, Some("active"), None)).await?;
    let data = resp.data.expect("index payload");
    assert_eq!(data.items.len(), 2);
    assert!(data.items.iter().all(|p| p.status == "active"));
    assert_eq!(data.filter_status.total, 4);

    // An unknown status matches nothing instead of failing.
    let resp = product_service::index(&state, query(None, Some("archived"), None)).await?;
    let meta = resp.meta.expect("meta");
    assert_eq!(meta.total, Some(0));
    assert_eq!(meta.page_count, Some(0));
    assert!(resp.data.expect("index payload").items.is_empty());

    // Keyword search is a trimmed, case-insensitive substring match.
    let resp = product_service::index(&state, query(None, None, Some("  shoe "))).await?;
    let data = resp.data.expect("index payload");
    assert_eq!(data.items.len(), 2);
    assert_eq!(data.keyword.as_deref(), Some("shoe"));

    // LIKE metacharacters in the keyword match literally.
    let resp = product_service::index(&state, query(None, None, Some("50%"))).await?;
    let data = resp.data.expect("index payload");
    assert_eq!(data.items.len(), 1);
    assert_eq!(data.items[0].id, scarf.id);

    // Explicit sort pair.
    let resp = product_service::index(
        &state,
        ProductQuery {
            page: None,
            status: None,
            keyword: None,
            sort_by: Some(ProductSortKey::Price),
            sort_order: Some(SortOrder::Asc),
        },
    )
    .await?;
    let items = resp.data.expect("index payload").items;
    assert_eq!(items.first().map(|p| p.id), Some(tee.id));
    assert_eq!(items.last().map(|p| p.id), Some(suede.id));

    // A lone sort key falls back to the default ordering.
    let resp = product_service::index(
        &state,
        ProductQuery {
            page: None,
            status: None,
            keyword: None,
            sort_by: Some(ProductSortKey::Price),
            sort_order: None,
        },
    )
    .await?;
    let items = resp.data.expect("index payload").items;
    assert_eq!(items.first().map(|p| p.position), Some(4));

    // A page past the end is empty, not an error.
    let resp = product_service::index(&state, query(Some(999), None, None)).await?;
    assert!(resp.data.expect("index payload").items.is_empty());
    assert_eq!(resp.meta.expect("meta").page, Some(999));

    // Detail round trip and a missing id.
    let detail = product_service::detail(&state, shoe.id).await?;
    assert_eq!(detail.data.expect("detail").title, "Running Shoe");
    let missing = product_service::detail(&state, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Partial edit from a form-shaped payload keeps the untouched fields.
    let payload: UpdateProductRequest = serde_json::from_value(json!({
        "title": "Classic Tee v2",
        "price": "26900",
    }))?;
    let updated = product_service::edit(&state, tee.id, payload)
        .await?
        .data
        .expect("updated product");
    assert_eq!(updated.title, "Classic Tee v2");
    assert_eq!(updated.price, 26900);
    assert_eq!(updated.description.as_deref(), Some("Soft cotton tee"));
    assert_eq!(updated.discount_percentage, 5);

    // Single status change.
    let changed = product_service::change_status(&state, "inactive".to_string(), shoe.id)
        .await?
        .data
        .expect("changed product");
    assert_eq!(changed.status, "inactive");
    let resp = product_service::index(&state, query(None, None, None)).await?;
    let tally = resp.data.expect("index payload").filter_status;
    assert_eq!(tally.active, 1);
    assert_eq!(tally.inactive, 3);

    // Bulk activate.
    let report = product_service::change_multi(
        &state,
        ChangeMultiRequest {
            kind: ChangeMultiType::Activate,
            ids: vec![tee.id.to_string(), scarf.id.to_string()],
        },
    )
    .await?
    .data
    .expect("batch report");
    assert_eq!(report.requested, 2);
    assert_eq!(report.updated, 2);
    assert!(report.failures.is_empty());
    let resp = product_service::index(&state, query(None, None, None)).await?;
    let tally = resp.data.expect("index payload").filter_status;
    assert_eq!(tally.active, 3);
    assert_eq!(tally.inactive, 1);

    // A malformed id is reported, the rest of the batch still applies.
    let report = product_service::change_multi(
        &state,
        ChangeMultiRequest {
            kind: ChangeMultiType::Deactivate,
            ids: vec!["not-a-uuid".to_string(), tee.id.to_string()],
        },
    )
    .await?
    .data
    .expect("batch report");
    assert_eq!(report.requested, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].entry, "not-a-uuid");

    // Reposition applies per entry and keeps going past bad ones.
    let report = product_service::change_multi(
        &state,
        ChangeMultiRequest {
            kind: ChangeMultiType::Reposition,
            ids: vec![
                format!("{}-10", shoe.id),
                format!("{}-zzz", suede.id),
                format!("{}-5", Uuid::new_v4()),
            ],
        },
    )
    .await?
    .data
    .expect("batch report");
    assert_eq!(report.requested, 3);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failures.len(), 2);
    let moved = product_service::detail(&state, shoe.id)
        .await?
        .data
        .expect("detail");
    assert_eq!(moved.position, 10);

    // Soft delete hides the row but keeps it in the table, stamped.
    product_service::delete_item(&state, scarf.id).await?;
    let gone = product_service::detail(&state, scarf.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));
    let raw = Products::find_by_id(scarf.id)
        .one(&state.orm)
        .await?
        .expect("row kept after soft delete");
    assert!(raw.deleted);
    let deleted_at = raw.deleted_at.expect("deleted_at stamped");
    assert!(deleted_at.with_timezone(&Utc) >= started);
    let resp = product_service::index(&state, query(None, None, None)).await?;
    assert_eq!(resp.meta.expect("meta").total, Some(3));

    // Auto-assigned position counts soft-deleted rows too.
    let belt = create_product(&state, "Canvas Belt", 59_000, "active", None).await?;
    assert_eq!(belt.position, 5);

    // Editing a soft-deleted product reports not found.
    let payload: UpdateProductRequest = serde_json::from_value(json!({"price": 1}))?;
    let result = product_service::edit(&state, scarf.id, payload).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    // Bulk soft delete.
    let report = product_service::change_multi(
        &state,
        ChangeMultiRequest {
            kind: ChangeMultiType::DeleteAll,
            ids: vec![tee.id.to_string(), shoe.id.to_string()],
        },
    )
    .await?
    .data
    .expect("batch report");
    assert_eq!(report.updated, 2);
    let resp = product_service::index(&state, query(None, None, None)).await?;
    let data = resp.data.expect("index payload");
    let titles: Vec<&str> = data.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Canvas Belt", "Blue Suede Shoe"]);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(backend, "TRUNCATE TABLE products"))
        .await?;

    Ok(AppState { orm })
}

async fn create_product(
    state: &AppState,
    title: &str,
    price: i64,
    status: &str,
    position: Option<i32>,
) -> anyhow::Result<Product> {
    let payload = CreateProductRequest {
        title: title.to_string(),
        description: None,
        price,
        discount_percentage: 0,
        stock: 10,
        thumbnail: None,
        status: Some(status.to_string()),
        position,
    };
    let resp = product_service::create(state, payload).await?;
    Ok(resp.data.expect("created product"))
}

fn query(page: Option<i64>, status: Option<&str>, keyword: Option<&str>) -> ProductQuery {
    ProductQuery {
        page,
        status: status.map(str::to_string),
        keyword: keyword.map(str::to_string),
        sort_by: None,
        sort_order: None,
    }
}
