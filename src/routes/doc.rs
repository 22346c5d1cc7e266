use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::{
        BatchFailure, BatchReport, ChangeMultiRequest, ChangeMultiType, CreateProductRequest,
        FilterStatusTally, ProductIndex, UpdateProductRequest,
    },
    models::Product,
    response::{ApiResponse, Meta},
    routes::{health, params, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::index,
        products::detail,
        products::create_form,
        products::create,
        products::edit_form,
        products::edit,
        products::change_status,
        products::change_multi,
        products::delete_item,
    ),
    components(
        schemas(
            Product,
            CreateProductRequest,
            UpdateProductRequest,
            ChangeMultiRequest,
            ChangeMultiType,
            BatchFailure,
            BatchReport,
            FilterStatusTally,
            ProductIndex,
            params::ProductQuery,
            params::ProductSortKey,
            params::SortOrder,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductIndex>,
            ApiResponse<BatchReport>,
            ApiResponse<health::HealthData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
