use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::coerce;
use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "coerce::form_i64")]
    pub price: i64,
    #[serde(deserialize_with = "coerce::form_i32")]
    pub discount_percentage: i32,
    #[serde(deserialize_with = "coerce::form_i32")]
    pub stock: i32,
    pub thumbnail: Option<String>,
    // Defaults to "inactive" when omitted.
    pub status: Option<String>,
    // Appended after the highest assigned slot when omitted.
    #[serde(default, deserialize_with = "coerce::form_opt_i32")]
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::form_opt_i64")]
    pub price: Option<i64>,
    #[serde(default, deserialize_with = "coerce::form_opt_i32")]
    pub discount_percentage: Option<i32>,
    #[serde(default, deserialize_with = "coerce::form_opt_i32")]
    pub stock: Option<i32>,
    pub thumbnail: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "coerce::form_opt_i32")]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeMultiType {
    Activate,
    Deactivate,
    DeleteAll,
    Reposition,
}

// For reposition each entry in ids is an "<id>-<position>" pair; for the
// other kinds it is a bare id.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeMultiRequest {
    #[serde(rename = "type")]
    pub kind: ChangeMultiType,
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchFailure {
    pub entry: String,
    pub reason: String,
}

// Entries that cannot be applied land in failures instead of aborting the batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatchReport {
    pub requested: usize,
    pub updated: u64,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilterStatusTally {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

#[derive(Serialize, ToSchema)]
pub struct ProductIndex {
    pub items: Vec<Product>,
    pub filter_status: FilterStatusTally,
    // Trimmed keyword echoed back for the search box, if one was given.
    pub keyword: Option<String>,
}
