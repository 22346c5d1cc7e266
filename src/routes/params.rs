use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

pub const PAGE_SIZE: i64 = 20;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<i64>,
    pub status: Option<String>,
    pub keyword: Option<String>,
    pub sort_by: Option<ProductSortKey>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub skip: i64,
    pub limit_items: i64,
    pub current_page: i64,
    pub page_count: i64,
}

// A page past the end yields an empty window, never an error.
pub fn paginate(requested: Option<i64>, total: i64, page_size: i64) -> PageMeta {
    let current_page = requested.filter(|page| *page > 0).unwrap_or(1);
    PageMeta {
        skip: current_page.saturating_sub(1).saturating_mul(page_size),
        limit_items: page_size,
        current_page,
        page_count: (total + page_size - 1) / page_size,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortKey {
    Position,
    Title,
    Price,
    Stock,
    CreatedAt,
}

// A lone sort key or a lone order falls back to the default ordering.
pub fn resolve_sort(
    key: Option<ProductSortKey>,
    order: Option<SortOrder>,
) -> (ProductSortKey, SortOrder) {
    match (key, order) {
        (Some(key), Some(order)) => (key, order),
        _ => (ProductSortKey::Position, SortOrder::Desc),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    keyword: String,
    pattern: String,
}

impl SearchTerm {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let keyword = raw?.trim();
        if keyword.is_empty() {
            return None;
        }
        Some(Self {
            keyword: keyword.to_owned(),
            pattern: format!("%{}%", escape_like(keyword)),
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

// % and _ are wildcards to LIKE; escape them so the keyword matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// Forms send the page as text; anything that does not parse lands on page one.
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(page)) => Some(page),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
