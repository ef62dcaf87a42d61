use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

use crate::AppState;
use crate::error::Result;
use crate::item::{Item, ItemFilter, ItemRepository, Page, SortField, SortOrder};
use crate::router::Params;

/// Query string accepted by the listing endpoint. Everything is optional
/// and arrives as text; blank values count as unset.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    category: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    search: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

impl ListQuery {
    /// Split the raw query into filter, sort and page. Numbers that do
    /// not parse are reported as field errors.
    fn into_parts(self) -> Result<(ItemFilter, SortField, SortOrder, Page)> {
        let filter = ItemFilter {
            category: none_if_blank(self.category).filter(|category| category != "all"),
            min_price: parse_number(self.min_price, "minPrice")?,
            max_price: parse_number(self.max_price, "maxPrice")?,
            search: none_if_blank(self.search),
        };

        let sort_field = SortField::parse(self.sort_by.as_deref().unwrap_or_default());
        let sort_order = SortOrder::parse(self.sort_order.as_deref().unwrap_or_default());

        let page = Page::new(
            parse_number(self.page, "page")?.unwrap_or(1),
            parse_number(self.limit, "limit")?.unwrap_or(Page::DEFAULT_SIZE),
        );

        Ok((filter, sort_field, sort_order, page))
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_number<T: FromStr>(value: Option<String>, field: &'static str) -> Result<Option<T>> {
    let Some(value) = none_if_blank(value) else {
        return Ok(None);
    };

    match value.trim().parse() {
        Ok(number) => Ok(Some(number)),
        Err(_) => {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("not_a_number");
            error.message = Some("must be a number".into());
            errors.add(field, error);
            Err(errors.into())
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    current_page: i64,
    total_pages: i64,
    total_items: i64,
    items_per_page: i64,
}

impl Pagination {
    /// An empty catalog pages to zero, everything else rounds up.
    fn new(page: Page, total_items: i64) -> Self {
        Self {
            current_page: page.number,
            // Page::new keeps size in 1..=100.
            total_pages: (total_items + page.size - 1) / page.size,
            total_items,
            items_per_page: page.size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    items: Vec<Item>,
    pagination: Pagination,
    categories: Vec<String>,
}

/// Handler to list the catalog with filters, sorting and pagination.
pub async fn handler(
    State(state): State<AppState>,
    Params(query): Params<ListQuery>,
) -> Result<Json<Response>> {
    let (filter, sort_field, sort_order, page) = query.into_parts()?;

    let repository = ItemRepository::new(state.db.postgres.clone());
    let (items, total_items) = repository.list(&filter, sort_field, sort_order, page).await?;
    let categories = repository.categories().await?;

    Ok(Json(Response {
        items,
        pagination: Pagination::new(page, total_items),
        categories,
    }))
}
