//! Handle database requests for the catalog.

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::Result;
use crate::item::{Item, NewItem};

/// Filters applied to a catalog listing.
///
/// Text filters are case-insensitive substring matches; price bounds
/// are inclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
}

/// Columns a listing may be sorted by.
///
/// Anything else coming from the query string falls back to
/// [`SortField::CreatedAt`], so user input never reaches the SQL text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SortField {
    Name,
    Price,
    Category,
    Stock,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "name" => Self::Name,
            "price" => Self::Price,
            "category" => Self::Category,
            "stock" => Self::Stock,
            "updatedAt" => Self::UpdatedAt,
            _ => Self::CreatedAt,
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SortField::Name => write!(f, "name"),
            SortField::Price => write!(f, "price"),
            SortField::Category => write!(f, "category"),
            SortField::Stock => write!(f, "stock"),
            SortField::CreatedAt => write!(f, "created_at"),
            SortField::UpdatedAt => write!(f, "updated_at"),
        }
    }
}

/// Direction of a sorted listing; anything but `asc` means descending.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// One page of a listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub const DEFAULT_SIZE: i64 = 20;
    pub const MAX_SIZE: i64 = 100;

    /// Page numbers start at 1; sizes are clamped to `1..=100`.
    pub fn new(number: i64, size: i64) -> Self {
        Self {
            number: number.max(1),
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

enum Bind {
    Text(String),
    Amount(Decimal),
}

/// Escape `LIKE` metacharacters so user input only matches literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// WHERE clause plus its bind values, placeholders numbered from `$1`.
fn filter_clause(filter: &ItemFilter) -> (String, Vec<Bind>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    if let Some(category) = &filter.category {
        binds.push(Bind::Text(format!("%{}%", escape_like(category))));
        conditions.push(format!("category ILIKE ${}", binds.len()));
    }
    if let Some(min_price) = filter.min_price {
        binds.push(Bind::Amount(min_price));
        conditions.push(format!("price >= ${}", binds.len()));
    }
    if let Some(max_price) = filter.max_price {
        binds.push(Bind::Amount(max_price));
        conditions.push(format!("price <= ${}", binds.len()));
    }
    if let Some(search) = &filter.search {
        binds.push(Bind::Text(format!("%{}%", escape_like(search))));
        let placeholder = binds.len();
        conditions.push(format!(
            "(name ILIKE ${placeholder} OR description ILIKE ${placeholder})"
        ));
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}

#[derive(Clone)]
pub struct ItemRepository {
    pool: Pool<Postgres>,
}

impl ItemRepository {
    /// Create a new [`ItemRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List one page of items and the total row count for the filter.
    pub async fn list(
        &self,
        filter: &ItemFilter,
        sort_field: SortField,
        sort_order: SortOrder,
        page: Page,
    ) -> Result<(Vec<Item>, i64)> {
        let (clause, binds) = filter_clause(filter);

        let query = format!(
            "SELECT * FROM items{clause} ORDER BY {sort_field} {sort_order} LIMIT {} OFFSET {}",
            page.size,
            page.offset(),
        );
        let mut items = sqlx::query_as::<_, Item>(&query);
        for bind in &binds {
            items = match bind {
                Bind::Text(value) => items.bind(value.clone()),
                Bind::Amount(value) => items.bind(*value),
            };
        }
        let items = items.fetch_all(&self.pool).await?;

        let query = format!("SELECT COUNT(*) FROM items{clause}");
        let mut total = sqlx::query_scalar::<_, i64>(&query);
        for bind in &binds {
            total = match bind {
                Bind::Text(value) => total.bind(value.clone()),
                Bind::Amount(value) => total.bind(*value),
            };
        }
        let total = total.fetch_one(&self.pool).await?;

        Ok((items, total))
    }

    /// Distinct categories over the whole catalog.
    pub async fn categories(&self) -> Result<Vec<String>> {
        Ok(
            sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM items ORDER BY category")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Find an item using `id` field.
    pub async fn find_by_id(&self, item_id: Uuid) -> Result<Option<Item>> {
        Ok(sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Find every item whose id is in `ids`.
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Item>> {
        Ok(
            sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ANY($1)")
                .bind(ids.to_vec())
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Insert a new item, returning the stored row.
    pub async fn insert(&self, item: &NewItem) -> Result<Item> {
        Ok(sqlx::query_as::<_, Item>(
            r#"INSERT INTO items (id, name, description, price, category, image, in_stock, stock)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.in_stock)
        .bind(item.stock)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Overwrite every mutable column of an item, returning the stored row.
    pub async fn update(&self, item: &Item) -> Result<Option<Item>> {
        Ok(sqlx::query_as::<_, Item>(
            r#"UPDATE items
                SET name = $1, description = $2, price = $3, category = $4, image = $5,
                    in_stock = $6, stock = $7, updated_at = NOW()
                WHERE id = $8
                RETURNING *"#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.in_stock)
        .bind(item.stock)
        .bind(item.id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Delete an item using `id` field.
    pub async fn delete(&self, item_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Lowest and highest price over the whole catalog; `(0, 0)` when empty.
    pub async fn price_range(&self) -> Result<(Decimal, Decimal)> {
        let (min, max) = sqlx::query_as::<_, (Option<Decimal>, Option<Decimal>)>(
            "SELECT MIN(price), MAX(price) FROM items",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((min.unwrap_or(Decimal::ZERO), max.unwrap_or(Decimal::ZERO)))
    }

    /// Number of items on the catalog.
    pub async fn count(&self) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn filter_clause_empty_without_filters() {
        let (clause, binds) = filter_clause(&ItemFilter::default());
        assert_eq!(clause, "");
        assert!(binds.is_empty());
    }

    #[test]
    fn filter_clause_numbers_placeholders_in_order() {
        let filter = ItemFilter {
            category: Some("electronics".to_owned()),
            min_price: Some(dec!(10)),
            max_price: Some(dec!(500)),
            search: Some("laptop".to_owned()),
        };

        let (clause, binds) = filter_clause(&filter);
        assert_eq!(
            clause,
            " WHERE category ILIKE $1 AND price >= $2 AND price <= $3 AND (name ILIKE $4 OR description ILIKE $4)"
        );
        assert_eq!(binds.len(), 4);
    }

    #[test]
    fn search_uses_a_single_bind_for_both_columns() {
        let filter = ItemFilter {
            search: Some("mug".to_owned()),
            ..Default::default()
        };

        let (clause, binds) = filter_clause(&filter);
        assert_eq!(clause, " WHERE (name ILIKE $1 OR description ILIKE $1)");
        assert_eq!(binds.len(), 1);
        assert!(matches!(&binds[0], Bind::Text(pattern) if pattern == "%mug%"));
    }

    #[test]
    fn filter_binds_escape_like_metacharacters() {
        let filter = ItemFilter {
            category: Some("Home_Office".to_owned()),
            search: Some("100% wool".to_owned()),
            ..Default::default()
        };

        let (_, binds) = filter_clause(&filter);
        assert!(matches!(&binds[0], Bind::Text(pattern) if pattern == "%Home\\_Office%"));
        assert!(matches!(&binds[1], Bind::Text(pattern) if pattern == "%100\\% wool%"));
    }

    #[test]
    fn sort_field_is_a_whitelist() {
        assert_eq!(SortField::parse("price"), SortField::Price);
        assert_eq!(SortField::parse("updatedAt"), SortField::UpdatedAt);
        assert_eq!(
            SortField::parse("robert'); DROP TABLE items;--"),
            SortField::CreatedAt
        );
        assert_eq!(SortField::CreatedAt.to_string(), "created_at");
    }

    #[test]
    fn sort_order_defaults_to_descending() {
        assert_eq!(SortOrder::parse("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("upwards"), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.to_string(), "DESC");
    }

    #[test]
    fn pages_clamp_and_compute_offsets() {
        assert_eq!(Page::new(0, 0), Page { number: 1, size: 1 });
        assert_eq!(
            Page::new(-5, 2000),
            Page {
                number: 1,
                size: Page::MAX_SIZE
            }
        );
        assert_eq!(Page::new(2, 20).offset(), 20);
        assert_eq!(Page::new(3, 20).offset(), 40);
        assert_eq!(Page::default().size, Page::DEFAULT_SIZE);
    }

    fn catalog_item(name: &str, category: &str, price: Decimal) -> NewItem {
        NewItem {
            name: name.to_owned(),
            description: format!("{name}, boxed"),
            price,
            category: category.to_owned(),
            image: crate::item::DEFAULT_IMAGE.to_owned(),
            in_stock: true,
            stock: 100,
        }
    }

    #[sqlx::test]
    async fn empty_catalog_price_range_is_zero(pool: Pool<Postgres>) {
        let repository = ItemRepository::new(pool);

        assert_eq!(
            repository.price_range().await.unwrap(),
            (Decimal::ZERO, Decimal::ZERO)
        );

        repository
            .insert(&catalog_item("Coffee Mug", "Home", dec!(19.99)))
            .await
            .unwrap();
        repository
            .insert(&catalog_item("Laptop Pro", "Electronics", dec!(1299.99)))
            .await
            .unwrap();

        assert_eq!(
            repository.price_range().await.unwrap(),
            (dec!(19.99), dec!(1299.99))
        );
    }

    #[sqlx::test]
    async fn percent_in_a_search_matches_literally(pool: Pool<Postgres>) {
        let repository = ItemRepository::new(pool);
        repository
            .insert(&catalog_item("100% Cotton Shirt", "Fashion", dec!(25)))
            .await
            .unwrap();
        repository
            .insert(&catalog_item("1000 Piece Puzzle", "Home", dec!(15)))
            .await
            .unwrap();

        let filter = ItemFilter {
            search: Some("100%".to_owned()),
            ..Default::default()
        };
        let (items, total) = repository
            .list(&filter, SortField::default(), SortOrder::default(), Page::default())
            .await
            .unwrap();

        assert_eq!(total, 1);
        assert_eq!(items[0].name, "100% Cotton Shirt");
    }
}
