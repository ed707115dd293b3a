//! Criteria-to-query compilation and lookahead pagination.
//!
//! A [`SearchFilter`] collects AND-combined predicates from a sparse
//! criteria object and compiles them into a `SELECT` whose values are all
//! bound parameters. Column and table names come from `'static` strings in
//! this crate, never from callers.

use std::future::Future;

use campus_core::paging::{Page, PageRequest, Window};
use campus_core::search::{id_criterion, prefix_pattern, text_criterion};
use campus_core::types::{Date, DbId};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use crate::error::ModelResult;
use crate::keys::Table;
use crate::DbPool;

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    /// `column = ?` on a numeric identity column.
    Id(&'static str, DbId),
    /// `id <> ?`
    NotId(DbId),
    /// `column LIKE ? ESCAPE '\'` with a prefix pattern.
    Prefix(&'static str, String),
    /// `column = ?` on a text column.
    Text(&'static str, String),
    /// `column = ?` on a date column.
    Date(&'static str, Date),
}

/// AND-combined search predicates over one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    predicates: Vec<Predicate>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on an identity column, only when `value > 0`.
    pub fn id(mut self, column: &'static str, value: Option<DbId>) -> Self {
        if let Some(v) = id_criterion(value) {
            self.predicates.push(Predicate::Id(column, v));
        }
        self
    }

    /// Prefix match on a text column, only when `value` is non-empty.
    pub fn prefix(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = text_criterion(value) {
            self.predicates.push(Predicate::Prefix(column, v.to_owned()));
        }
        self
    }

    /// Exact date match, only when a date is given.
    pub fn date(mut self, column: &'static str, value: Option<Date>) -> Self {
        if let Some(v) = value {
            self.predicates.push(Predicate::Date(column, v));
        }
        self
    }

    /// Exact text match. Always applied, including for empty strings.
    pub fn text_eq(mut self, column: &'static str, value: &str) -> Self {
        self.predicates.push(Predicate::Text(column, value.to_owned()));
        self
    }

    /// Exclude one record by id.
    pub fn exclude_id(mut self, id: DbId) -> Self {
        self.predicates.push(Predicate::NotId(id));
        self
    }

    /// `true` when no predicate participates, i.e. the filter matches every row.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Compile into a query over `table` selecting `columns`, ordered by id.
    pub fn build(self, table: Table, columns: &str, window: Window) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {columns} FROM {} WHERE 1 = 1",
            table.name()
        ));

        for predicate in self.predicates {
            match predicate {
                Predicate::Id(column, value) => {
                    qb.push(" AND ").push(column).push(" = ").push_bind(value);
                }
                Predicate::NotId(value) => {
                    qb.push(" AND id <> ").push_bind(value);
                }
                Predicate::Prefix(column, value) => {
                    qb.push(" AND ")
                        .push(column)
                        .push(" LIKE ")
                        .push_bind(prefix_pattern(&value))
                        .push(" ESCAPE '\\'");
                }
                Predicate::Text(column, value) => {
                    qb.push(" AND ").push(column).push(" = ").push_bind(value);
                }
                Predicate::Date(column, value) => {
                    qb.push(" AND ").push(column).push(" = ").push_bind(value);
                }
            }
        }

        qb.push(" ORDER BY id ASC");

        if let Window::Slice { limit, offset } = window {
            qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
        }

        qb
    }

    /// Run the filter for one page. A page before the first yields no rows
    /// without a store round trip.
    pub async fn fetch<T>(
        self,
        pool: &DbPool,
        table: Table,
        columns: &str,
        page: PageRequest,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let window = page.window();
        if window == Window::Empty {
            return Ok(Vec::new());
        }

        let mut qb = self.build(table, columns, window);
        tracing::debug!(table = table.name(), sql = qb.sql(), "Compiled search");
        qb.build_query_as::<T>().fetch_all(pool).await
    }

    /// First matching row by id, if any.
    pub async fn first<T>(
        self,
        pool: &DbPool,
        table: Table,
        columns: &str,
    ) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut qb = self.build(table, columns, Window::Slice { limit: 1, offset: 0 });
        qb.build_query_as::<T>().fetch_optional(pool).await
    }
}

/// Fetch `page` plus a lookahead of the following page.
///
/// The lookahead rows are discarded; only their count is kept so callers
/// can decide whether to offer a "next" control. Unbounded requests skip
/// the lookahead.
pub async fn paginate<T, F, Fut>(page: PageRequest, mut search: F) -> ModelResult<Page<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = ModelResult<Vec<T>>>,
{
    let items = search(page).await?;
    if page.window() == Window::All {
        return Ok(Page::new(items, 0));
    }
    let next_page_size = search(page.next()).await?.len();
    Ok(Page::new(items, next_page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_selects_everything() {
        let filter = SearchFilter::new().id("id", Some(0)).prefix("name", Some(""));
        assert!(filter.is_empty());

        let qb = filter.build(Table::Colleges, "id, name", Window::All);
        assert_eq!(qb.sql(), "SELECT id, name FROM colleges WHERE 1 = 1 ORDER BY id ASC");
    }

    #[test]
    fn values_never_reach_sql_text() {
        let hostile = "x' OR '1'='1";
        let qb = SearchFilter::new()
            .id("college_id", Some(3))
            .prefix("first_name", Some(hostile))
            .build(
                Table::Students,
                "id",
                Window::Slice {
                    limit: 10,
                    offset: 20,
                },
            );

        let sql = qb.sql();
        assert!(!sql.contains(hostile));
        assert_eq!(
            sql,
            "SELECT id FROM students WHERE 1 = 1 AND college_id = ? \
             AND first_name LIKE ? ESCAPE '\\' ORDER BY id ASC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn exact_predicates_are_always_applied() {
        let qb = SearchFilter::new()
            .text_eq("description", "")
            .exclude_id(4)
            .build(Table::Timetables, "id", Window::All);
        assert_eq!(
            qb.sql(),
            "SELECT id FROM timetables WHERE 1 = 1 AND description = ? AND id <> ? ORDER BY id ASC"
        );
    }

    #[tokio::test]
    async fn unbounded_pages_skip_lookahead() {
        let mut calls = 0;
        let page = paginate(PageRequest::unbounded(), |_| {
            calls += 1;
            async { Ok(vec![1, 2, 3]) }
        })
        .await
        .unwrap();
        assert_eq!(calls, 1);
        assert!(!page.has_next());
        assert_eq!(page.len(), 3);
    }

    #[tokio::test]
    async fn lookahead_counts_following_page() {
        let page = paginate(PageRequest::new(1, 2), |p| async move {
            Ok(if p.page_no == 1 { vec![1, 2] } else { vec![3] })
        })
        .await
        .unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.next_page_size, 1);
        assert!(page.has_next());
    }
}
