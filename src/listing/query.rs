use serde::Serialize;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use super::page::{Page, PageParams};

/// A parameter bound into a generated query.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Text(String),
    Int(i64),
    Uuid(Uuid),
}

#[derive(Debug, Clone)]
enum Cond {
    /// Case-insensitive substring match (`ILIKE '%term%'`, wildcards escaped).
    ContainsCi(&'static str, String),
    /// Exact match.
    Eq(&'static str, Bind),
}

/// SQL builder for the shared list contract: a fixed projection over one
/// table, ANDed typed conditions, newest-first ordering, and offset/limit
/// paging with a matching COUNT(*) under the same WHERE clause.
///
/// Table and column names are compile-time constants supplied by the entity
/// handlers; filter values always travel as bound parameters.
#[derive(Debug)]
pub struct ListQuery {
    table: &'static str,
    columns: &'static [&'static str],
    conds: Vec<Cond>,
    order_desc: &'static str,
    page: Option<PageParams>,
}

impl ListQuery {
    pub fn new(
        table: &'static str,
        columns: &'static [&'static str],
        order_desc: &'static str,
    ) -> Self {
        debug_assert!(is_identifier(table));
        debug_assert!(columns.iter().all(|c| is_identifier(c)));
        debug_assert!(is_identifier(order_desc));
        Self {
            table,
            columns,
            conds: vec![],
            order_desc,
            page: None,
        }
    }

    /// Case-insensitive substring filter; `None` adds nothing.
    pub fn contains(mut self, column: &'static str, term: Option<String>) -> Self {
        if let Some(term) = term {
            self.conds.push(Cond::ContainsCi(column, term));
        }
        self
    }

    pub fn eq_text(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.conds.push(Cond::Eq(column, Bind::Text(value)));
        }
        self
    }

    pub fn eq_uuid(mut self, column: &'static str, value: Option<Uuid>) -> Self {
        if let Some(value) = value {
            self.conds.push(Cond::Eq(column, Bind::Uuid(value)));
        }
        self
    }

    pub fn eq_int(mut self, column: &'static str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.conds.push(Cond::Eq(column, Bind::Int(value)));
        }
        self
    }

    fn page(mut self, params: PageParams) -> Self {
        self.page = Some(params);
        self
    }

    fn where_clause(&self) -> (String, Vec<Bind>) {
        let mut parts = Vec::with_capacity(self.conds.len());
        let mut params = Vec::with_capacity(self.conds.len());
        for cond in &self.conds {
            match cond {
                Cond::ContainsCi(column, term) => {
                    params.push(Bind::Text(format!("%{}%", escape_like(term))));
                    parts.push(format!("\"{}\" ILIKE ${}", column, params.len()));
                }
                Cond::Eq(column, bind) => {
                    params.push(bind.clone());
                    parts.push(format!("\"{}\" = ${}", column, params.len()));
                }
            }
        }
        (parts.join(" AND "), params)
    }

    pub fn select_sql(&self) -> (String, Vec<Bind>) {
        let projection = self
            .columns
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let (where_clause, params) = self.where_clause();

        let mut sql = format!("SELECT {} FROM \"{}\"", projection, self.table);
        if !where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_clause));
        }
        sql.push_str(&format!(" ORDER BY \"{}\" DESC", self.order_desc));
        if let Some(page) = &self.page {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", page.limit(), page.skip()));
        }
        (sql, params)
    }

    pub fn count_sql(&self) -> (String, Vec<Bind>) {
        let (where_clause, params) = self.where_clause();
        let mut sql = format!("SELECT COUNT(*) AS count FROM \"{}\"", self.table);
        if !where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_clause));
        }
        (sql, params)
    }

    /// Run the select without the count (unpaged listings).
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let (sql, params) = self.select_sql();
        let mut q = sqlx::query_as::<_, T>(&sql);
        for p in &params {
            q = bind_query_as(q, p);
        }
        q.fetch_all(pool).await
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (sql, params) = self.count_sql();
        let mut q = sqlx::query(&sql);
        for p in &params {
            q = bind_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        row.try_get("count")
    }

    /// Run select and count under the same filter and assemble the envelope.
    pub async fn fetch_page<T>(
        self,
        pool: &PgPool,
        params: PageParams,
    ) -> Result<Page<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
    {
        let query = self.page(params);
        let data = query.fetch_all::<T>(pool).await?;
        let total = query.count(pool).await?;
        Ok(Page::assemble(data, total, &params))
    }
}

fn bind_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    p: &'q Bind,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match p {
        Bind::Text(s) => q.bind(s),
        Bind::Int(i) => q.bind(*i),
        Bind::Uuid(u) => q.bind(*u),
    }
}

fn bind_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q Bind,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        Bind::Text(s) => q.bind(s),
        Bind::Int(i) => q.bind(*i),
        Bind::Uuid(u) => q.bind(*u),
    }
}

/// Escape LIKE wildcards so filter terms match literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().next().map(|c| c.is_alphabetic() || c == '_').unwrap_or(false)
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ListQuery {
        ListQuery::new("lands", &["id", "name", "area"], "created_at")
    }

    #[test]
    fn bare_query_has_no_where() {
        let (sql, params) = base().select_sql();
        assert_eq!(
            sql,
            "SELECT \"id\", \"name\", \"area\" FROM \"lands\" ORDER BY \"created_at\" DESC"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn conditions_and_paging_compose() {
        let owner = Uuid::new_v4();
        let params = PageParams::new(Some(20), Some(5)).unwrap();
        let (sql, binds) = base()
            .contains("name", Some("kebede".to_string()))
            .eq_text("land_status", Some("RESTRICTED".to_string()))
            .eq_uuid("office_id", Some(owner))
            .page(params)
            .select_sql();

        assert_eq!(
            sql,
            "SELECT \"id\", \"name\", \"area\" FROM \"lands\" \
             WHERE \"name\" ILIKE $1 AND \"land_status\" = $2 AND \"office_id\" = $3 \
             ORDER BY \"created_at\" DESC LIMIT 5 OFFSET 20"
        );
        assert_eq!(binds[0], Bind::Text("%kebede%".to_string()));
        assert_eq!(binds[1], Bind::Text("RESTRICTED".to_string()));
        assert_eq!(binds[2], Bind::Uuid(owner));
    }

    #[test]
    fn none_filters_are_ignored() {
        let (sql, params) = base()
            .contains("name", None)
            .eq_uuid("office_id", None)
            .eq_int("registration_no", None)
            .select_sql();
        assert!(!sql.contains("WHERE"));
        assert!(params.is_empty());
    }

    #[test]
    fn count_shares_the_where_clause() {
        let q = base().contains("name", Some("abc".to_string()));
        let (count_sql, count_params) = q.count_sql();
        assert_eq!(
            count_sql,
            "SELECT COUNT(*) AS count FROM \"lands\" WHERE \"name\" ILIKE $1"
        );
        assert_eq!(count_params.len(), 1);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
