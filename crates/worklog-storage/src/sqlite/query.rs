//! Parameterized query construction.
//!
//! A [`QueryBuilder`] collects predicates as `(template, values)` pairs. A
//! template is a fixed SQL fragment with one `?` per value; values are always
//! bound, never spliced into the SQL text. Column names passed to helpers are
//! `&'static str` so only compile-time identifiers reach the statement.

use rusqlite::types::Value;

/// SQL function lowercasing text with Unicode rules. SQLite's own `lower` and
/// `LIKE` only fold ASCII letters.
pub(crate) const CASEFOLD_FN: &str = "casefold";

/// One `WHERE` conjunct and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    template: String,
    values: Vec<Value>,
}

/// Assembles a `SELECT` with an AND-ed `WHERE` clause, ordering and paging.
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryBuilder {
    predicates: Vec<Predicate>,
}

impl QueryBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate. The template must contain exactly one `?` per value.
    pub(crate) fn push(&mut self, template: impl Into<String>, values: Vec<Value>) -> &mut Self {
        let template = template.into();
        debug_assert_eq!(
            template.matches('?').count(),
            values.len(),
            "placeholder count mismatch in {template:?}"
        );
        self.predicates.push(Predicate { template, values });
        self
    }

    /// Adds `column IN (?, ?, ...)`. An empty value set adds nothing.
    pub(crate) fn push_in<I, V>(&mut self, column: &'static str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.push(format!("{column} IN ({placeholders})"), values)
    }

    /// Adds a case-insensitive substring match against any of `columns`.
    ///
    /// Both sides are folded with [`CASEFOLD_FN`], which the connection must
    /// register. `%`, `_` and `\` in `needle` match literally.
    pub(crate) fn push_contains_any(
        &mut self,
        columns: &[&'static str],
        needle: &str,
    ) -> &mut Self {
        if columns.is_empty() || needle.is_empty() {
            return self;
        }
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        let template = columns
            .iter()
            .map(|c| format!("{CASEFOLD_FN}({c}) LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let values = vec![Value::from(pattern); columns.len()];
        self.push(format!("({template})"), values)
    }

    /// Returns `true` if no predicate has been added.
    pub(crate) fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Renders the `WHERE` clause (with a leading space) or an empty string.
    pub(crate) fn where_clause(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let conjuncts: Vec<&str> = self.predicates.iter().map(|p| p.template.as_str()).collect();
        format!(" WHERE {}", conjuncts.join(" AND "))
    }

    /// Builds `{select}{where} ORDER BY {order_by}` plus paging, returning the
    /// SQL and its parameters in placeholder order.
    ///
    /// `limit` and `offset` are bound only when positive; SQLite needs a
    /// `LIMIT` before `OFFSET`, so an offset alone uses `LIMIT -1`.
    pub(crate) fn build(
        self,
        select: &str,
        order_by: &str,
        limit: i64,
        offset: i64,
    ) -> (String, Vec<Value>) {
        let mut sql = format!("{select}{} ORDER BY {order_by}", self.where_clause());
        let mut params = self.into_params();

        match (limit > 0, offset > 0) {
            (true, true) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                params.push(Value::from(limit));
                params.push(Value::from(offset));
            }
            (true, false) => {
                sql.push_str(" LIMIT ?");
                params.push(Value::from(limit));
            }
            (false, true) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(Value::from(offset));
            }
            (false, false) => {}
        }
        (sql, params)
    }

    /// Builds `{select}{where}` without ordering or paging.
    pub(crate) fn build_unordered(self, select: &str) -> (String, Vec<Value>) {
        let sql = format!("{select}{}", self.where_clause());
        (sql, self.into_params())
    }

    fn into_params(self) -> Vec<Value> {
        self.predicates.into_iter().flat_map(|p| p.values).collect()
    }
}

/// Escapes `LIKE` metacharacters with `\`.
pub(crate) fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn empty_builder_has_no_where() {
        let (sql, params) = QueryBuilder::new().build("SELECT * FROM t", "id", 0, 0);
        assert_eq!(sql, "SELECT * FROM t ORDER BY id");
        assert!(params.is_empty());
    }

    #[test]
    fn predicates_are_anded_in_order() {
        let mut qb = QueryBuilder::new();
        qb.push_in("status", ["new".to_string(), "done".to_string()])
            .push("status != ?", vec![text("archived")]);
        let (sql, params) = qb.build("SELECT id FROM tasks", "created_at DESC", 0, 0);
        assert_eq!(
            sql,
            "SELECT id FROM tasks WHERE status IN (?, ?) AND status != ? ORDER BY created_at DESC"
        );
        assert_eq!(params, vec![text("new"), text("done"), text("archived")]);
    }

    #[test]
    fn empty_in_set_adds_nothing() {
        let mut qb = QueryBuilder::new();
        qb.push_in("priority", Vec::<String>::new());
        assert!(qb.is_empty());
    }

    #[test]
    fn values_never_reach_sql_text() {
        let hostile = "x' OR 1=1; DROP TABLE tasks; --";
        let mut qb = QueryBuilder::new();
        qb.push_in("status", [hostile.to_string()])
            .push_contains_any(&["title"], hostile);
        let (sql, params) = qb.build("SELECT id FROM tasks", "id", 0, 0);
        assert!(!sql.contains("DROP"));
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], text(hostile));
    }

    #[test]
    fn contains_any_binds_one_pattern_per_column() {
        let mut qb = QueryBuilder::new();
        qb.push_contains_any(&["title", "tags"], "50%_OFF");
        let (sql, params) = qb.build_unordered("SELECT COUNT(*) FROM tasks");
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM tasks WHERE \
             (casefold(title) LIKE ? ESCAPE '\\' OR casefold(tags) LIKE ? ESCAPE '\\')"
        );
        assert_eq!(params, vec![text("%50\\%\\_off%"), text("%50\\%\\_off%")]);
    }

    #[test]
    fn paging_binds_limit_and_offset() {
        let (sql, params) = QueryBuilder::new().build("SELECT id FROM t", "id", 10, 20);
        assert_eq!(sql, "SELECT id FROM t ORDER BY id LIMIT ? OFFSET ?");
        assert_eq!(params, vec![Value::Integer(10), Value::Integer(20)]);

        let (sql, params) = QueryBuilder::new().build("SELECT id FROM t", "id", -1, 5);
        assert_eq!(sql, "SELECT id FROM t ORDER BY id LIMIT -1 OFFSET ?");
        assert_eq!(params, vec![Value::Integer(5)]);

        let (sql, _) = QueryBuilder::new().build("SELECT id FROM t", "id", 0, -3);
        assert_eq!(sql, "SELECT id FROM t ORDER BY id");
    }

    #[test]
    fn escape_like_handles_metacharacters() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}
