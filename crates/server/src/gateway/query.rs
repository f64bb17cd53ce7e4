//! PostgREST request descriptions.
//!
//! A [`Select`], [`Upsert`] or [`Delete`] is plain data: the Supabase backend
//! renders it into query parameters, the in-memory backend evaluates it
//! directly against its tables.

use serde_json::Value;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// One column predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, String),
    Neq(String, String),
    Lt(String, String),
    Lte(String, String),
    Gt(String, String),
    Gte(String, String),
    /// Case-insensitive LIKE with `*` wildcards.
    Ilike(String, String),
    IsNull(String),
    NotNull(String),
    In(String, Vec<String>),
    /// Array column overlaps the list.
    Ov(String, Vec<String>),
    /// Array column contains every value of the list.
    Cs(String, Vec<String>),
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self::Eq(column.to_string(), value.to_string())
    }

    pub fn neq(column: &str, value: impl ToString) -> Self {
        Self::Neq(column.to_string(), value.to_string())
    }

    pub fn lt(column: &str, value: impl ToString) -> Self {
        Self::Lt(column.to_string(), value.to_string())
    }

    pub fn lte(column: &str, value: impl ToString) -> Self {
        Self::Lte(column.to_string(), value.to_string())
    }

    pub fn gt(column: &str, value: impl ToString) -> Self {
        Self::Gt(column.to_string(), value.to_string())
    }

    pub fn gte(column: &str, value: impl ToString) -> Self {
        Self::Gte(column.to_string(), value.to_string())
    }

    pub fn ilike(column: &str, pattern: impl ToString) -> Self {
        Self::Ilike(column.to_string(), pattern.to_string())
    }

    pub fn is_null(column: &str) -> Self {
        Self::IsNull(column.to_string())
    }

    pub fn not_null(column: &str) -> Self {
        Self::NotNull(column.to_string())
    }

    pub fn is_in<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self::In(column.to_string(), values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn overlaps<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self::Ov(column.to_string(), values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn contains<I, V>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self::Cs(column.to_string(), values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Eq(c, _)
            | Self::Neq(c, _)
            | Self::Lt(c, _)
            | Self::Lte(c, _)
            | Self::Gt(c, _)
            | Self::Gte(c, _)
            | Self::Ilike(c, _)
            | Self::IsNull(c)
            | Self::NotNull(c)
            | Self::In(c, _)
            | Self::Ov(c, _)
            | Self::Cs(c, _) => c,
        }
    }

    /// Operator and operand, e.g. `eq.43` or `in.(1,2)`.
    pub fn operand(&self) -> String {
        match self {
            Self::Eq(_, v) => format!("eq.{v}"),
            Self::Neq(_, v) => format!("neq.{v}"),
            Self::Lt(_, v) => format!("lt.{v}"),
            Self::Lte(_, v) => format!("lte.{v}"),
            Self::Gt(_, v) => format!("gt.{v}"),
            Self::Gte(_, v) => format!("gte.{v}"),
            Self::Ilike(_, v) => format!("ilike.{v}"),
            Self::IsNull(_) => "is.null".to_string(),
            Self::NotNull(_) => "not.is.null".to_string(),
            Self::In(_, vs) => format!("in.({})", list_literal(vs)),
            Self::Ov(_, vs) => format!("ov.{{{}}}", list_literal(vs)),
            Self::Cs(_, vs) => format!("cs.{{{}}}", list_literal(vs)),
        }
    }

    /// `column.op.value` form used inside `or=(...)`, where scalar values
    /// with reserved characters must be quoted.
    pub fn inline(&self) -> String {
        let operand = match self {
            Self::Eq(_, v) => format!("eq.{}", quoted(v)),
            Self::Neq(_, v) => format!("neq.{}", quoted(v)),
            Self::Lt(_, v) => format!("lt.{}", quoted(v)),
            Self::Lte(_, v) => format!("lte.{}", quoted(v)),
            Self::Gt(_, v) => format!("gt.{}", quoted(v)),
            Self::Gte(_, v) => format!("gte.{}", quoted(v)),
            Self::Ilike(_, v) => format!("ilike.{}", quoted(v)),
            _ => self.operand(),
        };
        format!("{}.{}", self.column(), operand)
    }
}

/// A value as PostgREST reads it inside a list or logic group.
fn quoted(value: &str) -> String {
    if value.contains([',', '(', ')', '{', '}', '"', '\\', ' ']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

fn list_literal(values: &[String]) -> String {
    values
        .iter()
        .map(|v| quoted(v))
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Ordering and counting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nulls {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
    pub nulls: Option<Nulls>,
}

impl Order {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
            nulls: None,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
            nulls: None,
        }
    }

    pub fn by(column: &str, ascending: bool) -> Self {
        if ascending {
            Self::asc(column)
        } else {
            Self::desc(column)
        }
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(Nulls::Last);
        self
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(Nulls::First);
        self
    }

    fn render(&self) -> String {
        let dir = if self.ascending { "asc" } else { "desc" };
        match self.nulls {
            Some(Nulls::First) => format!("{}.{dir}.nullsfirst", self.column),
            Some(Nulls::Last) => format!("{}.{dir}.nullslast", self.column),
            None => format!("{}.{dir}", self.column),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Count {
    #[default]
    None,
    Exact,
}

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

/// A read against a table or view.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    /// Each group is OR-composed; groups are AND-ed with the filters.
    pub or_groups: Vec<Vec<Filter>>,
    pub orders: Vec<Order>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub count: Count,
    /// Only the count is wanted; no rows are returned.
    pub head: bool,
}

impl Select {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            or_groups: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            count: Count::None,
            head: false,
        }
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an OR group; an empty group is ignored.
    pub fn or(mut self, group: Vec<Filter>) -> Self {
        if !group.is_empty() {
            self.or_groups.push(group);
        }
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// `limit` rows starting at `offset`.
    pub fn range(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn count_exact(mut self) -> Self {
        self.count = Count::Exact;
        self
    }

    /// Count only: `Prefer: count=exact` with no body.
    pub fn head(mut self) -> Self {
        self.count = Count::Exact;
        self.head = true;
        self
    }

    /// Query parameters in PostgREST order, unencoded.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        params.extend(filter_params(&self.filters));
        match self.or_groups.as_slice() {
            [] => {}
            [group] => params.push(("or".to_string(), or_literal(group))),
            groups => {
                let inner = groups
                    .iter()
                    .map(|g| format!("or{}", or_literal(g)))
                    .collect::<Vec<_>>()
                    .join(",");
                params.push(("and".to_string(), format!("({inner})")));
            }
        }
        if !self.orders.is_empty() {
            let order = self.orders.iter().map(Order::render).collect::<Vec<_>>().join(",");
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }

    pub fn to_query_string(&self) -> String {
        encode_params(&self.params())
    }
}

fn or_literal(group: &[Filter]) -> String {
    format!(
        "({})",
        group.iter().map(Filter::inline).collect::<Vec<_>>().join(",")
    )
}

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column().to_string(), f.operand()))
        .collect()
}

pub fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// What happens when an upserted row collides with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// Update the existing row with the given columns.
    #[default]
    Merge,
    /// Keep the existing row untouched.
    Ignore,
}

impl Resolution {
    pub fn prefer(&self) -> &'static str {
        match self {
            Self::Merge => "resolution=merge-duplicates",
            Self::Ignore => "resolution=ignore-duplicates",
        }
    }
}

/// Insert-or-update of one or more rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
    pub table: String,
    pub rows: Vec<Value>,
    /// Conflict target columns; the primary key when `None`.
    pub on_conflict: Option<String>,
    pub resolution: Resolution,
    /// Return the written rows.
    pub returning: bool,
}

impl Upsert {
    pub fn into_table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            rows: Vec::new(),
            on_conflict: None,
            resolution: Resolution::Merge,
            returning: false,
        }
    }

    pub fn row(mut self, row: Value) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Value>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn on_conflict(mut self, columns: &str) -> Self {
        self.on_conflict = Some(columns.to_string());
        self
    }

    pub fn ignore_duplicates(mut self) -> Self {
        self.resolution = Resolution::Ignore;
        self
    }

    pub fn returning(mut self) -> Self {
        self.returning = true;
        self
    }

    pub fn prefer(&self) -> String {
        let ret = if self.returning {
            "return=representation"
        } else {
            "return=minimal"
        };
        format!("{},{ret}", self.resolution.prefer())
    }

    pub fn to_query_string(&self) -> String {
        match &self.on_conflict {
            Some(cols) => encode_params(&[("on_conflict".to_string(), cols.clone())]),
            None => String::new(),
        }
    }
}

/// Delete of every row matching the filters.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filters: Vec<Filter>,
}

impl Delete {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn to_query_string(&self) -> String {
        encode_params(&filter_params(&self.filters))
    }
}
