//! Criteria query builder: caller-supplied filters turned into a
//! parameterized WHERE clause.
//!
//! Field names are the only caller-influenced text ever rendered into SQL,
//! and they are accepted only when the schema catalog already knows them.
//! Values are always bound as parameters.

use crate::catalog::{self, Table};
use crate::error::{StoreError, StoreResult};
use crate::param::{Param, ParamList};
use rusqlite::ToSql;

/// Comparison operator for a [`Criterion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// column = value
    Eq,
    /// column != value
    Ne,
    /// column > value
    Gt,
    /// column >= value
    Gte,
    /// column < value
    Lt,
    /// column <= value
    Lte,
    /// column LIKE pattern
    Like,
    /// column IN (values...)
    In,
}

impl Op {
    fn as_sql(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Like => "LIKE",
            Op::In => "IN",
        }
    }
}

/// A caller-supplied (field, operator, values) filter.
///
/// The field name is not trusted until it passes the catalog check inside
/// [`build_where_clause`].
#[derive(Debug, Clone)]
pub struct Criterion {
    field: String,
    op: Op,
    values: Vec<Param>,
}

impl Criterion {
    /// Create a criterion with an explicit operator and a single value.
    pub fn new<T: ToSql + Send + Sync + 'static>(
        field: impl Into<String>,
        op: Op,
        value: T,
    ) -> Self {
        Self {
            field: field.into(),
            op,
            values: vec![Param::new(value)],
        }
    }

    /// Equality criterion: field = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(field: impl Into<String>, value: T) -> Self {
        Self::new(field, Op::Eq, value)
    }

    /// Inequality criterion: field != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(field: impl Into<String>, value: T) -> Self {
        Self::new(field, Op::Ne, value)
    }

    /// Greater-than criterion: field > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(field: impl Into<String>, value: T) -> Self {
        Self::new(field, Op::Gt, value)
    }

    /// Less-than criterion: field < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(field: impl Into<String>, value: T) -> Self {
        Self::new(field, Op::Lt, value)
    }

    /// Pattern criterion: field LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(field: impl Into<String>, pattern: T) -> Self {
        Self::new(field, Op::Like, pattern)
    }

    /// List criterion: field IN (values...)
    pub fn in_list<T: ToSql + Send + Sync + 'static>(
        field: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        Self {
            field: field.into(),
            op: Op::In,
            values: values.into_iter().map(Param::new).collect(),
        }
    }

    /// The caller-supplied field name (unvalidated).
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// A rendered WHERE clause with its bound parameters.
#[derive(Debug, Clone)]
pub struct WhereClause {
    sql: String,
    params: ParamList,
}

impl WhereClause {
    /// The clause text, including the leading `WHERE`.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters, in placeholder order.
    pub fn params(&self) -> &ParamList {
        &self.params
    }
}

/// Build a parameterized WHERE clause for `table` from caller criteria.
///
/// The table name is validated as a whole-call precondition; individual
/// criteria with unknown fields are dropped rather than failing the call,
/// so one bad filter narrows a search instead of breaking it.
///
/// An empty criteria collection is an error here: deletion paths must never
/// run without a filter. Read paths that want empty-criteria-means-no-rows
/// semantics check for emptiness before calling.
///
/// When every criterion is dropped, the clause degrades to the no-op
/// predicate `WHERE 1=0` so the statement still parses and matches nothing.
pub fn build_where_clause(table: &str, criteria: &[Criterion]) -> StoreResult<WhereClause> {
    let table = Table::resolve(table)?;
    if criteria.is_empty() {
        return Err(StoreError::validation(
            "at least one search criterion is required",
        ));
    }
    Ok(render(table, criteria))
}

pub(crate) fn render(table: Table, criteria: &[Criterion]) -> WhereClause {
    let mut params = ParamList::new();
    let mut parts: Vec<String> = Vec::new();

    for criterion in criteria {
        if !catalog::is_valid_field(table, &criterion.field) {
            tracing::warn!(
                table = %table,
                field = %criterion.field,
                "dropping criterion with field outside the schema catalog",
            );
            continue;
        }
        if criterion.op == Op::In {
            if criterion.values.is_empty() {
                parts.push("1=0".to_string());
                continue;
            }
            let placeholders: Vec<String> = criterion
                .values
                .iter()
                .map(|v| format!("?{}", params.push_param(v.clone())))
                .collect();
            parts.push(format!(
                "{} IN ({})",
                criterion.field,
                placeholders.join(", ")
            ));
        } else {
            let Some(value) = criterion.values.first() else {
                continue;
            };
            let idx = params.push_param(value.clone());
            parts.push(format!("{} {} ?{}", criterion.field, criterion.op.as_sql(), idx));
        }
    }

    let sql = if parts.is_empty() {
        "WHERE 1=0".to_string()
    } else {
        format!("WHERE {}", parts.join(" AND "))
    };

    WhereClause { sql, params }
}
