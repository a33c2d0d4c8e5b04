//! Query builder - SELECT branches and UNION ALL composition.

use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.expr.to_tokens();
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A table reference with optional schema.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            schema: None,
            table: table.into(),
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::QualifiedIdent {
            schema: self.schema.clone(),
            name: self.table.clone(),
        });
        ts
    }
}

// =============================================================================
// Query
// =============================================================================

/// A single SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub limit: Option<u64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Highest placeholder index used anywhere in the query.
    pub fn max_placeholder(&self) -> usize {
        let in_select = self
            .select
            .iter()
            .map(|s| s.expr.max_placeholder())
            .max()
            .unwrap_or(0);
        let in_where = self
            .where_clause
            .as_ref()
            .map(Expr::max_placeholder)
            .unwrap_or(0);
        in_select.max(in_where)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.body_tokens();
        push_limit(&mut ts, self.limit);
        ts
    }

    /// Everything but the LIMIT clause.
    fn body_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select);
        for (i, select_expr) in self.select.iter().enumerate() {
            if i == 0 {
                ts.newline().indent(1);
            } else {
                ts.comma().newline().indent(1);
            }
            ts.append(&select_expr.to_tokens());
        }

        if let Some(from) = &self.from {
            ts.newline().push(Token::From).space();
            ts.append(&from.to_tokens());
        }

        if let Some(where_clause) = &self.where_clause {
            ts.newline().push(Token::Where).space();
            ts.append(&where_clause.to_tokens());
        }

        ts
    }

    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

// =============================================================================
// UNION ALL
// =============================================================================

/// Several branches joined with UNION ALL under one optional LIMIT.
///
/// Branches are emitted bare so the statement still starts with `SELECT`;
/// the trailing LIMIT applies to the whole union. Branch-level limits are
/// not rendered.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "UnionAll has no effect until converted to SQL with to_sql()"]
pub struct UnionAll {
    pub branches: Vec<Query>,
    pub limit: Option<u64>,
}

impl UnionAll {
    pub fn new(branches: Vec<Query>) -> Self {
        Self {
            branches,
            limit: None,
        }
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                ts.newline()
                    .push(Token::Union)
                    .space()
                    .push(Token::All)
                    .newline();
            }
            ts.append(&branch.body_tokens());
        }

        push_limit(&mut ts, self.limit);
        ts
    }

    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }
}

/// Append `LIMIT n`. Limits beyond `i64::MAX` saturate.
fn push_limit(ts: &mut TokenStream, limit: Option<u64>) {
    if let Some(limit) = limit {
        let n = i64::try_from(limit).unwrap_or(i64::MAX);
        ts.newline()
            .push(Token::Limit)
            .space()
            .push(Token::LitInt(n));
    }
}

// =============================================================================
// Tests
// =============================================================================
