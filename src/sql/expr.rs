//! Expression AST for search predicates and projections.

use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    Literal(Literal),

    /// Positional bind parameter `$n`.
    Placeholder(usize),

    /// Postgres cast: expr::type
    Cast {
        expr: Box<Expr>,
        type_name: &'static str,
    },

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    Paren(Box<Expr>),

    /// Raw SQL passed through unescaped. Never build from user input.
    Raw(String),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    ILike,
    And,
    Or,
}

// =============================================================================
// Constructors
// =============================================================================

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Bind parameter `$n` (1-based).
pub fn param(n: usize) -> Expr {
    Expr::Placeholder(n)
}

/// OR together `exprs`; `None` when empty.
pub fn any_of(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    exprs.into_iter().reduce(|acc, next| acc.or(next))
}

/// Fluent combinators.
pub trait ExprExt {
    fn and(self, other: Expr) -> Expr;
    fn or(self, other: Expr) -> Expr;
    fn eq(self, other: Expr) -> Expr;
    fn ilike(self, pattern: Expr) -> Expr;
    fn cast_text(self) -> Expr;
    fn paren(self) -> Expr;
}

impl ExprExt for Expr {
    fn and(self, other: Expr) -> Expr {
        binary(self, BinaryOperator::And, other)
    }

    fn or(self, other: Expr) -> Expr {
        binary(self, BinaryOperator::Or, other)
    }

    fn eq(self, other: Expr) -> Expr {
        binary(self, BinaryOperator::Eq, other)
    }

    fn ilike(self, pattern: Expr) -> Expr {
        binary(self, BinaryOperator::ILike, pattern)
    }

    fn cast_text(self) -> Expr {
        Expr::Cast {
            expr: Box::new(self),
            type_name: "text",
        }
    }

    fn paren(self) -> Expr {
        Expr::Paren(Box::new(self))
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

// =============================================================================
// Expression to Tokens
// =============================================================================

impl Expr {
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone()));
                    ts.push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Null => Token::Null,
                });
            }

            Expr::Placeholder(n) => {
                ts.push(Token::Placeholder(*n));
            }

            Expr::Cast { expr, type_name } => {
                ts.append(&expr.to_tokens());
                ts.push(Token::Cast);
                ts.push(Token::TypeName(type_name));
            }

            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens());
                ts.space();
                ts.push(match op {
                    BinaryOperator::Eq => Token::Eq,
                    BinaryOperator::ILike => Token::ILike,
                    BinaryOperator::And => Token::And,
                    BinaryOperator::Or => Token::Or,
                });
                ts.space();
                ts.append(&right.to_tokens());
            }

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens());
                ts.rparen();
            }

            Expr::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }
        }

        ts
    }

    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Highest placeholder index referenced by this expression (0 if none).
    pub fn max_placeholder(&self) -> usize {
        match self {
            Expr::Placeholder(n) => *n,
            Expr::Cast { expr, .. } | Expr::Paren(expr) => expr.max_placeholder(),
            Expr::BinaryOp { left, right, .. } => {
                left.max_placeholder().max(right.max_placeholder())
            }
            Expr::Column { .. } | Expr::Literal(_) | Expr::Raw(_) => 0,
        }
    }
}
