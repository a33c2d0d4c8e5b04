//! SQL generation.
//!
//! A small type-safe builder producing PostgreSQL text:
//!
//! - [`token`] - tokens and token streams; all quoting happens here
//! - [`expr`] - expression AST and combinators
//! - [`query`] - SELECT branches and UNION ALL composition

pub mod expr;
pub mod helpers;
pub mod query;
pub mod token;


pub use expr::{
    any_of, col, lit_int, lit_null, lit_str, param, BinaryOperator, Expr, ExprExt, Literal,
};
pub use helpers::{quote_double, quote_string_single};
pub use query::{Query, SelectExpr, TableRef, UnionAll};
pub use token::{Token, TokenStream};
