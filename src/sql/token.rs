//! SQL tokens - the atomic units of SQL output.
//!
//! Everything the builder emits goes through a [`Token`], so quoting of
//! identifiers and literals happens in exactly one place.

use super::helpers::{quote_double, quote_string_single};

/// SQL token.
///
/// Adding a variant forces every serializer match to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    As,
    Union,
    All,
    Limit,
    Null,
    ILike,

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    /// Postgres cast operator `::`
    Cast,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Identifier (table, column, alias), always double-quoted.
    Ident(String),
    /// Qualified identifier: schema.table or just table
    QualifiedIdent {
        schema: Option<String>,
        name: String,
    },
    LitInt(i64),
    LitString(String),
    /// Type name following a cast, emitted as-is.
    TypeName(&'static str),
    /// Positional bind parameter, `$n` (1-based).
    Placeholder(usize),

    // === Escape Hatch ===
    /// Raw SQL passed through unescaped.
    ///
    /// **Never pass user input to this variant.** Only static fragments such
    /// as the `1=0` guard or fixed introspection text belong here.
    Raw(String),
}

impl Token {
    /// Serialize this token to PostgreSQL text.
    pub fn serialize(&self) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::As => "AS".into(),
            Token::Union => "UNION".into(),
            Token::All => "ALL".into(),
            Token::Limit => "LIMIT".into(),
            Token::Null => "NULL".into(),
            Token::ILike => "ILIKE".into(),

            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Eq => "=".into(),
            Token::Cast => "::".into(),

            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "  ".repeat(*n),

            Token::Ident(name) => quote_double(name),
            Token::QualifiedIdent { schema, name } => match schema {
                Some(s) => format!("{}.{}", quote_double(s), quote_double(name)),
                None => quote_double(name),
            },
            Token::LitInt(n) => n.to_string(),
            Token::LitString(s) => quote_string_single(s),
            Token::TypeName(name) => (*name).into(),
            Token::Placeholder(n) => format!("${}", n),

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn serialize(&self) -> String {
        self.tokens.iter().map(Token::serialize).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}
